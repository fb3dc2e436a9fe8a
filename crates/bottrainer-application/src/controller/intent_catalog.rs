use std::sync::Arc;

use bottrainer_core::RequestState;
use bottrainer_core::schema::IntentDataset;
use bottrainer_interaction::IntentBackend;

use super::{LifecycleCell, Trigger};

/// Read-only view of the backend's `/intents` dataset.
///
/// Optional: older backends do not serve it, in which case the built-in
/// catalog is all the console shows.
pub struct IntentCatalogController {
    cell: Arc<LifecycleCell<IntentDataset>>,
    backend: Arc<dyn IntentBackend>,
}

impl IntentCatalogController {
    pub fn new(backend: Arc<dyn IntentBackend>) -> Self {
        Self {
            cell: LifecycleCell::new("intent_catalog"),
            backend,
        }
    }

    pub fn state(&self) -> RequestState<IntentDataset> {
        self.cell.snapshot()
    }

    pub fn dismiss(&self) {
        self.cell.dismiss();
    }

    pub fn load(&self) -> Trigger {
        let backend = Arc::clone(&self.backend);
        self.cell.launch(async move { backend.intents().await })
    }
}
