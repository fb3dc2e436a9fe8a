use std::sync::Arc;

use bottrainer_core::model::ComparisonReport;
use bottrainer_core::{ConsoleError, RequestState};
use bottrainer_interaction::{CompareModelsRequest, IntentBackend};

use super::{LifecycleCell, Trigger, positive_count};

pub const MAX_INTENTS: u32 = 10;
pub const MAX_SAMPLES_PER_INTENT: u32 = 50;

/// Benchmarks the two configured models against the same generated samples.
pub struct ComparisonController {
    cell: Arc<LifecycleCell<ComparisonReport>>,
    backend: Arc<dyn IntentBackend>,
}

impl ComparisonController {
    pub fn new(backend: Arc<dyn IntentBackend>) -> Self {
        Self {
            cell: LifecycleCell::new("comparison"),
            backend,
        }
    }

    pub fn state(&self) -> RequestState<ComparisonReport> {
        self.cell.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.cell.is_running()
    }

    pub fn dismiss(&self) {
        self.cell.dismiss();
    }

    pub fn run(&self, num_intents: i64, samples_per_intent: i64) -> Result<Trigger, ConsoleError> {
        let request = CompareModelsRequest {
            num_intents: positive_count("num_intents", num_intents)?,
            samples_per_intent: positive_count("samples_per_intent", samples_per_intent)?,
        };
        let backend = Arc::clone(&self.backend);
        Ok(self
            .cell
            .launch(async move { backend.compare_models(&request).await }))
    }
}
