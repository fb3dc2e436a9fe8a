use std::sync::Arc;

use bottrainer_core::model::BatchResult;
use bottrainer_core::{ConsoleError, RequestState, schema};
use bottrainer_interaction::{BatchTestRequest, IntentBackend, TransportError};

use super::{LifecycleCell, Trigger, positive_count};

/// Upper bound the console clamps the sample count to.
pub const MAX_SAMPLES: u32 = 50;

/// Results of one batch run, tagged with the intent they were generated for.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRun {
    pub target_intent: String,
    pub results: Vec<BatchResult>,
}

/// Generates synthetic utterances for one intent and classifies each.
pub struct BatchTestController {
    cell: Arc<LifecycleCell<BatchRun>>,
    backend: Arc<dyn IntentBackend>,
}

impl BatchTestController {
    pub fn new(backend: Arc<dyn IntentBackend>) -> Self {
        Self {
            cell: LifecycleCell::new("batch_test"),
            backend,
        }
    }

    pub fn state(&self) -> RequestState<BatchRun> {
        self.cell.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.cell.is_running()
    }

    pub fn dismiss(&self) {
        self.cell.dismiss();
    }

    /// Starts a batch run. Unknown intents and non-positive counts are
    /// rejected before anything is sent.
    pub fn run(&self, intent: &str, num_samples: i64) -> Result<Trigger, ConsoleError> {
        let definition = schema::find(intent).ok_or_else(|| {
            ConsoleError::validation("intent", format!("unknown intent '{intent}'"))
        })?;
        let num_samples = positive_count("num_samples", num_samples)?;

        let target_intent = definition.name;
        let backend = Arc::clone(&self.backend);
        Ok(self.cell.launch(async move {
            let request = BatchTestRequest {
                intent: target_intent,
                num_samples,
            };
            let results = backend.batch_test(&request).await?;
            Ok::<_, TransportError>(BatchRun {
                target_intent: target_intent.to_string(),
                results,
            })
        }))
    }
}
