use std::sync::Arc;

use bottrainer_core::model::EvaluationReport;
use bottrainer_core::{ConsoleError, RequestState};
use bottrainer_interaction::{EvaluateRequest, IntentBackend};

use super::{LifecycleCell, Trigger, positive_count};

/// Upper bound the console clamps samples-per-intent to.
pub const MAX_SAMPLES_PER_INTENT: u32 = 100;

/// Runs a full evaluation across every intent.
pub struct EvaluationController {
    cell: Arc<LifecycleCell<EvaluationReport>>,
    backend: Arc<dyn IntentBackend>,
}

impl EvaluationController {
    pub fn new(backend: Arc<dyn IntentBackend>) -> Self {
        Self {
            cell: LifecycleCell::new("evaluation"),
            backend,
        }
    }

    pub fn state(&self) -> RequestState<EvaluationReport> {
        self.cell.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.cell.is_running()
    }

    pub fn dismiss(&self) {
        self.cell.dismiss();
    }

    pub fn run(&self, samples_per_intent: i64) -> Result<Trigger, ConsoleError> {
        let request = EvaluateRequest {
            samples_per_intent: positive_count("samples_per_intent", samples_per_intent)?,
        };
        let backend = Arc::clone(&self.backend);
        Ok(self
            .cell
            .launch(async move { backend.evaluate(&request).await }))
    }
}
