//! Interaction controllers, one per console tab.
//!
//! Each controller owns an isolated request lifecycle. Controllers share the
//! backend and the session store but no mutable fields with each other, so
//! requests from different tabs may be in flight at the same time.
//!
//! Within one controller at most one request is in flight; a trigger while
//! busy is dropped. Spawned requests hold only a `Weak` reference to their
//! controller's state, so an outcome arriving after the controller is gone is
//! discarded.

pub mod batch_test;
pub mod comparison;
pub mod evaluation;
mod history;
mod intent_catalog;
mod single_query;

pub use batch_test::{BatchRun, BatchTestController};
pub use comparison::ComparisonController;
pub use evaluation::EvaluationController;
pub use history::{HistoryController, HistoryView};
pub use intent_catalog::IntentCatalogController;
pub use single_query::{AnalyzeOptions, SingleQueryController};

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bottrainer_core::{ConsoleError, RequestState};
use tokio::task::JoinHandle;

/// What happened when a controller was triggered.
#[derive(Debug)]
pub enum Trigger {
    /// A request was issued. The handle resolves once its outcome is recorded
    /// (or discarded, if the controller is gone by then).
    Started(JoinHandle<()>),
    /// A request from this controller is already in flight; nothing was issued.
    Busy,
    /// The submitted text was blank; nothing was recorded or issued.
    BlankInput,
}

impl Trigger {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started(_))
    }

    /// Waits for a started request to settle. Returns immediately otherwise.
    pub async fn settled(self) {
        if let Self::Started(handle) = self {
            if let Err(err) = handle.await {
                tracing::error!(error = %err, "controller task failed to complete");
            }
        }
    }
}

/// Rejects counts below one. Input surfaces clamp; this guards everything else.
pub(crate) fn positive_count(field: &'static str, raw: i64) -> Result<u32, ConsoleError> {
    if raw < 1 {
        return Err(ConsoleError::validation(field, format!("must be at least 1, got {raw}")));
    }
    u32::try_from(raw).map_err(|_| ConsoleError::validation(field, format!("{raw} is too large")))
}

/// Clamps a raw numeric input into `[min, max]`, the way the console's inputs do.
pub fn clamp_input(raw: i64, min: u32, max: u32) -> u32 {
    raw.clamp(i64::from(min), i64::from(max)) as u32
}

/// Shared lifecycle state of a single-shot controller.
pub(crate) struct LifecycleCell<T> {
    name: &'static str,
    state: Mutex<RequestState<T>>,
}

impl<T: Clone + Send + 'static> LifecycleCell<T> {
    pub(crate) fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            state: Mutex::new(RequestState::Idle),
        })
    }

    fn lock(&self) -> MutexGuard<'_, RequestState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn snapshot(&self) -> RequestState<T> {
        self.lock().clone()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.lock().is_running()
    }

    pub(crate) fn dismiss(&self) {
        self.lock().dismiss();
    }

    /// Enters `Running` and spawns `request`, unless already running.
    ///
    /// The future is only polled if the lifecycle accepted the trigger.
    pub(crate) fn launch<F, E>(self: &Arc<Self>, request: F) -> Trigger
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
        E: ToString + Send + 'static,
    {
        if !self.lock().begin() {
            tracing::debug!(controller = self.name, "request already in flight, trigger dropped");
            return Trigger::Busy;
        }
        tracing::info!(controller = self.name, "request started");

        let name = self.name;
        let cell = Arc::downgrade(self);
        Trigger::Started(tokio::spawn(async move {
            let outcome = request.await;
            let Some(cell) = cell.upgrade() else {
                tracing::debug!(controller = name, "controller torn down, discarding outcome");
                return;
            };
            match &outcome {
                Ok(_) => tracing::info!(controller = name, "request succeeded"),
                Err(err) => {
                    tracing::warn!(controller = name, error = %err.to_string(), "request failed")
                }
            }
            cell.lock().settle(outcome);
        }))
    }
}
