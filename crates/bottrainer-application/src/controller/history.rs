use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bottrainer_core::model::HistoryEntry;
use bottrainer_interaction::{IntentBackend, TransportError};

use super::Trigger;

/// Read-through cache of the backend's prediction log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryView {
    /// Entries as received, newest first.
    pub entries: Vec<HistoryEntry>,
    /// A refresh or clear is in flight.
    pub busy: bool,
    /// At least one refresh has completed successfully.
    pub loaded: bool,
    /// Message of the most recent failed refresh, cleared by the next success.
    pub last_error: Option<String>,
}

/// Refreshes and clears the remote prediction history.
///
/// A failed refresh keeps the previous entries. `clear` always re-reads after
/// the delete, whatever the delete reported.
pub struct HistoryController {
    state: Arc<Mutex<HistoryView>>,
    backend: Arc<dyn IntentBackend>,
}

impl HistoryController {
    pub fn new(backend: Arc<dyn IntentBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(HistoryView::default())),
            backend,
        }
    }

    pub fn view(&self) -> HistoryView {
        lock(&self.state).clone()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.state).busy
    }

    fn try_begin(&self) -> bool {
        let mut view = lock(&self.state);
        if view.busy {
            tracing::debug!("history request already in flight, trigger dropped");
            return false;
        }
        view.busy = true;
        true
    }

    /// Replaces the cache with a fresh read of the remote log.
    pub fn refresh(&self) -> Trigger {
        if !self.try_begin() {
            return Trigger::Busy;
        }
        let backend = Arc::clone(&self.backend);
        let state = Arc::downgrade(&self.state);
        Trigger::Started(tokio::spawn(async move {
            let outcome = backend.history().await;
            if let Some(state) = state.upgrade() {
                apply_refresh(&state, outcome);
            } else {
                tracing::debug!("history view torn down, discarding refresh");
            }
        }))
    }

    /// Deletes the remote log, then refreshes.
    pub fn clear(&self) -> Trigger {
        if !self.try_begin() {
            return Trigger::Busy;
        }
        let backend = Arc::clone(&self.backend);
        let state = Arc::downgrade(&self.state);
        Trigger::Started(tokio::spawn(async move {
            match backend.clear_history().await {
                Ok(()) => tracing::info!("history cleared"),
                Err(err) => {
                    tracing::warn!(error = %err, "history clear reported failure, refreshing anyway")
                }
            }
            let outcome = backend.history().await;
            if let Some(state) = state.upgrade() {
                apply_refresh(&state, outcome);
            } else {
                tracing::debug!("history view torn down, discarding refresh");
            }
        }))
    }
}

fn apply_refresh(
    state: &Mutex<HistoryView>,
    outcome: Result<Vec<HistoryEntry>, TransportError>,
) {
    let mut view = lock(state);
    match outcome {
        Ok(entries) => {
            tracing::debug!(count = entries.len(), "history refreshed");
            view.entries = entries;
            view.loaded = true;
            view.last_error = None;
        }
        Err(err) => {
            tracing::warn!(error = %err, "history refresh failed, keeping cached entries");
            view.last_error = Some(err.message);
        }
    }
    view.busy = false;
}

fn lock(state: &Mutex<HistoryView>) -> MutexGuard<'_, HistoryView> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
