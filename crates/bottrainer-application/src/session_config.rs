//! Session configuration store.
//!
//! The only shared mutable state in the console. Mutations are synchronous
//! and visible to the next request any controller issues.
//!
//! `bootstrap` races user edits: a `set_model_name` issued before the config
//! fetch resolves is overwritten by the fetched default. This ordering is
//! allowed and left visible rather than serialized away.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bottrainer_core::ConsoleError;
use bottrainer_core::model::{ModelDefaults, ModelKind, SessionConfig};
use bottrainer_interaction::{IntentBackend, RemoteConfig};
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct StoreInner {
    config: SessionConfig,
    defaults: ModelDefaults,
}

/// Process-wide session configuration, shared by reference with every controller.
#[derive(Debug, Default)]
pub struct SessionConfigStore {
    inner: RwLock<StoreInner>,
}

impl SessionConfigStore {
    /// Creates a store holding the hardcoded fallbacks, disconnected.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> SessionConfig {
        self.read().config.clone()
    }

    /// Last-known default model name per kind.
    pub fn defaults(&self) -> ModelDefaults {
        self.read().defaults.clone()
    }

    // ============================================================================
    // User mutations
    // ============================================================================

    /// Switches the active kind and resets the model name to that kind's default,
    /// discarding any manual edit.
    pub fn set_model_kind(&self, kind: ModelKind) {
        let mut inner = self.write();
        let name = inner.defaults.for_kind(kind).to_string();
        inner.config.model_kind = kind;
        inner.config.model_name = name;
        tracing::debug!(kind = %kind, model = %inner.config.model_name, "model kind switched");
    }

    /// Overwrites the model name. Empty names are stored as-is and replaced by
    /// the kind's fallback when a request is built.
    pub fn set_model_name(&self, name: impl Into<String>) {
        self.write().config.model_name = name.into();
    }

    pub fn set_show_raw_prompt(&self, show: bool) {
        self.write().config.show_raw_prompt = show;
    }

    // ============================================================================
    // Bootstrap
    // ============================================================================

    /// Merges a fetched remote config and marks the session connected.
    pub fn apply_remote(&self, remote: &RemoteConfig) {
        let mut inner = self.write();
        for kind in [ModelKind::Primary, ModelKind::Alternate] {
            if let Some(name) = remote.model_name_for(kind) {
                inner.defaults.set(kind, name);
            }
        }
        if let Some(kind) = remote.default_kind() {
            inner.config.model_kind = kind;
        }
        let active = inner.config.model_kind;
        inner.config.model_name = inner.defaults.for_kind(active).to_string();
        inner.config.connected = true;
    }

    fn mark_disconnected(&self) {
        self.write().config.connected = false;
    }

    /// Fetches `/config` once and merges it.
    ///
    /// On failure the current values stay in place, the session is marked
    /// disconnected, and the error is returned for logging only.
    pub async fn bootstrap(&self, backend: &dyn IntentBackend) -> Result<(), ConsoleError> {
        match backend.fetch_config().await {
            Ok(remote) => {
                self.apply_remote(&remote);
                let config = self.snapshot();
                tracing::info!(
                    kind = %config.model_kind,
                    model = %config.model_name,
                    "remote config loaded"
                );
                Ok(())
            }
            Err(err) => {
                self.mark_disconnected();
                tracing::warn!(error = %err, "could not load remote config, using defaults");
                Err(ConsoleError::config_load(err.message))
            }
        }
    }

    /// Runs [`bootstrap`](Self::bootstrap) in the background so startup never waits on it.
    pub fn spawn_bootstrap(self: &Arc<Self>, backend: Arc<dyn IntentBackend>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            // Failure is already logged and reflected in `connected`.
            let _ = store.bootstrap(backend.as_ref()).await;
        })
    }
}
