//! Container that routes which controller is visible.
//!
//! The console never merges controller state: each tab's controller keeps its
//! own lifecycle, and switching tabs leaves in-flight requests running.

use std::sync::Arc;

use bottrainer_interaction::IntentBackend;
use strum::{Display, EnumIter, EnumString};

use crate::controller::{
    AnalyzeOptions, BatchTestController, ComparisonController, EvaluationController,
    HistoryController, IntentCatalogController, SingleQueryController, Trigger,
};
use crate::session_config::SessionConfigStore;

/// Console tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tab {
    #[default]
    Query,
    Batch,
    #[strum(to_string = "evaluation", serialize = "eval")]
    Evaluation,
    Schema,
    #[strum(to_string = "comparison", serialize = "compare")]
    Comparison,
    History,
}

pub struct Console {
    backend: Arc<dyn IntentBackend>,
    session: Arc<SessionConfigStore>,
    options: AnalyzeOptions,
    active: Tab,
    query: Arc<SingleQueryController>,
    batch: Arc<BatchTestController>,
    evaluation: Arc<EvaluationController>,
    comparison: Arc<ComparisonController>,
    history: Arc<HistoryController>,
    intents: Arc<IntentCatalogController>,
}

impl Console {
    pub fn new(
        backend: Arc<dyn IntentBackend>,
        session: Arc<SessionConfigStore>,
        options: AnalyzeOptions,
    ) -> Self {
        Self {
            query: Arc::new(SingleQueryController::new(
                Arc::clone(&backend),
                Arc::clone(&session),
                options.clone(),
            )),
            batch: Arc::new(BatchTestController::new(Arc::clone(&backend))),
            evaluation: Arc::new(EvaluationController::new(Arc::clone(&backend))),
            comparison: Arc::new(ComparisonController::new(Arc::clone(&backend))),
            history: Arc::new(HistoryController::new(Arc::clone(&backend))),
            intents: Arc::new(IntentCatalogController::new(Arc::clone(&backend))),
            active: Tab::default(),
            backend,
            session,
            options,
        }
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn session(&self) -> &Arc<SessionConfigStore> {
        &self.session
    }

    /// Makes `tab` visible. Showing the history tab re-reads the remote log;
    /// showing the schema tab loads the backend dataset once.
    pub fn select(&mut self, tab: Tab) -> Option<Trigger> {
        tracing::debug!(from = %self.active, to = %tab, "tab selected");
        self.active = tab;
        match tab {
            Tab::History => Some(self.history.refresh()),
            Tab::Schema if self.intents.state().is_idle() => Some(self.intents.load()),
            _ => None,
        }
    }

    /// Replaces the controller behind `tab` with a fresh one.
    ///
    /// Requests still in flight on the old controller finish against a dropped
    /// state and are discarded.
    pub fn remount(&mut self, tab: Tab) {
        let backend = Arc::clone(&self.backend);
        match tab {
            Tab::Query => {
                self.query = Arc::new(SingleQueryController::new(
                    backend,
                    Arc::clone(&self.session),
                    self.options.clone(),
                ))
            }
            Tab::Batch => self.batch = Arc::new(BatchTestController::new(backend)),
            Tab::Evaluation => self.evaluation = Arc::new(EvaluationController::new(backend)),
            Tab::Comparison => self.comparison = Arc::new(ComparisonController::new(backend)),
            Tab::History => self.history = Arc::new(HistoryController::new(backend)),
            Tab::Schema => self.intents = Arc::new(IntentCatalogController::new(backend)),
        }
        tracing::info!(tab = %tab, "tab remounted");
    }

    pub fn query(&self) -> &Arc<SingleQueryController> {
        &self.query
    }

    pub fn batch(&self) -> &Arc<BatchTestController> {
        &self.batch
    }

    pub fn evaluation(&self) -> &Arc<EvaluationController> {
        &self.evaluation
    }

    pub fn comparison(&self) -> &Arc<ComparisonController> {
        &self.comparison
    }

    pub fn history(&self) -> &Arc<HistoryController> {
        &self.history
    }

    pub fn intents(&self) -> &Arc<IntentCatalogController> {
        &self.intents
    }
}
