//! Application layer for the BotTrainer console.
//!
//! Coordinates the session configuration with the per-tab interaction
//! controllers, each of which drives its own requests against an
//! [`IntentBackend`](bottrainer_interaction::IntentBackend).

pub mod console;
pub mod controller;
pub mod session_config;

pub use console::{Console, Tab};
pub use controller::{
    AnalyzeOptions, BatchRun, BatchTestController, ComparisonController, EvaluationController,
    HistoryController, HistoryView, IntentCatalogController, SingleQueryController, Trigger,
    clamp_input,
};
pub use session_config::SessionConfigStore;
