//! Domain models shared by the transport and controller layers.

pub mod conversation;
pub(crate) mod entities;
pub mod history;
pub mod report;
pub mod session;

pub use conversation::{Analysis, ConversationTurn, TurnId, TurnRole};
pub use history::HistoryEntry;
pub use report::{BatchResult, ComparisonReport, EvaluationReport, IntentMetrics, Metrics, ModelScore};
pub use session::{ModelDefaults, ModelKind, SessionConfig};
