//! Backend access for the BotTrainer console: the HTTP transport, the
//! backend's request/response contract, and the console settings file.

pub mod backend;
pub mod config;
pub mod transport;

pub use backend::{
    AnalyzeRequest, BatchTestRequest, CompareModelsRequest, EvaluateRequest, HttpIntentBackend,
    IntentBackend, RemoteConfig,
};
pub use config::ConsoleSettings;
pub use transport::{DEFAULT_BASE_URL, TransportClient, TransportError};
