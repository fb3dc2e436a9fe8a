//! Domain layer of the BotTrainer console.
//!
//! Holds the session and result models, the request lifecycle shared by the
//! controllers, the error taxonomy, and the pure presentation adapters. This
//! crate performs no I/O.

pub mod error;
pub mod lifecycle;
pub mod model;
pub mod present;
pub mod schema;

pub use error::{ConsoleError, Result};
pub use lifecycle::RequestState;
