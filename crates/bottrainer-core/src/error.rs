//! Error types for the BotTrainer console.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the console.
///
/// Every asynchronous boundary terminates in a controller's state machine,
/// so these values are rendered inline rather than propagated to a global
/// handler.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConsoleError {
    /// The remote configuration could not be loaded. Non-fatal: defaults stay in place.
    #[error("Configuration load error: {0}")]
    ConfigLoad(String),

    /// The backend could not be reached or answered with a non-2xx status.
    ///
    /// `message` is propagated verbatim to the user.
    #[error("{message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Malformed user input that must never reach the backend.
    #[error("Invalid {field}: {message}")]
    Validation {
        field: String,
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },
}

impl ConsoleError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a ConfigLoad error
    pub fn config_load(message: impl Into<String>) -> Self {
        Self::ConfigLoad(message.into())
    }

    /// Creates a Transport error
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Creates a Validation error for the named input field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a ConfigLoad error
    pub fn is_config_load(&self) -> bool {
        matches!(self, Self::ConfigLoad(_))
    }

    /// Check if this is a Transport error
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this is a Validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// HTTP status attached to a transport failure, if the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ConsoleError {
    fn from(err: std::io::Error) -> Self {
        Self::ConfigLoad(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for ConsoleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConsoleError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ConsoleError>`.
pub type Result<T> = std::result::Result<T, ConsoleError>;
