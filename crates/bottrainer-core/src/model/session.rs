//! Session configuration domain models.
//!
//! The session configuration parameterizes every outbound request. It is
//! created with hardcoded fallbacks at startup and overwritten once by the
//! remote config fetch.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Fallback model name for the primary (local Ollama) model kind.
pub const PRIMARY_FALLBACK_MODEL: &str = "gemma3";
/// Fallback model name for the alternate (hosted Gemini) model kind.
pub const ALTERNATE_FALLBACK_MODEL: &str = "gemini-1.5-flash";

/// Which classification model family the backend should use.
///
/// The wire names (`gemma`, `gemini`) are what the backend expects in
/// `model_type` and reports in `llm.default_model`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ModelKind {
    #[default]
    #[serde(rename = "gemma")]
    #[strum(to_string = "gemma", serialize = "primary")]
    Primary,
    #[serde(rename = "gemini")]
    #[strum(to_string = "gemini", serialize = "alternate")]
    Alternate,
}

impl ModelKind {
    /// Name sent to the backend as `model_type`.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Primary => "gemma",
            Self::Alternate => "gemini",
        }
    }

    /// Hardcoded model name used until the backend reports its own default.
    pub fn fallback_model_name(self) -> &'static str {
        match self {
            Self::Primary => PRIMARY_FALLBACK_MODEL,
            Self::Alternate => ALTERNATE_FALLBACK_MODEL,
        }
    }

    /// Maps a backend-reported `default_model` to a kind. Unknown names yield `None`.
    pub fn from_wire(name: &str) -> Option<Self> {
        name.trim().to_ascii_lowercase().parse().ok()
    }
}

/// Last-known default model name for each kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDefaults {
    pub primary: String,
    pub alternate: String,
}

impl ModelDefaults {
    /// Returns the stored default for `kind`.
    pub fn for_kind(&self, kind: ModelKind) -> &str {
        match kind {
            ModelKind::Primary => &self.primary,
            ModelKind::Alternate => &self.alternate,
        }
    }

    /// Overwrites the stored default for `kind`.
    pub fn set(&mut self, kind: ModelKind, name: impl Into<String>) {
        match kind {
            ModelKind::Primary => self.primary = name.into(),
            ModelKind::Alternate => self.alternate = name.into(),
        }
    }
}

impl Default for ModelDefaults {
    fn default() -> Self {
        Self {
            primary: PRIMARY_FALLBACK_MODEL.to_string(),
            alternate: ALTERNATE_FALLBACK_MODEL.to_string(),
        }
    }
}

/// Process-wide session configuration read by every controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Active model kind
    pub model_kind: ModelKind,
    /// Model name sent with analyze requests (user-editable)
    pub model_name: String,
    /// Whether system turns echo the raw analyzed text
    pub show_raw_prompt: bool,
    /// Whether the last config fetch succeeded
    pub connected: bool,
}

impl SessionConfig {
    /// Model name to put on the wire.
    ///
    /// An empty (or whitespace-only) name is replaced by the fallback for the
    /// active kind, so a request never carries a blank model.
    pub fn effective_model_name(&self) -> &str {
        let trimmed = self.model_name.trim();
        if trimmed.is_empty() {
            self.model_kind.fallback_model_name()
        } else {
            trimmed
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        let model_kind = ModelKind::default();
        Self {
            model_kind,
            model_name: model_kind.fallback_model_name().to_string(),
            show_raw_prompt: false,
            connected: false,
        }
    }
}
