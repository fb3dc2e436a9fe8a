//! Single-query transcript types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Intent value carried by a system turn that records a failed analysis.
pub const ERROR_INTENT: &str = "error";
/// Entity key under which a failed analysis stores its message.
pub const ERROR_ENTITY_KEY: &str = "error";
/// Text shown on a system turn that records a failed analysis.
pub const ERROR_TURN_TEXT: &str = "Error analyzing message";

/// Opaque turn identifier. Unique within a transcript and increasing in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnId(pub u64);

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    System,
}

/// One entry in the single-query transcript. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: TurnId,
    pub role: TurnRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<BTreeMap<String, String>>,
}

impl ConversationTurn {
    /// A user turn carrying only the submitted text.
    pub fn user(id: TurnId, text: impl Into<String>) -> Self {
        Self {
            id,
            role: TurnRole::User,
            text: text.into(),
            intent: None,
            confidence: None,
            entities: None,
        }
    }

    /// A system turn carrying a successful classification of `text`.
    pub fn classified(id: TurnId, text: impl Into<String>, analysis: Analysis) -> Self {
        Self {
            id,
            role: TurnRole::System,
            text: text.into(),
            intent: Some(analysis.intent),
            confidence: Some(analysis.confidence),
            entities: Some(analysis.entities),
        }
    }

    /// A system turn recording a failure as data: sentinel intent, zero
    /// confidence, and the message under the reserved entity key.
    pub fn failed(id: TurnId, message: impl Into<String>) -> Self {
        let mut entities = BTreeMap::new();
        entities.insert(ERROR_ENTITY_KEY.to_string(), message.into());
        Self {
            id,
            role: TurnRole::System,
            text: ERROR_TURN_TEXT.to_string(),
            intent: Some(ERROR_INTENT.to_string()),
            confidence: Some(0.0),
            entities: Some(entities),
        }
    }

    /// True for system turns that record a failed analysis.
    pub fn is_error(&self) -> bool {
        self.role == TurnRole::System && self.intent.as_deref() == Some(ERROR_INTENT)
    }

    /// The failure message stored on an error turn.
    pub fn error_message(&self) -> Option<&str> {
        if !self.is_error() {
            return None;
        }
        self.entities
            .as_ref()
            .and_then(|entities| entities.get(ERROR_ENTITY_KEY))
            .map(String::as_str)
    }
}

/// Result of classifying one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub intent: String,
    pub confidence: f64,
    #[serde(default, deserialize_with = "crate::model::entities::deserialize")]
    pub entities: BTreeMap<String, String>,
}
