//! Built-in intent schema.
//!
//! The ten intents the backend is trained on. The names double as the fixed
//! set of targets accepted by batch testing.

use serde::{Deserialize, Serialize};

/// Definition of one supported intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntentDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub examples: &'static [&'static str],
    pub entities: &'static [&'static str],
}

const INTENT_SCHEMA: &[IntentDefinition] = &[
    IntentDefinition {
        name: "greeting",
        description: "User initiates conversation with a greeting",
        examples: &["Hello", "Hi there", "Good morning", "Hey"],
        entities: &["time_of_day"],
    },
    IntentDefinition {
        name: "farewell",
        description: "User ends the conversation",
        examples: &["Goodbye", "See you later", "Thanks, bye", "Have a nice day"],
        entities: &[],
    },
    IntentDefinition {
        name: "help_request",
        description: "User asks for assistance or support",
        examples: &["I need help", "Can you assist me?", "Having an issue", "Support needed"],
        entities: &["issue_type", "urgency"],
    },
    IntentDefinition {
        name: "order_status",
        description: "User inquires about their order",
        examples: &["Where is my order?", "Track my package", "Order status", "When will it arrive?"],
        entities: &["order_id", "product_name"],
    },
    IntentDefinition {
        name: "product_inquiry",
        description: "User asks about a product or service",
        examples: &["Tell me about this product", "What are the features?", "How much does it cost?"],
        entities: &["product_name", "attribute"],
    },
    IntentDefinition {
        name: "complaint",
        description: "User expresses dissatisfaction",
        examples: &["This is unacceptable", "I want to file a complaint", "Very disappointed"],
        entities: &["issue_type", "product_name"],
    },
    IntentDefinition {
        name: "feedback",
        description: "User provides feedback about experience",
        examples: &["Great service!", "Could be better", "I have some suggestions"],
        entities: &["sentiment", "topic"],
    },
    IntentDefinition {
        name: "booking",
        description: "User wants to make a reservation or appointment",
        examples: &["Book a table", "Schedule a meeting", "Reserve for tomorrow"],
        entities: &["date", "time", "party_size"],
    },
    IntentDefinition {
        name: "cancellation",
        description: "User wants to cancel an order or booking",
        examples: &["Cancel my order", "I need to cancel", "Remove my reservation"],
        entities: &["order_id", "booking_id"],
    },
    IntentDefinition {
        name: "payment",
        description: "User has payment-related queries",
        examples: &["Payment failed", "How do I pay?", "Refund request", "Payment methods"],
        entities: &["payment_method", "amount"],
    },
];

/// All supported intents, in display order.
pub fn all() -> &'static [IntentDefinition] {
    INTENT_SCHEMA
}

/// Looks up an intent by exact name.
pub fn find(name: &str) -> Option<&'static IntentDefinition> {
    INTENT_SCHEMA.iter().find(|intent| intent.name == name)
}

/// Intent names, in display order.
pub fn names() -> impl Iterator<Item = &'static str> {
    INTENT_SCHEMA.iter().map(|intent| intent.name)
}

/// An intent as served by the backend's `/intents` dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIntent {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
    #[serde(default)]
    pub entities: Vec<String>,
}

/// Body of `GET /intents`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentDataset {
    pub intents: Vec<RemoteIntent>,
}

impl IntentDataset {
    /// Names the backend knows about that are missing from the built-in catalog.
    pub fn unknown_to_catalog(&self) -> Vec<&str> {
        self.intents
            .iter()
            .map(|intent| intent.name.as_str())
            .filter(|name| find(name).is_none())
            .collect()
    }
}
