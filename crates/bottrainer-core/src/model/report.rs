//! Result shapes for batch testing, evaluation and model comparison.
//!
//! Each report is produced atomically by one request and replaces the
//! previous one wholesale. Scores are fractions in `[0, 1]`.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============================================================================
// Batch testing
// ============================================================================

/// One generated utterance and its prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub text: String,
    pub predicted_intent: String,
    pub confidence: f64,
    #[serde(default, deserialize_with = "crate::model::entities::deserialize")]
    pub entities: BTreeMap<String, String>,
}

// ============================================================================
// Evaluation
// ============================================================================

/// Per-intent classification metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentMetrics {
    pub precision: f64,
    pub recall: f64,
    #[serde(alias = "f1-score")]
    pub f1: f64,
    #[serde(default, deserialize_with = "deserialize_support")]
    pub support: u32,
}

/// Outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub overall_accuracy: f64,
    /// Keyed by intent name. Entries that are not metric objects (such as a
    /// bare `accuracy` scalar) are skipped.
    #[serde(rename = "classification_report", deserialize_with = "deserialize_report")]
    pub per_intent: BTreeMap<String, IntentMetrics>,
}

fn deserialize_support<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    // Reports built with scikit-learn carry support as a float.
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if raw.is_finite() && raw >= 0.0 {
        Ok(raw.round() as u32)
    } else {
        Err(D::Error::custom(format!("support must be non-negative, got {raw}")))
    }
}

fn deserialize_report<'de, D>(deserializer: D) -> Result<BTreeMap<String, IntentMetrics>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    let mut report = BTreeMap::new();
    for (intent, value) in raw {
        if !value.is_object() {
            continue;
        }
        let metrics = serde_json::from_value::<IntentMetrics>(value)
            .map_err(|err| D::Error::custom(format!("metrics for '{intent}': {err}")))?;
        report.insert(intent, metrics);
    }
    Ok(report)
}

// ============================================================================
// Model comparison
// ============================================================================

/// Aggregate metrics for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Metrics for one side of a comparison together with the key the backend used for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelScore {
    pub label: String,
    pub metrics: Metrics,
}

/// Side-by-side metrics for the two compared models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub model_a: ModelScore,
    pub model_b: ModelScore,
}

/// Key pairs the backend has used for the two sides, first match wins.
const COMPARISON_KEYS: &[(&str, &str)] = &[
    ("gemma", "qwen"),
    ("gemma", "gemini"),
    ("modelA_metrics", "modelB_metrics"),
    ("model_a", "model_b"),
];

impl<'de> Deserialize<'de> for ComparisonReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        for (key_a, key_b) in COMPARISON_KEYS {
            if raw.contains_key(*key_a) && raw.contains_key(*key_b) {
                let take = |raw: &mut BTreeMap<String, Value>, key: &str| -> Result<ModelScore, D::Error> {
                    let value = raw.remove(key).unwrap_or(Value::Null);
                    let metrics = serde_json::from_value::<Metrics>(value)
                        .map_err(|err| D::Error::custom(format!("metrics for '{key}': {err}")))?;
                    Ok(ModelScore {
                        label: key.to_string(),
                        metrics,
                    })
                };
                let model_a = take(&mut raw, key_a)?;
                let model_b = take(&mut raw, key_b)?;
                return Ok(Self { model_a, model_b });
            }
        }
        let found: Vec<&str> = raw.keys().map(String::as_str).collect();
        Err(D::Error::custom(format!(
            "comparison response has no recognised model keys (found: {})",
            found.join(", ")
        )))
    }
}
