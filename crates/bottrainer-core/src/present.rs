//! Presentation adapters.
//!
//! Pure functions from stored results to display values. Nothing here
//! mutates or caches controller state; every value is derived on read.

use serde::Serialize;
use strum::Display;

use crate::model::{BatchResult, ComparisonReport, IntentMetrics, Metrics};

/// Lower bound (inclusive) of the "good" band.
pub const GOOD_THRESHOLD: f64 = 0.8;
/// Lower bound (inclusive) of the "moderate" band.
pub const MODERATE_THRESHOLD: f64 = 0.5;

/// Quality band of a score in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Band {
    Good,
    Moderate,
    Poor,
}

/// Bands a score: `>= 0.8` good, `>= 0.5` moderate, otherwise poor.
pub fn band(value: f64) -> Band {
    if value >= GOOD_THRESHOLD {
        Band::Good
    } else if value >= MODERATE_THRESHOLD {
        Band::Moderate
    } else {
        Band::Poor
    }
}

/// Bands for the three per-intent scores of an evaluation row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricBands {
    pub precision: Band,
    pub recall: Band,
    pub f1: Band,
}

impl MetricBands {
    pub fn of(metrics: &IntentMetrics) -> Self {
        Self {
            precision: band(metrics.precision),
            recall: band(metrics.recall),
            f1: band(metrics.f1),
        }
    }
}

/// Renders a fraction as a percentage, e.g. `0.73` → `"73.0%"` with one decimal.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// Display form of an intent label. Only the first underscore becomes a space.
pub fn humanize_intent(intent: &str) -> String {
    intent.replacen('_', " ", 1)
}

// ============================================================================
// Batch testing
// ============================================================================

/// A batch row matches iff the predicted intent equals the target exactly.
pub fn matches_target(result: &BatchResult, target_intent: &str) -> bool {
    result.predicted_intent == target_intent
}

/// Match flag for every row, in order.
pub fn match_flags(results: &[BatchResult], target_intent: &str) -> Vec<bool> {
    results
        .iter()
        .map(|result| matches_target(result, target_intent))
        .collect()
}

/// `(matched, total)` for a batch run.
pub fn match_summary(results: &[BatchResult], target_intent: &str) -> (usize, usize) {
    let matched = results
        .iter()
        .filter(|result| matches_target(result, target_intent))
        .count();
    (matched, results.len())
}

// ============================================================================
// Model comparison
// ============================================================================

/// Unweighted mean of accuracy, precision, recall and F1.
pub fn composite_score(metrics: &Metrics) -> f64 {
    (metrics.accuracy + metrics.precision + metrics.recall + metrics.f1) / 4.0
}

/// Side of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    ModelA,
    ModelB,
}

/// The side with the strictly higher composite score; `None` on a tie.
pub fn winner(report: &ComparisonReport) -> Option<Side> {
    let a = composite_score(&report.model_a.metrics);
    let b = composite_score(&report.model_b.metrics);
    if a > b {
        Some(Side::ModelA)
    } else if b > a {
        Some(Side::ModelB)
    } else {
        None
    }
}
