//! Remote query history entries.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// One logged analysis, as reported by the backend's history store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// ISO-8601 instant, with or without an offset
    pub timestamp: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub intent: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl HistoryEntry {
    /// Parses the timestamp as local wall-clock time.
    ///
    /// Offsets are dropped; the backend writes naive local timestamps.
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(&self.timestamp) {
            return Some(with_offset.naive_local());
        }
        NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f").ok()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_naive_python_isoformat() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"timestamp":"2025-03-01T14:05:09.123456","input":"hi","model":"gemma3","intent":"greeting","confidence":0.92}"#,
        )
        .unwrap();
        let at = entry.recorded_at().unwrap();
        assert_eq!(at.hour(), 14);
        assert_eq!(at.minute(), 5);
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let entry = HistoryEntry {
            timestamp: "2025-03-01T14:05:09+02:00".to_string(),
            input: String::new(),
            model: String::new(),
            intent: String::new(),
            confidence: None,
        };
        assert_eq!(entry.recorded_at().unwrap().hour(), 14);
    }

    #[test]
    fn tolerates_null_fields() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"timestamp":"bogus","input":null,"model":null,"intent":"unknown","confidence":null}"#,
        )
        .unwrap();
        assert_eq!(entry.input, "");
        assert_eq!(entry.model, "");
        assert!(entry.confidence.is_none());
        assert!(entry.recorded_at().is_none());
    }
}
