//! Log record model.
//!
//! A record is built once per emit call and handed to every sink by
//! reference, so sinks can format it but never change it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::level::Level;

/// String-keyed JSON object used for both session and data.
pub type Fields = Map<String, Value>;

/// A single log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub level: Level,

    /// Human-readable message; may embed `*bold*` and `_italic_` markup.
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// RFC 3339 with millisecond precision on the wire.
    #[serde(with = "millis_rfc3339")]
    pub timestamp: DateTime<Utc>,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            data: None,
            session: None,
            tags: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_session(mut self, session: Value) -> Self {
        self.session = Some(session);
        self
    }

    /// Attach tags; an empty list leaves the record untagged.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        if !tags.is_empty() {
            self.tags = Some(tags);
        }
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Shallow merge: keys of `overlay` replace keys of `base`, nested objects
/// included.
pub fn merge_fields(base: Option<&Fields>, overlay: &Fields) -> Fields {
    let mut merged = base.cloned().unwrap_or_default();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

mod millis_rfc3339 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_json_shape() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 29, 12, 30, 5).unwrap();
        let record = LogRecord::new(Level::Info, "Connected")
            .with_data(json!({"peer": "abc"}))
            .with_timestamp(ts);

        let line = serde_json::to_string(&record).unwrap();
        assert!(line.contains("\"level\":\"info\""));
        assert!(line.contains("\"message\":\"Connected\""));
        assert!(line.contains("\"timestamp\":\"2026-01-29T12:30:05.000Z\""));
        assert!(!line.contains("session"));
        assert!(!line.contains("tags"));

        let parsed: LogRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_empty_tags_are_dropped() {
        let record = LogRecord::new(Level::Debug, "x").with_tags(Vec::new());
        assert!(record.tags.is_none());
    }

    #[test]
    fn test_merge_is_shallow() {
        let base = fields(json!({"user": {"id": 1, "name": "ana"}, "region": "eu"}));
        let overlay = fields(json!({"user": {"id": 2}}));

        let merged = merge_fields(Some(&base), &overlay);
        assert_eq!(Value::Object(merged), json!({"user": {"id": 2}, "region": "eu"}));
    }

    #[test]
    fn test_merge_keeps_key_position() {
        let base = fields(json!({"a": 1, "b": 2}));
        let overlay = fields(json!({"a": 3, "c": 4}));

        let merged = merge_fields(Some(&base), &overlay);
        let keys: Vec<&str> = merged.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }
}
