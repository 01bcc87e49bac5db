//! JSON line formatter for file sinks.
//!
//! The whole record is written as one compact JSON object, markup untouched.

use crate::record::LogRecord;

/// Serialize a record as a single JSON line (no trailing newline).
pub fn format_json(record: &LogRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

/// Parse a line written by [`format_json`].
pub fn parse_json(line: &str) -> Result<LogRecord, serde_json::Error> {
    serde_json::from_str(line)
}
