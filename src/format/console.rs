//! Human-readable console lines.
//!
//! `[DD/MM/YYYY HH:MM:SS] message {data}`: the timestamp in local time and
//! gray, the message with emphasis applied and painted in the level color,
//! then the record data pretty-printed with two-space indentation.

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use crate::record::LogRecord;

use super::markup::apply_emphasis;

pub const CONSOLE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Render a timestamp in local time as `DD/MM/YYYY HH:MM:SS`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format(CONSOLE_TIME_FORMAT).to_string()
}

/// Render one record as a console line.
pub fn format_line(record: &LogRecord) -> String {
    let date = format!("[{}]", format_timestamp(&record.timestamp)).bright_black();
    let message = apply_emphasis(&record.message).color(record.level.color());

    let mut line = format!("{} {}", date, message);

    if let Some(data) = &record.data {
        let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
        line.push(' ');
        line.push_str(&pretty);
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::markup::strip_emphasis;
    use crate::level::Level;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_record(level: Level, message: &str) -> LogRecord {
        let ts = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
        LogRecord::new(level, message).with_timestamp(ts)
    }

    #[test]
    fn test_timestamp_layout() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 2).unwrap();
        let local = ts.with_timezone(&Local);
        let expected = format!(
            "{:02}/{:02}/{:04} {:02}:{:02}:{:02}",
            chrono::Datelike::day(&local),
            chrono::Datelike::month(&local),
            chrono::Datelike::year(&local),
            chrono::Timelike::hour(&local),
            chrono::Timelike::minute(&local),
            chrono::Timelike::second(&local),
        );
        assert_eq!(format_timestamp(&ts), expected);
        assert_eq!(expected.len(), 19);
    }

    #[test]
    fn test_line_composition() {
        colored::control::set_override(true);
        let record = fixed_record(Level::Info, "Build *done* in _2s_");

        let expected = format!(
            "{} {}",
            format!("[{}]", format_timestamp(&record.timestamp)).bright_black(),
            apply_emphasis(&record.message).color(Level::Info.color())
        );
        assert_eq!(format_line(&record), expected);
        assert!(format_line(&record).contains("\u{1b}[1mdone"));
    }

    #[test]
    fn test_data_is_pretty_printed() {
        let record = fixed_record(Level::Warn, "slow query").with_data(json!({"ms": 812}));
        let line = format_line(&record);
        assert!(line.ends_with(" {\n  \"ms\": 812\n}"));
    }

    #[test]
    fn test_line_without_data() {
        let record = fixed_record(Level::Debug, "tick");
        let line = format_line(&record);
        assert!(!line.contains('{'));
        assert!(strip_emphasis(&line).contains("tick"));
    }
}
