//! Severity levels.
//!
//! The table is fixed: error, warn, info, success, debug, with lower
//! priorities being more severe. Each level carries the color the console
//! formatter paints its message with.

use std::fmt;
use std::str::FromStr;

use colored::Color;
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warn,
    Info,
    Success,
    Debug,
}

impl Level {
    /// All levels in priority order, most severe first.
    pub const ALL: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Success,
        Level::Debug,
    ];

    pub fn priority(self) -> u8 {
        match self {
            Level::Error => 0,
            Level::Warn => 1,
            Level::Info => 2,
            Level::Success => 3,
            Level::Debug => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Success => "success",
            Level::Debug => "debug",
        }
    }

    /// Console color for messages at this level.
    pub fn color(self) -> Color {
        match self {
            Level::Error => Color::Red,
            Level::Warn => Color::Yellow,
            Level::Info => Color::Cyan,
            Level::Success => Color::Green,
            Level::Debug => Color::BrightBlack,
        }
    }

    /// Whether a record at `self` passes a sink whose threshold is `threshold`.
    pub fn admitted_by(self, threshold: Level) -> bool {
        self.priority() <= threshold.priority()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LogError::UnknownLevel(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priorities_are_ordered() {
        let priorities: Vec<u8> = Level::ALL.iter().map(|l| l.priority()).collect();
        assert_eq!(priorities, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("success".parse::<Level>().unwrap(), Level::Success);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert!(matches!(
            "verbose".parse::<Level>(),
            Err(LogError::UnknownLevel(name)) if name == "verbose"
        ));
    }

    #[test]
    fn test_admitted_by() {
        assert!(Level::Error.admitted_by(Level::Info));
        assert!(Level::Info.admitted_by(Level::Info));
        assert!(!Level::Debug.admitted_by(Level::Info));
        assert!(Level::Debug.admitted_by(Level::Debug));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Level::Success).unwrap(), "\"success\"");
        let level: Level = serde_json::from_str("\"debug\"").unwrap();
        assert_eq!(level, Level::Debug);
    }
}
