//! Sink configuration.
//!
//! Everything has a default, so an empty JSON object (or no environment
//! variables at all) yields a console sink that prints every level and a file
//! sink rotating daily at 20 MiB.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{LogError, Result};
use crate::level::Level;

pub const DEFAULT_DATE_PATTERN: &str = "YYYY-MM-DD";
pub const DEFAULT_MAX_SIZE: u64 = 20 * 1024 * 1024;

const ENV_DATE_PATTERN: &str = "CONTEXTLOG_DATE_PATTERN";
const ENV_MAX_SIZE: &str = "CONTEXTLOG_MAX_SIZE";
const ENV_CONSOLE_LEVEL: &str = "CONTEXTLOG_CONSOLE_LEVEL";
const ENV_FILE_LEVEL: &str = "CONTEXTLOG_FILE_LEVEL";

/// Configuration for both sinks of a logger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub console: ConsoleConfig,
    pub file: FileSinkConfig,
}

impl LoggerConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.file.strftime_pattern()?;
        Ok(config)
    }

    /// Defaults overridden by `CONTEXTLOG_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(pattern) = lookup(ENV_DATE_PATTERN) {
            config.file.date_pattern = pattern;
            config.file.strftime_pattern()?;
        }
        if let Some(size) = lookup(ENV_MAX_SIZE) {
            config.file.max_size = Some(parse_size(&size)?);
        }
        if let Some(level) = lookup(ENV_CONSOLE_LEVEL) {
            config.console.min_level = level.parse()?;
        }
        if let Some(level) = lookup(ENV_FILE_LEVEL) {
            config.file.min_level = level.parse()?;
        }

        Ok(config)
    }
}

/// Console sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Least severe level printed.
    pub min_level: Level,
    /// Levels written to stderr instead of stdout.
    pub stderr_levels: Vec<Level>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            min_level: Level::Debug,
            stderr_levels: vec![Level::Error],
        }
    }
}

/// Rotating file sink settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkConfig {
    /// Directory holding the `<date>.log` files. An empty path means the
    /// current working directory.
    pub dir: PathBuf,
    /// Moment-style pattern naming each file (`YYYY-MM-DD`).
    pub date_pattern: String,
    /// Size in bytes after which the day's file rolls over; `None` disables
    /// size rotation.
    #[serde(deserialize_with = "deserialize_size")]
    pub max_size: Option<u64>,
    pub min_level: Level,
}

impl Default for FileSinkConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::new(),
            date_pattern: DEFAULT_DATE_PATTERN.to_string(),
            max_size: Some(DEFAULT_MAX_SIZE),
            min_level: Level::Debug,
        }
    }
}

impl FileSinkConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn with_date_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.date_pattern = pattern.into();
        self
    }

    pub fn with_max_size(mut self, max_size: Option<u64>) -> Self {
        self.max_size = max_size;
        self
    }

    /// The date pattern translated to chrono's strftime syntax.
    pub fn strftime_pattern(&self) -> Result<String> {
        moment_to_strftime(&self.date_pattern)
    }
}

/// Parse a human size such as `"20m"`, `"512k"`, `"1g"` or plain bytes.
pub fn parse_size(raw: &str) -> Result<u64> {
    let trimmed = raw.trim().to_ascii_lowercase();
    let invalid = || LogError::InvalidSize(raw.to_string());

    let (digits, multiplier) = match trimmed.chars().last() {
        Some('k') => (&trimmed[..trimmed.len() - 1], 1024),
        Some('m') => (&trimmed[..trimmed.len() - 1], 1024 * 1024),
        Some('g') => (&trimmed[..trimmed.len() - 1], 1024 * 1024 * 1024),
        Some(c) if c.is_ascii_digit() => (trimmed.as_str(), 1),
        _ => return Err(invalid()),
    };

    let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
    if value == 0 {
        return Err(invalid());
    }
    value.checked_mul(multiplier).ok_or_else(invalid)
}

/// Translate a moment-style date pattern into strftime.
///
/// Supported tokens: `YYYY`, `YY`, `MM`, `DD`, `HH`, `mm`, `ss`. Text inside
/// `[...]` is copied literally. Patterns that would name a file outside the
/// sink directory are rejected.
pub fn moment_to_strftime(pattern: &str) -> Result<String> {
    const TOKENS: [(&str, &str); 7] = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
    ];

    if pattern.is_empty() {
        return Err(LogError::InvalidConfig("empty date pattern".to_string()));
    }
    if pattern.contains(['/', '\\']) {
        return Err(LogError::InvalidConfig(format!(
            "date pattern {:?} contains a path separator",
            pattern
        )));
    }

    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'scan: while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped.find(']').ok_or_else(|| {
                LogError::InvalidConfig(format!("unterminated literal in {:?}", pattern))
            })?;
            out.push_str(&stripped[..end].replace('%', "%%"));
            rest = &stripped[end + 1..];
            continue;
        }

        for (token, strftime) in TOKENS {
            if let Some(stripped) = rest.strip_prefix(token) {
                out.push_str(strftime);
                rest = stripped;
                continue 'scan;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            if c == '%' {
                out.push_str("%%");
            } else {
                out.push(c);
            }
        }
        rest = chars.as_str();
    }

    if StrftimeItems::new(&out).any(|item| matches!(item, Item::Error)) {
        return Err(LogError::InvalidConfig(format!(
            "date pattern {:?} is not renderable",
            pattern
        )));
    }

    Ok(out)
}

fn deserialize_size<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeRepr {
        Bytes(u64),
        Text(String),
    }

    match Option::<SizeRepr>::deserialize(d)? {
        None => Ok(None),
        Some(SizeRepr::Bytes(bytes)) => Ok(Some(bytes)),
        Some(SizeRepr::Text(text)) => parse_size(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
