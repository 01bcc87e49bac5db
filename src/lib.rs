//! contextlog - contextual structured logging
//!
//! A [`Logger`] wraps a shared [`Dispatcher`] feeding a console sink and a
//! daily-rotating JSON file sink, and stamps every record with the session
//! fields and tags it carries.
//!
//! ## Architecture
//!
//! - `level` - fixed severity table with console colors
//! - `record` - the record handed to every sink
//! - `format` - console lines with `*bold*` / `_italic_` markup, JSON lines
//! - `sink` - console, rotating file and in-memory sinks
//! - `transport` - sink factory and the shared dispatcher
//! - `serializer` - rich value conversion for session and data
//! - `logger` - the contextual logger, undo guards, timers and panic reporting
//! - `config` - sink configuration from JSON or environment
//! - `diagnostics` - the crate's own logging through the `log` facade
//!
//! ## Usage
//!
//! ```no_run
//! use contextlog::Logger;
//! use serde_json::json;
//!
//! let logger = Logger::new("./logs");
//! let request = logger.with_session(&json!({"request_id": "r-42"}));
//!
//! request.info("Build *done* in _2s_").debug_with("cache", &json!({"hits": 12}));
//!
//! let timer = request.timer("deploy");
//! timer.finish();
//! ```

pub mod diagnostics;

pub mod config;
pub mod error;
pub mod format;
pub mod level;
pub mod logger;
pub mod record;
pub mod serializer;
pub mod sink;
pub mod transport;

pub use config::{ConsoleConfig, FileSinkConfig, LoggerConfig};
pub use error::{LogError, Result};
pub use level::Level;
pub use logger::{Logger, LoggerOptions, SessionGuard, TagGuard, Timer};
pub use record::{Fields, LogRecord};
pub use serializer::{JsonSerializer, RichSerializer};
pub use sink::{ConsoleSink, FileSink, MemorySink, Sink};
pub use transport::Dispatcher;
