//! Record sinks.
//!
//! - `console` - formatted lines on stdout/stderr
//! - `file` - JSON lines in daily, size-capped files
//! - `memory` - records kept in memory for inspection

pub mod console;
pub mod file;
pub mod memory;

pub use console::*;
pub use file::*;
pub use memory::*;

use crate::level::Level;
use crate::record::LogRecord;

/// A destination for log records.
///
/// Writes are best-effort: a sink reports its own failures through the
/// crate diagnostics and never returns them to the emitting logger.
pub trait Sink: Send + Sync {
    fn name(&self) -> &str;

    /// Least severe level this sink accepts.
    fn min_level(&self) -> Level;

    fn write(&self, record: &LogRecord);

    fn flush(&self) {}

    fn accepts(&self, level: Level) -> bool {
        level.admitted_by(self.min_level())
    }
}
