//! Elapsed-time helper.

use std::time::{Duration, Instant};

use super::Logger;

/// Running timer started by [`Logger::timer`].
///
/// Elapsed time comes from a monotonic clock read at `finish`, reported to
/// one decimal place.
pub struct Timer<'a> {
    logger: &'a Logger,
    name: String,
    started: Instant,
}

impl<'a> Timer<'a> {
    pub(crate) fn start(logger: &'a Logger, name: impl Into<String>) -> Self {
        Self {
            logger,
            name: name.into(),
            started: Instant::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Stop the timer and log `"<name>: *<seconds>s*"` at info.
    pub fn finish(self) -> &'a Logger {
        let elapsed = self.elapsed();
        self.logger.info(timer_message(&self.name, elapsed))
    }
}

/// `"<name>: *<seconds>s*"`, seconds to one decimal.
pub fn timer_message(name: &str, elapsed: Duration) -> String {
    format!("{}: *{:.1}s*", name, elapsed.as_secs_f64())
}
