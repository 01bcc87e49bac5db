//! Internal diagnostics.
//!
//! The crate reports its own trouble (a sink that cannot open its file, a
//! value that cannot be serialized) through the `log` facade, never through
//! the records it is asked to emit. Every message carries a sink context
//! prefix so failures can be traced back to the sink that raised them.

use std::fmt;

/// Install `env_logger` for the crate's diagnostics.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_millis()
        .try_init();
}

/// Context prefix for diagnostics raised by a sink.
#[derive(Debug, Clone)]
pub struct SinkContext {
    pub sink: String,
    pub target: Option<String>,
}

impl SinkContext {
    pub fn new(sink: &str) -> Self {
        Self {
            sink: sink.to_string(),
            target: None,
        }
    }

    pub fn with_target(&self, target: &str) -> Self {
        Self {
            sink: self.sink.clone(),
            target: Some(target.to_string()),
        }
    }
}

impl fmt::Display for SinkContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Some(target) => write!(f, "[sink={}] [target={}]", self.sink, target),
            None => write!(f, "[sink={}]", self.sink),
        }
    }
}

/// Log a warning with sink context.
#[macro_export]
macro_rules! diag_warn {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::warn!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={} ",)*), $($value),*)
        );
    };
}

/// Log a debug message with sink context.
#[macro_export]
macro_rules! diag_debug {
    ($ctx:expr, $event:expr, $($key:ident = $value:expr),* $(,)?) => {
        log::debug!(
            "{} {} {}",
            $ctx,
            $event,
            format_args!(concat!($(stringify!($key), "={} ",)*), $($value),*)
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_context_display() {
        let ctx = SinkContext::new("file");
        assert_eq!(format!("{}", ctx), "[sink=file]");

        let with_target = ctx.with_target("logs/2026-01-29.log");
        assert_eq!(
            format!("{}", with_target),
            "[sink=file] [target=logs/2026-01-29.log]"
        );
    }

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        diag_debug!(SinkContext::new("test"), "DIAG_SMOKE", attempt = 1);
    }
}
