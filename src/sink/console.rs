//! Console sink.

use std::io::{self, Write};

use parking_lot::Mutex;

use crate::config::ConsoleConfig;
use crate::diagnostics::SinkContext;
use crate::format::console::format_line;
use crate::level::Level;
use crate::record::LogRecord;

use super::Sink;

/// Writes [`format_line`] output to the standard streams, or to a supplied
/// writer.
pub struct ConsoleSink {
    config: ConsoleConfig,
    writer: Option<Mutex<Box<dyn Write + Send>>>,
    ctx: SinkContext,
}

impl ConsoleSink {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            config,
            writer: None,
            ctx: SinkContext::new("console"),
        }
    }

    /// Send every line to `writer` instead of stdout/stderr.
    pub fn with_writer(config: ConsoleConfig, writer: impl Write + Send + 'static) -> Self {
        Self {
            config,
            writer: Some(Mutex::new(Box::new(writer))),
            ctx: SinkContext::new("console"),
        }
    }

    fn uses_stderr(&self, level: Level) -> bool {
        self.config.stderr_levels.contains(&level)
    }

    fn write_line(&self, level: Level, line: &str) -> io::Result<()> {
        if let Some(writer) = &self.writer {
            let mut writer = writer.lock();
            writeln!(writer, "{}", line)?;
            return writer.flush();
        }

        if self.uses_stderr(level) {
            let mut stderr = io::stderr().lock();
            writeln!(stderr, "{}", line)
        } else {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", line)?;
            stdout.flush()
        }
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn min_level(&self) -> Level {
        self.config.min_level
    }

    fn write(&self, record: &LogRecord) {
        let line = format_line(record);
        if let Err(e) = self.write_line(record.level, &line) {
            crate::diag_warn!(self.ctx, "CONSOLE_WRITE_FAILED", level = record.level, error = e);
        }
    }

    fn flush(&self) {
        if let Some(writer) = &self.writer {
            let _ = writer.lock().flush();
        } else {
            let _ = io::stdout().flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::markup::strip_emphasis;
    use std::sync::Arc;

    /// Writer sharing its buffer with the test that created it.
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writes_formatted_lines() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleSink::with_writer(ConsoleConfig::default(), buffer.clone());

        sink.write(&LogRecord::new(Level::Info, "hello *world*"));
        sink.write(&LogRecord::new(Level::Error, "boom"));

        let out = buffer.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("world"));
        assert!(!strip_emphasis(lines[0]).contains('*'));
        assert!(lines[1].contains("boom"));
    }

    #[test]
    fn test_default_accepts_every_level() {
        let sink = ConsoleSink::new(ConsoleConfig::default());
        for level in Level::ALL {
            assert!(sink.accepts(level));
        }
        assert!(sink.uses_stderr(Level::Error));
        assert!(!sink.uses_stderr(Level::Warn));
    }

    #[test]
    fn test_min_level_filters() {
        let config = ConsoleConfig {
            min_level: Level::Warn,
            ..ConsoleConfig::default()
        };
        let sink = ConsoleSink::new(config);
        assert!(sink.accepts(Level::Error));
        assert!(sink.accepts(Level::Warn));
        assert!(!sink.accepts(Level::Info));
    }
}
