//! Daily rotating JSON-lines file sink.
//!
//! Records land in `<dir>/<date>.log`, the date rendered from the record's
//! UTC timestamp with the configured pattern. When a write would push the
//! current file past `max_size`, the sink moves on to `<date>.1.log`,
//! `<date>.2.log` and so on. Nothing touches the filesystem until the first
//! record arrives.
//!
//! The default `YYYY-MM-DD` pattern is served by a daily
//! `tracing_appender` rolling appender; other patterns write plain files.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::config::{moment_to_strftime, FileSinkConfig, DEFAULT_DATE_PATTERN};
use crate::diagnostics::SinkContext;
use crate::error::Result;
use crate::format::json::format_json;
use crate::level::Level;
use crate::record::LogRecord;

use super::Sink;

/// strftime form of the appender's daily file date.
const DAILY_STRFTIME: &str = "%Y-%m-%d";

/// Rotating file sink.
pub struct FileSink {
    config: FileSinkConfig,
    /// `config.date_pattern` translated to strftime.
    strftime: String,
    state: Mutex<Option<OpenFile>>,
    ctx: SinkContext,
}

/// The file currently receiving records.
struct OpenFile {
    date: String,
    index: u32,
    path: PathBuf,
    writer: FileWriter,
    size: u64,
}

enum FileWriter {
    /// Daily appender writing `<date>.log` or `<date>.<index>.log`.
    Daily(RollingFileAppender),
    Plain(BufWriter<File>),
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FileWriter::Daily(appender) => appender.write(buf),
            FileWriter::Plain(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FileWriter::Daily(appender) => appender.flush(),
            FileWriter::Plain(file) => file.flush(),
        }
    }
}

impl FileSink {
    /// Build a sink, rejecting an unusable date pattern.
    pub fn try_new(config: FileSinkConfig) -> Result<Self> {
        let strftime = config.strftime_pattern()?;
        Ok(Self::with_strftime(config, strftime))
    }

    /// Build a sink, falling back to the default date pattern if the
    /// configured one is unusable.
    pub fn new(config: FileSinkConfig) -> Self {
        match config.strftime_pattern() {
            Ok(strftime) => Self::with_strftime(config, strftime),
            Err(e) => {
                log::warn!(
                    "[sink=file] DATE_PATTERN_REJECTED pattern={:?} error={} fallback={}",
                    config.date_pattern,
                    e,
                    DEFAULT_DATE_PATTERN
                );
                let strftime = moment_to_strftime(DEFAULT_DATE_PATTERN)
                    .unwrap_or_else(|_| DAILY_STRFTIME.to_string());
                Self::with_strftime(config, strftime)
            }
        }
    }

    fn with_strftime(config: FileSinkConfig, strftime: String) -> Self {
        let ctx = SinkContext::new("file").with_target(&config.dir.display().to_string());
        Self {
            config,
            strftime,
            state: Mutex::new(None),
            ctx,
        }
    }

    /// Path of the file last written to, if any.
    pub fn current_path(&self) -> Option<PathBuf> {
        self.state.lock().as_ref().map(|file| file.path.clone())
    }

    /// File name for `date` at rotation `index`.
    pub fn file_name(date: &str, index: u32) -> String {
        format!("{}.{}", date, Self::suffix(index))
    }

    fn suffix(index: u32) -> String {
        if index == 0 {
            "log".to_string()
        } else {
            format!("{}.log", index)
        }
    }

    fn is_daily(&self) -> bool {
        self.strftime == DAILY_STRFTIME
    }

    fn path_for(&self, date: &str, index: u32) -> PathBuf {
        self.config.dir.join(Self::file_name(date, index))
    }

    fn is_full(&self, size: u64, incoming: u64) -> bool {
        match self.config.max_size {
            Some(max) => size > 0 && size + incoming > max,
            None => false,
        }
    }

    /// Open the first file for `date`, starting at `index`, that can still
    /// take `incoming` bytes.
    fn open(&self, date: &str, mut index: u32, incoming: u64) -> Result<OpenFile> {
        if !self.config.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.config.dir)?;
        }

        loop {
            let path = self.path_for(date, index);
            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if self.is_full(size, incoming) {
                index += 1;
                continue;
            }

            let writer = if self.is_daily() {
                let appender = RollingFileAppender::builder()
                    .rotation(Rotation::DAILY)
                    .filename_suffix(Self::suffix(index))
                    .build(&self.config.dir)?;
                FileWriter::Daily(appender)
            } else {
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                FileWriter::Plain(BufWriter::new(file))
            };
            crate::diag_debug!(self.ctx, "FILE_OPENED", path = path.display(), size = size);

            return Ok(OpenFile {
                date: date.to_string(),
                index,
                path,
                writer,
                size,
            });
        }
    }

    fn append(&self, record: &LogRecord) -> Result<()> {
        let mut line = format_json(record)?;
        line.push('\n');
        let incoming = line.len() as u64;

        let date = record.timestamp.format(&self.strftime).to_string();

        let mut state = self.state.lock();

        let reopen = match state.as_ref() {
            None => Some(0),
            Some(file) if file.date != date => Some(0),
            Some(file) if self.is_full(file.size, incoming) => Some(file.index + 1),
            Some(_) => None,
        };

        if let Some(index) = reopen {
            if let Some(mut previous) = state.take() {
                previous.writer.flush()?;
            }
            *state = Some(self.open(&date, index, incoming)?);
        }

        if let Some(file) = state.as_mut() {
            file.writer.write_all(line.as_bytes())?;
            file.writer.flush()?;
            file.size += incoming;
        }

        Ok(())
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn min_level(&self) -> Level {
        self.config.min_level
    }

    fn write(&self, record: &LogRecord) {
        if let Err(e) = self.append(record) {
            crate::diag_warn!(self.ctx, "FILE_WRITE_FAILED", level = record.level, error = e);
        }
    }

    fn flush(&self) {
        if let Some(file) = self.state.lock().as_mut() {
            if let Err(e) = file.writer.flush() {
                crate::diag_warn!(self.ctx, "FILE_FLUSH_FAILED", error = e);
            }
        }
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Some(file) = self.state.get_mut().as_mut() {
            let _ = file.writer.flush();
        }
    }
}
