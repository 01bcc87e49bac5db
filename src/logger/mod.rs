//! Contextual logger.
//!
//! A [`Logger`] carries session fields and tags and stamps them onto every
//! record it emits. Two ways to change that context:
//!
//! - `with_session` / `with_tags` derive a new logger with its own copy of
//!   the context, sharing sinks with the parent. Use these to fork context
//!   per request.
//! - `add_session` / `add_tag` change this logger in place and return a
//!   guard that can undo exactly that change.
//!
//! Emitting never fails; every level method returns the logger for chaining.
//! `handle_panics` additionally routes panics through the logger's sinks.

pub mod context;
pub mod panic_hook;
pub mod timer;

pub use context::*;
pub use timer::*;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::config::{FileSinkConfig, LoggerConfig};
use crate::error::Result;
use crate::level::Level;
use crate::record::{Fields, LogRecord};
use crate::serializer::{to_fields, JsonSerializer, RichSerializer};
use crate::sink::Sink;
use crate::transport::{self, Dispatcher};

use context::SharedContext;

/// Width of the line emitted by [`Logger::divider`].
pub const DIVIDER_WIDTH: usize = 80;

/// Construction options for [`Logger::with_options`].
#[derive(Default)]
pub struct LoggerOptions {
    /// Directory for the file sink.
    pub path: PathBuf,
    pub session: Option<Fields>,
    pub tags: Option<Vec<String>>,
    /// Existing dispatcher to write through instead of a new one.
    pub dispatcher: Option<Arc<Dispatcher>>,
    pub config: LoggerConfig,
    /// Replaces the default console sink.
    pub console: Option<Arc<dyn Sink>>,
    /// Replaces the default rotating file sink.
    pub file: Option<Arc<dyn Sink>>,
    pub serializer: Option<Arc<dyn RichSerializer>>,
}

impl LoggerOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_session<T: Serialize + ?Sized>(mut self, session: &T) -> Self {
        self.session = Some(to_fields(session));
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_console_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.console = Some(sink);
        self
    }

    pub fn with_file_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.file = Some(sink);
        self
    }

    pub fn with_serializer(mut self, serializer: Arc<dyn RichSerializer>) -> Self {
        self.serializer = Some(serializer);
        self
    }

    fn file_config(&self) -> FileSinkConfig {
        FileSinkConfig {
            dir: self.path.clone(),
            ..self.config.file.clone()
        }
    }
}

/// Logger with session and tag context.
pub struct Logger {
    dispatcher: Arc<Dispatcher>,
    console: Arc<dyn Sink>,
    file: Arc<dyn Sink>,
    serializer: Arc<dyn RichSerializer>,
    path: PathBuf,
    context: SharedContext,
}

impl Logger {
    /// Logger with a console sink and a daily file sink writing into `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let options = LoggerOptions::new(path);
        let file: Arc<dyn Sink> = transport::file(options.file_config());
        Self::assemble(options, file)
    }

    /// Logger built from explicit options. Fails only on an unusable file
    /// sink configuration.
    pub fn with_options(options: LoggerOptions) -> Result<Self> {
        let file: Arc<dyn Sink> = match options.file.clone() {
            Some(sink) => sink,
            None => transport::try_file(options.file_config())?,
        };
        Ok(Self::assemble(options, file))
    }

    fn assemble(options: LoggerOptions, file: Arc<dyn Sink>) -> Self {
        let console: Arc<dyn Sink> = match options.console {
            Some(sink) => sink,
            None => transport::console(&options.config.console),
        };

        let dispatcher = options.dispatcher.unwrap_or_else(|| {
            Arc::new(Dispatcher::with_sinks(vec![console.clone(), file.clone()]))
        });

        let serializer: Arc<dyn RichSerializer> = match options.serializer {
            Some(serializer) => serializer,
            None => Arc::new(JsonSerializer),
        };

        Self {
            dispatcher,
            console,
            file,
            serializer,
            path: options.path,
            context: Arc::new(Mutex::new(Context::new(options.session, options.tags))),
        }
    }

    /// New logger sharing every handle with `self` but owning `context`.
    fn derive(&self, context: Context) -> Logger {
        self.with_context_handle(Arc::new(Mutex::new(context)))
    }

    /// New logger sharing every handle with `self`, context included.
    fn share(&self) -> Logger {
        self.with_context_handle(self.context.clone())
    }

    fn with_context_handle(&self, context: SharedContext) -> Logger {
        Logger {
            dispatcher: self.dispatcher.clone(),
            console: self.console.clone(),
            file: self.file.clone(),
            serializer: self.serializer.clone(),
            path: self.path.clone(),
            context,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn console_sink(&self) -> &Arc<dyn Sink> {
        &self.console
    }

    pub fn file_sink(&self) -> &Arc<dyn Sink> {
        &self.file
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Option<Fields> {
        self.context.lock().session.clone()
    }

    /// Snapshot of the current tags.
    pub fn tags(&self) -> Option<Vec<String>> {
        self.context.lock().tags.clone()
    }

    // Context

    /// New logger whose session is this session merged with `data`.
    pub fn with_session<T: Serialize + ?Sized>(&self, data: &T) -> Logger {
        let data = to_fields(data);
        let context = self.context.lock().merged(&data);
        self.derive(context)
    }

    /// New logger whose tags are these tags followed by `tags`.
    pub fn with_tags<I, S>(&self, tags: I) -> Logger
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        let context = self.context.lock().tagged(&tags);
        self.derive(context)
    }

    /// Merge `data` into this logger's session.
    pub fn add_session<T: Serialize + ?Sized>(&self, data: &T) -> SessionGuard {
        let data = to_fields(data);
        self.context.lock().merge_in_place(&data);
        SessionGuard::new(self.context.clone(), data.keys().cloned().collect())
    }

    /// Append `tags` to this logger's tags.
    pub fn add_tag<I, S>(&self, tags: I) -> TagGuard
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        self.context.lock().append_tags(&tags);
        TagGuard::new(self.context.clone(), tags)
    }

    pub fn clear_session(&self) -> &Self {
        self.context.lock().session = None;
        self
    }

    pub fn clear_tags(&self) -> &Self {
        self.context.lock().tags = None;
        self
    }

    // Emit

    pub fn log(&self, level: Level, message: impl AsRef<str>) -> &Self {
        self.emit(level, message.as_ref(), None)
    }

    pub fn log_with<T: Serialize + ?Sized>(
        &self,
        level: Level,
        message: impl AsRef<str>,
        data: &T,
    ) -> &Self {
        self.emit(level, message.as_ref(), Some(to_fields(data)))
    }

    pub fn error(&self, message: impl AsRef<str>) -> &Self {
        self.log(Level::Error, message)
    }

    pub fn error_with<T: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &T) -> &Self {
        self.log_with(Level::Error, message, data)
    }

    pub fn warn(&self, message: impl AsRef<str>) -> &Self {
        self.log(Level::Warn, message)
    }

    pub fn warn_with<T: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &T) -> &Self {
        self.log_with(Level::Warn, message, data)
    }

    pub fn info(&self, message: impl AsRef<str>) -> &Self {
        self.log(Level::Info, message)
    }

    pub fn info_with<T: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &T) -> &Self {
        self.log_with(Level::Info, message, data)
    }

    pub fn success(&self, message: impl AsRef<str>) -> &Self {
        self.log(Level::Success, message)
    }

    pub fn success_with<T: Serialize + ?Sized>(
        &self,
        message: impl AsRef<str>,
        data: &T,
    ) -> &Self {
        self.log_with(Level::Success, message, data)
    }

    pub fn debug(&self, message: impl AsRef<str>) -> &Self {
        self.log(Level::Debug, message)
    }

    pub fn debug_with<T: Serialize + ?Sized>(&self, message: impl AsRef<str>, data: &T) -> &Self {
        self.log_with(Level::Debug, message, data)
    }

    /// Debug line of [`DIVIDER_WIDTH`] dashes.
    pub fn divider(&self) -> &Self {
        self.debug("-".repeat(DIVIDER_WIDTH))
    }

    /// Start a timer; `finish` logs the elapsed seconds at info.
    pub fn timer(&self, name: impl Into<String>) -> Timer<'_> {
        Timer::start(self, name)
    }

    fn emit(&self, level: Level, message: &str, data: Option<Fields>) -> &Self {
        let (session, tags) = {
            let context = self.context.lock();
            (context.session.clone(), context.tags.clone().unwrap_or_default())
        };
        let session = session.map(|s| self.serializer.encode(&s));

        let mut record = LogRecord::new(level, message).with_tags(tags);
        if let Some(data) = data {
            record = record.with_data(self.serializer.encode(&data));
        }
        if let Some(session) = session {
            record = record.with_session(session);
        }

        self.dispatcher.dispatch(&record);
        self
    }

    // Sinks

    /// Detach this logger's file sink from the shared dispatcher.
    pub fn disable_file(&self) -> &Self {
        self.dispatcher.remove(&self.file);
        self
    }

    /// Re-attach this logger's file sink. Attaching twice is a no-op.
    pub fn enable_file(&self) -> &Self {
        self.dispatcher.add(self.file.clone());
        self
    }

    pub fn file_enabled(&self) -> bool {
        self.dispatcher.contains(&self.file)
    }

    pub fn flush(&self) {
        self.dispatcher.flush();
    }

    /// Log every panic at error level through this logger's sinks.
    ///
    /// Installs a process-wide panic hook that chains to the previous one.
    /// The record carries the panic message, location and thread under
    /// `data`, plus this logger's session and tags as they are when the
    /// panic happens.
    pub fn handle_panics(&self) -> &Self {
        panic_hook::install(self.share());
        self
    }
}
