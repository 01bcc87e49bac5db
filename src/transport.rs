//! Sink construction and fan-out.
//!
//! The [`Dispatcher`] is the shared multi-sink logger every `Logger` writes
//! through. Loggers derived from one another hold the same dispatcher, so
//! attaching or detaching a sink is visible to all of them.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::{ConsoleConfig, FileSinkConfig};
use crate::error::Result;
use crate::record::LogRecord;
use crate::sink::{ConsoleSink, FileSink, Sink};

/// Console sink printing every level.
pub fn console(config: &ConsoleConfig) -> Arc<ConsoleSink> {
    Arc::new(ConsoleSink::new(config.clone()))
}

/// Rotating file sink; an unusable date pattern falls back to the default.
pub fn file(config: FileSinkConfig) -> Arc<FileSink> {
    Arc::new(FileSink::new(config))
}

/// Rotating file sink; an unusable date pattern is an error.
pub fn try_file(config: FileSinkConfig) -> Result<Arc<FileSink>> {
    Ok(Arc::new(FileSink::try_new(config)?))
}

/// Ordered set of sinks receiving every dispatched record.
#[derive(Default)]
pub struct Dispatcher {
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sinks(sinks: Vec<Arc<dyn Sink>>) -> Self {
        let dispatcher = Self::new();
        for sink in sinks {
            dispatcher.add(sink);
        }
        dispatcher
    }

    /// Attach a sink. Returns `false` if that exact sink is already attached.
    pub fn add(&self, sink: Arc<dyn Sink>) -> bool {
        let mut sinks = self.sinks.write();
        if sinks.iter().any(|s| same_sink(s, &sink)) {
            return false;
        }
        log::debug!("SINK_ATTACHED name={} total={}", sink.name(), sinks.len() + 1);
        sinks.push(sink);
        true
    }

    /// Detach a sink. Returns `false` if it was not attached.
    pub fn remove(&self, sink: &Arc<dyn Sink>) -> bool {
        let mut sinks = self.sinks.write();
        let before = sinks.len();
        sinks.retain(|s| !same_sink(s, sink));
        let removed = sinks.len() != before;
        if removed {
            log::debug!("SINK_DETACHED name={} total={}", sink.name(), sinks.len());
        }
        removed
    }

    pub fn contains(&self, sink: &Arc<dyn Sink>) -> bool {
        self.sinks.read().iter().any(|s| same_sink(s, sink))
    }

    pub fn len(&self) -> usize {
        self.sinks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.read().is_empty()
    }

    pub fn sink_names(&self) -> Vec<String> {
        self.sinks
            .read()
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    /// Hand a record to every attached sink that accepts its level.
    pub fn dispatch(&self, record: &LogRecord) {
        let sinks: Vec<Arc<dyn Sink>> = self.sinks.read().clone();
        for sink in sinks.iter().filter(|s| s.accepts(record.level)) {
            sink.write(record);
        }
    }

    pub fn flush(&self) {
        for sink in self.sinks.read().iter() {
            sink.flush();
        }
    }
}

/// Identity comparison on the data pointer only.
fn same_sink(a: &Arc<dyn Sink>, b: &Arc<dyn Sink>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
