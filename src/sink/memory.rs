//! In-memory sink.
//!
//! Keeps every accepted record, which makes it the natural sink for tests
//! and for embedders that want to inspect what a logger produced.

use parking_lot::Mutex;

use crate::level::Level;
use crate::record::LogRecord;

use super::Sink;

pub struct MemorySink {
    name: String,
    min_level: Level,
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_min_level(name, Level::Debug)
    }

    pub fn with_min_level(name: impl Into<String>, min_level: Level) -> Self {
        Self {
            name: name.into(),
            min_level,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|record| record.message.clone())
            .collect()
    }

    pub fn last(&self) -> Option<LogRecord> {
        self.records.lock().last().cloned()
    }

    /// Remove and return everything captured so far.
    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock())
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl Sink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_level(&self) -> Level {
        self.min_level
    }

    fn write(&self, record: &LogRecord) {
        self.records.lock().push(record.clone());
    }
}
