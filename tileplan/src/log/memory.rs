//! In-memory logger.

use crate::log::{LogLevel, Logger};
use parking_lot::Mutex;
use std::fmt::Arguments;

/// One captured message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Keeps every message at or above `min_level` in memory.
#[derive(Debug)]
pub struct MemoryLogger {
    min_level: LogLevel,
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryLogger {
    /// Captures all levels.
    pub fn new() -> Self {
        Self::with_min_level(LogLevel::Trace)
    }

    pub fn with_min_level(min_level: LogLevel) -> Self {
        Self {
            min_level,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Copy of everything captured so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().clone()
    }

    /// Captured messages at exactly `level`.
    pub fn messages_at(&self, level: LogLevel) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.level == level)
            .map(|r| r.message.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        if level < self.min_level {
            return;
        }
        self.records.lock().push(LogRecord {
            level,
            message: args.to_string(),
        });
    }
}
