//! Logging sink passed explicitly through constructors
//!
//! Components never log through a module-level global. They receive an
//! `Arc<dyn LogSink>`; production code uses [`TracingSink`], tests use
//! [`MemorySink`] to capture and assert on events.

use std::fmt;
use std::sync::{Arc, Mutex};

/// Structured field attached to a log event
pub type Field = (&'static str, String);

/// Logging interface used by every docportal component
pub trait LogSink: Send + Sync {
    fn debug(&self, message: &str, fields: &[Field]);

    fn info(&self, message: &str, fields: &[Field]);

    fn error(&self, message: &str, fields: &[Field]);
}

/// Shared handle to a log sink
pub type SharedSink = Arc<dyn LogSink>;

/// Sink that forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TracingSink {
    pub fn shared() -> SharedSink {
        Arc::new(Self)
    }
}

struct DisplayFields<'a>(&'a [Field]);

impl fmt::Display for DisplayFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

impl LogSink for TracingSink {
    fn debug(&self, message: &str, fields: &[Field]) {
        tracing::debug!(fields = %DisplayFields(fields), "{}", message);
    }

    fn info(&self, message: &str, fields: &[Field]) {
        tracing::info!(fields = %DisplayFields(fields), "{}", message);
    }

    fn error(&self, message: &str, fields: &[Field]) {
        tracing::error!(fields = %DisplayFields(fields), "{}", message);
    }
}

/// Severity of a captured event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Error,
}

/// Event recorded by [`MemorySink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub level: Level,
    pub message: String,
    pub fields: Vec<(String, String)>,
}

impl LogEvent {
    /// Value of a field, if present
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Sink that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Snapshot of the events recorded so far
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events recorded at the given level
    pub fn at(&self, level: Level) -> Vec<LogEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == level)
            .collect()
    }

    fn record(&self, level: Level, message: &str, fields: &[Field]) {
        let event = LogEvent {
            level,
            message: message.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl LogSink for MemorySink {
    fn debug(&self, message: &str, fields: &[Field]) {
        self.record(Level::Debug, message, fields);
    }

    fn info(&self, message: &str, fields: &[Field]) {
        self.record(Level::Info, message, fields);
    }

    fn error(&self, message: &str, fields: &[Field]) {
        self.record(Level::Error, message, fields);
    }
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl LogSink for NullSink {
    fn debug(&self, _message: &str, _fields: &[Field]) {}

    fn info(&self, _message: &str, _fields: &[Field]) {}

    fn error(&self, _message: &str, _fields: &[Field]) {}
}
