use chrono::{DateTime, Utc};

use crate::value::Attr;

/// Log severity. Ordered, open-ended: any `i32` is a legal level, the four
/// canonical values below are merely the ones with a dedicated tag and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    /// Fixed-width 3-character tag for the rendered line. Every value other
    /// than the four canonical levels renders as `???`.
    pub fn tag(self) -> &'static str {
        match self {
            Level::DEBUG => "DBG",
            Level::INFO => "INF",
            Level::WARN => "WRN",
            Level::ERROR => "ERR",
            _ => "???",
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::ERROR,
            tracing::Level::WARN => Level::WARN,
            tracing::Level::INFO => Level::INFO,
            // TRACE has no canonical counterpart; fold it into DEBUG.
            tracing::Level::DEBUG | tracing::Level::TRACE => Level::DEBUG,
        }
    }
}

/// One discrete log event as handed to the handler. Immutable after
/// construction; the handler never writes back into it.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl LogRecord {
    pub fn new(timestamp: DateTime<Utc>, level: Level, message: impl Into<String>) -> Self {
        LogRecord {
            timestamp,
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    /// Append attributes to the record, preserving insertion order.
    pub fn add_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        self.attrs.extend(attrs);
    }
}
