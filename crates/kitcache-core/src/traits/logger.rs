//! Logger capability used by the remote engine

use std::fmt;

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Get level as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// A structured key/value pair attached to a log record
pub type Field<'a> = (&'a str, &'a dyn fmt::Display);

/// Leveled, structured logger
///
/// Only [`Logger::log`] is required; the per-level helpers forward to it.
pub trait Logger: Send + Sync + 'static {
    /// Emit one record
    fn log(&self, level: LogLevel, message: &str, fields: &[Field<'_>]);

    fn debug(&self, message: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Debug, message, fields);
    }

    fn info(&self, message: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Info, message, fields);
    }

    fn warn(&self, message: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Warn, message, fields);
    }

    fn error(&self, message: &str, fields: &[Field<'_>]) {
        self.log(LogLevel::Error, message, fields);
    }
}

/// Logger that discards everything (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    #[inline]
    fn log(&self, _level: LogLevel, _message: &str, _fields: &[Field<'_>]) {}
}
