//! Log records
//!
//! A record is created once per accepted log call and shared by reference
//! with every sink it is dispatched to.

use chrono::{DateTime, Local};

use super::level::LogLevel;

/// A single, immutable log record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    level: LogLevel,
    message: String,
    timestamp: DateTime<Local>,
}

impl LogRecord {
    /// Create a record stamped with the current local time
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self::at(level, message, Local::now())
    }

    /// Create a record with an explicit timestamp
    pub fn at(level: LogLevel, message: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Render `[HH:MM:SS] [LEVEL   ] message`
    pub fn format_line(&self) -> String {
        self.format_line_with_prefix("")
    }

    /// Render the standard line with `prefix` placed directly before the message
    pub fn format_line_with_prefix(&self, prefix: &str) -> String {
        format!(
            "[{}] [{:<8}] {}{}",
            self.timestamp.format("%H:%M:%S"),
            self.level.as_str(),
            prefix,
            self.message
        )
    }
}
