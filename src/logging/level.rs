//! Log levels
//!
//! The level set is closed: every sink handles all seven variants.

use std::fmt;

/// Severity/category of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    /// Verbose diagnostics, only dispatched when debug mode is on
    Debug,
    Info,
    /// A step completed successfully
    Success,
    Warning,
    Error,
    /// Incremental progress of a long-running job
    Progress,
    /// One-line status shown to the user (e.g. "12 pages queued")
    StatusNotice,
}

impl LogLevel {
    /// Every level, in declaration order
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Success,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Progress,
        LogLevel::StatusNotice,
    ];

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Progress => "PROGRESS",
            LogLevel::StatusNotice => "STATUS",
        }
    }

    /// Color token consumed by presentation sinks
    pub fn color(&self) -> &'static str {
        match self {
            LogLevel::Debug => "grey",
            LogLevel::Info => "white",
            LogLevel::Success => "green",
            LogLevel::Warning => "yellow",
            LogLevel::Error => "red",
            LogLevel::Progress => "cyan",
            LogLevel::StatusNotice => "magenta",
        }
    }

    /// Parse a display name (case-insensitive); unknown names map to `Info`
    pub fn from_name(name: &str) -> LogLevel {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(LogLevel::Info)
    }

    /// Whether this level is gated behind debug mode
    pub fn is_debug_only(&self) -> bool {
        matches!(self, LogLevel::Debug)
    }

    /// Check if this level is a warning or error (for alerts)
    pub fn is_alert(&self) -> bool {
        matches!(self, LogLevel::Warning | LogLevel::Error)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
