//! Sink and display error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by a single sink while handling a record
#[derive(Debug, Error)]
pub enum SinkError {
    /// File or stream I/O failed
    #[error("{operation} failed for {}: {}", .path.display(), friendly_io_message(.source))]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The message contains a character the configured encoding cannot represent
    #[error("cannot encode {character:?} as {encoding}")]
    Encoding {
        encoding: &'static str,
        character: char,
    },

    /// The receiving side of a cross-context hand-off is gone
    #[error("receiver disconnected: {0}")]
    Disconnected(String),

    /// A UI component failed to display a delivered message
    #[error("ui display failed: {0}")]
    Display(#[from] DisplayError),

    /// The sink was constructed with settings it cannot work with
    #[error("invalid sink configuration: {0}")]
    InvalidConfig(String),

    /// The sink panicked while emitting
    #[error("sink panicked: {0}")]
    Panicked(String),
}

impl SinkError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SinkError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Failure raised by a UI component while displaying a delivered message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    /// The component has no display method for this kind of message
    #[error("display method `{0}` is not supported")]
    Unsupported(&'static str),

    /// The display method ran and failed
    #[error("display failed: {0}")]
    Failed(String),
}

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied (read or write)
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full",
            DiskErrorKind::PermissionDenied => "permission denied",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "I/O error",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                if let Some(os_error) = e.raw_os_error() {
                    // ENOSPC = 28, EDQUOT = 122 (Linux) / 69 (macOS)
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                    // EACCES
                    if os_error == 13 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

fn friendly_io_message(e: &io::Error) -> String {
    match categorize_io_error(e) {
        DiskErrorKind::Other => e.to_string(),
        kind => format!("{} ({})", kind.user_message(), e),
    }
}
