//! Fallback diagnostic channel
//!
//! When a sink fails, the failure is turned into a [`SinkFailure`] and handed
//! to a [`FailureReporter`]. Reporters must never fail themselves.

use std::fmt;
use std::sync::Mutex;

use super::error::SinkError;
use super::level::LogLevel;

/// A structured report of one sink failing on one record
#[derive(Debug)]
pub struct SinkFailure {
    /// Name of the sink that failed
    pub sink: String,
    /// Level of the record being delivered
    pub level: LogLevel,
    /// What went wrong
    pub error: SinkError,
}

impl SinkFailure {
    pub fn new(sink: impl Into<String>, level: LogLevel, error: SinkError) -> Self {
        Self {
            sink: sink.into(),
            level,
            error,
        }
    }
}

impl fmt::Display for SinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sink '{}' failed on {} record: {}",
            self.sink, self.level, self.error
        )
    }
}

/// Last-resort reporting path for sink failures
pub trait FailureReporter: Send + Sync {
    fn report(&self, failure: &SinkFailure);
}

/// Writes failures to the process error stream
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrReporter;

impl FailureReporter for StderrReporter {
    fn report(&self, failure: &SinkFailure) {
        eprintln!("[fanlog] {}", failure);
    }
}

/// Forwards failures to the internal `tracing` diagnostics
///
/// Used while the terminal UI owns stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, failure: &SinkFailure) {
        tracing::error!(
            sink = %failure.sink,
            level = %failure.level,
            error = %failure.error,
            "Log sink failed"
        );
    }
}

/// Keeps rendered failure reports in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<String>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all reports received so far
    pub fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Get the number of reports received so far
    pub fn len(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FailureReporter for MemoryReporter {
    fn report(&self, failure: &SinkFailure) {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(failure.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display_names_sink() {
        let failure = SinkFailure::new(
            "file:/tmp/app.log",
            LogLevel::Warning,
            SinkError::Disconnected("ui closed".to_string()),
        );
        assert_eq!(
            failure.to_string(),
            "sink 'file:/tmp/app.log' failed on WARNING record: receiver disconnected: ui closed"
        );
    }

    #[test]
    fn test_memory_reporter_collects() {
        let reporter = MemoryReporter::new();
        assert!(reporter.is_empty());

        reporter.report(&SinkFailure::new(
            "a",
            LogLevel::Info,
            SinkError::Panicked("boom".to_string()),
        ));
        reporter.report(&SinkFailure::new(
            "b",
            LogLevel::Error,
            SinkError::Panicked("bang".to_string()),
        ));

        let reports = reporter.reports();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("'a'"));
        assert!(reports[1].contains("'b'"));
    }
}
