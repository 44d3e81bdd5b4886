//! The dispatching logger
//!
//! A `Logger` owns an ordered list of sinks and a debug flag. Each accepted
//! call builds one [`LogRecord`] and hands it to every sink, in registration
//! order, on the calling thread. Sink failures are isolated and reported; they
//! never reach the producer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use super::level::LogLevel;
use super::record::LogRecord;
use super::report::{FailureReporter, SinkFailure, StderrReporter};
use super::sink::{fan_out, same_sink, SharedSink};

/// Default logger name
pub const DEFAULT_LOGGER_NAME: &str = "app";

/// Named logger with level gating and isolated fan-out
pub struct Logger {
    name: String,
    debug: AtomicBool,
    /// Copy-on-write: dispatch clones the `Arc` and never sees a half-applied edit
    sinks: RwLock<Arc<Vec<SharedSink>>>,
    reporter: Arc<dyn FailureReporter>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_LOGGER_NAME, false)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("debug", &self.is_debug())
            .field("sinks", &self.sink_names())
            .finish()
    }
}

impl Logger {
    /// Create a logger with no sinks, reporting failures to stderr
    pub fn new(name: impl Into<String>, debug: bool) -> Self {
        Self {
            name: name.into(),
            debug: AtomicBool::new(debug),
            sinks: RwLock::new(Arc::new(Vec::new())),
            reporter: Arc::new(StderrReporter),
        }
    }

    /// Replace the fallback reporter used for sink failures
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Toggle dispatch of `Debug` records for all subsequent calls
    pub fn set_debug(&self, enabled: bool) {
        self.debug.store(enabled, Ordering::Relaxed);
    }

    /// Register a sink; returns false if this instance is already registered
    pub fn add_sink(&self, sink: SharedSink) -> bool {
        let mut guard = match self.sinks.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.iter().any(|s| same_sink(s, &sink)) {
            return false;
        }
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(sink);
        *guard = Arc::new(next);
        true
    }

    /// Unregister a sink by identity; returns false if it was not registered
    pub fn remove_sink(&self, sink: &SharedSink) -> bool {
        let mut guard = match self.sinks.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !guard.iter().any(|s| same_sink(s, sink)) {
            return false;
        }
        let next: Vec<SharedSink> = guard
            .iter()
            .filter(|s| !same_sink(s, sink))
            .cloned()
            .collect();
        *guard = Arc::new(next);
        true
    }

    /// Remove every sink
    pub fn clear_sinks(&self) {
        self.replace_sinks(Vec::new());
    }

    /// Swap the whole sink list in one step, dropping duplicate instances
    pub fn replace_sinks(&self, sinks: Vec<SharedSink>) {
        let mut unique: Vec<SharedSink> = Vec::with_capacity(sinks.len());
        for sink in sinks {
            if !unique.iter().any(|s| same_sink(s, &sink)) {
                unique.push(sink);
            }
        }
        let mut guard = match self.sinks.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Arc::new(unique);
    }

    pub fn sink_count(&self) -> usize {
        self.snapshot().len()
    }

    /// Names of the registered sinks, in dispatch order
    pub fn sink_names(&self) -> Vec<String> {
        self.snapshot().iter().map(|s| s.name()).collect()
    }

    fn snapshot(&self) -> Arc<Vec<SharedSink>> {
        match self.sinks.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Whether a record at `level` would be dispatched right now
    pub fn enabled(&self, level: LogLevel) -> bool {
        !level.is_debug_only() || self.is_debug()
    }

    /// Log `message` at `level`
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }
        let record = LogRecord::new(level, message);
        self.dispatch(&record);
    }

    /// Deliver an already-built record to every sink, ignoring the debug gate
    ///
    /// Returns the failures that were reported, if any.
    pub fn dispatch(&self, record: &LogRecord) -> Vec<SinkFailure> {
        let sinks = self.snapshot();
        fan_out(&sinks, record, self.reporter.as_ref(), |name| name)
    }

    /// Log at `Info`; the level-less entry point
    pub fn log_default(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    pub fn progress(&self, message: impl Into<String>) {
        self.log(LogLevel::Progress, message);
    }

    pub fn status_notice(&self, message: impl Into<String>) {
        self.log(LogLevel::StatusNotice, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::report::MemoryReporter;
    use crate::logging::sink::testing::{FailingSink, RecordingSink};

    fn logger_with_reporter() -> (Logger, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        let logger = Logger::new("test", false).with_reporter(reporter.clone());
        (logger, reporter)
    }

    #[test]
    fn test_default_logger() {
        let logger = Logger::default();
        assert_eq!(logger.name(), "app");
        assert!(!logger.is_debug());
        assert_eq!(logger.sink_count(), 0);
    }

    #[test]
    fn test_debug_suppressed_until_enabled() {
        let (logger, _) = logger_with_reporter();
        let sink = RecordingSink::named("rec");
        logger.add_sink(sink.clone());

        logger.debug("hidden");
        assert_eq!(sink.count(), 0);

        logger.set_debug(true);
        logger.debug("hidden");
        assert_eq!(sink.messages(), vec!["hidden"]);
    }

    #[test]
    fn test_non_debug_levels_always_pass() {
        let (logger, _) = logger_with_reporter();
        let sink = RecordingSink::named("rec");
        logger.add_sink(sink.clone());

        logger.info("i");
        logger.success("s");
        logger.warning("w");
        logger.error("e");
        logger.progress("p");
        logger.status_notice("n");
        logger.log_default("legacy");

        assert_eq!(sink.messages(), vec!["i", "s", "w", "e", "p", "n", "legacy"]);
        let levels: Vec<_> = sink
            .records
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.level())
            .collect();
        assert_eq!(levels[6], LogLevel::Info);
        assert_eq!(levels[5], LogLevel::StatusNotice);
    }

    #[test]
    fn test_add_sink_is_idempotent() {
        let (logger, _) = logger_with_reporter();
        let sink = RecordingSink::named("rec");
        assert!(logger.add_sink(sink.clone()));
        assert!(!logger.add_sink(sink.clone()));

        logger.info("once");
        assert_eq!(sink.count(), 1);
        assert_eq!(logger.sink_count(), 1);
    }

    #[test]
    fn test_dispatch_follows_registration_order() {
        let (logger, _) = logger_with_reporter();
        let a = RecordingSink::named("a");
        let b = RecordingSink::named("b");
        logger.add_sink(b.clone());
        logger.add_sink(a.clone());
        logger.add_sink(b.clone());
        assert_eq!(logger.sink_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_remove_sink_by_identity() {
        let (logger, _) = logger_with_reporter();
        let a: SharedSink = RecordingSink::named("a");
        let lookalike: SharedSink = RecordingSink::named("a");
        logger.add_sink(a.clone());

        assert!(!logger.remove_sink(&lookalike));
        assert_eq!(logger.sink_count(), 1);
        assert!(logger.remove_sink(&a));
        assert_eq!(logger.sink_count(), 0);
        assert!(!logger.remove_sink(&a));
    }

    #[test]
    fn test_failing_sink_is_isolated_and_reported() {
        let (logger, reporter) = logger_with_reporter();
        let first = RecordingSink::named("first");
        let third = RecordingSink::named("third");
        logger.add_sink(first.clone());
        logger.add_sink(Arc::new(FailingSink("second")));
        logger.add_sink(third.clone());

        logger.info("hello");

        assert_eq!(first.count(), 1);
        assert_eq!(third.count(), 1);
        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].contains("'second'"));
    }

    #[test]
    fn test_dispatch_returns_failures() {
        let (logger, _) = logger_with_reporter();
        logger.add_sink(Arc::new(FailingSink("bad")));
        let failures = logger.dispatch(&LogRecord::new(LogLevel::Error, "x"));
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].sink, "bad");
        assert_eq!(failures[0].level, LogLevel::Error);
    }

    #[test]
    fn test_replace_sinks_dedups() {
        let (logger, _) = logger_with_reporter();
        let a: SharedSink = RecordingSink::named("a");
        let b: SharedSink = RecordingSink::named("b");
        logger.add_sink(RecordingSink::named("old"));

        logger.replace_sinks(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(logger.sink_names(), vec!["a", "b"]);

        logger.clear_sinks();
        assert_eq!(logger.sink_count(), 0);
    }

    #[test]
    fn test_concurrent_producers_and_registration() {
        let (logger, _) = logger_with_reporter();
        let logger = Arc::new(logger);
        let sink = RecordingSink::named("rec");
        logger.add_sink(sink.clone());

        let mut handles = Vec::new();
        for t in 0..4 {
            let logger = Arc::clone(&logger);
            handles.push(std::thread::spawn(move || {
                for i in 0..50 {
                    logger.info(format!("{}-{}", t, i));
                }
            }));
        }
        let churn = {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let extra: SharedSink = RecordingSink::named("extra");
                    logger.add_sink(extra.clone());
                    logger.remove_sink(&extra);
                }
            })
        };
        for h in handles {
            h.join().unwrap();
        }
        churn.join().unwrap();

        let messages = sink.messages();
        assert_eq!(messages.len(), 200);
        // Per-producer order is preserved
        for t in 0..4 {
            let own: Vec<_> = messages
                .iter()
                .filter(|m| m.starts_with(&format!("{}-", t)))
                .cloned()
                .collect();
            let expected: Vec<_> = (0..50).map(|i| format!("{}-{}", t, i)).collect();
            assert_eq!(own, expected);
        }
    }
}
