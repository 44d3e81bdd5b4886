//! Named logger registry
//!
//! Independent subsystems share one `Logger` per name. The registry is an
//! ordinary value owned by the application context, so tests can build as many
//! isolated registries as they like.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::logger::Logger;
use super::report::{FailureReporter, StderrReporter};
use super::sink::SharedSink;

/// Lock-guarded map from logger name to logger
pub struct LoggerRegistry {
    loggers: Mutex<HashMap<String, Arc<Logger>>>,
    reporter: Arc<dyn FailureReporter>,
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerRegistry {
    pub fn new() -> Self {
        Self {
            loggers: Mutex::new(HashMap::new()),
            reporter: Arc::new(StderrReporter),
        }
    }

    /// Reporter given to every logger this registry creates
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<Logger>>> {
        match self.loggers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Fetch the logger for `name`, creating it on first request
    ///
    /// An existing logger keeps its sinks; only its debug flag is updated.
    pub fn get_logger(&self, name: &str, debug: bool) -> Arc<Logger> {
        let mut loggers = self.lock();
        if let Some(logger) = loggers.get(name) {
            logger.set_debug(debug);
            return Arc::clone(logger);
        }

        let debug_mode = debug;
        tracing::debug!(logger = name, debug_mode, "Creating logger");
        let logger =
            Arc::new(Logger::new(name, debug).with_reporter(Arc::clone(&self.reporter)));
        loggers.insert(name.to_string(), Arc::clone(&logger));
        logger
    }

    /// Fetch or create `name` and replace its sinks with `sinks`, in order
    pub fn configure_logger(
        &self,
        name: &str,
        sinks: Vec<SharedSink>,
        debug: bool,
    ) -> Arc<Logger> {
        let logger = self.get_logger(name, debug);
        logger.replace_sinks(sinks);
        tracing::debug!(
            logger = name,
            sinks = ?logger.sink_names(),
            "Logger configured"
        );
        logger
    }

    /// Look up an existing logger without creating one
    pub fn get(&self, name: &str) -> Option<Arc<Logger>> {
        self.lock().get(name).cloned()
    }

    /// Registered logger names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
