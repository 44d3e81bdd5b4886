//! Application context
//!
//! Owns the loaded configuration and the logger registry, and wires the
//! configured sinks onto the application logger.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::logging::{
    FailureReporter, Logger, LoggerRegistry, SharedSink, StderrReporter, UiBridgeReceiver,
    UiBridgeSink,
};

/// Where log output is shown besides the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontEnd {
    /// Plain console output
    Headless,
    /// Terminal log viewer fed through the UI bridge
    Terminal,
}

/// The wired application logger and its UI hand-off
pub struct LoggingSetup {
    pub logger: Arc<Logger>,
    /// Receiver for the terminal viewer; `None` in headless mode
    pub receiver: Option<UiBridgeReceiver>,
    /// Active log file, if the file sink is enabled
    pub log_path: Option<PathBuf>,
}

pub struct AppContext {
    config: Config,
    registry: Arc<LoggerRegistry>,
    reporter: Arc<dyn FailureReporter>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self::with_reporter(config, Arc::new(StderrReporter))
    }

    /// Build a context whose loggers report sink failures to `reporter`
    pub fn with_reporter(config: Config, reporter: Arc<dyn FailureReporter>) -> Self {
        let registry = LoggerRegistry::new().with_reporter(Arc::clone(&reporter));
        Self {
            config,
            registry: Arc::new(registry),
            reporter,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<LoggerRegistry> {
        &self.registry
    }

    /// Sinks for `front_end` in dispatch order: file first, then console or UI
    pub fn build_sinks(
        &self,
        front_end: FrontEnd,
    ) -> Result<(Vec<SharedSink>, Option<UiBridgeReceiver>)> {
        let mut sinks: Vec<SharedSink> = Vec::new();
        let mut receiver = None;

        if self.config.file.enabled {
            sinks.push(Arc::new(self.config.file.build_sink()?));
        }

        match front_end {
            FrontEnd::Headless => {
                if self.config.console.enabled {
                    sinks.push(Arc::new(self.config.console.build_sink()));
                }
            }
            FrontEnd::Terminal => {
                let bridge = UiBridgeSink::new().with_reporter(Arc::clone(&self.reporter));
                receiver = Some(bridge.bind());
                sinks.push(Arc::new(bridge));
            }
        }

        Ok((sinks, receiver))
    }

    /// Configure the application logger for `front_end`
    ///
    /// `debug_override` wins over the configured debug flag when set.
    pub fn setup_logging(
        &self,
        front_end: FrontEnd,
        debug_override: Option<bool>,
    ) -> Result<LoggingSetup> {
        let (sinks, receiver) = self.build_sinks(front_end)?;
        let debug_mode = debug_override.unwrap_or(self.config.logger.debug);
        let logger = self
            .registry
            .configure_logger(&self.config.logger.name, sinks, debug_mode);

        let log_path = self
            .config
            .file
            .enabled
            .then(|| self.config.file.resolved_path());

        tracing::info!(
            logger = %self.config.logger.name,
            ?front_end,
            debug_mode,
            "Application logger configured"
        );

        Ok(LoggingSetup {
            logger,
            receiver,
            log_path,
        })
    }

    /// The application logger, created on first use
    pub fn logger(&self) -> Arc<Logger> {
        let name = &self.config.logger.name;
        match self.registry.get(name) {
            Some(logger) => logger,
            None => self.registry.get_logger(name, self.config.logger.debug),
        }
    }
}
