//! Demo producer
//!
//! Imitates a page-scraping run so every sink sees realistic traffic from a
//! thread other than the one that owns the UI.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::logging::Logger;
use crate::{
    logger_debug, logger_error, logger_info, logger_progress, logger_status, logger_success,
    logger_warning,
};

/// Shape of a demo run
#[derive(Debug, Clone, Copy)]
pub struct WorkloadOptions {
    pub pages: u32,
    pub interval: Duration,
}

impl Default for WorkloadOptions {
    fn default() -> Self {
        Self {
            pages: 40,
            interval: Duration::from_millis(250),
        }
    }
}

/// What a run produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkloadSummary {
    pub fetched: u32,
    pub warnings: u32,
    pub failures: u32,
    pub cancelled: bool,
}

/// Run the demo on the current thread until done or `stop` is set
pub fn run(logger: &Logger, options: WorkloadOptions, stop: &AtomicBool) -> WorkloadSummary {
    let mut summary = WorkloadSummary::default();
    logger_info!(logger, "Starting crawl of {} pages", options.pages);

    for page in 1..=options.pages {
        if stop.load(Ordering::Relaxed) {
            summary.cancelled = true;
            logger_warning!(logger, "Crawl cancelled after {} pages", page - 1);
            return summary;
        }

        logger_debug!(logger, "GET https://example.com/catalog?page={}", page);

        if page % 13 == 0 {
            summary.failures += 1;
            logger_error!(logger, "Page {} failed: request timed out", page);
        } else {
            summary.fetched += 1;
            if page % 7 == 0 {
                summary.warnings += 1;
                logger_warning!(logger, "Page {} slow to respond, backing off", page);
            }
            logger_debug!(logger, "Page {} parsed {} items", page, 20 + page % 5);
        }

        logger_progress!(logger, "Page {}/{}", page, options.pages);
        if page % 10 == 0 {
            logger_status!(
                logger,
                "{} fetched, {} failed",
                summary.fetched,
                summary.failures
            );
        }

        if !options.interval.is_zero() {
            thread::sleep(options.interval);
        }
    }

    logger_success!(
        logger,
        "Crawl finished: {} fetched, {} warnings, {} failed",
        summary.fetched,
        summary.warnings,
        summary.failures
    );
    summary
}

/// Run the demo on a background thread
pub fn spawn(
    logger: Arc<Logger>,
    options: WorkloadOptions,
    stop: Arc<AtomicBool>,
) -> io::Result<JoinHandle<WorkloadSummary>> {
    thread::Builder::new()
        .name("fanlog-workload".to_string())
        .spawn(move || run(&logger, options, &stop))
}
