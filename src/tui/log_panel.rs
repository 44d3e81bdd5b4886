//! On-screen log panel
//!
//! The UI-thread component the bridge delivers into. Keeps a bounded ring of
//! entries for the list view, a bounded alert ring for warnings and errors,
//! and the latest progress and status lines for the status bar.

use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::logging::{DisplayError, LogDisplay, LogLevel};

/// A single displayed line
#[derive(Debug, Clone)]
pub struct PanelEntry {
    /// When the panel received the message
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl PanelEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            level,
            message: message.into(),
        }
    }
}

/// Ring-buffered log display owned by the terminal event loop
pub struct LogPanel {
    entries: VecDeque<PanelEntry>,
    alerts: VecDeque<PanelEntry>,
    max_entries: usize,
    max_alerts: usize,
    progress: Option<String>,
    status: Option<String>,
}

impl LogPanel {
    /// Create a panel keeping at most `max_entries` lines and `max_alerts` alerts
    pub fn new(max_entries: usize, max_alerts: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1024)),
            alerts: VecDeque::with_capacity(max_alerts.min(1024)),
            max_entries: max_entries.max(1),
            max_alerts: max_alerts.max(1),
            progress: None,
            status: None,
        }
    }

    /// Append an entry, evicting the oldest when full
    pub fn push(&mut self, entry: PanelEntry) {
        if entry.level.is_alert() {
            if self.alerts.len() >= self.max_alerts {
                self.alerts.pop_front();
            }
            self.alerts.push_back(entry.clone());
        }

        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &PanelEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn alerts(&self) -> impl ExactSizeIterator<Item = &PanelEntry> {
        self.alerts.iter()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    /// Acknowledge all pending alerts
    pub fn clear_alerts(&mut self) {
        self.alerts.clear();
    }

    /// Most recent progress message
    pub fn latest_progress(&self) -> Option<&str> {
        self.progress.as_deref()
    }

    /// Most recent status notice
    pub fn latest_status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn record(&mut self, level: LogLevel, message: &str) -> Result<(), DisplayError> {
        self.push(PanelEntry::new(level, message));
        Ok(())
    }
}

impl LogDisplay for LogPanel {
    fn info(&mut self, message: &str) -> Result<(), DisplayError> {
        self.record(LogLevel::Info, message)
    }

    fn success(&mut self, message: &str) -> Result<(), DisplayError> {
        self.record(LogLevel::Success, message)
    }

    fn warning(&mut self, message: &str) -> Result<(), DisplayError> {
        self.record(LogLevel::Warning, message)
    }

    fn error(&mut self, message: &str) -> Result<(), DisplayError> {
        self.record(LogLevel::Error, message)
    }

    fn progress(&mut self, message: &str) -> Result<(), DisplayError> {
        self.progress = Some(message.to_string());
        self.record(LogLevel::Progress, message)
    }

    fn status_notice(&mut self, message: &str) -> Result<(), DisplayError> {
        self.status = Some(message.to_string());
        self.record(LogLevel::StatusNotice, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{Logger, MemoryReporter, UiBridgeSink};
    use std::sync::Arc;

    #[test]
    fn test_push_and_alerts() {
        let mut panel = LogPanel::new(100, 10);

        panel.info("message 1").unwrap();
        panel.warning("warning 1").unwrap();
        panel.error("error 1").unwrap();

        assert_eq!(panel.len(), 3);
        assert_eq!(panel.alert_count(), 2);

        let messages: Vec<&str> = panel.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["message 1", "warning 1", "error 1"]);

        let alerts: Vec<&str> = panel.alerts().map(|e| e.message.as_str()).collect();
        assert_eq!(alerts, vec!["warning 1", "error 1"]);

        panel.clear_alerts();
        assert_eq!(panel.alert_count(), 0);
        assert_eq!(panel.len(), 3);
    }

    #[test]
    fn test_capacity() {
        let mut panel = LogPanel::new(3, 2);
        for i in 0..5 {
            panel.info(&format!("msg {}", i)).unwrap();
        }

        assert_eq!(panel.len(), 3);
        let messages: Vec<&str> = panel.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn test_progress_and_status_tracked() {
        let mut panel = LogPanel::new(10, 10);
        assert!(panel.latest_progress().is_none());

        panel.progress("page 1/10").unwrap();
        panel.progress("page 2/10").unwrap();
        panel.status_notice("rate limited").unwrap();

        assert_eq!(panel.latest_progress(), Some("page 2/10"));
        assert_eq!(panel.latest_status(), Some("rate limited"));
        assert_eq!(panel.len(), 3);
    }

    #[test]
    fn test_bridge_delivers_all_levels() {
        let reporter = Arc::new(MemoryReporter::new());
        let sink = Arc::new(UiBridgeSink::new().with_reporter(reporter.clone()));
        let mut receiver = sink.bind();

        let logger = Logger::new("panel", true);
        logger.add_sink(sink);
        logger.debug("d");
        logger.info("i");
        logger.success("s");
        logger.warning("w");
        logger.error("e");
        logger.progress("p");
        logger.status_notice("n");

        let mut panel = LogPanel::new(100, 100);
        assert_eq!(receiver.drain(&mut panel), 7);

        let levels: Vec<LogLevel> = panel.entries().map(|e| e.level).collect();
        assert_eq!(
            levels,
            vec![
                LogLevel::Info,
                LogLevel::Info,
                LogLevel::Success,
                LogLevel::Warning,
                LogLevel::Error,
                LogLevel::Progress,
                LogLevel::StatusNotice,
            ]
        );
        assert!(reporter.is_empty());
    }
}
