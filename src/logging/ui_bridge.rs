//! Cross-context delivery to a UI component
//!
//! The UI component lives on its own thread (the terminal event loop). The
//! [`UiBridgeSink`] never touches it: `emit` only pushes a [`UiMessage`] onto
//! a channel. The UI thread owns the matching [`UiBridgeReceiver`] and drains
//! it into a [`LogDisplay`] from its own loop, in FIFO order.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use super::error::{DisplayError, SinkError};
use super::level::LogLevel;
use super::record::LogRecord;
use super::report::{FailureReporter, SinkFailure, StderrReporter};
use super::sink::Sink;

/// Payload handed across to the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiMessage {
    pub level_name: String,
    pub message: String,
    pub color: String,
}

impl From<&LogRecord> for UiMessage {
    fn from(record: &LogRecord) -> Self {
        Self {
            level_name: record.level().as_str().to_string(),
            message: record.message().to_string(),
            color: record.level().color().to_string(),
        }
    }
}

/// A UI component able to show log messages
///
/// Only `info` is mandatory. The other methods report
/// [`DisplayError::Unsupported`] unless the component overrides them.
pub trait LogDisplay {
    fn info(&mut self, message: &str) -> Result<(), DisplayError>;

    fn success(&mut self, _message: &str) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported("success"))
    }

    fn warning(&mut self, _message: &str) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported("warning"))
    }

    fn error(&mut self, _message: &str) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported("error"))
    }

    fn progress(&mut self, _message: &str) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported("progress"))
    }

    fn status_notice(&mut self, _message: &str) -> Result<(), DisplayError> {
        Err(DisplayError::Unsupported("status_notice"))
    }
}

/// The display method a level is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMethod {
    Info,
    Success,
    Warning,
    Error,
    Progress,
    StatusNotice,
}

impl DisplayMethod {
    /// Fixed level → method table
    pub fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug | LogLevel::Info => DisplayMethod::Info,
            LogLevel::Success => DisplayMethod::Success,
            LogLevel::Warning => DisplayMethod::Warning,
            LogLevel::Error => DisplayMethod::Error,
            LogLevel::Progress => DisplayMethod::Progress,
            LogLevel::StatusNotice => DisplayMethod::StatusNotice,
        }
    }

    /// Route by level name; unknown names go to `info`
    pub fn for_level_name(name: &str) -> Self {
        Self::for_level(LogLevel::from_name(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMethod::Info => "info",
            DisplayMethod::Success => "success",
            DisplayMethod::Warning => "warning",
            DisplayMethod::Error => "error",
            DisplayMethod::Progress => "progress",
            DisplayMethod::StatusNotice => "status_notice",
        }
    }

    /// Call this method on `display`
    pub fn invoke(
        &self,
        display: &mut dyn LogDisplay,
        message: &str,
    ) -> Result<(), DisplayError> {
        match self {
            DisplayMethod::Info => display.info(message),
            DisplayMethod::Success => display.success(message),
            DisplayMethod::Warning => display.warning(message),
            DisplayMethod::Error => display.error(message),
            DisplayMethod::Progress => display.progress(message),
            DisplayMethod::StatusNotice => display.status_notice(message),
        }
    }
}

/// Sink half of the bridge; safe to call from any thread
pub struct UiBridgeSink {
    sender: Mutex<Option<mpsc::UnboundedSender<UiMessage>>>,
    reporter: Arc<dyn FailureReporter>,
}

impl Default for UiBridgeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl UiBridgeSink {
    /// Create an unbound bridge; records are dropped until [`bind`](Self::bind)
    pub fn new() -> Self {
        Self {
            sender: Mutex::new(None),
            reporter: Arc::new(StderrReporter),
        }
    }

    /// Create a bridge already bound to a fresh receiver
    pub fn bound() -> (Self, UiBridgeReceiver) {
        let sink = Self::new();
        let receiver = sink.bind();
        (sink, receiver)
    }

    /// Reporter handed to receivers for display failures
    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Attach a new receiver, detaching any previous one first
    ///
    /// A detached receiver still yields what was queued before detaching and
    /// then reports the channel as closed.
    pub fn bind(&self) -> UiBridgeReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        // Replacing the sender closes the previous receiver's channel
        *self.lock_sender() = Some(tx);
        UiBridgeReceiver {
            rx,
            reporter: Arc::clone(&self.reporter),
        }
    }

    /// Drop the current binding, if any
    pub fn detach(&self) {
        *self.lock_sender() = None;
    }

    pub fn is_bound(&self) -> bool {
        self.lock_sender().is_some()
    }

    fn lock_sender(&self) -> MutexGuard<'_, Option<mpsc::UnboundedSender<UiMessage>>> {
        match self.sender.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Sink for UiBridgeSink {
    fn name(&self) -> String {
        "ui-bridge".to_string()
    }

    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut slot = self.lock_sender();
        let Some(tx) = slot.as_ref() else {
            return Ok(());
        };
        if tx.send(UiMessage::from(record)).is_err() {
            // The UI went away; stop sending until rebound
            *slot = None;
            return Err(SinkError::Disconnected(
                "ui receiver dropped, bridge detached".to_string(),
            ));
        }
        Ok(())
    }
}

/// UI-thread half of the bridge
pub struct UiBridgeReceiver {
    rx: mpsc::UnboundedReceiver<UiMessage>,
    reporter: Arc<dyn FailureReporter>,
}

impl UiBridgeReceiver {
    /// Take the next queued message without waiting
    pub fn try_next(&mut self) -> Option<UiMessage> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next message; `None` once detached and empty
    pub async fn recv(&mut self) -> Option<UiMessage> {
        self.rx.recv().await
    }

    /// Deliver everything currently queued to `display`, in order
    ///
    /// Returns the number of messages taken off the queue.
    pub fn drain(&mut self, display: &mut dyn LogDisplay) -> usize {
        let mut count = 0;
        while let Some(message) = self.try_next() {
            self.deliver(display, &message);
            count += 1;
        }
        count
    }

    /// Route one message to its display method
    ///
    /// Display failures are reported, never returned. Returns whether the
    /// display accepted the message.
    pub fn deliver(&self, display: &mut dyn LogDisplay, message: &UiMessage) -> bool {
        let method = DisplayMethod::for_level_name(&message.level_name);
        match method.invoke(display, &message.message) {
            Ok(()) => true,
            Err(e) => {
                let failure = SinkFailure::new(
                    format!("ui-bridge:{}", method.as_str()),
                    LogLevel::from_name(&message.level_name),
                    SinkError::Display(e),
                );
                self.reporter.report(&failure);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::report::MemoryReporter;

    /// Display that records which method received which message
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(&'static str, String)>,
    }

    impl LogDisplay for Recorder {
        fn info(&mut self, message: &str) -> Result<(), DisplayError> {
            self.calls.push(("info", message.to_string()));
            Ok(())
        }

        fn success(&mut self, message: &str) -> Result<(), DisplayError> {
            self.calls.push(("success", message.to_string()));
            Ok(())
        }

        fn warning(&mut self, message: &str) -> Result<(), DisplayError> {
            self.calls.push(("warning", message.to_string()));
            Ok(())
        }

        fn error(&mut self, _message: &str) -> Result<(), DisplayError> {
            Err(DisplayError::Failed("widget destroyed".to_string()))
        }
    }

    fn bridge_with_reporter() -> (UiBridgeSink, UiBridgeReceiver, Arc<MemoryReporter>) {
        let reporter = Arc::new(MemoryReporter::new());
        let sink = UiBridgeSink::new().with_reporter(reporter.clone());
        let receiver = sink.bind();
        (sink, receiver, reporter)
    }

    #[test]
    fn test_mapping_table() {
        assert_eq!(DisplayMethod::for_level(LogLevel::Debug), DisplayMethod::Info);
        assert_eq!(DisplayMethod::for_level_name("SUCCESS"), DisplayMethod::Success);
        assert_eq!(DisplayMethod::for_level_name("STATUS"), DisplayMethod::StatusNotice);
        assert_eq!(DisplayMethod::for_level_name("PROGRESS"), DisplayMethod::Progress);
        assert_eq!(DisplayMethod::for_level_name("nonsense"), DisplayMethod::Info);
    }

    #[test]
    fn test_unbound_emit_is_noop() {
        let sink = UiBridgeSink::new();
        assert!(!sink.is_bound());
        assert!(sink.emit(&LogRecord::new(LogLevel::Info, "x")).is_ok());
    }

    #[test]
    fn test_messages_arrive_in_order() {
        let (sink, mut receiver, _) = bridge_with_reporter();
        for m in ["M1", "M2", "M3"] {
            sink.emit(&LogRecord::new(LogLevel::Info, m)).unwrap();
        }

        let mut display = Recorder::default();
        assert_eq!(receiver.drain(&mut display), 3);
        let messages: Vec<_> = display.calls.iter().map(|(_, m)| m.as_str()).collect();
        assert_eq!(messages, vec!["M1", "M2", "M3"]);
    }

    #[test]
    fn test_emit_does_not_touch_display() {
        let (sink, mut receiver, _) = bridge_with_reporter();
        sink.emit(&LogRecord::new(LogLevel::Warning, "queued"))
            .unwrap();

        let message = receiver.try_next().unwrap();
        assert_eq!(
            message,
            UiMessage {
                level_name: "WARNING".to_string(),
                message: "queued".to_string(),
                color: "yellow".to_string(),
            }
        );
    }

    #[test]
    fn test_cross_thread_order_from_one_producer() {
        let (sink, mut receiver, _) = bridge_with_reporter();
        let sink = Arc::new(sink);
        let producer = {
            let sink = Arc::clone(&sink);
            std::thread::spawn(move || {
                for i in 0..100 {
                    sink.emit(&LogRecord::new(LogLevel::Info, format!("m{}", i)))
                        .unwrap();
                }
            })
        };
        producer.join().unwrap();

        let mut display = Recorder::default();
        receiver.drain(&mut display);
        let expected: Vec<_> = (0..100).map(|i| format!("m{}", i)).collect();
        let got: Vec<_> = display.calls.into_iter().map(|(_, m)| m).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_display_failures_are_reported() {
        let (sink, mut receiver, reporter) = bridge_with_reporter();
        sink.emit(&LogRecord::new(LogLevel::Error, "broken"))
            .unwrap();
        sink.emit(&LogRecord::new(LogLevel::Progress, "50%"))
            .unwrap();
        sink.emit(&LogRecord::new(LogLevel::Success, "fine"))
            .unwrap();

        let mut display = Recorder::default();
        assert_eq!(receiver.drain(&mut display), 3);

        assert_eq!(display.calls, vec![("success", "fine".to_string())]);
        let reports = reporter.reports();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].contains("ui-bridge:error"));
        assert!(reports[1].contains("ui-bridge:progress"));
        assert!(reports[1].contains("not supported"));
    }

    #[test]
    fn test_rebind_detaches_previous_receiver() {
        let (sink, mut first, _) = bridge_with_reporter();
        sink.emit(&LogRecord::new(LogLevel::Info, "before")).unwrap();

        let mut second = sink.bind();
        sink.emit(&LogRecord::new(LogLevel::Info, "after")).unwrap();

        assert_eq!(first.try_next().unwrap().message, "before");
        assert!(first.try_next().is_none());
        assert_eq!(second.try_next().unwrap().message, "after");
    }

    #[test]
    fn test_dropped_receiver_detaches_sink() {
        let (sink, receiver, _) = bridge_with_reporter();
        drop(receiver);

        let result = sink.emit(&LogRecord::new(LogLevel::Info, "lost"));
        assert!(matches!(result, Err(SinkError::Disconnected(_))));
        assert!(!sink.is_bound());
        assert!(sink.emit(&LogRecord::new(LogLevel::Info, "quiet")).is_ok());
    }

    #[test]
    fn test_async_recv() {
        let (sink, mut receiver) = UiBridgeSink::bound();
        sink.emit(&LogRecord::new(LogLevel::StatusNotice, "idle"))
            .unwrap();
        sink.detach();

        let first = tokio_test::block_on(receiver.recv());
        assert_eq!(first.map(|m| m.level_name), Some("STATUS".to_string()));
        assert!(tokio_test::block_on(receiver.recv()).is_none());
    }
}
