//! Composite sink: one sink that fans out to a nested list of sinks

use std::sync::Arc;

use super::error::SinkError;
use super::record::LogRecord;
use super::report::{FailureReporter, StderrReporter};
use super::sink::{fan_out, SharedSink, Sink};

/// Forwards each record to its children in order
///
/// A failing child is reported as `<composite>/<child>` and does not stop
/// its siblings. The composite itself never fails.
pub struct CompositeSink {
    name: String,
    children: Vec<SharedSink>,
    reporter: Arc<dyn FailureReporter>,
}

impl CompositeSink {
    pub fn new(name: impl Into<String>, children: Vec<SharedSink>) -> Self {
        Self {
            name: name.into(),
            children,
            reporter: Arc::new(StderrReporter),
        }
    }

    /// Append another child
    pub fn with_child(mut self, child: SharedSink) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn FailureReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Sink for CompositeSink {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        fan_out(&self.children, record, self.reporter.as_ref(), |child| {
            format!("{}/{}", self.name, child)
        });
        Ok(())
    }
}
