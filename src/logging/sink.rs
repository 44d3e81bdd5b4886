//! Sink abstraction and the isolated fan-out loop shared by the logger and
//! composite sinks.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::error::SinkError;
use super::record::LogRecord;
use super::report::{FailureReporter, SinkFailure};

/// A destination for log records
pub trait Sink: Send + Sync {
    /// Name used to identify this sink in failure reports
    fn name(&self) -> String;

    /// Perform this sink's side effect for one record
    fn emit(&self, record: &LogRecord) -> Result<(), SinkError>;
}

/// Shared handle to a sink; identity is the allocation it points to
pub type SharedSink = Arc<dyn Sink>;

/// Check whether two handles refer to the same sink instance
pub fn same_sink(a: &SharedSink, b: &SharedSink) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

/// Emit `record` to one sink, converting both errors and panics into a failure
pub(crate) fn emit_isolated(sink: &dyn Sink, record: &LogRecord) -> Result<(), SinkError> {
    match panic::catch_unwind(AssertUnwindSafe(|| sink.emit(record))) {
        Ok(result) => result,
        Err(payload) => Err(SinkError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Deliver `record` to every sink in order
///
/// A failing sink never stops delivery to the ones after it. Each failure is
/// passed to `reporter` and also returned to the caller. `label` rewrites the
/// sink name used in reports.
pub(crate) fn fan_out<F>(
    sinks: &[SharedSink],
    record: &LogRecord,
    reporter: &dyn FailureReporter,
    label: F,
) -> Vec<SinkFailure>
where
    F: Fn(String) -> String,
{
    let mut failures = Vec::new();
    for sink in sinks {
        if let Err(error) = emit_isolated(sink.as_ref(), record) {
            let failure = SinkFailure::new(label(sink.name()), record.level(), error);
            reporter.report(&failure);
            failures.push(failure);
        }
    }
    failures
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
