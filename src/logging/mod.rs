//! Logging engine
//!
//! One logical log stream fanned out, in order, to a rotating file, the
//! console, the terminal UI and composites of these. A failing sink is
//! reported on the fallback channel and never affects the others or the
//! producer.

mod composite;
mod console_sink;
mod encoding;
mod error;
mod file_sink;
mod level;
mod logger;
mod macros;
mod record;
mod registry;
mod report;
pub mod rotation;
mod sink;
mod ui_bridge;

pub use composite::CompositeSink;
pub use console_sink::{terminal_color, ConsoleSink};
pub use encoding::TextEncoding;
pub use error::{categorize_io_error, DiskErrorKind, DisplayError, SinkError};
pub use file_sink::{session_marker, FileSink, FileSinkOptions};
pub use level::LogLevel;
pub use logger::{Logger, DEFAULT_LOGGER_NAME};
pub use record::LogRecord;
pub use registry::LoggerRegistry;
pub use report::{FailureReporter, MemoryReporter, SinkFailure, StderrReporter, TracingReporter};
pub use sink::{same_sink, SharedSink, Sink};
pub use ui_bridge::{DisplayMethod, LogDisplay, UiBridgeReceiver, UiBridgeSink, UiMessage};
