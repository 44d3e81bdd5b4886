//! fanlog - fan-out logging engine
//!
//! One logical log stream delivered, in order, to a rotating log file, the
//! console and a terminal log viewer running on its own thread.

pub mod app;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod logging;
pub mod tui;
pub mod workload;
