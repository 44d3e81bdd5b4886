//! `format!`-style front ends for the logger's level methods.
//!
//! ```ignore
//! logger_info!(logger, "fetched {} of {} pages", done, total);
//! ```
//!
//! Debug formatting is skipped entirely while the logger's debug mode is off.

#[macro_export]
macro_rules! logger_log {
    ($logger:expr, $lvl:expr, $($arg:tt)*) => {{
        let __logger = &$logger;
        let __lvl = $lvl;
        if __logger.enabled(__lvl) {
            __logger.log(__lvl, format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! logger_debug   { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::logging::LogLevel::Debug, $($arg)*) } }
#[macro_export]
macro_rules! logger_info    { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::logging::LogLevel::Info, $($arg)*) } }
#[macro_export]
macro_rules! logger_success { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::logging::LogLevel::Success, $($arg)*) } }
#[macro_export]
macro_rules! logger_warning { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::logging::LogLevel::Warning, $($arg)*) } }
#[macro_export]
macro_rules! logger_error   { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::logging::LogLevel::Error, $($arg)*) } }
#[macro_export]
macro_rules! logger_progress { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::logging::LogLevel::Progress, $($arg)*) } }
#[macro_export]
macro_rules! logger_status  { ($logger:expr, $($arg:tt)*) => { $crate::logger_log!($logger, $crate::logging::LogLevel::StatusNotice, $($arg)*) } }
