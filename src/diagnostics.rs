//! Internal diagnostics for fanlog itself
//!
//! fanlog's own events (logger creation, sink failures in TUI mode, startup)
//! go through `tracing` to a timestamped file under `~/.fanlog/diagnostics`.
//! These files are separate from the application log the sinks write.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Diagnostics files older than this are removed at startup
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

const FILE_PREFIX: &str = "fanlog-";

/// Where this run's diagnostics are written
#[derive(Debug, Clone)]
pub struct DiagnosticsInfo {
    pub path: PathBuf,
}

/// Keeps the diagnostics file open for the life of the process
pub struct DiagnosticsGuard {
    _file: Arc<Mutex<File>>,
}

/// Generate a timestamped diagnostics file path
pub fn create_diagnostics_file_path(dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    dir.join(format!("{}{}.log", FILE_PREFIX, timestamp))
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<File>>,
}

impl Write for SharedFileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.file.lock() {
            Ok(mut file) => {
                file.write_all(buf)?;
                Ok(buf.len())
            }
            // Drop output rather than panic inside the subscriber
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.file.lock() {
            Ok(mut file) => file.flush(),
            Err(_) => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Resolve the filter directive: `RUST_LOG`, then `--debug`, then info
fn env_filter(debug: bool) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            "fanlog=debug".into()
        } else {
            "fanlog=info".into()
        }
    })
}

/// Install the global diagnostics subscriber writing into `dir`
///
/// Returns the file info and a guard that must be kept alive while logging.
pub fn init_diagnostics(dir: &Path, debug: bool) -> Result<(DiagnosticsInfo, DiagnosticsGuard)> {
    fs::create_dir_all(dir).context("Failed to create diagnostics directory")?;

    let path = create_diagnostics_file_path(dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context("Failed to open diagnostics file")?;
    let file = Arc::new(Mutex::new(file));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(SharedFileWriter {
            file: Arc::clone(&file),
        })
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter(debug))
        .with(layer)
        .try_init()
        .context("Failed to install diagnostics subscriber")?;

    Ok((DiagnosticsInfo { path }, DiagnosticsGuard { _file: file }))
}

/// Remove diagnostics files older than the default retention period
///
/// Returns the number of files deleted.
pub fn cleanup_old_diagnostics(dir: &Path) -> Result<usize> {
    cleanup_old_diagnostics_with_retention(dir, DEFAULT_RETENTION_DAYS)
}

/// Remove diagnostics files older than `retention_days`
///
/// Only `fanlog-*.log` files are touched. Returns the number deleted.
pub fn cleanup_old_diagnostics_with_retention(dir: &Path, retention_days: u64) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(retention_days * 24 * 60 * 60))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let mut deleted = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_diagnostics = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|name| name.starts_with(FILE_PREFIX) && name.ends_with(".log"))
            .unwrap_or(false);
        if !is_diagnostics {
            continue;
        }

        let modified = entry.metadata().and_then(|m| m.modified());
        if let Ok(modified) = modified {
            if modified <= cutoff && fs::remove_file(&path).is_ok() {
                deleted += 1;
            }
        }
    }

    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        File::create(path).unwrap().write_all(b"diag").unwrap();
    }

    #[test]
    fn test_create_diagnostics_file_path() {
        let path = create_diagnostics_file_path(Path::new("/tmp/fanlog/diagnostics"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("fanlog-"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn test_cleanup_nonexistent_dir() {
        let count = cleanup_old_diagnostics(Path::new("/nonexistent/fanlog/diag")).unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_cleanup_keeps_recent_files() {
        let temp_dir = TempDir::new().unwrap();
        let recent = temp_dir.path().join("fanlog-2026-01-21_14-30-45.log");
        touch(&recent);

        assert_eq!(cleanup_old_diagnostics(temp_dir.path()).unwrap(), 0);
        assert!(recent.exists());
    }

    #[test]
    fn test_zero_retention_removes_only_diagnostics() {
        let temp_dir = TempDir::new().unwrap();
        let diag = temp_dir.path().join("fanlog-2026-01-21_14-30-45.log");
        let app_log = temp_dir.path().join("app.log");
        let other = temp_dir.path().join("other-2026-01-01.log");
        touch(&diag);
        touch(&app_log);
        touch(&other);

        let count = cleanup_old_diagnostics_with_retention(temp_dir.path(), 0).unwrap();
        assert_eq!(count, 1);
        assert!(!diag.exists());
        assert!(app_log.exists());
        assert!(other.exists());
    }

    #[test]
    fn test_shared_writer_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("w.log");
        let file = File::create(&path).unwrap();
        let maker = SharedFileWriter {
            file: Arc::new(Mutex::new(file)),
        };

        let mut a = maker.make_writer();
        let mut b = maker.make_writer();
        a.write_all(b"one\n").unwrap();
        b.write_all(b"two\n").unwrap();
        a.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }
}
