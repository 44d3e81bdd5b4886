//! Size-based log file rotation
//!
//! Exactly one backup generation is kept, at `<path>.old`. Rotating deletes
//! the previous backup before moving the active file into its place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default rotation threshold in megabytes
pub const DEFAULT_MAX_SIZE_MB: f64 = 5.0;

/// Suffix appended to the active path to form the backup path
pub const BACKUP_SUFFIX: &str = ".old";

/// Get the backup path for an active log file
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Check whether a file of `size_bytes` is over a `max_size_mb` threshold
pub fn exceeds_threshold(size_bytes: u64, max_size_mb: f64) -> bool {
    (size_bytes as f64) / 1024.0 / 1024.0 > max_size_mb
}

/// Check the active file's size and report whether it should be rotated
///
/// A missing file never needs rotating.
pub fn needs_rotation(path: &Path, max_size_mb: f64) -> io::Result<bool> {
    match fs::metadata(path) {
        Ok(meta) => Ok(exceeds_threshold(meta.len(), max_size_mb)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Move the active file to its backup path, discarding any older backup
///
/// Returns the backup path.
pub fn rotate(path: &Path) -> io::Result<PathBuf> {
    let backup = backup_path(path);
    match fs::remove_file(&backup) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::rename(path, &backup)?;
    Ok(backup)
}
