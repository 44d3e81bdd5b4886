//! Rotating, durable file sink
//!
//! Every record is appended as one line and synced to storage before `emit`
//! returns. When the active file grows past the configured size it is rotated
//! (see [`super::rotation`]) and a fresh session marker starts the new file.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use super::encoding::TextEncoding;
use super::error::SinkError;
use super::record::LogRecord;
use super::rotation::{self, DEFAULT_MAX_SIZE_MB};
use super::sink::Sink;

/// Construction options for [`FileSink`]
#[derive(Debug, Clone)]
pub struct FileSinkOptions {
    /// Active log file
    pub path: PathBuf,
    /// Rotation threshold in megabytes
    pub max_size_mb: f64,
    /// Text encoding for everything written to the file
    pub encoding: TextEncoding,
}

impl FileSinkOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            encoding: TextEncoding::default(),
        }
    }

    pub fn max_size_mb(mut self, max_size_mb: f64) -> Self {
        self.max_size_mb = max_size_mb;
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

/// Build the session marker written at the top of every new file
pub fn session_marker() -> String {
    format!(
        "=== Log started at {} ===",
        Local::now().format("%Y-%m-%dT%H:%M:%S%.6f")
    )
}

/// Appends records to a log file, rotating on size
pub struct FileSink {
    path: PathBuf,
    max_size_mb: f64,
    encoding: TextEncoding,
    /// Open append handle; `None` after a failed reopen or while rotating
    file: Mutex<Option<File>>,
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("max_size_mb", &self.max_size_mb)
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl FileSink {
    /// Create a sink with default size threshold and encoding
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        Self::with_options(FileSinkOptions::new(path))
    }

    /// Create a sink, making the parent directory and the file if needed
    ///
    /// Errors here are configuration errors and are returned to the caller.
    pub fn with_options(options: FileSinkOptions) -> Result<Self, SinkError> {
        if options.max_size_mb.is_nan() || options.max_size_mb < 0.0 {
            return Err(SinkError::InvalidConfig(format!(
                "max_size_mb must be zero or positive, got {}",
                options.max_size_mb
            )));
        }

        if let Some(parent) = options.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| SinkError::io("create log directory", parent, e))?;
            }
        }

        let sink = Self {
            path: options.path,
            max_size_mb: options.max_size_mb,
            encoding: options.encoding,
            file: Mutex::new(None),
        };
        let file = sink.open_active()?;
        if let Ok(mut slot) = sink.file.lock() {
            *slot = Some(file);
        }
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        rotation::backup_path(&self.path)
    }

    pub fn max_size_mb(&self) -> f64 {
        self.max_size_mb
    }

    pub fn encoding(&self) -> TextEncoding {
        self.encoding
    }

    /// Open the active file for appending, writing a session marker if it is new
    fn open_active(&self) -> Result<File, SinkError> {
        let is_new = !self.path.exists();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| SinkError::io("open log file", &self.path, e))?;

        if is_new {
            let marker = self.encoding.encode(&format!("{}\n", session_marker()))?;
            file.write_all(&marker)
                .and_then(|_| file.flush())
                .map_err(|e| SinkError::io("write session marker", &self.path, e))?;
        }
        Ok(file)
    }

    /// Drop the handle if the active file was deleted or moved away
    ///
    /// The next write then recreates the file with a fresh session marker
    /// instead of appending to an unlinked inode.
    fn detach_if_missing(&self, slot: &mut Option<File>) {
        if slot.is_some() && !self.path.exists() {
            *slot = None;
        }
    }

    fn rotate_if_needed(&self, slot: &mut Option<File>) -> Result<(), SinkError> {
        let over = rotation::needs_rotation(&self.path, self.max_size_mb)
            .map_err(|e| SinkError::io("check log size", &self.path, e))?;
        if !over {
            return Ok(());
        }

        // Close the handle before renaming the file out from under it
        *slot = None;
        rotation::rotate(&self.path).map_err(|e| SinkError::io("rotate log file", &self.path, e))?;
        *slot = Some(self.open_active()?);
        Ok(())
    }

    fn write_record(&self, slot: &mut Option<File>, record: &LogRecord) -> Result<(), SinkError> {
        // Encode first so an unencodable record leaves the file untouched
        let bytes = self.encoding.encode(&format!("{}\n", record.format_line()))?;

        if slot.is_none() {
            *slot = Some(self.open_active()?);
        }
        let Some(file) = slot.as_mut() else {
            return Ok(());
        };

        let result = file
            .write_all(&bytes)
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_all());
        if let Err(e) = result {
            // Drop the handle so the next record starts from a fresh open
            *slot = None;
            return Err(SinkError::io("append to log file", &self.path, e));
        }
        Ok(())
    }
}

impl Sink for FileSink {
    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn emit(&self, record: &LogRecord) -> Result<(), SinkError> {
        let mut slot = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        self.detach_if_missing(&mut slot);
        self.rotate_if_needed(&mut slot)?;
        self.write_record(&mut slot, record)
    }
}
