//! Append-only failure log.
//!
//! # Design
//! `ErrorLog::open` is the only way to get a log: it resolves the path once
//! and touches nothing on disk. The containing directory is created on the
//! first append, once per log (clones share that check), so a run without
//! failures leaves no trace. The file itself is opened in append mode for
//! every record and closed again, so no handle outlives a call. There is no locking; appends from multiple threads must be
//! serialized by the caller.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use chrono::Local;

use crate::error::FailureKind;

/// Relative location of the log file when none is configured.
pub const DEFAULT_LOG_PATH: &str = "log/log_file";

const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
    dir_ready: Arc<OnceLock<()>>,
}

impl ErrorLog {
    /// Resolve `path` against the working directory.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()?.join(path)
        };

        Ok(Self {
            path,
            dir_ready: Arc::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one record. The directory and file are created on first append.
    pub fn append(&self, kind: FailureKind, message: &str) -> io::Result<()> {
        tracing::warn!(%kind, detail = message, "request failed");
        self.ensure_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = Local::now().format(TIMESTAMP_FORMAT);
        write!(
            file,
            "ERROR\nDate: {timestamp}, Kind: {kind}, Message: {message}\n"
        )
    }

    fn ensure_dir(&self) -> io::Result<()> {
        if self.dir_ready.get().is_some() {
            return Ok(());
        }
        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
                tracing::debug!(dir = %dir.display(), "created error log directory");
            }
        }
        let _ = self.dir_ready.set(());
        Ok(())
    }
}
