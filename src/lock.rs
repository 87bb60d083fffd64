//! Fetch run exclusivity.
//!
//! Snapshots are rewritten in place after every page, so two fetch runs
//! pointed at the same output directory would corrupt each other. A
//! file-based exclusive lock makes the second run fail fast instead.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Guard that holds the exclusive fetch lock for its lifetime.
pub struct FetchLock {
    lock_file: Option<File>,
    path: PathBuf,
}

impl FetchLock {
    /// Acquire an exclusive lock at the given path.
    pub fn acquire(path: &Path) -> Result<Self> {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                lock_file: Some(lock_file),
                path: path.to_path_buf(),
            }),
            Err(_) => {
                eprintln!(
                    "Another fetch is already running. Wait for it to finish and try again."
                );
                Err(Error::FetchLocked)
            }
        }
    }

    /// Release the lock manually
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
        }
        self.lock_file = None;
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Drop for FetchLock {
    fn drop(&mut self) {
        self.release();
    }
}
