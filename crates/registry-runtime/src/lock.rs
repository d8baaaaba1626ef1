//! # Data File Locking
//!
//! The file and RocksDB backends keep committed state in one process. Two
//! `stockroom-registry` invocations against the same data path would each
//! validate against their own copy and overwrite each other's commits, so
//! mutations take an exclusive lock first.
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). The lock file is never removed: every invocation must lock the
//! same inode, so release only clears the PID and unlocks.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from data file locking
#[derive(Debug, Error)]
pub enum LockError {
    #[error("Failed to create lock file: {0}")]
    CreateFailed(io::Error),

    #[error("Registry data already in use by process {pid:?} ({})", path.display())]
    AlreadyLocked { pid: Option<u32>, path: PathBuf },

    #[error("Failed to write PID to lock file: {0}")]
    WriteFailed(io::Error),
}

/// Exclusive lock on a registry data path, released on drop.
pub struct DataLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl DataLock {
    /// Lock file path for a data file (`registry.json` -> `registry.json.lock`).
    pub fn lock_path_for(data_path: &Path) -> PathBuf {
        let mut name = data_path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Acquire the lock for `data_path`, failing fast if it is held.
    pub fn acquire(data_path: &Path) -> Result<Self, LockError> {
        let lock_path = Self::lock_path_for(data_path);
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(LockError::CreateFailed)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(LockError::CreateFailed)?;

        if file.try_lock_exclusive().is_err() {
            return Err(LockError::AlreadyLocked {
                pid: Self::read_existing_pid(&lock_path),
                path: lock_path,
            });
        }

        let pid = std::process::id();
        let mut locked_file = file;
        locked_file.set_len(0).map_err(LockError::WriteFailed)?;
        writeln!(locked_file, "{pid}").map_err(LockError::WriteFailed)?;
        locked_file.sync_all().map_err(LockError::WriteFailed)?;

        Ok(Self {
            file: locked_file,
            path: lock_path,
            pid,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for DataLock {
    fn drop(&mut self) {
        let _ = self.file.set_len(0);
        let _ = self.file.unlock();
    }
}
