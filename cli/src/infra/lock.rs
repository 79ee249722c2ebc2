//! Advisory lock guarding the state file against concurrent runs.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::Result;
use fd_lock::{RwLock, RwLockWriteGuard};

use crate::domain::ProvisionError;

/// Lock file next to the state file, `<state-file>.lock`.
pub struct StateLock {
    path: PathBuf,
    lock: RwLock<File>,
}

impl StateLock {
    #[must_use]
    pub fn lock_path(state_path: &Path) -> PathBuf {
        let mut name = state_path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".lock");
        state_path.with_file_name(name)
    }

    /// Open (creating if needed) the lock file for `state_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock file or its directory cannot be created.
    pub fn open(state_path: &Path) -> Result<Self> {
        let path = Self::lock_path(state_path);
        let fs_error = |p: &Path, source| ProvisionError::Filesystem {
            path: p.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fs_error(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| fs_error(&path, e))?;
        Ok(Self {
            path,
            lock: RwLock::new(file),
        })
    }

    /// Take the lock without waiting; released when the guard drops.
    ///
    /// # Errors
    ///
    /// Returns `ProvisionError::StateLocked` if another run holds it.
    pub fn try_acquire(&mut self) -> Result<RwLockWriteGuard<'_, File>> {
        let path = self.path.clone();
        self.lock.try_write().map_err(|e| {
            if e.kind() == std::io::ErrorKind::WouldBlock {
                ProvisionError::StateLocked { path }.into()
            } else {
                ProvisionError::Filesystem { path, source: e }.into()
            }
        })
    }
}
