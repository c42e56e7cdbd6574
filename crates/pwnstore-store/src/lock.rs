// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Advisory exclusive locks around read-modify-write sequences.
//!
//! Locks are `flock` on a sidecar file and are released when the guard drops
//! (or the process exits). Lock order is always plugin directory first, then
//! device config.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use pwnstore_core::PwnstoreError;
use tracing::trace;

/// Sidecar lock file guarding the plugin directory.
pub const PLUGIN_DIR_LOCK: &str = ".pwnstore.lock";

/// Holds an exclusive lock until dropped.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Blocks until the exclusive lock on `path` is held, creating the file if
    /// needed.
    pub fn acquire(path: &Path) -> Result<Self, PwnstoreError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| PwnstoreError::Internal(format!("opening lock {}: {e}", path.display())))?;

        lock_exclusive(&file)
            .map_err(|e| PwnstoreError::Internal(format!("locking {}: {e}", path.display())))?;
        trace!(path = %path.display(), "lock acquired");

        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Lock guarding `plugin_dir`. The directory must exist.
    pub fn plugin_dir(plugin_dir: &Path) -> Result<Self, PwnstoreError> {
        Self::acquire(&plugin_dir.join(PLUGIN_DIR_LOCK))
    }

    /// Lock guarding the device config at `config_file`.
    pub fn config(config_file: &Path) -> Result<Self, PwnstoreError> {
        Self::acquire(&config_lock_path(config_file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        unlock(&self.file);
        trace!(path = %self.path.display(), "lock released");
    }
}

/// `<config>.lock` next to the config file.
pub fn config_lock_path(config_file: &Path) -> PathBuf {
    let mut name = config_file.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;

    loop {
        // SAFETY: the descriptor is owned by `file` and stays open for the call.
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if result == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(unix)]
fn unlock(file: &File) {
    use std::os::unix::io::AsRawFd;

    // SAFETY: as above; closing the descriptor would release it anyway.
    unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}
