//! Disk I/O helpers: read, atomic write, and the advisory lock guard.
//!
//! Writes go to a hidden temp file in the target's directory, are synced to
//! disk, take over the old file's permissions, and only then replace the
//! target by rename. Readers see either the old document or the new one.
//! Lock files are only ever created by writers.

use crate::error::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Reads the file at `path`. Returns `None` if it doesn't exist (not an error).
pub fn read(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::read(path, e)),
    }
}

/// Write `bytes` to a temp file next to `path`, fsync it, then rename it over
/// `path`. Missing parent directories are created first.
///
/// An existing target is probed for write access before anything else so a
/// read-only file is reported as a write error instead of being silently
/// replaced by the rename.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = parent_dir(path);
    fs::create_dir_all(dir).map_err(|e| Error::write(path, e))?;

    let existing = match OpenOptions::new().write(true).open(path) {
        Ok(file) => Some(file.metadata().map_err(|e| Error::write(path, e))?),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => return Err(Error::write(path, e)),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| Error::write(path, e))?;
    tmp.write_all(bytes).map_err(|e| Error::write(path, e))?;
    if let Some(meta) = existing {
        fs::set_permissions(tmp.path(), meta.permissions()).map_err(|e| Error::write(path, e))?;
    }
    tmp.as_file().sync_all().map_err(|e| Error::write(path, e))?;
    // A failed persist drops the temp file, which deletes it.
    tmp.persist(path).map_err(|e| Error::write(path, e.error))?;
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// Sidecar lock file used for `path`.
pub fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

/// Advisory lock on a sidecar file, released on drop.
#[derive(Debug)]
pub struct FileLock {
    file: File,
    path: PathBuf,
}

impl FileLock {
    /// Block until an exclusive lock on `lock_path` is held. Creates the lock
    /// file and its directory if needed; any failure is a write error against
    /// `data_path`.
    pub fn exclusive(lock_path: &Path, data_path: &Path) -> Result<Self> {
        fs::create_dir_all(parent_dir(lock_path)).map_err(|e| Error::write(data_path, e))?;
        let file = open_lock_file(lock_path).map_err(|e| Error::write(data_path, e))?;
        fs2::FileExt::lock_exclusive(&file).map_err(|e| Error::write(data_path, e))?;
        trace!(path = %lock_path.display(), "exclusive lock acquired");
        Ok(Self {
            file,
            path: lock_path.to_path_buf(),
        })
    }

    /// Try to take a shared lock for a read-only operation. The lock file is
    /// opened, never created. Returns `None` when it doesn't exist or can't be
    /// opened; the caller then proceeds without a lock.
    pub fn shared(lock_path: &Path) -> Option<Self> {
        let file = match OpenOptions::new().read(true).open(lock_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %lock_path.display(), error = %e, "reading without a lock");
                return None;
            }
        };
        if let Err(e) = fs2::FileExt::lock_shared(&file) {
            warn!(path = %lock_path.display(), error = %e, "reading without a lock");
            return None;
        }
        trace!(path = %lock_path.display(), "shared lock acquired");
        Some(Self {
            file,
            path: lock_path.to_path_buf(),
        })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = fs2::FileExt::unlock(&self.file) {
            warn!(path = %self.path.display(), error = %e, "failed to release lock");
        }
    }
}

fn open_lock_file(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .truncate(false)
        .read(true)
        .write(true)
        .open(path)
}
