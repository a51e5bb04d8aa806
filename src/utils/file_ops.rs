use std::collections::HashMap;
use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use log::info;
use crate::{MutilError, Result};

/// Every move of a file under processing goes through here.
///
/// Moves never overwrite an existing file. The existence check and the rename
/// run under a lock held per destination directory, so the manager can be
/// shared by workers handling different files.
#[derive(Default)]
pub struct FileManager {
    dir_locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `source` to `destination`, creating missing parent directories.
    /// Moving a file onto itself is a no-op.
    pub fn move_file(&self, source: impl AsRef<Path>, destination: impl AsRef<Path>) -> Result<PathBuf> {
        let source = source.as_ref();
        let destination = destination.as_ref();

        if !source.is_file() {
            return Err(MutilError::NotFound(source.to_path_buf()));
        }
        if source == destination {
            return Ok(destination.to_path_buf());
        }

        let parent = parent_dir(destination);
        self.ensure_directory(parent)?;

        self.with_dir_lock(parent, || -> Result<PathBuf> {
            if destination.exists() && !same_file(source, destination)? {
                return Err(MutilError::AlreadyExists(destination.to_path_buf()));
            }
            fs::rename(source, destination)?;
            info!("{} -> {}", source.display(), destination.display());
            Ok(destination.to_path_buf())
        })
    }

    /// Creates `path` and its ancestors with mode 0755 if missing.
    pub fn ensure_directory(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o755);
        }
        builder.create(path.as_ref())?;
        Ok(())
    }

    /// Runs `f` while holding the lock for directory `dir`. An empty path
    /// means the current directory.
    pub fn with_dir_lock<T>(&self, dir: &Path, f: impl FnOnce() -> T) -> T {
        let dir = if dir.as_os_str().is_empty() { Path::new(".") } else { dir };
        let key = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        let lock = {
            let mut locks = self.dir_locks.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(locks.entry(key.clone()).or_default())
        };

        let result = {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };

        // Clones only happen under the map lock, so a count of two (map + ours)
        // means nobody else is holding or waiting on this directory.
        let mut locks = self.dir_locks.lock().unwrap_or_else(|e| e.into_inner());
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&key);
        }
        result
    }

    #[cfg(test)]
    fn tracked_dirs(&self) -> usize {
        self.dir_locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Directory a path lives in; `.` for bare file names.
pub fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn same_file(a: &Path, b: &Path) -> Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}
