use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use log::{error, warn};
use crate::audio::encoder::{EncodeJob, Encoder};
use crate::utils::file_ops::FileManager;
use crate::{MutilError, Result, Song};

/// Directory, beside each file, that keeps the pre-strip originals.
pub const BACKUP_DIR: &str = "mutil_backup~";
pub const TEMP_PREFIX: &str = "temp.";

/// Drops embedded cover art by stream-copying the audio, keeping the original
/// as a backup.
pub struct CoverStripper<'a> {
    encoder: &'a dyn Encoder,
    files: &'a FileManager,
}

impl<'a> CoverStripper<'a> {
    pub fn new(encoder: &'a dyn Encoder, files: &'a FileManager) -> Self {
        Self { encoder, files }
    }

    /// Returns where the original was backed up to. The song keeps its path.
    pub fn strip_cover(&self, song: &Song) -> Result<PathBuf> {
        let source = song.path.as_path();
        if !source.is_file() {
            return Err(MutilError::NotFound(source.to_path_buf()));
        }
        let temp = sibling(source, TEMP_PREFIX);
        let backup = backup_path(source);

        if temp.exists() {
            return Err(MutilError::AlreadyExists(temp));
        }
        if let Err(e) = self.encoder.encode(&EncodeJob::stream_copy(source, &temp)) {
            discard(&temp);
            return Err(e);
        }

        // The original must be out of the way before the stripped copy takes its place
        if let Err(e) = self.files.move_file(source, &backup) {
            discard(&temp);
            return Err(e);
        }
        self.files.move_file(&temp, source)?;
        Ok(backup)
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let mut backup = parent.join(BACKUP_DIR);
    if let Some(name) = path.file_name() {
        backup.push(name);
    }
    backup
}

fn sibling(path: &Path, prefix: &str) -> PathBuf {
    let mut name = OsString::from(prefix);
    name.push(path.file_name().unwrap_or_default());
    path.with_file_name(name)
}

fn discard(temp: &Path) {
    if !temp.exists() {
        return;
    }
    match fs::remove_file(temp) {
        Ok(()) => warn!("removed temporary file {}", temp.display()),
        Err(e) => error!("could not remove temporary file {}: {}", temp.display(), e),
    }
}
