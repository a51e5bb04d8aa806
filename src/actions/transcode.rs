use std::path::PathBuf;
use crate::audio::codecs::CodecOption;
use crate::audio::encoder::{EncodeJob, Encoder};
use crate::utils::file_ops::{parent_dir, FileManager};
use crate::{MutilError, Result, Song};

/// Encodes a song into one of the codec table formats, next to the original.
pub struct Transcoder<'a> {
    encoder: &'a dyn Encoder,
    files: &'a FileManager,
}

impl<'a> Transcoder<'a> {
    pub fn new(encoder: &'a dyn Encoder, files: &'a FileManager) -> Self {
        Self { encoder, files }
    }

    /// Returns the path of the new file. The source is left in place.
    pub fn transcode(&self, song: &Song, format: &str) -> Result<PathBuf> {
        let codec = CodecOption::lookup(format)?;
        let output = song.path.with_extension(codec.extension);
        let dir = parent_dir(&output);

        self.files.with_dir_lock(dir, || -> Result<PathBuf> {
            if output.exists() {
                return Err(MutilError::AlreadyExists(output.clone()));
            }
            println!("transcoding: {}...", song.path.display());
            self.encoder
                .encode(&EncodeJob::new(&song.path, codec.args, &output))?;
            Ok(output.clone())
        })
    }
}
