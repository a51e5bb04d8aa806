use std::collections::HashSet;
use std::path::{Path, PathBuf};
use log::warn;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::{MetadataOptions, MetadataRevision, StandardTagKey};
use symphonia::core::probe::Hint;
use crate::actions::cover::{BACKUP_DIR, TEMP_PREFIX};
use crate::text::parse_track;
use crate::{MutilError, Result, Song};

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac", "wav", "ogg", "opus", "m4a"];

/// Raw tag strings as read from a file. Track is kept undecoded (`"2/10"`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub track: Option<String>,
}

impl Tags {
    fn absorb(&mut self, revision: &MetadataRevision) {
        for tag in revision.tags() {
            let slot = match tag.std_key {
                Some(StandardTagKey::TrackTitle) => &mut self.title,
                Some(StandardTagKey::Album) => &mut self.album,
                Some(StandardTagKey::Artist) => &mut self.artist,
                Some(StandardTagKey::TrackNumber) => &mut self.track,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(tag.value.to_string());
            }
        }
    }
}

pub trait TagReader: Send + Sync {
    fn read_tags(&self, path: &Path) -> Result<Tags>;

    /// Builds the record a file is processed with.
    fn read_song(&self, path: &Path) -> Result<Song> {
        let tags = self.read_tags(path)?;
        let track = parse_track(tags.track.as_deref().unwrap_or(""))?;
        Ok(Song {
            path: path.to_path_buf(),
            title: tags.title,
            album: tags.album,
            artist: tags.artist,
            track,
        })
    }
}

/// Reads tags with symphonia's probe, without decoding any audio.
pub struct SymphoniaTagReader;

impl TagReader for SymphoniaTagReader {
    fn read_tags(&self, path: &Path) -> Result<Tags> {
        let tag_error = |reason: String| MutilError::TagRead {
            path: path.to_path_buf(),
            reason,
        };
        let file = std::fs::File::open(path).map_err(|e| tag_error(e.to_string()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(extension);
        }

        let mut probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(|e| tag_error(e.to_string()))?;

        let mut tags = Tags::default();

        // Container tags win over ones found while probing (e.g. ID3v2 ahead of an mp3)
        let mut format = probed.format;
        if let Some(revision) = format.metadata().current() {
            tags.absorb(revision);
        }
        if let Some(metadata) = probed.metadata.get() {
            if let Some(revision) = metadata.current() {
                tags.absorb(revision);
            }
        }

        Ok(tags)
    }
}

/// Expands the command-line inputs: files are kept as given, directories are
/// walked for audio files. Inputs naming the same file are only kept once.
pub fn collect_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let candidates = if input.is_dir() {
            collect_audio_files(input)
        } else {
            vec![input.clone()]
        };
        for file in candidates {
            let identity = std::fs::canonicalize(&file).unwrap_or_else(|_| file.clone());
            if seen.insert(identity) {
                files.push(file);
            } else {
                warn!("skipping repeated input: {}", file.display());
            }
        }
    }
    files
}

fn collect_audio_files(dir_path: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir_path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_leftover(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("error accessing entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file() && is_audio_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Cover-strip backups and temp files are never inputs themselves.
fn is_leftover(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if entry.file_type().is_dir() {
        name == BACKUP_DIR
    } else {
        name.starts_with(TEMP_PREFIX)
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}
