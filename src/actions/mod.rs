pub mod cover;
pub mod transcode;

use std::path::{Path, PathBuf};
use log::info;
use crate::audio::encoder::Encoder;
use crate::audio::metadata::TagReader;
use crate::policy::{filename::FilenamePolicy, sort::SortPolicy};
use crate::utils::file_ops::FileManager;
use crate::Result;
use cover::CoverStripper;
use transcode::Transcoder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Sort(PathBuf),
    Rename,
    RemoveCover,
    Transcode(String),
}

impl Action {
    fn rank(&self) -> u8 {
        match self {
            Action::Sort(_) => 0,
            Action::Rename => 1,
            Action::RemoveCover => 2,
            Action::Transcode(_) => 3,
        }
    }
}

/// The actions requested for a run, held in the order they are applied:
/// sort, rename, remove cover, transcode. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSet(Vec<Action>);

impl ActionSet {
    /// `None` when nothing was requested.
    pub fn new(actions: impl IntoIterator<Item = Action>) -> Option<Self> {
        let mut actions: Vec<Action> = actions.into_iter().collect();
        actions.sort_by_key(Action::rank);
        actions.dedup_by_key(|a| a.rank());
        if actions.is_empty() {
            None
        } else {
            Some(Self(actions))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.0.iter()
    }
}

/// Runs the requested actions over one file at a time.
pub struct Processor {
    actions: ActionSet,
    tags: Box<dyn TagReader>,
    encoder: Box<dyn Encoder>,
    files: FileManager,
    filenames: FilenamePolicy,
    sorter: SortPolicy,
}

impl Processor {
    pub fn new(actions: ActionSet, tags: Box<dyn TagReader>, encoder: Box<dyn Encoder>) -> Self {
        Self {
            actions,
            tags,
            encoder,
            files: FileManager::new(),
            filenames: FilenamePolicy::new(),
            sorter: SortPolicy::new(),
        }
    }

    /// Applies every action to `path` and returns where the file ended up.
    /// The first failing step stops the rest for this file.
    pub fn process(&self, path: &Path) -> Result<PathBuf> {
        let mut song = self.tags.read_song(path)?;

        for action in self.actions.iter() {
            match action {
                Action::Sort(base) => {
                    let destination = self.sorter.derive_directory(&song, base);
                    song.path = self.files.move_file(&song.path, &destination)?;
                }
                Action::Rename => {
                    let name = self.filenames.derive_filename(&song)?;
                    let destination = song.path.with_file_name(name);
                    song.path = self.files.move_file(&song.path, &destination)?;
                }
                Action::RemoveCover => {
                    let backup = CoverStripper::new(self.encoder.as_ref(), &self.files)
                        .strip_cover(&song)?;
                    info!("original kept at {}", backup.display());
                }
                Action::Transcode(format) => {
                    Transcoder::new(self.encoder.as_ref(), &self.files)
                        .transcode(&song, format)?;
                }
            }
        }

        Ok(song.path)
    }
}
