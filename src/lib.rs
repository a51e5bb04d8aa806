use std::path::PathBuf;
use std::process::ExitStatus;

pub mod actions;
pub mod audio;
pub mod cli;
pub mod policy;
pub mod text;
pub mod utils;

/// One file's identity while it is being processed. `path` follows the file
/// through every move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub path: PathBuf,
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub track: Option<u32>,
}

impl Song {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: None,
            album: None,
            artist: None,
            track: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutilError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("file already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("insufficient metadata: {}", .0.display())]
    InsufficientMetadata(PathBuf),
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("cannot read tags from {}: {reason}", path.display())]
    TagRead { path: PathBuf, reason: String },
    #[error("invalid track number: {0:?}")]
    InvalidTrackNumber(String),
    #[error("failed to start {program}: {source}")]
    EncoderSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed on {}: {status}", input.display())]
    EncoderFailure {
        program: String,
        input: PathBuf,
        status: ExitStatus,
    },
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MutilError>;

// Re-exports for convenience
pub use actions::{Action, ActionSet, Processor};
pub use audio::codecs::{CodecOption, CODECS};
pub use audio::encoder::{EncodeJob, Encoder, Ffmpeg, Verbosity};
pub use audio::metadata::{SymphoniaTagReader, TagReader, Tags};
pub use policy::{filename::FilenamePolicy, sort::SortPolicy};
pub use text::{parse_track, Sanitizer};
pub use utils::file_ops::FileManager;
