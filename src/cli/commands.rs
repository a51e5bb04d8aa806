use clap::builder::PossibleValuesParser;
use clap::Parser;
use std::path::PathBuf;
use crate::actions::{Action, ActionSet};
use crate::audio::codecs::CODEC_KEYS;
use crate::audio::encoder::Verbosity;
use crate::utils::batch::FailurePolicy;

#[derive(Parser, Debug)]
#[command(name = "mutil")]
#[command(version)]
#[command(about = "Renames, sorts, strips cover art from and transcodes music files", long_about = None)]
pub struct Cli {
    /// Files to process; directories are searched for audio files
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Rename files to match their tags
    #[arg(short = 'r')]
    pub rename: bool,

    /// Sort files into artist/album folders within a directory
    #[arg(short = 's', value_name = "DIRECTORY")]
    pub sort: Option<PathBuf>,

    /// Remove cover art without re-encoding
    #[arg(long)]
    pub remove_cover: bool,

    /// Transcode files using ffmpeg into the given format
    #[arg(short = 't', value_name = "FORMAT", value_parser = PossibleValuesParser::new(CODEC_KEYS))]
    pub transcode: Option<String>,

    /// Explain what is being done
    #[arg(short = 'v', conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress warnings
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Continue with the remaining files after one fails
    #[arg(long)]
    pub keep_going: bool,

    /// Write a CSV report of every file's outcome
    #[arg(long, value_name = "CSV")]
    pub report: Option<PathBuf>,

    /// Number of files processed at once (0 = one per CPU)
    #[arg(short = 'j', long, default_value_t = 1)]
    pub jobs: usize,

    /// Encoder program
    #[arg(long, env = "MUTIL_FFMPEG", default_value = "ffmpeg")]
    pub ffmpeg: String,
}

impl Cli {
    /// `None` when no action flag was given.
    pub fn actions(&self) -> Option<ActionSet> {
        let mut actions = Vec::new();
        if let Some(dir) = &self.sort {
            actions.push(Action::Sort(dir.clone()));
        }
        if self.rename {
            actions.push(Action::Rename);
        }
        if self.remove_cover {
            actions.push(Action::RemoveCover);
        }
        if let Some(format) = &self.transcode {
            actions.push(Action::Transcode(format.clone()));
        }
        ActionSet::new(actions)
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.quiet)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        if self.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        }
    }
}
