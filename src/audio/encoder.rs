use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use log::{debug, LevelFilter};
use crate::{MutilError, Result};

/// How chatty the run should be. Drives both the logger and ffmpeg's `-v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        match (verbose, quiet) {
            (true, _) => Verbosity::Verbose,
            (_, true) => Verbosity::Quiet,
            _ => Verbosity::Normal,
        }
    }

    pub fn ffmpeg_level(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warning",
            Verbosity::Verbose => "info",
        }
    }

    pub fn log_filter(&self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::Error,
            Verbosity::Normal => LevelFilter::Warn,
            Verbosity::Verbose => LevelFilter::Info,
        }
    }
}

/// A single file-in, file-out encoder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    pub input: PathBuf,
    pub args: Vec<String>,
    pub output: PathBuf,
}

impl EncodeJob {
    pub fn new(input: impl Into<PathBuf>, args: &[&str], output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
            output: output.into(),
        }
    }

    /// Audio stream copied as-is, video (cover art) dropped.
    pub fn stream_copy(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self::new(input, &["-c:a", "copy", "-vn"], output)
    }
}

pub trait Encoder: Send + Sync {
    /// Blocks until the encoder exits. A non-zero exit is an error.
    fn encode(&self, job: &EncodeJob) -> Result<()>;
}

pub struct Ffmpeg {
    program: String,
    verbosity: Verbosity,
}

impl Ffmpeg {
    pub fn new(program: impl Into<String>, verbosity: Verbosity) -> Self {
        Self {
            program: program.into(),
            verbosity,
        }
    }

    pub fn command_args(&self, job: &EncodeJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-hide_banner".into(),
            "-v".into(),
            self.verbosity.ffmpeg_level().into(),
            "-i".into(),
            job.input.clone().into_os_string(),
        ];
        args.extend(job.args.iter().map(OsString::from));
        args.push(job.output.clone().into_os_string());
        args
    }
}

impl Encoder for Ffmpeg {
    fn encode(&self, job: &EncodeJob) -> Result<()> {
        let args = self.command_args(job);
        debug!("running {} {:?}", self.program, args);

        // stdin is closed so ffmpeg can never block on an overwrite prompt
        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|source| MutilError::EncoderSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(MutilError::EncoderFailure {
                program: self.program.clone(),
                input: job.input.clone(),
                status,
            });
        }
        Ok(())
    }
}
