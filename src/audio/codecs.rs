use crate::{MutilError, Result};

/// Encoder settings for one transcode target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOption {
    pub key: &'static str,
    /// Output extension, without the leading dot.
    pub extension: &'static str,
    pub args: &'static [&'static str],
}

pub static CODECS: &[CodecOption] = &[
    CodecOption {
        key: "opus",
        extension: "ogg",
        args: &[
            "-acodec", "libopus",
            "-vbr", "off",
            "-b:a", "192k",
            "-sample_fmt", "s16",
            "-vn",
        ],
    },
    CodecOption {
        key: "mp3-320",
        extension: "mp3",
        args: &["-acodec", "libmp3lame", "-b:a", "320k", "-vn"],
    },
    CodecOption {
        key: "mp3-128",
        extension: "mp3",
        args: &["-acodec", "libmp3lame", "-b:a", "128k", "-vn"],
    },
];

/// Keys accepted by `-t`, in table order.
pub const CODEC_KEYS: [&str; 3] = ["opus", "mp3-320", "mp3-128"];

impl CodecOption {
    pub fn lookup(key: &str) -> Result<&'static CodecOption> {
        CODECS
            .iter()
            .find(|codec| codec.key == key)
            .ok_or_else(|| MutilError::UnsupportedFormat(key.to_string()))
    }
}
