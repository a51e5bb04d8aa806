use crate::text::Sanitizer;
use crate::{MutilError, Result, Song};

/// Longest filename produced, extension included.
pub const MAX_FILENAME_LEN: usize = 64;

/// Derives `NN_Title.ext` names from a song's tags.
pub struct FilenamePolicy {
    sanitizer: Sanitizer,
}

impl FilenamePolicy {
    pub fn new() -> Self {
        Self {
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn derive_filename(&self, song: &Song) -> Result<String> {
        let extension = song
            .path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut stem = String::new();
        // track 0 means "unset" in many taggers
        if let Some(track) = song.track.filter(|&t| t > 0) {
            stem.push_str(&format!("{:02}_", track));
        }
        if let Some(title) = song.title.as_deref().filter(|t| !t.is_empty()) {
            let budget = MAX_FILENAME_LEN.saturating_sub(stem.len() + extension.chars().count());
            stem.push_str(&self.sanitizer.sanitize(title, Some(budget)));
        }

        let stem = stem.trim_end_matches('_');
        if stem.is_empty() {
            return Err(MutilError::InsufficientMetadata(song.path.clone()));
        }
        Ok(format!("{}{}", stem, extension))
    }
}

impl Default for FilenamePolicy {
    fn default() -> Self {
        Self::new()
    }
}
