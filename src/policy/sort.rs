use std::path::{Path, PathBuf};
use crate::text::Sanitizer;
use crate::Song;

const DIR_NAME_LIMIT: usize = 64;

/// Places songs under `base/artist/album/`, keeping their filename.
///
/// A missing artist or album sanitizes to an empty component, which collapses
/// that level of the tree: a song with no tags lands directly in `base`.
pub struct SortPolicy {
    sanitizer: Sanitizer,
}

impl SortPolicy {
    pub fn new() -> Self {
        Self {
            sanitizer: Sanitizer::new(),
        }
    }

    pub fn derive_directory(&self, song: &Song, base: impl AsRef<Path>) -> PathBuf {
        let artist = self.dir_name(song.artist.as_deref());
        let album = self.dir_name(song.album.as_deref());
        let mut destination = base.as_ref().join(artist).join(album);
        if let Some(name) = song.path.file_name() {
            destination.push(name);
        }
        destination
    }

    fn dir_name(&self, tag: Option<&str>) -> String {
        self.sanitizer
            .sanitize(tag.unwrap_or(""), Some(DIR_NAME_LIMIT))
            .to_lowercase()
    }
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self::new()
    }
}
