use regex::{Captures, Regex};
use crate::{MutilError, Result};

const SEPARATOR: &str = "_";

/// Turns tag text into filesystem-safe tokens.
///
/// Known symbols are substituted first (`'` dropped, `$` to `S`, `@` to `a`,
/// `&` to `and`), then leading and trailing non-alphanumerics are stripped and
/// every inner run of them collapses to a single `_`.
pub struct Sanitizer {
    symbols: Regex,
    edges: Regex,
    runs: Regex,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self {
            symbols: Regex::new(r"['$@&]").expect("symbol pattern"),
            edges: Regex::new(r"^[^a-zA-Z0-9]+|[^a-zA-Z0-9]+$").expect("edge pattern"),
            runs: Regex::new(r"[^a-zA-Z0-9]+").expect("run pattern"),
        }
    }

    pub fn sanitize(&self, text: &str, trim: Option<usize>) -> String {
        let substituted = self.symbols.replace_all(text, |caps: &Captures| {
            match &caps[0] {
                "$" => "S",
                "@" => "a",
                "&" => "and",
                _ => "",
            }
        });
        let stripped = self.edges.replace_all(&substituted, "");
        let mut cleaned = self.runs.replace_all(&stripped, SEPARATOR).into_owned();

        if let Some(limit) = trim {
            // only ASCII survives the passes above, so byte truncation is safe
            cleaned.truncate(limit);
            let kept = cleaned.trim_end_matches(SEPARATOR).len();
            cleaned.truncate(kept);
        }
        cleaned
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads the leading run of digits from a track tag such as `"2/10"`.
/// Empty text means no track number.
pub fn parse_track(text: &str) -> Result<Option<u32>> {
    if text.is_empty() {
        return Ok(None);
    }
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end == 0 {
        return Err(MutilError::InvalidTrackNumber(text.to_string()));
    }
    text[..digits_end]
        .parse()
        .map(Some)
        .map_err(|_| MutilError::InvalidTrackNumber(text.to_string()))
}
