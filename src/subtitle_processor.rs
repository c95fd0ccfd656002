use anyhow::Result;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::file_utils::FileManager;

// @module: SubRip document validation and chunking

/// Default soft limit for a single chunk, in characters
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 4096;

// @const: Leading SRT cue (index, time range, at least one more character)
static LEADING_CUE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A\d+\n\d{2}:\d{2}:\d{2},\d{3} --> \d{2}:\d{2}:\d{2},\d{3}\n.+")
        .expect("leading cue pattern is valid")
});

/// Check whether a document starts with something that looks like an SRT cue.
///
/// Only the first cue is inspected. A document whose first cue is malformed is
/// rejected even when later cues are well formed.
pub fn is_valid_srt(srt_text: &str) -> bool {
    LEADING_CUE_REGEX.is_match(srt_text)
}

/// Split a document into chunks of whole lines.
///
/// Every line is re-terminated with `\n`. A new chunk is started right before a
/// line whose addition would push the current chunk past `max_length`
/// characters. A line longer than `max_length` is kept whole in its own chunk.
pub fn split_srt_by_length(srt_text: &str, max_length: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current_part = String::new();
    let mut current_len = 0usize;

    for line in srt_text.lines() {
        // +1 for the newline the line is re-terminated with
        let line_len = line.chars().count() + 1;

        if !current_part.is_empty() && current_len + line_len > max_length {
            parts.push(std::mem::take(&mut current_part));
            current_len = 0;
        }

        current_part.push_str(line);
        current_part.push('\n');
        current_len += line_len;
    }

    if !current_part.is_empty() {
        parts.push(current_part);
    }

    parts
}

/// Raw SubRip document held in memory as a single string
#[derive(Debug, Clone)]
pub struct SubtitleDocument {
    /// File the document was read from
    pub source_file: PathBuf,

    /// Unparsed file content
    pub content: String,
}

impl SubtitleDocument {
    /// Create a document from already loaded text
    pub fn new(source_file: PathBuf, content: String) -> Self {
        SubtitleDocument {
            source_file,
            content,
        }
    }

    /// Read a document from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        debug!("Loaded {} characters from {:?}", content.chars().count(), path);
        Ok(Self::new(path.to_path_buf(), content))
    }

    /// Whether the document passes the leading cue check
    pub fn is_valid(&self) -> bool {
        is_valid_srt(&self.content)
    }

    /// Split the document into chunks of at most `max_length` characters
    pub fn chunks(&self, max_length: usize) -> Vec<String> {
        split_srt_by_length(&self.content, max_length)
    }

    /// Character count of the document
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.content)
    }
}
