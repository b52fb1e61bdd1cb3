use std::fs;
use std::path::Path;

use datacleanup_core::{CleanupError, CleanupResult};

/// One line of a text export, right-trimmed, with its 1-based position in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    pub number: usize,
    pub text: String,
}

impl RawLine {
    pub fn new(number: usize, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Split text into numbered lines with trailing whitespace removed.
pub fn split_lines(content: &str) -> Vec<RawLine> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| RawLine::new(i + 1, line.trim_end()))
        .collect()
}

/// Read a whole text export into memory.
pub fn load_lines(path: &Path) -> CleanupResult<Vec<RawLine>> {
    let content = fs::read_to_string(path).map_err(|e| CleanupError::io(path, e))?;
    Ok(split_lines(&content))
}
