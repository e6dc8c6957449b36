use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::search::ContextBlock;

/// A single matching line, as produced by the matcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Absolute path of the file
    pub path: PathBuf,
    /// 1-based line number of the match
    pub line_number: usize,
    /// The matched line, without its terminator
    pub line: String,
}

impl Match {
    pub fn new(path: impl Into<PathBuf>, line_number: usize, line: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            line_number,
            line: line.into(),
        }
    }
}

/// A match together with the block of lines surrounding it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundCode {
    /// File path relative to the search root
    pub file: PathBuf,
    /// The entire line that had a match
    pub line: String,
    /// 1-based line number of the match
    pub line_number: usize,
    /// Lines around the match joined with `\n`, without a trailing newline
    pub block: String,
}

impl FoundCode {
    /// Index of the matched line within `block.split('\n')`, given the
    /// padding the block was extracted with
    pub fn match_offset(&self, padding: usize) -> usize {
        let (start, _) = ContextBlock::bounds(self.line_number, padding, self.line_number);
        self.line_number - start
    }
}
