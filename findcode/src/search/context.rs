use std::path::{Path, PathBuf};
use tracing::trace;

use super::processor::decode_bytes;
use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};
use crate::results::{FoundCode, Match};

/// An inclusive, 1-based run of lines around a match.
///
/// The window is clamped at both ends of the file: near the first or last
/// line it shrinks instead of sliding, so `start <= line_number <= end`
/// always holds and `start >= 1`, `end <= total_lines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextBlock {
    pub start: usize,
    pub end: usize,
    /// The lines `start..=end` joined with `\n`, no trailing newline
    pub text: String,
}

impl ContextBlock {
    /// Lowest line a block may start at
    pub const FLOOR: usize = 1;

    /// Computes the clamped `(start, end)` window for a match.
    /// `line_number` must be within `FLOOR..=total_lines`.
    pub fn bounds(line_number: usize, padding: usize, total_lines: usize) -> (usize, usize) {
        let start = line_number.saturating_sub(padding).max(Self::FLOOR);
        let end = line_number.saturating_add(padding).min(total_lines);
        (start, end)
    }

    /// Slices the block out of already-read file contents.
    /// Returns `None` when `line_number` is not a line of `contents`.
    pub fn from_contents(contents: &str, line_number: usize, padding: usize) -> Option<Self> {
        let lines: Vec<&str> = contents.lines().collect();
        if line_number < Self::FLOOR || line_number > lines.len() {
            return None;
        }

        let (start, end) = Self::bounds(line_number, padding, lines.len());
        Some(ContextBlock {
            start,
            end,
            text: lines[start - 1..end].join("\n"),
        })
    }
}

/// Counts lines the same way the matcher numbers them
pub fn total_lines(contents: &str) -> usize {
    contents.lines().count()
}

/// Strips the search root from a matched path.
/// A root that is itself the file yields the file name.
pub fn relative_path(path: &Path, root: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        Ok(_) => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// Re-reads the matched file and builds the final result for one match
pub fn extract(
    m: &Match,
    root: &Path,
    padding: usize,
    encoding_mode: EncodingMode,
) -> SearchResult<FoundCode> {
    trace!("Extracting context for {}:{}", m.path.display(), m.line_number);

    let bytes = std::fs::read(&m.path).map_err(|e| SearchError::extraction(&m.path, e))?;
    let decoded = decode_bytes(bytes, &m.path, encoding_mode)?;
    if decoded.lossy {
        // Already reported as a warning when the file was scanned
        trace!("Invalid UTF-8 replaced in file: {}", m.path.display());
    }
    let contents = decoded.contents;

    let block = ContextBlock::from_contents(&contents, m.line_number, padding).ok_or_else(|| {
        SearchError::line_out_of_range(&m.path, m.line_number, total_lines(&contents))
    })?;

    Ok(FoundCode {
        file: relative_path(&m.path, root),
        line: m.line.clone(),
        line_number: m.line_number,
        block: block.text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "Check this out!\n\nThis is amazing!\n\nWow!\n";

    #[test]
    fn test_bounds_middle() {
        assert_eq!(ContextBlock::bounds(5, 2, 10), (3, 7));
        assert_eq!(ContextBlock::bounds(5, 0, 10), (5, 5));
    }

    #[test]
    fn test_bounds_clamp_without_sliding() {
        assert_eq!(ContextBlock::bounds(1, 2, 10), (1, 3));
        assert_eq!(ContextBlock::bounds(2, 2, 10), (1, 4));
        assert_eq!(ContextBlock::bounds(10, 2, 10), (8, 10));
        assert_eq!(ContextBlock::bounds(1, 5, 1), (1, 1));
        assert_eq!(ContextBlock::bounds(3, usize::MAX, 4), (1, 4));
    }

    #[test]
    fn test_bounds_invariants() {
        for total in 1..=8 {
            for line in 1..=total {
                for padding in 0..=4 {
                    let (start, end) = ContextBlock::bounds(line, padding, total);
                    assert!(start >= ContextBlock::FLOOR);
                    assert!(start <= line && line <= end);
                    assert!(end <= total);
                    assert!(end - start <= 2 * padding);
                }
            }
        }
    }

    #[test]
    fn test_block_near_end() {
        let block = ContextBlock::from_contents(SAMPLE, 5, 2).unwrap();
        assert_eq!((block.start, block.end), (3, 5));
        assert_eq!(block.text, "This is amazing!\n\nWow!");
    }

    #[test]
    fn test_block_near_start() {
        let block = ContextBlock::from_contents(SAMPLE, 1, 2).unwrap();
        assert_eq!((block.start, block.end), (1, 3));
        assert_eq!(block.text, "Check this out!\n\nThis is amazing!");
    }

    #[test]
    fn test_block_without_trailing_newline() {
        let block = ContextBlock::from_contents("a\nb\nc", 3, 1).unwrap();
        assert_eq!(block.text, "b\nc");
    }

    #[test]
    fn test_block_out_of_range() {
        assert!(ContextBlock::from_contents(SAMPLE, 0, 2).is_none());
        assert!(ContextBlock::from_contents(SAMPLE, 6, 2).is_none());
        assert!(ContextBlock::from_contents("", 1, 2).is_none());
    }

    #[test]
    fn test_total_lines() {
        assert_eq!(total_lines(SAMPLE), 5);
        assert_eq!(total_lines("no newline"), 1);
        assert_eq!(total_lines(""), 0);
    }

    #[test]
    fn test_relative_path() {
        let root = Path::new("/work/project");
        assert_eq!(
            relative_path(Path::new("/work/project/src/a.txt"), root),
            PathBuf::from("src/a.txt")
        );
        assert_eq!(
            relative_path(Path::new("./a.txt"), Path::new(".")),
            PathBuf::from("a.txt")
        );
        assert_eq!(
            relative_path(Path::new("/work/project/a.txt"), Path::new("/work/project/a.txt")),
            PathBuf::from("a.txt")
        );
    }

    #[test]
    fn test_extract() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a-file.txt");
        fs::write(&path, SAMPLE).unwrap();

        let found = extract(&Match::new(&path, 5, "Wow!"), dir.path(), 2, EncodingMode::Lossy)
            .unwrap();
        assert_eq!(
            found,
            FoundCode {
                file: PathBuf::from("a-file.txt"),
                line: "Wow!".to_string(),
                line_number: 5,
                block: "This is amazing!\n\nWow!".to_string(),
            }
        );
    }

    #[test]
    fn test_extract_lossy_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9\nmatch here\n").unwrap();

        let m = Match::new(&path, 2, "match here");
        let found = extract(&m, dir.path(), 1, EncodingMode::Lossy).unwrap();
        assert_eq!(found.block, "caf\u{FFFD}\nmatch here");

        let err = extract(&m, dir.path(), 1, EncodingMode::FailFast).unwrap_err();
        assert!(matches!(err, SearchError::Encoding { .. }));
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = tempdir().unwrap();
        let m = Match::new(dir.path().join("gone.txt"), 1, "x");
        let err = extract(&m, dir.path(), 2, EncodingMode::Lossy).unwrap_err();
        assert!(matches!(err, SearchError::Extraction { .. }));
    }

    #[test]
    fn test_extract_file_shrank() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.txt");
        fs::write(&path, "one line\n").unwrap();

        let err = extract(&Match::new(&path, 4, "gone"), dir.path(), 2, EncodingMode::Lossy)
            .unwrap_err();
        assert!(matches!(
            err,
            SearchError::LineOutOfRange {
                line_number: 4,
                total_lines: 1,
                ..
            }
        ));
    }
}
