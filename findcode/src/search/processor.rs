use std::path::Path;
use tracing::{trace, warn};

use super::matcher::LineMatcher;
use crate::config::EncodingMode;
use crate::errors::{SearchError, SearchResult};
use crate::results::Match;

/// Decoded file contents
pub(crate) struct Decoded {
    pub contents: String,
    /// Whether invalid UTF-8 was replaced
    pub lossy: bool,
}

/// Decodes file bytes according to the encoding mode. Logging a lossy
/// decode is left to the caller so each file is reported once.
pub(crate) fn decode_bytes(
    bytes: Vec<u8>,
    path: &Path,
    encoding_mode: EncodingMode,
) -> SearchResult<Decoded> {
    match String::from_utf8(bytes) {
        Ok(contents) => Ok(Decoded {
            contents,
            lossy: false,
        }),
        Err(e) => match encoding_mode {
            EncodingMode::FailFast => Err(SearchError::encoding(path, e.utf8_error())),
            EncodingMode::Lossy => Ok(Decoded {
                contents: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                lossy: true,
            }),
        },
    }
}

/// Scans individual files for matching lines
#[derive(Debug)]
pub struct FileProcessor {
    matcher: LineMatcher,
    encoding_mode: EncodingMode,
}

impl FileProcessor {
    pub fn new(matcher: LineMatcher, encoding_mode: EncodingMode) -> Self {
        Self {
            matcher,
            encoding_mode,
        }
    }

    pub fn matcher(&self) -> &LineMatcher {
        &self.matcher
    }

    /// Reads the whole file and returns its matching lines.
    /// A read failure is fatal for the search that asked for it.
    pub fn process_file(&self, path: &Path) -> SearchResult<Vec<Match>> {
        trace!("Scanning file: {}", path.display());

        let bytes = std::fs::read(path).map_err(|e| SearchError::search_execution(path, e))?;
        let decoded = decode_bytes(bytes, path, self.encoding_mode)?;
        if decoded.lossy {
            warn!("Invalid UTF-8 replaced in file: {}", path.display());
        }

        Ok(self.matcher.find_matches(path, &decoded.contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use std::fs;
    use tempfile::tempdir;

    fn processor(query: &str, mode: EncodingMode) -> FileProcessor {
        FileProcessor::new(LineMatcher::new(&Query::literal(query)).unwrap(), mode)
    }

    #[test]
    fn test_process_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "alpha\nbeta\nalphabet\n").unwrap();

        let matches = processor("alpha", EncodingMode::Lossy)
            .process_file(&path)
            .unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], Match::new(&path, 1, "alpha"));
        assert_eq!(matches[1], Match::new(&path, 3, "alphabet"));
    }

    #[test]
    fn test_missing_file_is_search_execution_error() {
        let dir = tempdir().unwrap();
        let err = processor("x", EncodingMode::Lossy)
            .process_file(&dir.path().join("gone.txt"))
            .unwrap_err();
        assert!(matches!(err, SearchError::SearchExecution { .. }));
    }

    #[test]
    fn test_invalid_utf8_lossy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9 match\nplain\n").unwrap();

        let matches = processor("match", EncodingMode::Lossy)
            .process_file(&path)
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, "caf\u{FFFD} match");
    }

    #[test]
    fn test_decode_reports_replacement() {
        let path = Path::new("x.txt");
        let decoded = decode_bytes(b"plain".to_vec(), path, EncodingMode::Lossy).unwrap();
        assert!(!decoded.lossy);
        assert_eq!(decoded.contents, "plain");

        let decoded = decode_bytes(b"caf\xe9".to_vec(), path, EncodingMode::Lossy).unwrap();
        assert!(decoded.lossy);
        assert_eq!(decoded.contents, "caf\u{FFFD}");
    }

    #[test]
    fn test_invalid_utf8_failfast() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9 match\n").unwrap();

        let err = processor("match", EncodingMode::FailFast)
            .process_file(&path)
            .unwrap_err();
        assert!(matches!(err, SearchError::Encoding { .. }));
    }
}
