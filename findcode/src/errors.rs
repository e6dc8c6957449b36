/// Error types for findcode.
///
/// Every failure is surfaced to the direct caller through [`SearchResult`].
/// There are no retries and nothing is silently skipped: a single unreadable
/// file aborts the whole search, mirroring how a failing `grep` invocation
/// aborts a shell pipeline.
///
/// ```rust,ignore
/// match findcode::search(&query, &options) {
///     Ok(found) => // Render results,
///     Err(SearchError::InvalidQuery(msg)) => // Caller passed an empty query,
///     Err(SearchError::Extraction { path, .. }) => // File vanished mid-search,
///     Err(e) => // Anything else
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Message used when a query is missing or of the wrong kind
pub const INVALID_QUERY_MESSAGE: &str =
    "The provided query must be a String or Regular Expression.";

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{0}")]
    InvalidQuery(String),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Search failed in {path}: {source}")]
    SearchExecution {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not read {path} for context extraction: {source}")]
    Extraction {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Line {line_number} is out of range for {path} ({total_lines} lines)")]
    LineOutOfRange {
        path: PathBuf,
        line_number: usize,
        total_lines: usize,
    },
    #[error("Invalid UTF-8 in file {path}: {source}")]
    Encoding {
        path: PathBuf,
        source: std::str::Utf8Error,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Search was cancelled")]
    Cancelled,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_query() -> Self {
        Self::InvalidQuery(INVALID_QUERY_MESSAGE.to_string())
    }

    pub fn invalid_pattern(msg: impl Into<String>) -> Self {
        Self::InvalidPattern(msg.into())
    }

    pub fn search_execution(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SearchExecution {
            path: path.into(),
            source,
        }
    }

    pub fn extraction(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Extraction {
            path: path.into(),
            source,
        }
    }

    pub fn line_out_of_range(path: &Path, line_number: usize, total_lines: usize) -> Self {
        Self::LineOutOfRange {
            path: path.to_path_buf(),
            line_number,
            total_lines,
        }
    }

    pub fn encoding(path: impl Into<PathBuf>, source: std::str::Utf8Error) -> Self {
        Self::Encoding {
            path: path.into(),
            source,
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error came from the matching phase (walk, pattern, file scan)
    pub fn is_search_execution(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern(_) | Self::SearchExecution { .. } | Self::Encoding { .. }
        )
    }

    /// Whether this error came from the context extraction phase
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction { .. } | Self::LineOutOfRange { .. })
    }
}

impl From<config::ConfigError> for SearchError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
