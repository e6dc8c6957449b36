use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{SearchError, SearchResult};

/// Flags accepted after the closing slash of a delimited pattern.
/// Only `i` changes behavior; the rest are meaningless for per-line matching.
const PATTERN_FLAGS: &[char] = &['g', 'i', 'm', 's', 'u', 'y'];

/// What to look for.
///
/// A query is either literal text, matched as a case-sensitive substring of
/// each line, or a regular expression matched per line with an explicit
/// case-insensitivity toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    Literal(String),
    Pattern {
        source: String,
        #[serde(default)]
        case_insensitive: bool,
    },
}

impl Query {
    /// Creates a literal (substring) query
    pub fn literal(text: impl Into<String>) -> Self {
        Query::Literal(text.into())
    }

    /// Creates a case-sensitive pattern query
    pub fn pattern(source: impl Into<String>) -> Self {
        Query::Pattern {
            source: source.into(),
            case_insensitive: false,
        }
    }

    /// Creates a pattern query from a compiled regex. A `Regex` does not
    /// expose the builder flags it was compiled with, so case-insensitivity
    /// must be passed explicitly; inline flags such as `(?i)` carry over in
    /// the source.
    pub fn from_regex(regex: &regex::Regex, case_insensitive: bool) -> Self {
        Query::Pattern {
            source: regex.as_str().to_string(),
            case_insensitive,
        }
    }

    /// Builder method to toggle case-insensitivity.
    /// Literal queries are promoted to an escaped pattern so the text still
    /// matches verbatim.
    pub fn with_case_insensitive(self, case_insensitive: bool) -> Self {
        match self {
            Query::Pattern { source, .. } => Query::Pattern {
                source,
                case_insensitive,
            },
            Query::Literal(text) if case_insensitive => Query::Pattern {
                source: regex::escape(&text),
                case_insensitive,
            },
            literal => literal,
        }
    }

    /// Parses user input. Text of the form `/source/flags` becomes a pattern
    /// (flag `i` makes it case-insensitive); anything else is a literal.
    pub fn parse(input: &str) -> Self {
        if let Some(rest) = input.strip_prefix('/') {
            if let Some(close) = rest.rfind('/') {
                let (source, flags) = (&rest[..close], &rest[close + 1..]);
                if !source.is_empty() && flags.chars().all(|c| PATTERN_FLAGS.contains(&c)) {
                    return Query::Pattern {
                        source: source.to_string(),
                        case_insensitive: flags.contains('i'),
                    };
                }
            }
        }
        Query::Literal(input.to_string())
    }

    /// The raw text of the query
    pub fn text(&self) -> &str {
        match self {
            Query::Literal(text) => text,
            Query::Pattern { source, .. } => source,
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Query::Pattern { .. })
    }

    pub fn is_case_insensitive(&self) -> bool {
        matches!(
            self,
            Query::Pattern {
                case_insensitive: true,
                ..
            }
        )
    }

    /// Rejects empty queries before any filesystem access happens
    pub fn validate(&self) -> SearchResult<()> {
        if self.text().is_empty() {
            return Err(SearchError::invalid_query());
        }
        Ok(())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Literal(text) => write!(f, "{:?}", text),
            Query::Pattern {
                source,
                case_insensitive,
            } => write!(f, "/{}/{}", source, if *case_insensitive { "i" } else { "" }),
        }
    }
}

impl From<&str> for Query {
    fn from(text: &str) -> Self {
        Query::Literal(text.to_string())
    }
}

impl From<String> for Query {
    fn from(text: String) -> Self {
        Query::Literal(text)
    }
}
