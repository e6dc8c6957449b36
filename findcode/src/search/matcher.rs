use regex::{Regex, RegexBuilder};
use std::path::Path;

use crate::errors::{SearchError, SearchResult};
use crate::query::Query;
use crate::results::Match;

/// Strategy for matching a single line
#[derive(Debug, Clone)]
pub enum LineMatcher {
    /// Case-sensitive substring search
    Literal(String),
    /// Regular expression, evaluated against each line on its own
    Regex(Regex),
}

impl LineMatcher {
    /// Builds a matcher for the query. Empty queries and patterns the regex
    /// engine rejects fail here, before any file is touched.
    pub fn new(query: &Query) -> SearchResult<Self> {
        query.validate()?;

        match query {
            Query::Literal(text) => Ok(LineMatcher::Literal(text.clone())),
            Query::Pattern {
                source,
                case_insensitive,
            } => RegexBuilder::new(source)
                .case_insensitive(*case_insensitive)
                .build()
                .map(LineMatcher::Regex)
                .map_err(|e| SearchError::invalid_pattern(e.to_string())),
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            LineMatcher::Literal(text) => line.contains(text.as_str()),
            LineMatcher::Regex(regex) => regex.is_match(line),
        }
    }

    /// Returns one match per matching line of `content`, in line order
    pub fn find_matches(&self, path: &Path, content: &str) -> Vec<Match> {
        content
            .lines()
            .enumerate()
            .filter(|(_, line)| self.is_match(line))
            .map(|(index, line)| Match::new(path, index + 1, line))
            .collect()
    }
}
