use glob::Pattern;
use std::ffi::OsStr;

use crate::errors::{SearchError, SearchResult};

/// Compiles the exclude list into glob patterns.
/// Entries are matched against a directory's own name, not its full path,
/// so `node_modules` skips that directory at any depth.
pub fn compile_exclude_patterns(exclude: &[String]) -> SearchResult<Vec<Pattern>> {
    exclude
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| {
            Pattern::new(name).map_err(|e| {
                SearchError::config_error(format!("invalid exclude pattern '{}': {}", name, e))
            })
        })
        .collect()
}

/// Checks if a directory with the given name should be skipped
pub fn is_excluded_dir(name: &OsStr, patterns: &[Pattern]) -> bool {
    let name = name.to_string_lossy();
    patterns.iter().any(|pattern| pattern.matches(&name))
}
