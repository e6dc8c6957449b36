use glob::Pattern;
use ignore::WalkBuilder;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::engine::CancellationToken;
use crate::errors::{SearchError, SearchResult};
use crate::filters::is_excluded_dir;

/// Collects every regular file under `root`, skipping excluded directories.
///
/// The walk ignores `.gitignore` and hidden-file rules and does not follow
/// symlinks, the way `grep -r` behaves. Entries are visited depth-first and
/// sorted by file name, so the order is stable across runs and platforms.
/// The first walk error aborts the collection.
pub fn collect_files(
    root: &Path,
    exclude: &[Pattern],
    cancel: &CancellationToken,
) -> SearchResult<Vec<PathBuf>> {
    let exclude = exclude.to_vec();

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            let skip = is_dir && entry.depth() > 0 && is_excluded_dir(entry.file_name(), &exclude);
            if skip {
                debug!("Skipping excluded directory: {}", entry.path().display());
            }
            !skip
        });

    let mut files = Vec::new();
    for entry in walker.build() {
        cancel.check()?;
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.file_type().is_some_and(|ft| ft.is_file()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn walk_error(root: &Path, err: ignore::Error) -> SearchError {
    let path = match &err {
        ignore::Error::WithPath { path, .. } => path.clone(),
        _ => root.to_path_buf(),
    };
    let message = err.to_string();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
    SearchError::search_execution(path, source)
}
