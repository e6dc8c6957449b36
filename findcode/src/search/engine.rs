use rayon::prelude::*;
use rayon::ThreadPool;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::context::extract;
use super::matcher::LineMatcher;
use super::processor::FileProcessor;
use super::walker::collect_files;
use crate::config::SearchOptions;
use crate::errors::{SearchError, SearchResult};
use crate::filters::compile_exclude_patterns;
use crate::query::Query;
use crate::results::{FoundCode, Match};

/// Cooperative cancellation flag shared between a caller and a running search.
/// Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Fails with [`SearchError::Cancelled`] once cancellation was requested
    pub fn check(&self) -> SearchResult<()> {
        if self.is_cancelled() {
            Err(SearchError::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn build_pool(options: &SearchOptions) -> SearchResult<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(options.thread_count.get())
        .build()
        .map_err(|e| SearchError::config_error(format!("failed to build thread pool: {}", e)))
}

/// Searches the tree and returns every matching line with its context block,
/// in walk order.
pub fn search(query: &Query, options: &SearchOptions) -> SearchResult<Vec<FoundCode>> {
    search_with_cancel(query, options, &CancellationToken::new())
}

/// Same as [`search`], but aborts with [`SearchError::Cancelled`] once the
/// token is cancelled.
pub fn search_with_cancel(
    query: &Query,
    options: &SearchOptions,
    cancel: &CancellationToken,
) -> SearchResult<Vec<FoundCode>> {
    info!("Starting search for {}", query);

    let matcher = LineMatcher::new(query)?;
    let root = options.resolve_root()?;
    let pool = build_pool(options)?;

    let matches = scan(matcher, &root, options, &pool, cancel)?;
    debug!("Extracting context for {} matches", matches.len());

    let found: Vec<FoundCode> = pool.install(|| {
        matches
            .par_iter()
            .map(|m| {
                cancel.check()?;
                extract(m, &root, options.padding, options.encoding)
            })
            .collect::<SearchResult<Vec<_>>>()
    })?;

    info!("Search complete. Found {} matches", found.len());
    Ok(found)
}

/// Runs only the matching phase: one [`Match`] per matching line, in walk order.
pub fn find_matches(query: &Query, options: &SearchOptions) -> SearchResult<Vec<Match>> {
    let matcher = LineMatcher::new(query)?;
    let root = options.resolve_root()?;
    let pool = build_pool(options)?;
    scan(matcher, &root, options, &pool, &CancellationToken::new())
}

fn scan(
    matcher: LineMatcher,
    root: &Path,
    options: &SearchOptions,
    pool: &ThreadPool,
    cancel: &CancellationToken,
) -> SearchResult<Vec<Match>> {
    let exclude = compile_exclude_patterns(&options.exclude)?;
    let files = collect_files(root, &exclude, cancel)?;
    debug!("Found {} files to scan under {}", files.len(), root.display());

    let processor = FileProcessor::new(matcher, options.encoding);
    let per_file: Vec<Vec<Match>> = pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                cancel.check()?;
                processor.process_file(path)
            })
            .collect::<SearchResult<Vec<_>>>()
    })?;

    Ok(per_file.into_iter().flatten().collect())
}
