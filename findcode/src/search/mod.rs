//! Matching and context extraction.
//!
//! A search runs in two phases. The matcher walks the tree and scans each
//! file, yielding one [`Match`](crate::results::Match) per matching line.
//! The extractor then re-reads each matched file and slices a clamped block
//! of lines around the match. Both phases run on a rayon pool and keep walk
//! order in their output.
pub mod context;
pub mod engine;
pub mod matcher;
pub mod processor;
pub mod walker;

pub use context::{extract, ContextBlock};
pub use engine::{find_matches, search, search_with_cancel, CancellationToken};
pub use matcher::LineMatcher;
pub use processor::FileProcessor;
