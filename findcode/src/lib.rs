pub mod config;
pub mod errors;
pub mod filters;
pub mod query;
pub mod results;
pub mod search;

pub use crate::config::{CliOverrides, EncodingMode, SearchOptions};
pub use crate::errors::{SearchError, SearchResult};
pub use crate::query::Query;
pub use crate::results::{FoundCode, Match};
pub use crate::search::{find_matches, search, search_with_cancel, CancellationToken};
