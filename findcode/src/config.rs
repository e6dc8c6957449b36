use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{SearchError, SearchResult};

/// Directory skipped when the caller does not provide an exclude list
pub const DEFAULT_EXCLUDE: &str = "node_modules";

/// Lines of context on each side of a match
pub const DEFAULT_PADDING: usize = 2;

/// How to treat files that are not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    /// Abort the search with an encoding error
    FailFast,
    /// Replace invalid sequences with U+FFFD and keep going
    #[default]
    Lossy,
}

impl std::str::FromStr for EncodingMode {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "failfast" => Ok(EncodingMode::FailFast),
            "lossy" => Ok(EncodingMode::Lossy),
            other => Err(SearchError::config_error(format!(
                "unknown encoding mode '{}' (expected failfast or lossy)",
                other
            ))),
        }
    }
}

/// Options for a single search invocation.
///
/// # Configuration Locations
///
/// Options can be loaded from YAML files, later files overriding earlier ones:
/// 1. Global `$CONFIG_DIR/findcode/config.yaml`
/// 2. Local `.findcode.yaml` in the current directory
/// 3. Custom file passed via `--config`
///
/// ```yaml
/// # Root directory (defaults to the current directory)
/// directory: "src"
///
/// # Directory names to skip (glob syntax, matched against the name only)
/// exclude:
///   - "node_modules"
///   - "target"
///
/// # Lines of context on each side of a match
/// padding: 3
///
/// thread_count: 4
/// encoding: lossy
/// log_level: "info"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Root directory to search. `None` means the working directory at call time.
    pub directory: Option<PathBuf>,

    /// Directory names to skip during the walk
    pub exclude: Vec<String>,

    /// Lines of context on each side of a match
    pub padding: usize,

    /// Worker threads for scanning and extraction
    pub thread_count: NonZeroUsize,

    pub encoding: EncodingMode,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            directory: None,
            exclude: vec![DEFAULT_EXCLUDE.to_string()],
            padding: DEFAULT_PADDING,
            thread_count: default_thread_count(),
            encoding: EncodingMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl SearchOptions {
    /// Creates options rooted at the given directory
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        SearchOptions {
            directory: Some(directory.into()),
            ..Default::default()
        }
    }

    pub fn with_exclude<I, S>(mut self, exclude: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_thread_count(mut self, count: NonZeroUsize) -> Self {
        self.thread_count = count;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingMode) -> Self {
        self.encoding = encoding;
        self
    }

    /// Resolves the search root to an absolute path, falling back to the
    /// current directory. Called once per search so the rest of the run never
    /// touches ambient state.
    pub fn resolve_root(&self) -> SearchResult<PathBuf> {
        match &self.directory {
            Some(dir) if dir.is_absolute() => Ok(dir.clone()),
            Some(dir) => std::env::current_dir()
                .map(|cwd| cwd.join(dir))
                .map_err(|e| SearchError::search_execution(dir, e)),
            None => std::env::current_dir().map_err(|e| SearchError::search_execution(".", e)),
        }
    }

    /// Loads options from the default locations
    pub fn load() -> SearchResult<Self> {
        Self::load_from(None)
    }

    /// Loads options from the default locations plus an explicit file.
    /// An explicit file that does not exist is an error; missing default files are skipped.
    pub fn load_from(config_path: Option<&Path>) -> SearchResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            dirs::config_dir().map(|p| p.join("findcode/config.yaml")),
            Some(PathBuf::from(".findcode.yaml")),
        ];
        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Overlays values given on the command line. Only flags the user
    /// actually passed are applied, so they always win over config files.
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(directory) = cli.directory {
            self.directory = Some(directory);
        }
        if let Some(exclude) = cli.exclude {
            self.exclude = exclude;
        }
        if let Some(padding) = cli.padding {
            self.padding = padding;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(encoding) = cli.encoding {
            self.encoding = encoding;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        self
    }
}

/// Options given explicitly on the command line; `None` means "not passed"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    pub directory: Option<PathBuf>,
    pub exclude: Option<Vec<String>>,
    pub padding: Option<usize>,
    pub thread_count: Option<NonZeroUsize>,
    pub encoding: Option<EncodingMode>,
    pub log_level: Option<String>,
}
