use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use findcode::{search, CliOverrides, EncodingMode, FoundCode, Query, SearchOptions};
use std::{num::NonZeroUsize, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Text to find. Write `/pattern/flags` (e.g. `/^fn main/i`) for a regular expression
    query: String,

    /// Root directory to search in (defaults to the current directory)
    #[arg(short = 'd', long)]
    directory: Option<PathBuf>,

    /// Directory names to skip, glob syntax (can be specified multiple times)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Treat the query as a regular expression
    #[arg(short = 'r', long)]
    regex: bool,

    /// Match without regard to letter case
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Number of lines to show on each side of a match
    #[arg(short = 'C', long)]
    context: Option<usize>,

    /// Number of threads to use
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// How to handle invalid UTF-8 sequences (failfast|lossy)
    #[arg(long)]
    encoding: Option<EncodingMode>,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn query(&self) -> Query {
        let query = if self.regex {
            Query::pattern(&self.query)
        } else {
            Query::parse(&self.query)
        };
        if self.ignore_case {
            query.with_case_insensitive(true)
        } else {
            query
        }
    }

    /// Only the flags actually passed; everything else comes from config files
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            directory: self.directory.clone(),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            padding: self.context,
            thread_count: self.threads,
            encoding: self.encoding,
            log_level: self.verbose.then(|| "debug".to_string()),
        }
    }
}

fn setup_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let options = SearchOptions::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());
    setup_logging(&options.log_level);

    let found = search(&cli.query(), &options)?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&found).context("failed to encode results")?
        );
    } else {
        print_results(&found, options.padding);
    }
    Ok(())
}

fn print_results(found: &[FoundCode], padding: usize) {
    for result in found {
        println!(
            "\n{}:{}",
            result.file.display().to_string().blue(),
            result.line_number.to_string().green()
        );
        let offset = result.match_offset(padding);
        for (index, line) in result.block.split('\n').enumerate() {
            if index == offset {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
    }

    let files = {
        let mut files: Vec<_> = found.iter().map(|r| &r.file).collect();
        files.dedup();
        files.len()
    };
    println!("\nFound {} matches in {} files", found.len(), files);
}
