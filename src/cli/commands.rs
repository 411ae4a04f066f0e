//! CLI commands and argument parsing

use crate::probe::DEFAULT_PROBE_PATH;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GitHub API pagination and rate limit probe
#[derive(Parser, Debug)]
#[command(name = "gh-api-probe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL (overrides the config file and GITHUB_API_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// API token (overrides the config file and GITHUB_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page and print its Link relations
    Links {
        /// Page URL or API path
        url: String,
    },

    /// Follow `next` links and count pages and items
    Walk {
        /// Start URLs or API paths (traversed concurrently)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Abort after this many pages
        #[arg(long)]
        max_pages: Option<u64>,

        /// Print every item as it was seen
        #[arg(long)]
        items: bool,
    },

    /// Check the request quota reported by the API
    RateLimit {
        /// Path to request
        #[arg(long, default_value = DEFAULT_PROBE_PATH)]
        path: String,

        /// Expected hourly limit (defaults to 60 anonymous, 5000 with a token)
        #[arg(long)]
        expect: Option<u32>,
    },

    /// Check that a 304 revalidation does not spend quota
    Conditional {
        /// Path to request
        #[arg(long, default_value = DEFAULT_PROBE_PATH)]
        path: String,
    },

    /// Search repositories
    Search {
        /// Free-text terms
        terms: Vec<String>,

        /// Qualifier as key:value (repeatable), e.g. `stars:>=10`
        #[arg(short, long = "qualifier")]
        qualifiers: Vec<String>,

        /// Sort field (stars, forks, help-wanted-issues, updated)
        #[arg(long)]
        sort: Option<String>,

        /// Results per page
        #[arg(long)]
        per_page: Option<u32>,

        /// Skip checking the results against the qualifiers
        #[arg(long)]
        no_verify: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
