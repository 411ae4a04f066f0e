// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # gh-api-probe
//!
//! Probes for the GitHub REST API's pagination and rate limiting.
//!
//! ## Features
//!
//! - **Link Header Parsing**: RFC 5988 `Link` headers into named relations
//! - **Pagination Walking**: Follow `next` links, counting pages and items
//! - **Rate Limit Checks**: Quota headers and free 304 revalidations
//! - **Repository Search**: Typed search qualifiers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gh_api_probe::{HttpClient, HttpClientConfig, PaginationWalker, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = HttpClientConfig::builder()
//!         .base_url("https://api.github.com")
//!         .build();
//!     let client = HttpClient::with_config(config)?;
//!
//!     let result = PaginationWalker::new(&client)
//!         .walk("/orgs/rust-lang/repos?per_page=100")
//!         .await?;
//!     println!("{} pages, {} repos", result.pages_visited, result.items_seen);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                            CLI                              │
//! │   links    walk    rate-limit    conditional    search      │
//! └─────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────┬───────────┴───────────┬──────────────────┐
//! │    Pagination    │        Probe          │      Search      │
//! ├──────────────────┼───────────────────────┼──────────────────┤
//! │ Link parser      │ Quota check           │ Qualifiers       │
//! │ Walker           │ Conditional requests  │ Repositories     │
//! └──────────────────┴───────────────────────┴──────────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────┐
//! │          HTTP (retry, backoff, throttling) + Auth           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Link header parsing and pagination walking
pub mod pagination;

/// Rate limit probes
pub mod probe;

/// Repository search
pub mod search;

/// Probe configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ProbeConfig;
pub use http::{ApiResponse, HttpClient, HttpClientConfig, RateLimitStatus};
pub use pagination::{parse_link_header, LinkRelations, PaginationResult, PaginationWalker};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
