//! Repository search
//!
//! Builds GitHub search qualifiers (`org:`, `stars:>=`, `topic:`, ...) and
//! runs them against `/search/repositories`. [`SearchVerifier`] then checks
//! each returned repository against the typed qualifiers.

mod client;
mod query;
mod types;
mod verify;

pub use client::SearchClient;
pub use query::{Qualifier, Range, SearchIn, SearchQuery, SortOrder, Visibility};
pub use types::{Issue, Label, License, Repository, SearchResults};
pub use verify::{SearchVerifier, VerificationReport, HELP_WANTED};
