//! CLI module
//!
//! Command-line interface for probing the GitHub API.
//!
//! # Commands
//!
//! - `links` - Print the Link relations of one page
//! - `walk` - Follow `next` links and count pages and items
//! - `rate-limit` - Check the reported request quota
//! - `conditional` - Check that 304 revalidations are free
//! - `search` - Search repositories

mod commands;
mod runner;

#[cfg(test)]
mod tests;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
