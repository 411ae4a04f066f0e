//! Error types for gh-api-probe
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for gh-api-probe
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Link Header Errors
    // ============================================================================
    #[error("Link header is empty")]
    EmptyHeader,

    #[error("Malformed link entry: '{entry}'")]
    MalformedLinkEntry { entry: String },

    // ============================================================================
    // Traversal Errors
    // ============================================================================
    #[error("Unexpected HTTP {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Page at {url} contained no items")]
    EmptyPage { url: String },

    #[error("Item {index} on {url} is missing '{field}'")]
    MalformedItem {
        url: String,
        index: usize,
        field: String,
    },

    #[error("Pagination exceeded {max_pages} pages")]
    PageLimitExceeded { max_pages: u64 },

    #[error("Pagination cycle detected: {url} was already visited")]
    PaginationCycle { url: String },

    #[error("Traversal cancelled")]
    Cancelled,

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Missing response header: {name}")]
    MissingHeader { name: String },

    #[error("Invalid value for header '{name}': {value}")]
    InvalidHeader { name: String, value: String },

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Search failed: {message}")]
    Search { message: String },

    #[error("Check failed: {message}")]
    Check { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a malformed link entry error
    pub fn malformed_entry(entry: impl Into<String>) -> Self {
        Self::MalformedLinkEntry {
            entry: entry.into(),
        }
    }

    /// Create an unexpected status error
    pub fn unexpected_status(url: impl Into<String>, status: u16) -> Self {
        Self::UnexpectedStatus {
            url: url.into(),
            status,
        }
    }

    /// Create a malformed item error
    pub fn malformed_item(url: impl Into<String>, index: usize, field: impl Into<String>) -> Self {
        Self::MalformedItem {
            url: url.into(),
            index,
            field: field.into(),
        }
    }

    /// Create a missing header error
    pub fn missing_header(name: impl Into<String>) -> Self {
        Self::MissingHeader { name: name.into() }
    }

    /// Create an invalid header error
    pub fn invalid_header(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidHeader {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a search error
    pub fn search(message: impl Into<String>) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    /// Create a failed check error
    pub fn check(message: impl Into<String>) -> Self {
        Self::Check {
            message: message.into(),
        }
    }
}

/// Result type alias for gh-api-probe
pub type Result<T> = std::result::Result<T, Error>;
