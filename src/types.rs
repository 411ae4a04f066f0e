//! Common types used throughout gh-api-probe
//!
//! Shared type aliases and small enums used by several modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Auth Scheme
// ============================================================================

/// How a personal access token is presented in the `Authorization` header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: token <value>` (classic GitHub form)
    #[default]
    Token,
    /// `Authorization: Bearer <value>`
    Bearer,
}

// ============================================================================
// Well-known media types
// ============================================================================

/// Default GitHub REST media type
pub const GITHUB_JSON: &str = "application/vnd.github+json";

/// Preview media type required to receive repository topics in search results
pub const MERCY_PREVIEW: &str = "application/vnd.github.mercy-preview+json";
