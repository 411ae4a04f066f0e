//! Search response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `/search/repositories` response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResults {
    /// Total matches (may exceed the items returned)
    pub total_count: u64,
    /// Whether the search timed out before finishing
    #[serde(default)]
    pub incomplete_results: bool,
    /// Repositories on this page
    pub items: Vec<Repository>,
}

impl SearchResults {
    /// Names of the returned repositories, in result order
    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Repository as returned by the search API
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
    /// API URL of the repository
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Size in kilobytes
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub watchers: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub language: Option<String>,
    /// Only populated with the mercy-preview media type
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub mirror_url: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

impl Repository {
    /// Whether the repository is tagged with `topic`
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t.eq_ignore_ascii_case(topic))
    }

    /// Whether the repository mirrors another one
    pub fn is_mirror(&self) -> bool {
        self.mirror_url.is_some()
    }
}

/// Repository license summary
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct License {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub node_id: Option<String>,
}

/// Issue as returned by `/repos/{owner}/{repo}/issues`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Issue {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub labels: Vec<Label>,
}

impl Issue {
    /// Whether the issue carries a label, compared case-insensitively
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l.name.eq_ignore_ascii_case(name))
    }
}

/// Issue label
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Label {
    pub name: String,
}
