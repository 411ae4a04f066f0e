//! Probe configuration
//!
//! Loaded from a YAML file, then overridden by the environment
//! (`GITHUB_TOKEN`, `GITHUB_API_URL`) and finally by CLI flags.
//!
//! ```yaml
//! base_url: https://api.github.com
//! token: ghp_...
//! auth_scheme: token
//! timeout_secs: 30
//! max_retries: 3
//! rate_limit:
//!   requests_per_second: 5
//!   burst_size: 5
//! walk:
//!   max_pages: 500
//!   detect_cycles: true
//! ```

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::WalkOptions;
use crate::types::{AuthScheme, GITHUB_JSON};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "GITHUB_API_URL";

/// Default GitHub REST API root
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Top-level configuration
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    /// API root that relative paths are resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Personal access token
    #[serde(default)]
    pub token: Option<String>,

    /// How the token is sent
    #[serde(default)]
    pub auth_scheme: AuthScheme,

    /// Default Accept header
    #[serde(default = "default_accept")]
    pub accept: String,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for 429/5xx responses
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Client-side throttling; omitted means no throttling
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,

    /// Traversal limits
    #[serde(default)]
    pub walk: WalkConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_accept() -> String {
    GITHUB_JSON.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            auth_scheme: AuthScheme::default(),
            accept: default_accept(),
            user_agent: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            rate_limit: None,
            walk: WalkConfig::default(),
        }
    }
}

// Tokens never end up in logs.
impl std::fmt::Debug for ProbeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("auth_scheme", &self.auth_scheme)
            .field("accept", &self.accept)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("rate_limit", &self.rate_limit)
            .field("walk", &self.walk)
            .finish()
    }
}

/// Traversal limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WalkConfig {
    /// Maximum pages per traversal; `null` disables the cap
    #[serde(default = "default_max_pages")]
    pub max_pages: Option<u64>,

    /// Fail when a `next` link points at an already visited page
    #[serde(default = "default_detect_cycles")]
    pub detect_cycles: bool,
}

fn default_max_pages() -> Option<u64> {
    WalkOptions::default().max_pages
}

fn default_detect_cycles() -> bool {
    true
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            max_pages: default_max_pages(),
            detect_cycles: default_detect_cycles(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(TOKEN_ENV).ok(),
            std::env::var(BASE_URL_ENV).ok(),
        );
    }

    /// Apply token and base URL overrides; empty values are ignored
    pub fn apply_overrides(&mut self, token: Option<String>, base_url: Option<String>) {
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.token = Some(token);
        }
        if let Some(base_url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = base_url;
        }
    }

    /// Check the configuration for invalid values
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        url::Url::parse(&self.base_url)?;

        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if self.walk.max_pages == Some(0) {
            return Err(Error::config("walk.max_pages must be greater than zero"));
        }
        if let Some(ref limit) = self.rate_limit {
            if limit.requests_per_second == 0 {
                return Err(Error::config(
                    "rate_limit.requests_per_second must be greater than zero",
                ));
            }
        }
        Ok(())
    }

    /// HTTP client configuration derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .accept(&self.accept);

        builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };

        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        builder.build()
    }

    /// Credentials derived from this config
    pub fn auth_config(&self) -> AuthConfig {
        match &self.token {
            Some(token) => AuthConfig::from_token(token, self.auth_scheme),
            None => AuthConfig::None,
        }
    }

    /// Traversal options derived from this config
    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            max_pages: self.walk.max_pages,
            detect_cycles: self.walk.detect_cycles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.base_url, "https://api.github.com");
        assert_eq!(config.auth_scheme, AuthScheme::Token);
        assert_eq!(config.walk.max_pages, Some(1000));
        assert!(config.rate_limit.is_none());
        assert!(matches!(config.auth_config(), AuthConfig::None));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r"
base_url: https://ghe.example.com/api/v3
token: ghp_abc
auth_scheme: bearer
timeout_secs: 10
rate_limit:
  requests_per_second: 2
  burst_size: 4
walk:
  max_pages: 50
  detect_cycles: false
";
        let config = ProbeConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "https://ghe.example.com/api/v3");
        assert_eq!(
            config.auth_config(),
            AuthConfig::Bearer {
                token: "ghp_abc".to_string()
            }
        );
        assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 4)));

        let options = config.walk_options();
        assert_eq!(options.max_pages, Some(50));
        assert!(!options.detect_cycles);

        let http = config.http_client_config();
        assert_eq!(http.timeout, Duration::from_secs(10));
        assert_eq!(
            http.base_url.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );
        assert!(http.rate_limit.is_some());
    }

    #[test]
    fn test_from_empty_yaml_uses_defaults() {
        let config = ProbeConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn test_unlimited_pages() {
        let config = ProbeConfig::from_yaml_str("walk:\n  max_pages: null\n").unwrap();
        assert_eq!(config.walk.max_pages, None);
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = ProbeConfig::from_yaml_str("base_uri: https://x\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_validate() {
        let err = ProbeConfig::from_yaml_str("base_url: not a url\n").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));

        let err = ProbeConfig::from_yaml_str("timeout_secs: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = ProbeConfig::from_yaml_str("walk:\n  max_pages: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut config = ProbeConfig::default();
        config.apply_overrides(Some("ghp_env".to_string()), Some(String::new()));
        assert_eq!(config.token.as_deref(), Some("ghp_env"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        config.apply_overrides(None, Some("http://localhost:8080".to_string()));
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.token.as_deref(), Some("ghp_env"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ProbeConfig {
            token: Some("ghp_secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://127.0.0.1:9999").unwrap();
        writeln!(file, "max_retries: 0").unwrap();

        let config = ProbeConfig::load(file.path()).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9999");
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ProbeConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, Error::Io(_)), "unexpected error: {err}");
    }
}
