//! Rate limiting
//!
//! Two sides of the same concern:
//! - [`RateLimiter`] throttles our own requests (governor token bucket)
//! - [`RateLimitStatus`] reads the quota the server reports back in its
//!   `X-RateLimit-*` headers

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;

/// Configuration for rate limiting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Maximum number of requests per second
    pub requests_per_second: u32,
    /// Burst size (max tokens in bucket)
    pub burst_size: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 10,
            burst_size: 10,
        }
    }
}

impl RateLimiterConfig {
    /// Create a new rate limiter config
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

/// Token bucket rate limiter
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given config
    pub fn new(config: &RateLimiterConfig) -> Self {
        let quota = Quota::per_second(
            NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN),
        )
        .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN));

        Self {
            limiter: Arc::new(Governor::direct(quota)),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}

// ============================================================================
// Server-reported quota
// ============================================================================

const LIMIT: &str = "x-ratelimit-limit";
const REMAINING: &str = "x-ratelimit-remaining";
const RESET: &str = "x-ratelimit-reset";
const USED: &str = "x-ratelimit-used";
const RESOURCE: &str = "x-ratelimit-resource";

/// Quota reported by the server on a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitStatus {
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Requests remaining in the window
    pub remaining: u32,
    /// When the window resets
    pub reset_at: DateTime<Utc>,
    /// Requests used in the window (not sent by every endpoint)
    pub used: Option<u32>,
    /// Quota bucket (`core`, `search`, ...)
    pub resource: Option<String>,
}

impl RateLimitStatus {
    /// Parse the `X-RateLimit-*` headers.
    ///
    /// Limit, remaining and reset are required; used and resource are optional.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
        let limit = required_number(headers, LIMIT)?;
        let remaining = required_number(headers, REMAINING)?;
        let reset_secs: i64 = required_number(headers, RESET)?;
        let reset_at = Utc
            .timestamp_opt(reset_secs, 0)
            .single()
            .ok_or_else(|| Error::invalid_header(RESET, reset_secs.to_string()))?;

        let used = match header_str(headers, USED)? {
            Some(raw) => Some(parse_number(USED, raw)?),
            None => None,
        };
        let resource = header_str(headers, RESOURCE)?.map(String::from);

        Ok(Self {
            limit,
            remaining,
            reset_at,
            used,
            resource,
        })
    }

    /// Whether the quota window resets after `now`
    pub fn resets_after(&self, now: DateTime<Utc>) -> bool {
        self.reset_at > now
    }

    /// Whether the quota is used up
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>> {
    match headers.get(name) {
        Some(value) => value
            .to_str()
            .map(|s| Some(s.trim()))
            .map_err(|_| Error::invalid_header(name, String::from_utf8_lossy(value.as_bytes()))),
        None => Ok(None),
    }
}

fn required_number<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Result<T> {
    let raw = header_str(headers, name)?.ok_or_else(|| Error::missing_header(name))?;
    parse_number(name, raw)
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.parse().map_err(|_| Error::invalid_header(name, raw))
}
