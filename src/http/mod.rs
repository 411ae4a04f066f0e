//! HTTP client module
//!
//! Provides the HTTP client collaborator used by the pagination walker,
//! the rate-limit probes and repository search.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Client-side Throttling**: Token bucket rate limiter using governor
//! - **Raw Responses**: Status, headers and body are handed back untouched so
//!   callers decide which statuses are acceptable
//! - **Rate-limit Headers**: Parsing of GitHub's `X-RateLimit-*` headers

mod client;
mod rate_limit;
mod response;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimitStatus, RateLimiter, RateLimiterConfig};
pub use response::ApiResponse;
