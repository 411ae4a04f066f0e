//! Rate limit probes
//!
//! Checks that the API reports the quota a client should get, and that
//! conditional requests answered with `304 Not Modified` do not spend it.

mod types;

pub use types::{
    expected_limit, ConditionalReport, QuotaReport, AUTHENTICATED_LIMIT, UNAUTHENTICATED_LIMIT,
};

use crate::error::{Error, Result};
use crate::http::{ApiResponse, HttpClient, RequestConfig};
use chrono::Utc;
use reqwest::StatusCode;
use tracing::{debug, info};

/// Endpoint that is cheap to request and always carries an ETag
pub const DEFAULT_PROBE_PATH: &str = "/meta";

/// Runs quota checks through an [`HttpClient`]
#[derive(Debug)]
pub struct RateLimitProbe<'a> {
    client: &'a HttpClient,
}

impl<'a> RateLimitProbe<'a> {
    /// Create a probe
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Request `path` once and check the reported quota.
    ///
    /// The limit must equal `expected_limit` (or the default for the
    /// client's authentication state), the request must have been counted
    /// against it, and the window must reset in the future.
    pub async fn check_quota(&self, path: &str, expected_limit: Option<u32>) -> Result<QuotaReport> {
        let authenticated = self.client.is_authenticated();
        let expected = expected_limit.unwrap_or_else(|| types::expected_limit(authenticated));

        let response = self.fetch(path, RequestConfig::new()).await?;
        require_status(&response, StatusCode::OK)?;
        let status = response.rate_limit()?;
        debug!(path, authenticated, "Quota: {}", types::describe(&status));

        if status.limit != expected {
            return Err(Error::check(format!(
                "expected a limit of {expected}, server reported {}",
                status.limit
            )));
        }
        if status.remaining >= status.limit {
            return Err(Error::check(format!(
                "request was not counted: {}",
                types::describe(&status)
            )));
        }
        if !status.resets_after(Utc::now()) {
            return Err(Error::check(format!(
                "reset time is not in the future: {}",
                types::describe(&status)
            )));
        }

        info!(
            path,
            limit = status.limit,
            remaining = status.remaining,
            "Quota check passed"
        );
        Ok(QuotaReport {
            path: path.to_string(),
            authenticated,
            expected_limit: expected,
            status,
        })
    }

    /// Request `path`, then revalidate it with `If-None-Match`.
    ///
    /// The second response must be `304 Not Modified` and leave the
    /// remaining quota where the first one left it.
    pub async fn check_conditional(&self, path: &str) -> Result<ConditionalReport> {
        let first = self.fetch(path, RequestConfig::new()).await?;
        require_status(&first, StatusCode::OK)?;
        let etag = first
            .etag()
            .ok_or_else(|| Error::missing_header("etag"))?
            .to_string();
        let before = first.rate_limit()?;

        let second = self
            .fetch(path, RequestConfig::new().if_none_match(etag.clone()))
            .await?;
        require_status(&second, StatusCode::NOT_MODIFIED)?;
        let after = second.rate_limit()?;

        let report = ConditionalReport {
            path: path.to_string(),
            etag,
            revalidation_status: second.status_code(),
            remaining_before: before.remaining,
            remaining_after: after.remaining,
        };

        if !report.quota_preserved() {
            return Err(Error::check(format!(
                "304 response spent quota: {} before, {} after",
                report.remaining_before, report.remaining_after
            )));
        }

        info!(path, etag = %report.etag, "Conditional request check passed");
        Ok(report)
    }

    async fn fetch(&self, path: &str, config: RequestConfig) -> Result<ApiResponse> {
        // Each probe request must reach the server exactly once.
        self.client.get_with_config(path, config.retries(0)).await
    }
}

fn require_status(response: &ApiResponse, expected: StatusCode) -> Result<()> {
    if response.status() == expected {
        Ok(())
    } else {
        Err(Error::check(format!(
            "expected HTTP {} from {}, got {}",
            expected.as_u16(),
            response.url(),
            response.status_code()
        )))
    }
}
