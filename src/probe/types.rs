//! Probe report types

use crate::http::RateLimitStatus;
use serde::Serialize;

/// Limit GitHub grants anonymous clients per hour
pub const UNAUTHENTICATED_LIMIT: u32 = 60;

/// Limit GitHub grants token-authenticated clients per hour
pub const AUTHENTICATED_LIMIT: u32 = 5000;

/// Expected hourly limit for a client
pub fn expected_limit(authenticated: bool) -> u32 {
    if authenticated {
        AUTHENTICATED_LIMIT
    } else {
        UNAUTHENTICATED_LIMIT
    }
}

/// Outcome of a quota check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotaReport {
    /// Path that was requested
    pub path: String,
    /// Whether the request carried credentials
    pub authenticated: bool,
    /// Limit the check expected
    pub expected_limit: u32,
    /// Quota reported by the server
    pub status: RateLimitStatus,
}

/// Outcome of a conditional request check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalReport {
    /// Path that was requested
    pub path: String,
    /// Entity tag from the first response
    pub etag: String,
    /// Status of the revalidation request
    pub revalidation_status: u16,
    /// Remaining quota after the first request
    pub remaining_before: u32,
    /// Remaining quota after the revalidation request
    pub remaining_after: u32,
}

impl ConditionalReport {
    /// Whether the revalidation left the quota untouched
    pub fn quota_preserved(&self) -> bool {
        self.remaining_before == self.remaining_after
    }
}

/// One-line summary of a quota
pub(crate) fn describe(status: &RateLimitStatus) -> String {
    format!(
        "{}/{} remaining, resets {}",
        status.remaining,
        status.limit,
        status.reset_at.to_rfc3339()
    )
}
