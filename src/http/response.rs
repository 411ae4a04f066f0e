//! Buffered HTTP response
//!
//! The body is read eagerly so the response can be inspected several times
//! (status checks, header checks, JSON decoding) without consuming it.

use super::rate_limit::RateLimitStatus;
use crate::error::{Error, Result};
use bytes::Bytes;
use reqwest::header::{HeaderMap, ETAG, LINK};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

/// A fully-read HTTP response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    url: String,
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl ApiResponse {
    /// Create a response from its parts
    pub fn new(url: impl Into<String>, status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            url: url.into(),
            status,
            headers,
            body,
        }
    }

    /// Read a reqwest response to completion
    pub async fn from_response(response: Response) -> Result<Self> {
        let url = response.url().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        Ok(Self::new(url, status, headers, body))
    }

    /// Final URL of the request
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Response status
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response status as a number
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// `Link` header value, if the response has one.
    ///
    /// Repeated `Link` fields are joined with `", "` into a single value.
    /// A field that is not visible ASCII is an error rather than absent.
    pub fn link(&self) -> Result<Option<String>> {
        let mut values = Vec::new();
        for value in self.headers.get_all(LINK) {
            let text = value.to_str().map_err(|_| {
                Error::invalid_header(LINK.as_str(), String::from_utf8_lossy(value.as_bytes()))
            })?;
            values.push(text);
        }
        if values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(values.join(", ")))
        }
    }

    /// `ETag` header, if the response has one
    pub fn etag(&self) -> Option<&str> {
        self.headers.get(ETAG).and_then(|v| v.to_str().ok())
    }

    /// Parse the `X-RateLimit-*` headers
    pub fn rate_limit(&self) -> Result<RateLimitStatus> {
        RateLimitStatus::from_headers(&self.headers)
    }

    /// Raw body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as (lossy) text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }
}
