//! Search client

use super::query::SearchQuery;
use super::types::SearchResults;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::MERCY_PREVIEW;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

const SEARCH_REPOSITORIES: &str = "/search/repositories";

/// Runs repository searches through an [`HttpClient`]
#[derive(Debug)]
pub struct SearchClient<'a> {
    client: &'a HttpClient,
}

/// Error body GitHub sends with 422 responses
#[derive(Debug, Deserialize)]
struct ValidationError {
    message: String,
    #[serde(default)]
    errors: Vec<ValidationDetail>,
}

#[derive(Debug, Deserialize)]
struct ValidationDetail {
    #[serde(default)]
    message: Option<String>,
}

impl<'a> SearchClient<'a> {
    /// Create a search client
    pub fn new(client: &'a HttpClient) -> Self {
        Self { client }
    }

    /// Search repositories.
    ///
    /// Requests the mercy-preview media type so results include topics.
    pub async fn search_repositories(&self, query: &SearchQuery) -> Result<SearchResults> {
        if query.is_empty() {
            return Err(Error::search("query has no terms or qualifiers"));
        }

        let mut request = RequestConfig::new().accept(MERCY_PREVIEW);
        for (key, value) in query.to_params() {
            request = request.query(key, value);
        }

        let response = self
            .client
            .get_with_config(SEARCH_REPOSITORIES, request)
            .await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNPROCESSABLE_ENTITY => {
                let detail = response
                    .json::<ValidationError>()
                    .map(|body| describe(&body))
                    .unwrap_or_else(|_| response.text());
                warn!(query = %query, "Search rejected: {detail}");
                return Err(Error::search(detail));
            }
            _ => {
                return Err(Error::unexpected_status(
                    response.url(),
                    response.status_code(),
                ))
            }
        }

        let results: SearchResults = response.json()?;
        debug!(
            query = %query,
            total = results.total_count,
            returned = results.items.len(),
            "Search complete"
        );
        Ok(results)
    }
}

fn describe(body: &ValidationError) -> String {
    let details: Vec<&str> = body
        .errors
        .iter()
        .filter_map(|e| e.message.as_deref())
        .collect();
    if details.is_empty() {
        body.message.clone()
    } else {
        format!("{}: {}", body.message, details.join("; "))
    }
}
