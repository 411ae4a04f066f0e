//! Pagination walker
//!
//! Follows `rel="next"` links until a page has none, counting pages and
//! items along the way.

use super::link::{parse_link_header, LinkRelations};
use super::types::{parse_page_items, CancelSignal, Item, PaginationResult, Tally, WalkOptions};
use crate::error::{Error, Result};
use crate::http::{ApiResponse, HttpClient};
use crate::types::JsonValue;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::StatusCode;
use std::collections::HashSet;
use tracing::{debug, info};
use url::Url;

/// Source of pages for the walker
///
/// Implemented by [`HttpClient`]; credentials and the Accept header come
/// from the client configuration.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch a single page
    async fn fetch_page(&self, url: &str) -> Result<ApiResponse>;
}

#[async_trait]
impl PageSource for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<ApiResponse> {
        self.get(url).await
    }
}

/// Walks every page of a link-header paginated collection
pub struct PaginationWalker<'a, S: PageSource + ?Sized> {
    source: &'a S,
    options: WalkOptions,
    cancel: Option<CancelSignal>,
}

impl<'a, S: PageSource + ?Sized> PaginationWalker<'a, S> {
    /// Create a walker with default options
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            options: WalkOptions::default(),
            cancel: None,
        }
    }

    /// Set traversal options
    #[must_use]
    pub fn with_options(mut self, options: WalkOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a cancellation signal
    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Traverse all pages starting at `start_url` and return the totals.
    ///
    /// Any failure aborts the traversal; counts gathered so far are dropped.
    pub async fn walk(&self, start_url: &str) -> Result<PaginationResult> {
        let (result, _) = self.traverse(start_url, false).await?;
        Ok(result)
    }

    /// Like [`walk`](Self::walk) but also returns every item seen
    pub async fn walk_collect(&self, start_url: &str) -> Result<(PaginationResult, Vec<Item>)> {
        self.traverse(start_url, true).await
    }

    /// Traverse several start URLs concurrently.
    ///
    /// Each traversal keeps its own totals and fails on its own; outcomes
    /// come back in start-URL order. An attached cancellation signal stops
    /// all of them.
    pub async fn walk_many<U: AsRef<str>>(&self, start_urls: &[U]) -> Vec<Result<PaginationResult>> {
        join_all(start_urls.iter().map(|url| self.walk(url.as_ref()))).await
    }

    /// Like [`walk_many`](Self::walk_many) but also returns every item seen
    pub async fn walk_collect_many<U: AsRef<str>>(
        &self,
        start_urls: &[U],
    ) -> Vec<Result<(PaginationResult, Vec<Item>)>> {
        join_all(start_urls.iter().map(|url| self.walk_collect(url.as_ref()))).await
    }

    /// Fetch one page and return its Link relations.
    ///
    /// A page without a Link header has no relations.
    pub async fn relations(&self, url: &str) -> Result<LinkRelations> {
        let response = self.source.fetch_page(url).await?;
        require_ok(url, &response)?;
        match response.link()? {
            Some(header) => parse_link_header(&header),
            None => Ok(LinkRelations::new()),
        }
    }

    async fn traverse(&self, start_url: &str, keep_items: bool) -> Result<(PaginationResult, Vec<Item>)> {
        let mut tally = Tally::default();
        let mut visited = HashSet::new();
        let mut collected = Vec::new();
        let mut current = start_url.to_string();

        loop {
            self.check_cancelled()?;
            if let Some(max_pages) = self.options.max_pages {
                if tally.pages_visited() >= max_pages {
                    return Err(Error::PageLimitExceeded { max_pages });
                }
            }

            let response = self.source.fetch_page(&current).await?;
            require_ok(&current, &response)?;

            let body: JsonValue = response.json()?;
            let items = parse_page_items(&current, body)?;
            tally.record_page(items.len());
            debug!(
                url = %current,
                page = tally.pages_visited(),
                items = items.len(),
                "Visited page"
            );
            if keep_items {
                collected.extend(items);
            }

            let base = response.url().to_string();
            if self.options.detect_cycles {
                visited.insert(base.clone());
            }

            // No Link header at all means a single (or final) page.
            let Some(header) = response.link()? else {
                break;
            };
            let relations = parse_link_header(&header)?;
            let Some(next) = relations.next() else {
                break;
            };

            let next = resolve_url(&base, next);
            if self.options.detect_cycles && visited.contains(&next) {
                return Err(Error::PaginationCycle { url: next });
            }
            current = next;
        }

        let result = tally.finish();
        info!(
            start = %start_url,
            pages = result.pages_visited,
            items = result.items_seen,
            "Pagination complete"
        );
        Ok((result, collected))
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(signal) if signal.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

fn require_ok(url: &str, response: &ApiResponse) -> Result<()> {
    if response.status() == StatusCode::OK {
        Ok(())
    } else {
        Err(Error::unexpected_status(url, response.status_code()))
    }
}

/// Resolve a link target against the URL of the page it came from
fn resolve_url(base: &str, target: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(target))
        .map_or_else(|_| target.to_string(), String::from)
}
