//! Pagination types
//!
//! Result, options, page items and the cancellation signal used by the walker.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use serde::Serialize;
use tokio::sync::watch;

/// Totals of one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationResult {
    /// Sum of item counts across all visited pages
    pub items_seen: u64,
    /// Number of pages fetched, including the first
    pub pages_visited: u64,
}

/// Running totals owned by a single traversal
#[derive(Debug, Default)]
pub(crate) struct Tally {
    items_seen: u64,
    pages_visited: u64,
}

impl Tally {
    pub(crate) fn record_page(&mut self, items: usize) {
        self.pages_visited += 1;
        self.items_seen += items as u64;
    }

    pub(crate) fn pages_visited(&self) -> u64 {
        self.pages_visited
    }

    pub(crate) fn finish(self) -> PaginationResult {
        PaginationResult {
            items_seen: self.items_seen,
            pages_visited: self.pages_visited,
        }
    }
}

/// Options for a traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Abort with [`Error::PageLimitExceeded`] instead of fetching more pages
    pub max_pages: Option<u64>,
    /// Abort with [`Error::PaginationCycle`] when a `next` URL repeats
    pub detect_cycles: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_pages: Some(1000),
            detect_cycles: true,
        }
    }
}

impl WalkOptions {
    /// Options with no page cap and no cycle detection
    pub fn unbounded() -> Self {
        Self {
            max_pages: None,
            detect_cycles: false,
        }
    }

    /// Set the page cap
    #[must_use]
    pub fn max_pages(mut self, max_pages: u64) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    /// Enable or disable cycle detection
    #[must_use]
    pub fn detect_cycles(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }
}

/// One entry of a page body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    /// Identifier (`id` field)
    pub id: JsonValue,
    /// Display name (`name` field)
    pub name: String,
    /// The full record
    #[serde(skip)]
    pub raw: JsonValue,
}

impl Item {
    /// Validate a record; `name` and `id` must be present and non-null
    pub fn from_value(url: &str, index: usize, raw: JsonValue) -> Result<Self> {
        let name = match raw.get("name") {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Null) | None => return Err(Error::malformed_item(url, index, "name")),
            Some(other) => other.to_string(),
        };
        let id = match raw.get("id") {
            Some(JsonValue::Null) | None => return Err(Error::malformed_item(url, index, "id")),
            Some(id) => id.clone(),
        };
        Ok(Self { id, name, raw })
    }
}

/// Validate a page body: a non-empty array of items with `name` and `id`
pub fn parse_page_items(url: &str, body: JsonValue) -> Result<Vec<Item>> {
    let JsonValue::Array(records) = body else {
        return Err(Error::decode(format!(
            "expected a JSON array of items from {url}"
        )));
    };

    if records.is_empty() {
        return Err(Error::EmptyPage {
            url: url.to_string(),
        });
    }

    records
        .into_iter()
        .enumerate()
        .map(|(index, raw)| Item::from_value(url, index, raw))
        .collect()
}

/// Receiving side of a cancellation request, checked before each page fetch
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Sending side of a cancellation request
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Request cancellation of every traversal holding a matching signal
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Create a connected cancellation handle and signal
pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelSignal { rx })
}
