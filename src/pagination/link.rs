//! Link header parsing (RFC 5988)
//!
//! Format: `<https://api.github.com/...?page=2>; rel="next", <...>; rel="last"`
//!
//! Each entry is tokenized into a target URL and its parameters instead of
//! being pattern-matched, so a malformed entry surfaces as
//! [`Error::MalformedLinkEntry`] rather than as a missing match.

use crate::error::{Error, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Relation for the following page
pub const REL_NEXT: &str = "next";
/// Relation for the preceding page
pub const REL_PREV: &str = "prev";
/// Relation for the first page
pub const REL_FIRST: &str = "first";
/// Relation for the last page
pub const REL_LAST: &str = "last";

/// A single `<url>; rel="name"` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    /// Target URL, trimmed
    pub url: String,
    /// Relation name, trimmed
    pub rel: String,
}

impl LinkEntry {
    /// Tokenize one comma-separated entry of a Link header
    pub fn parse(raw: &str) -> Result<Self> {
        let entry = raw.trim();

        let rest = entry
            .strip_prefix('<')
            .ok_or_else(|| Error::malformed_entry(entry))?;
        let close = rest.find('>').ok_or_else(|| Error::malformed_entry(entry))?;
        let url = rest[..close].trim();
        if url.is_empty() {
            return Err(Error::malformed_entry(entry));
        }

        let rel = split_outside(&rest[close + 1..], ';')
            .into_iter()
            .filter_map(|param| param.split_once('='))
            .find(|(key, _)| key.trim().eq_ignore_ascii_case("rel"))
            .and_then(|(_, value)| unquote(value.trim()))
            .map(str::trim)
            .filter(|rel| !rel.is_empty())
            .ok_or_else(|| Error::malformed_entry(entry))?;

        Ok(Self {
            url: url.to_string(),
            rel: rel.to_string(),
        })
    }
}

/// Strip surrounding double quotes; unquoted tokens are accepted as-is.
/// Returns `None` for an unterminated or stray quote.
fn unquote(value: &str) -> Option<&str> {
    match value.strip_prefix('"') {
        Some(inner) => inner.strip_suffix('"').filter(|v| !v.contains('"')),
        None if value.contains('"') => None,
        None => Some(value),
    }
}

/// Split on `sep` where it is not inside `<...>` or a quoted string.
fn split_outside(value: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quoted = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in value.char_indices() {
        if quoted {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' if depth == 0 => quoted = true,
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&value[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

/// Relation name to URL mapping parsed from a Link header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LinkRelations {
    links: BTreeMap<String, String>,
}

impl LinkRelations {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a relation; an existing relation of the same name is replaced
    pub fn insert(&mut self, rel: impl Into<String>, url: impl Into<String>) {
        self.links.insert(rel.into(), url.into());
    }

    /// URL for a relation
    pub fn get(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    /// Whether a relation is present
    pub fn contains(&self, rel: &str) -> bool {
        self.links.contains_key(rel)
    }

    /// URL of the next page
    pub fn next(&self) -> Option<&str> {
        self.get(REL_NEXT)
    }

    /// URL of the previous page
    pub fn prev(&self) -> Option<&str> {
        self.get(REL_PREV)
    }

    /// URL of the first page
    pub fn first(&self) -> Option<&str> {
        self.get(REL_FIRST)
    }

    /// URL of the last page
    pub fn last(&self) -> Option<&str> {
        self.get(REL_LAST)
    }

    /// Number of relations
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether no relations are present
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterate over `(rel, url)` pairs in relation-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.links.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Page number of the `last` relation, read from its `page` query parameter
    pub fn last_page_number(&self) -> Option<u32> {
        let last = url::Url::parse(self.last()?).ok()?;
        last.query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
    }
}

/// Parse a Link header value into its relations.
///
/// Fails with [`Error::EmptyHeader`] on zero-length input and with
/// [`Error::MalformedLinkEntry`] if any entry lacks a `<url>` or `rel`.
/// A relation name that appears twice keeps the later URL.
pub fn parse_link_header(value: &str) -> Result<LinkRelations> {
    if value.is_empty() {
        return Err(Error::EmptyHeader);
    }

    let mut relations = LinkRelations::new();
    for raw in split_outside(value, ',') {
        let entry = LinkEntry::parse(raw)?;
        relations.insert(entry.rel, entry.url);
    }
    Ok(relations)
}
