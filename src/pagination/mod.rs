//! Pagination module
//!
//! Link header (RFC 5988) parsing and the walker that follows `next`
//! relations through a paginated collection.
//!
//! # Overview
//!
//! [`parse_link_header`] turns a raw `Link` header into [`LinkRelations`].
//! [`PaginationWalker`] fetches a page through a [`PageSource`], validates
//! its items, and keeps following `next` until a page has none, returning a
//! [`PaginationResult`] with the page and item counts.

mod link;
mod types;
mod walker;

pub use link::{
    parse_link_header, LinkEntry, LinkRelations, REL_FIRST, REL_LAST, REL_NEXT, REL_PREV,
};
pub use types::{
    cancel_pair, parse_page_items, CancelHandle, CancelSignal, Item, PaginationResult,
    WalkOptions,
};
pub use walker::{PageSource, PaginationWalker};
