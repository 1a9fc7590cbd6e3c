//! Offset/limit page request primitives for catalog listings.
//!
//! The storefront catalog is read one bounded slice at a time: each request
//! names an `offset` into the remote collection and a `limit` on how many
//! items the server may return. This crate owns that request shape, the
//! validation applied to limits, and the short-page heuristic used to decide
//! whether another page is worth requesting.
//!
//! # Example
//!
//! ```
//! use pagination::{PageLimit, PageRequest, infer_has_more};
//!
//! let limit = PageLimit::new(20).expect("valid limit");
//! let first = PageRequest::first(limit);
//! assert_eq!(first.offset(), 0);
//!
//! // A full page suggests more data; a short page ends the listing.
//! assert!(infer_has_more(20, limit));
//! assert!(!infer_has_more(17, limit));
//!
//! let next = PageRequest::after(20, limit);
//! assert_eq!(next.offset(), 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest page size a client may request in one call.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Errors raised when constructing page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// A page must ask for at least one item.
    #[error("page limit must be positive")]
    ZeroLimit,
    /// The limit exceeds [`MAX_PAGE_LIMIT`].
    #[error("page limit {limit} exceeds the maximum of {max}")]
    LimitTooLarge {
        /// Requested limit.
        limit: u32,
        /// Maximum accepted limit.
        max: u32,
    },
}

/// Validated page size in `1..=MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageLimit(u32);

impl PageLimit {
    /// Validate a raw page size.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError::ZeroLimit`] for `0` and
    /// [`PageRequestError::LimitTooLarge`] above [`MAX_PAGE_LIMIT`].
    pub const fn new(limit: u32) -> Result<Self, PageRequestError> {
        if limit == 0 {
            return Err(PageRequestError::ZeroLimit);
        }
        if limit > MAX_PAGE_LIMIT {
            return Err(PageRequestError::LimitTooLarge {
                limit,
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(Self(limit))
    }

    /// Raw page size.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PageLimit {
    type Error = PageRequestError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageLimit> for u32 {
    fn from(value: PageLimit) -> Self {
        value.0
    }
}

impl fmt::Display for PageLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One bounded slice of a remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    offset: u32,
    limit: PageLimit,
}

impl PageRequest {
    /// Build a request starting at `offset`.
    #[must_use]
    pub const fn new(offset: u32, limit: PageLimit) -> Self {
        Self { offset, limit }
    }

    /// Request the first page of a listing.
    #[must_use]
    pub const fn first(limit: PageLimit) -> Self {
        Self::new(0, limit)
    }

    /// Request the page that follows `loaded` already-accumulated items.
    ///
    /// Offsets saturate at `u32::MAX`; a listing that large is never
    /// rendered by a client.
    #[must_use]
    pub fn after(loaded: usize, limit: PageLimit) -> Self {
        let offset = u32::try_from(loaded).unwrap_or(u32::MAX);
        Self::new(offset, limit)
    }

    /// Zero-based index of the first requested item.
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Maximum number of items requested.
    #[must_use]
    pub const fn limit(&self) -> PageLimit {
        self.limit
    }

    /// Query-string pairs understood by the catalog endpoint.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("offset", self.offset.to_string()),
            ("limit", self.limit.get().to_string()),
        ]
    }
}

impl fmt::Display for PageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset={} limit={}", self.offset, self.limit)
    }
}

/// Infer whether a listing continues past a page of `received` items.
///
/// The catalog endpoint does not report a total, so a page that comes back
/// shorter than requested is taken as the end of the data. A page that is
/// exactly full is indistinguishable from "more data exists" and reports
/// `true`; the follow-up request then returns an empty page.
#[must_use]
pub fn infer_has_more(received: usize, requested: PageLimit) -> bool {
    usize::try_from(requested.get()).is_ok_and(|limit| received >= limit)
}
