//! Storefront client core.
//!
//! Typed service calls over a pluggable request executor, a shared session
//! store, a paginated catalog feed and keyed list diffing for rendering.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
