//! Outbound adapters implementing domain ports.
//!
//! - **http**: reqwest-backed [`RequestExecutor`] talking to the storefront API
//! - **fixture**: in-memory storefront used for demos and tests
//!
//! Adapters translate requests and payloads only; envelope decoding and
//! session handling stay in the domain.
//!
//! [`RequestExecutor`]: crate::domain::ports::RequestExecutor

pub mod fixture;
pub mod http;
