//! In-memory storefront.
//!
//! [`FixtureStorefront`] answers the same routes and envelopes as the real
//! API from seeded data, so the services, the catalog feed and the binary can
//! run without a network. Failures can be queued to exercise retry paths.

mod storefront;

pub use storefront::{FixtureAccount, FixtureStorefront, demo_catalog};
