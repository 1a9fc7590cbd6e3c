//! HTTP outbound adapter.
//!
//! This module provides a thin reqwest implementation of the
//! `RequestExecutor` port.

mod executor;

pub use executor::HttpRequestExecutor;
