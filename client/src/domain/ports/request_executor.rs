//! Port for the transport that turns request descriptors into raw payloads.
//!
//! Adapters own connectivity and timeouts. They report round-trip failures as
//! [`ErrorKind::Transport`](crate::domain::ErrorKind::Transport) and otherwise
//! return the JSON body untouched; envelope decoding happens in the domain.

use async_trait::async_trait;

use crate::domain::{RawPayload, RequestDescriptor, ServiceResult};

/// Executes one request and yields its raw JSON payload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Perform the round trip for `request`.
    async fn execute(&self, request: RequestDescriptor) -> ServiceResult<RawPayload>;
}
