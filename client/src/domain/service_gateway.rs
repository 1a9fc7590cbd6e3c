//! Shared request pipeline behind every service façade.
//!
//! A call goes through four steps:
//!
//! 1. short-circuit with [`OperationError::unauthenticated`] when the call
//!    needs a token and the session has none;
//! 2. sign the descriptor with the current token;
//! 3. hand it to the [`RequestExecutor`];
//! 4. decode the envelope into the caller's type.
//!
//! When the server answers a signed call with an authorization failure the
//! token that signed it is revoked, which signs the user out.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::ports::RequestExecutor;
use super::{OperationError, RequestDescriptor, ServiceResult, SessionStore, decode_response};

/// Whether and how a call is signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signing {
    /// Never attach a token.
    Anonymous,
    /// Attach the token when signed in.
    IfPresent,
    /// Fail locally unless signed in.
    Required,
}

/// Executor and session store shared by the service façades.
pub struct ServiceGateway<E> {
    executor: Arc<E>,
    session: SessionStore,
}

impl<E> Clone for ServiceGateway<E> {
    fn clone(&self) -> Self {
        Self {
            executor: Arc::clone(&self.executor),
            session: self.session.clone(),
        }
    }
}

impl<E> ServiceGateway<E> {
    /// Build a gateway over `executor` signing with tokens from `session`.
    pub fn new(executor: Arc<E>, session: SessionStore) -> Self {
        Self { executor, session }
    }

    /// Session store used for signing.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}

impl<E> ServiceGateway<E>
where
    E: RequestExecutor,
{
    /// Sign, execute and decode `request`.
    ///
    /// # Errors
    ///
    /// Returns the executor's transport error, a decoding error for foreign
    /// payloads, a domain error for failure envelopes, or the local
    /// `unauthenticated` error for [`Signing::Required`] calls made while
    /// signed out.
    pub async fn call<T>(&self, request: RequestDescriptor, signing: Signing) -> ServiceResult<T>
    where
        T: DeserializeOwned,
    {
        let token = match signing {
            Signing::Anonymous => None,
            Signing::IfPresent => self.session.current_token(),
            Signing::Required => Some(
                self.session
                    .current_token()
                    .ok_or_else(OperationError::unauthenticated)?,
            ),
        };

        let request = request.signed_with(token.clone());
        debug!(%request, signed = token.is_some(), "issuing request");
        let payload = self.executor.execute(request).await?;
        let result = decode_response::<T>(payload);

        if let Err(err) = &result {
            debug!(kind = ?err.kind(), message = err.message(), "request failed");
            if err.is_authorization_failure() {
                match token.as_ref() {
                    Some(token) => {
                        self.session.revoke(token);
                    }
                    None => warn!("authorization failure on an unsigned request"),
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "service_gateway_tests.rs"]
mod tests;
