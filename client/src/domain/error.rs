//! Error taxonomy shared by every asynchronous service operation.
//!
//! Service calls resolve to [`ServiceResult`]. Failures are split three ways
//! so presentation code can tell a rejected form apart from a dropped
//! connection:
//!
//! - [`ErrorKind::Transport`]: the round trip did not complete.
//! - [`ErrorKind::Decoding`]: a payload arrived but had an unexpected shape.
//! - [`ErrorKind::Domain`]: the server understood the request and rejected
//!   it, optionally naming the offending inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used when a call needing a session token is made while signed out.
pub const UNAUTHENTICATED_MESSAGE: &str = "unauthenticated";

const AUTHORIZATION_FAILURE_CODES: [&str; 3] = ["unauthorized", "token_expired", "invalid_token"];
const AUTHORIZATION_FAILURE_MESSAGES: [&str; 3] = ["unauthorized", "token expired", "invalid token"];

/// Result type returned by every service operation.
pub type ServiceResult<T> = Result<T, OperationError>;

/// Failure category of an [`OperationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connectivity, timeout or any other failure to complete the round trip.
    Transport,
    /// The payload did not match any expected shape.
    Decoding,
    /// The remote side rejected a well-formed request.
    Domain,
}

/// A validation message attached to one named input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldError {
    /// Identifier of the offending input.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl FieldError {
    /// Convenience constructor.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure envelope body: `{ "message": .., "fields": [..] | null }`.
///
/// `code` is an optional machine-readable tag some endpoints add so clients
/// can recognise expired credentials without matching on prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorResponse {
    /// Human-readable failure message.
    pub message: String,
    /// Per-field validation errors, if any.
    #[serde(default)]
    pub fields: Option<Vec<FieldError>>,
    /// Optional machine-readable failure code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Failure body carrying only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: None,
            code: None,
        }
    }

    /// Attach per-field validation errors.
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<FieldError>) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Attach a machine-readable failure code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Failure outcome of a service operation.
///
/// ## Invariants
/// - `field_errors` is empty unless `kind` is [`ErrorKind::Domain`].
/// - `code` is only set for [`ErrorKind::Domain`].
///
/// # Examples
/// ```
/// use storefront_client::domain::{ErrorKind, ErrorResponse, FieldError, OperationError};
///
/// let err = OperationError::domain(
///     ErrorResponse::message("bad order")
///         .with_fields(vec![FieldError::new("house", "required")]),
/// );
/// assert_eq!(err.kind(), ErrorKind::Domain);
/// assert_eq!(err.field_errors().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct OperationError {
    kind: ErrorKind,
    message: String,
    code: Option<String>,
    field_errors: Vec<FieldError>,
}

impl OperationError {
    /// The round trip failed before a payload was received.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::bare(ErrorKind::Transport, message)
    }

    /// A payload was received but matched no expected shape.
    pub fn decoding(message: impl Into<String>) -> Self {
        Self::bare(ErrorKind::Decoding, message)
    }

    /// Wrap a decoded failure envelope.
    pub fn domain(response: ErrorResponse) -> Self {
        let ErrorResponse {
            message,
            fields,
            code,
        } = response;
        Self {
            kind: ErrorKind::Domain,
            message,
            code,
            field_errors: fields.unwrap_or_default(),
        }
    }

    /// Local short-circuit for calls that need a token while signed out.
    pub fn unauthenticated() -> Self {
        Self::bare(ErrorKind::Domain, UNAUTHENTICATED_MESSAGE)
    }

    fn bare(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            code: None,
            field_errors: Vec::new(),
        }
    }

    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Machine-readable code from the failure envelope, if any.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Per-field validation errors, in server order.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Whether the server reported expired or invalid credentials.
    ///
    /// Matching is on the envelope code first, then on the message. The
    /// local [`OperationError::unauthenticated`] short-circuit never matches.
    pub fn is_authorization_failure(&self) -> bool {
        if self.kind != ErrorKind::Domain {
            return false;
        }
        if let Some(code) = self.code.as_deref() {
            let code = code.to_ascii_lowercase();
            if AUTHORIZATION_FAILURE_CODES.contains(&code.as_str()) {
                return true;
            }
        }
        let message = self.message.trim().to_ascii_lowercase();
        AUTHORIZATION_FAILURE_MESSAGES.contains(&message.as_str())
    }

    /// Decide how presentation code should surface this failure.
    pub fn presentation(&self) -> ErrorPresentation {
        if self.kind == ErrorKind::Domain && !self.field_errors.is_empty() {
            ErrorPresentation::Fields(self.field_errors.clone())
        } else {
            ErrorPresentation::Notice(self.message.clone())
        }
    }
}

/// Where a failure should be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPresentation {
    /// Attach messages to specific form inputs.
    Fields(Vec<FieldError>),
    /// Show a generic notification.
    Notice(String),
}
