//! Response envelope decoding.
//!
//! Every endpoint answers with one of two JSON shapes:
//!
//! - success: `{ "data": <T> }`
//! - failure: `{ "message": string, "fields": [..] | null }`
//!
//! Both shapes reject unknown keys, so a payload can match at most one of
//! them. The success shape is tried first; on mismatch the failure shape is
//! tried; a payload matching neither becomes a [`ErrorKind::Decoding`] error.
//!
//! [`ErrorKind::Decoding`]: super::ErrorKind::Decoding

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::{ErrorResponse, OperationError, ServiceResult};

/// Raw JSON payload produced by a request executor.
pub type RawPayload = Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SuccessEnvelope<T> {
    data: T,
}

/// Outcome of decoding a raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope<T> {
    /// The payload matched `{ "data": T }`.
    Data(T),
    /// The payload matched the failure shape.
    Failure(ErrorResponse),
}

impl<T> ResponseEnvelope<T> {
    /// Collapse into a service result, turning failures into domain errors.
    pub fn into_result(self) -> ServiceResult<T> {
        match self {
            Self::Data(value) => Ok(value),
            Self::Failure(response) => Err(OperationError::domain(response)),
        }
    }
}

/// Decode a raw payload into a success value or a failure body.
///
/// # Errors
///
/// Returns a [`super::ErrorKind::Decoding`] error when the payload matches
/// neither envelope shape.
pub fn decode_envelope<T>(payload: RawPayload) -> Result<ResponseEnvelope<T>, OperationError>
where
    T: DeserializeOwned,
{
    let success_error = match SuccessEnvelope::<T>::deserialize(&payload) {
        Ok(envelope) => return Ok(ResponseEnvelope::Data(envelope.data)),
        Err(err) => err,
    };

    match ErrorResponse::deserialize(&payload) {
        Ok(failure) => Ok(ResponseEnvelope::Failure(failure)),
        Err(failure_error) => {
            debug!(%success_error, %failure_error, "payload matched no envelope shape");
            Err(OperationError::decoding(format!(
                "unexpected response payload: {success_error}"
            )))
        }
    }
}

/// Decode a raw payload straight into a service result.
///
/// # Errors
///
/// Returns a domain error for failure envelopes and a decoding error for
/// payloads matching neither shape.
pub fn decode_response<T>(payload: RawPayload) -> ServiceResult<T>
where
    T: DeserializeOwned,
{
    decode_envelope(payload)?.into_result()
}

#[cfg(test)]
mod tests {
    //! Envelope shape selection and mutual exclusivity.

    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{ErrorKind, FieldError};

    #[derive(Debug, PartialEq, Eq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Token {
        access_token: String,
    }

    #[test]
    fn success_shape_yields_data() {
        let decoded =
            decode_envelope::<Token>(json!({ "data": { "accessToken": "t-1" } })).expect("decode");
        assert_eq!(
            decoded,
            ResponseEnvelope::Data(Token {
                access_token: "t-1".to_owned()
            })
        );
    }

    #[test]
    fn failure_shape_yields_error_response() {
        let decoded = decode_envelope::<Token>(json!({
            "message": "order rejected",
            "fields": [{ "field": "house", "message": "required" }]
        }))
        .expect("decode");
        assert_eq!(
            decoded,
            ResponseEnvelope::Failure(
                ErrorResponse::message("order rejected")
                    .with_fields(vec![FieldError::new("house", "required")])
            )
        );
    }

    #[test]
    fn failure_with_null_fields_decodes() {
        let err = decode_response::<Token>(json!({
            "message": "invalid credentials",
            "fields": null
        }))
        .expect_err("failure envelope");
        assert_eq!(err.kind(), ErrorKind::Domain);
        assert_eq!(err.message(), "invalid credentials");
        assert!(err.field_errors().is_empty());
    }

    #[rstest]
    #[case::both_shapes(json!({ "data": { "accessToken": "t" }, "message": "x" }))]
    #[case::wrong_data_type(json!({ "data": { "token": 1 } }))]
    #[case::neither(json!({ "status": "ok" }))]
    #[case::not_an_object(json!([1, 2, 3]))]
    #[case::message_not_string(json!({ "message": 42 }))]
    fn ambiguous_or_foreign_payloads_are_decoding_errors(#[case] payload: RawPayload) {
        let err = decode_response::<Token>(payload).expect_err("must not decode");
        assert_eq!(err.kind(), ErrorKind::Decoding);
    }

    #[test]
    fn success_payload_never_matches_failure_shape() {
        let payload = json!({ "data": { "accessToken": "t" } });
        assert!(ErrorResponse::deserialize(&payload).is_err());
    }

    #[test]
    fn failure_payload_never_matches_success_shape() {
        let payload = json!({ "message": "nope", "fields": null });
        assert!(SuccessEnvelope::<Value>::deserialize(&payload).is_err());
    }

    #[test]
    fn unit_data_accepts_null() {
        decode_response::<serde::de::IgnoredAny>(json!({ "data": null })).expect("null data");
    }
}
