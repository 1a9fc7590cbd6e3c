//! Transport-neutral description of one service request.
//!
//! Services build a [`RequestDescriptor`], sign it with the session token and
//! hand it to a [`RequestExecutor`](super::ports::RequestExecutor). Adapters
//! decide how the descriptor becomes bytes on a wire.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{AccessToken, OperationError};

/// HTTP-style verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    /// Read.
    Get,
    /// Create.
    Post,
    /// Remove.
    Delete,
}

impl RequestMethod {
    /// Upper-case verb.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method, relative path, query, body and optional bearer token.
///
/// The path is held as unescaped segments. Adapters encode each segment on
/// its own, so an identifier containing `/`, `?` or `#` stays one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: RequestMethod,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
    bearer_token: Option<AccessToken>,
}

impl RequestDescriptor {
    fn new(method: RequestMethod, route: &str) -> Self {
        Self {
            method,
            segments: route
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
            query: Vec::new(),
            body: None,
            bearer_token: None,
        }
    }

    /// `GET` request for a fixed `/`-separated route.
    pub fn get(route: &str) -> Self {
        Self::new(RequestMethod::Get, route)
    }

    /// `POST` request for a fixed `/`-separated route.
    pub fn post(route: &str) -> Self {
        Self::new(RequestMethod::Post, route)
    }

    /// `DELETE` request for a fixed `/`-separated route.
    pub fn delete(route: &str) -> Self {
        Self::new(RequestMethod::Delete, route)
    }

    /// Append one path segment taken verbatim, such as an identifier.
    #[must_use]
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append query pairs in order.
    #[must_use]
    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns a decoding error if `body` cannot be represented as JSON.
    pub fn with_json_body<B: Serialize>(mut self, body: &B) -> Result<Self, OperationError> {
        let value = serde_json::to_value(body)
            .map_err(|err| OperationError::decoding(format!("request body not encodable: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Sign with a bearer token.
    #[must_use]
    pub fn signed_with(mut self, token: Option<AccessToken>) -> Self {
        self.bearer_token = token;
        self
    }

    /// Verb.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Unescaped path segments relative to the API root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Segments joined with `/`, unescaped; for logs and matching.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Query pairs in insertion order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of the first query pair named `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// JSON body, if any.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Bearer token the request is signed with.
    pub fn bearer_token(&self) -> Option<&AccessToken> {
        self.bearer_token.as_ref()
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path())
    }
}

#[cfg(test)]
mod tests {
    //! Descriptor building.

    use serde_json::json;

    use super::*;

    #[test]
    fn builder_keeps_query_order_and_token() {
        let request = RequestDescriptor::get("products")
            .with_query([("offset", "20"), ("limit", "12")])
            .signed_with(Some(AccessToken::new("t-1")));
        assert_eq!(request.method(), RequestMethod::Get);
        assert_eq!(request.to_string(), "GET products");
        assert_eq!(request.query_value("limit"), Some("12"));
        assert_eq!(
            request.query().first().map(|(key, _)| key.as_str()),
            Some("offset")
        );
        assert_eq!(
            request.bearer_token().map(AccessToken::expose),
            Some("t-1")
        );
    }

    #[test]
    fn identifier_segments_are_kept_whole() {
        let request = RequestDescriptor::get("/products/").with_segment("shoe?size=42#x/b");
        assert_eq!(request.segments(), ["products", "shoe?size=42#x/b"]);
    }

    #[test]
    fn json_body_is_attached() {
        let request = RequestDescriptor::post("user/signin")
            .with_json_body(&json!({ "email": "a", "password": "b" }))
            .expect("encodable");
        assert_eq!(request.body(), Some(&json!({ "email": "a", "password": "b" })));
        assert!(request.bearer_token().is_none());
    }
}
