//! Reqwest-backed request executor.
//!
//! This adapter owns transport details only: URL construction, bearer
//! headers, timeouts and status mapping. The JSON payload is returned as-is
//! for the domain's envelope decoder, whatever the status code.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use tracing::debug;

use crate::domain::ports::RequestExecutor;
use crate::domain::{OperationError, RawPayload, RequestDescriptor, RequestMethod, ServiceResult};

/// Executor that sends every request relative to one API base URL.
#[derive(Debug, Clone)]
pub struct HttpRequestExecutor {
    client: Client,
    base_url: Url,
}

impl HttpRequestExecutor {
    /// Build an executor using a reqwest client with an explicit request timeout.
    ///
    /// A base URL without a trailing slash is treated as a directory, so
    /// `https://host/api` and `https://host/api/` behave the same.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: as_directory(base_url),
        })
    }

    /// Base URL every request path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint_for(&self, request: &RequestDescriptor) -> ServiceResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                OperationError::transport(format!("base url {} cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(request.segments());
        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query()
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }
        Ok(url)
    }
}

#[async_trait]
impl RequestExecutor for HttpRequestExecutor {
    async fn execute(&self, request: RequestDescriptor) -> ServiceResult<RawPayload> {
        let url = self.endpoint_for(&request)?;
        let mut builder = self
            .client
            .request(http_method(request.method()), url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = request.bearer_token() {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(body) = request.body() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!(%request, status = status.as_u16(), bytes = body.len(), "response received");
        parse_payload(status, body.as_ref())
    }
}

fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn http_method(method: RequestMethod) -> Method {
    match method {
        RequestMethod::Get => Method::GET,
        RequestMethod::Post => Method::POST,
        RequestMethod::Delete => Method::DELETE,
    }
}

fn parse_payload(status: StatusCode, body: &[u8]) -> ServiceResult<RawPayload> {
    match serde_json::from_slice::<RawPayload>(body) {
        Ok(payload) => Ok(payload),
        Err(error) if status.is_success() => Err(OperationError::decoding(format!(
            "response body is not JSON: {error}"
        ))),
        Err(_) => Err(map_status_error(status, body)),
    }
}

fn map_transport_error(error: reqwest::Error) -> OperationError {
    if error.is_timeout() {
        OperationError::transport(format!("request timed out: {error}"))
    } else {
        OperationError::transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> OperationError {
    let body_preview = body_preview(body);
    if body_preview.is_empty() {
        OperationError::transport(format!("status {}", status.as_u16()))
    } else {
        OperationError::transport(format!("status {}: {}", status.as_u16(), body_preview))
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
