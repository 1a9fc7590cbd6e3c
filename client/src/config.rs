//! Client configuration loaded via OrthoConfig.
//!
//! Values merge from CLI flags, `STOREFRONT_*` environment variables and
//! configuration files. Every field is optional; accessors apply defaults and
//! validate.

use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::{PageLimit, PageRequestError};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::paginated_list::{DEFAULT_FIRST_PAGE_LIMIT, DEFAULT_NEXT_PAGE_LIMIT};
use crate::domain::{LoginCredentials, LoginValidationError, PageSizes};

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while validating loaded settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// `base_url` is not an absolute URL.
    #[error("invalid base url {value:?}: {source}")]
    InvalidBaseUrl {
        /// Configured value.
        value: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// A page size is out of range.
    #[error("invalid {field}: {source}")]
    InvalidPageLimit {
        /// Setting name.
        field: &'static str,
        /// Validation error.
        #[source]
        source: PageRequestError,
    },
    /// `request_timeout_secs` was zero.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    /// Start-up credentials were supplied but blank.
    #[error("invalid start-up credentials: {0}")]
    InvalidCredentials(#[from] LoginValidationError),
}

/// Settings for the storefront client binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "STOREFRONT")]
pub struct ClientSettings {
    /// API root every request path is resolved against.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Size of the first catalog page.
    pub first_page_limit: Option<u32>,
    /// Size of every following catalog page.
    pub next_page_limit: Option<u32>,
    /// Serve requests from the in-memory storefront instead of HTTP.
    #[ortho_config(default = false)]
    pub fixture: bool,
    /// Email to sign in with on start-up.
    pub username: Option<String>,
    /// Password to sign in with on start-up.
    pub password: Option<String>,
}

impl ClientSettings {
    /// Parsed API root.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBaseUrl`] when the value does not parse.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(raw).map_err(|source| SettingsError::InvalidBaseUrl {
            value: raw.to_owned(),
            source,
        })
    }

    /// Per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroTimeout`] for a zero timeout.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// First and follow-up catalog page sizes.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidPageLimit`] naming the offending
    /// setting.
    pub fn page_sizes(&self) -> Result<PageSizes, SettingsError> {
        let first = page_limit(
            "first_page_limit",
            self.first_page_limit.unwrap_or(DEFAULT_FIRST_PAGE_LIMIT),
        )?;
        let next = page_limit(
            "next_page_limit",
            self.next_page_limit.unwrap_or(DEFAULT_NEXT_PAGE_LIMIT),
        )?;
        Ok(PageSizes::new(first, next))
    }

    /// Credentials for a start-up sign-in, if both parts are configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidCredentials`] when a configured part
    /// is blank.
    pub fn credentials(&self) -> Result<Option<LoginCredentials>, SettingsError> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => {
                Ok(Some(LoginCredentials::try_from_parts(username, password)?))
            }
            _ => Ok(None),
        }
    }
}

fn page_limit(field: &'static str, value: u32) -> Result<PageLimit, SettingsError> {
    PageLimit::new(value).map_err(|source| SettingsError::InvalidPageLimit { field, source })
}
