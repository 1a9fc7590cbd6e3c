//! Authentication primitives: sign-in credentials and the user profile.
//!
//! Screens hand raw strings to [`LoginCredentials::try_from_parts`] so blank
//! inputs are rejected before a request is ever built.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Error returned when sign-in form values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Login was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl LoginValidationError {
    /// Form input the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "email",
            Self::EmptyPassword => "password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use storefront_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" user ", "secret").unwrap();
/// assert_eq!(creds.username(), "user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login sent as the `email` field.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password as typed by the user.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Free-form occupation line.
    #[serde(default)]
    pub occupation: String,
    /// Avatar image reference, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Profile {
    /// Name shown in the profile header.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname).trim().to_owned()
    }
}
