//! Driving port for sign-in, profile and sign-out use-cases.

use async_trait::async_trait;

use crate::domain::{AccessToken, LoginCredentials, Profile, ServiceResult};

/// Authentication façade used by the sign-in and profile screens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for an access token.
    ///
    /// On success the token is published to the session store before this
    /// future resolves.
    async fn authenticate(&self, credentials: &LoginCredentials) -> ServiceResult<AccessToken>;

    /// Fetch the signed-in user's profile.
    async fn get_profile(&self) -> ServiceResult<Profile>;

    /// Forget the current session locally.
    fn sign_out(&self);
}
