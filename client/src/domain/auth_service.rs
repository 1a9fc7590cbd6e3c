//! Authentication service over the shared request pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::ports::{AuthService, RequestExecutor};
use super::service_gateway::{ServiceGateway, Signing};
use super::{AccessToken, LoginCredentials, Profile, RequestDescriptor, ServiceResult};

#[derive(Serialize)]
struct SignInBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInData {
    access_token: String,
}

#[derive(Deserialize)]
struct ProfileData {
    profile: Profile,
}

/// [`AuthService`] backed by a request executor.
#[derive(Clone)]
pub struct ApiAuthService<E> {
    gateway: ServiceGateway<E>,
}

impl<E> ApiAuthService<E> {
    /// Create the service over `gateway`.
    pub fn new(gateway: ServiceGateway<E>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl<E> AuthService for ApiAuthService<E>
where
    E: RequestExecutor,
{
    #[instrument(skip_all)]
    async fn authenticate(&self, credentials: &LoginCredentials) -> ServiceResult<AccessToken> {
        let request = RequestDescriptor::post("user/signin").with_json_body(&SignInBody {
            email: credentials.username(),
            password: credentials.password(),
        })?;
        let data: SignInData = self.gateway.call(request, Signing::Anonymous).await?;

        let token = AccessToken::new(data.access_token);
        self.gateway.session().publish(token.clone());
        info!("signed in");
        Ok(token)
    }

    #[instrument(skip_all)]
    async fn get_profile(&self) -> ServiceResult<Profile> {
        let data: ProfileData = self
            .gateway
            .call(RequestDescriptor::get("user"), Signing::Required)
            .await?;
        Ok(data.profile)
    }

    fn sign_out(&self) {
        self.gateway.session().clear();
        info!("signed out");
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
