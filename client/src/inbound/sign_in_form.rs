//! Sign-in form controller.

use std::sync::Arc;

use tracing::instrument;

use super::FormOutcome;
use crate::domain::ports::{AuthService, Notifier};
use crate::domain::{FieldError, LoginCredentials, Profile};

/// Validates the sign-in inputs, signs in and loads the profile.
pub struct SignInForm<A: ?Sized, N: ?Sized> {
    auth: Arc<A>,
    notifier: Arc<N>,
}

impl<A, N> SignInForm<A, N>
where
    A: AuthService + ?Sized,
    N: Notifier + ?Sized,
{
    /// Build the controller.
    pub fn new(auth: Arc<A>, notifier: Arc<N>) -> Self {
        Self { auth, notifier }
    }

    /// Submit the form.
    ///
    /// Blank inputs are rejected locally. On success the session already
    /// carries the new token, so the profile request is signed with it.
    #[instrument(skip_all)]
    pub async fn submit(&self, email: &str, password: &str) -> FormOutcome<Profile> {
        let credentials = match LoginCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(err) => {
                return FormOutcome::FieldErrors(vec![FieldError::new(
                    err.field(),
                    err.to_string(),
                )]);
            }
        };

        if let Err(err) = self.auth.authenticate(&credentials).await {
            return FormOutcome::from_error(&err, self.notifier.as_ref());
        }
        match self.auth.get_profile().await {
            Ok(profile) => FormOutcome::Accepted(profile),
            Err(err) => FormOutcome::from_error(&err, self.notifier.as_ref()),
        }
    }

    /// Sign out locally.
    pub fn sign_out(&self) {
        self.auth.sign_out();
    }
}
