//! Session store holding the current access token.
//!
//! One [`SessionStore`] is created at start-up and shared (cloned) into every
//! service that signs requests. There is no ambient global: components that
//! need the token receive the store at construction.
//!
//! The token lives in a `tokio::sync::watch` channel. Readers observe the
//! latest published value without locking against each other, and
//! [`SessionStore::subscribe`] hands out a change-notification receiver.
//! Requests already signed with a stale token are not cancelled.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Bearer token issued by a successful sign-in.
///
/// `Debug` output is redacted so tokens never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Raw token for request signing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Receiver notified whenever the session token changes.
pub type TokenWatcher = watch::Receiver<Option<AccessToken>>;

/// Shared, process-wide holder of the current access token.
///
/// Cloning is cheap and every clone observes the same token.
#[derive(Clone)]
pub struct SessionStore {
    sender: Arc<watch::Sender<Option<AccessToken>>>,
}

impl SessionStore {
    /// Create an empty (signed-out) store.
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(None);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// The token currently used to sign requests.
    pub fn current_token(&self) -> Option<AccessToken> {
        self.sender.borrow().clone()
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.sender.borrow().is_some()
    }

    /// Subscribe to token changes.
    ///
    /// The receiver starts out having seen the current value.
    pub fn subscribe(&self) -> TokenWatcher {
        self.sender.subscribe()
    }

    /// Publish a freshly issued token.
    pub(crate) fn publish(&self, token: AccessToken) {
        self.sender.send_replace(Some(token));
        info!("session token published");
    }

    /// Drop `token` if it is still the current one.
    ///
    /// Used when the server rejects a request signed with `token`; a newer
    /// token published in the meantime is left alone.
    pub(crate) fn revoke(&self, token: &AccessToken) -> bool {
        let revoked = self
            .sender
            .send_if_modified(|current| {
                if current.as_ref() == Some(token) {
                    *current = None;
                    true
                } else {
                    false
                }
            });
        if revoked {
            warn!("session token revoked after authorization failure");
        }
        revoked
    }

    /// Drop the current token, notifying subscribers if one was present.
    pub fn clear(&self) {
        let cleared = self.sender.send_if_modified(|token| token.take().is_some());
        if cleared {
            info!("session token cleared");
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Token visibility and change notification.

    use super::*;

    #[test]
    fn starts_signed_out() {
        let store = SessionStore::new();
        assert!(store.current_token().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn published_token_is_visible_to_every_clone() {
        let store = SessionStore::new();
        let reader = store.clone();
        store.publish(AccessToken::new("abc"));
        assert_eq!(
            reader.current_token().map(|token| token.expose().to_owned()),
            Some("abc".to_owned())
        );
    }

    #[tokio::test]
    async fn subscribers_are_notified_of_publish_and_clear() {
        let store = SessionStore::new();
        let mut watcher = store.subscribe();

        store.publish(AccessToken::new("abc"));
        watcher.changed().await.expect("sender alive");
        assert!(watcher.borrow_and_update().is_some());

        store.clear();
        watcher.changed().await.expect("sender alive");
        assert!(watcher.borrow_and_update().is_none());
    }

    #[test]
    fn clearing_an_empty_store_does_not_notify() {
        let store = SessionStore::new();
        let watcher = store.subscribe();
        store.clear();
        assert!(!watcher.has_changed().expect("sender alive"));
    }

    #[test]
    fn revoke_ignores_a_newer_token() {
        let store = SessionStore::new();
        let stale = AccessToken::new("old");
        store.publish(AccessToken::new("new"));
        assert!(!store.revoke(&stale));
        assert!(store.is_authenticated());

        let current = AccessToken::new("new");
        assert!(store.revoke(&current));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn debug_output_redacts_token() {
        let token = AccessToken::new("super-secret");
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
