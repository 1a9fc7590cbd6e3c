//! Returns the user to the sign-in screen when the session ends.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::SessionStore;
use crate::domain::ports::Navigator;

/// Watch `session` and call [`Navigator::show_sign_in`] whenever a present
/// token is dropped, whether by sign-out or by an authorization failure.
///
/// The store only notifies when a token is published or actually removed, so
/// a change that leaves the session empty always means a session ended.
/// Changes the task has not observed yet are coalesced. The task ends when
/// every [`SessionStore`] clone is dropped.
pub fn spawn_session_guard<V>(session: &SessionStore, navigator: Arc<V>) -> JoinHandle<()>
where
    V: Navigator + ?Sized + 'static,
{
    let mut watcher = session.subscribe();
    tokio::spawn(async move {
        while watcher.changed().await.is_ok() {
            let signed_out = watcher.borrow_and_update().is_none();
            if signed_out {
                navigator.show_sign_in();
            }
        }
        debug!("session guard stopped");
    })
}
