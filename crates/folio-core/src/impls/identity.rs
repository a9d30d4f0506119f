//! IdentityProvider の実装
//!
//! - `StaticIdentity`: 固定の identity（または匿名）。変化しない
//! - `SessionIdentity`: サインイン / サインアウトを `watch` で購読者に通知

use tokio::sync::watch;

use crate::ports::{Identity, IdentityProvider};

/// An identity that never changes.
pub struct StaticIdentity {
    identity: Option<Identity>,
    // keeps `watch()` receivers from observing a closed channel
    tx: watch::Sender<Option<Identity>>,
}

impl StaticIdentity {
    pub fn new(identity: Option<Identity>) -> Self {
        let (tx, _rx) = watch::channel(identity.clone());
        Self { identity, tx }
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current(&self) -> Option<Identity> {
        self.identity.clone()
    }

    fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}

/// IdentityProvider backed by a `watch` channel.
pub struct SessionIdentity {
    tx: watch::Sender<Option<Identity>>,
}

impl SessionIdentity {
    pub fn anonymous() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn signed_in(identity: Identity) -> Self {
        let (tx, _rx) = watch::channel(Some(identity));
        Self { tx }
    }

    /// Replace the current identity. Signing in as the same identity again
    /// does not notify watchers.
    pub fn sign_in(&self, identity: Identity) {
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(&identity) {
                return false;
            }
            *current = Some(identity);
            true
        });
    }

    pub fn sign_out(&self) {
        self.tx.send_if_modified(|current| current.take().is_some());
    }
}

impl Default for SessionIdentity {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl IdentityProvider for SessionIdentity {
    fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}
