//! IdentityProvider port - 操作主体の供給
//!
//! 認証そのものは扱いません。「いま誰として操作しているか（または匿名か）」
//! だけを外部から受け取ります。

use tokio::sync::watch;

use crate::domain::UserId;

/// The acting identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// IdentityProvider は現在の identity を返し、変化を通知する
pub trait IdentityProvider: Send + Sync {
    /// `None` means nobody is signed in.
    fn current(&self) -> Option<Identity>;

    /// Receiver that observes sign-in / sign-out.
    fn watch(&self) -> watch::Receiver<Option<Identity>>;
}
