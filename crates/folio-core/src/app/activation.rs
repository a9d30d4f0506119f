//! Activation - 自動 fetch のトリガー
//!
//! - 読み書きコレクション: identity が現れた（変わった）ときに 1 回 fetch
//! - 読み取り専用コレクション: activate 時に 1 回 fetch
//!
//! ポーリングはしません。

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::collection::ResourceCollection;
use super::published::PublishedCollection;
use crate::domain::{ResourceKind, UserId};
use crate::ports::Identity;

/// Auto-fetch handle.
/// - `shutdown_tx` を drop すると identity の監視が止まる
/// - `shutdown()` で監視タスクの終了を待てる
pub struct Activation {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl Activation {
    fn spawn<F>(task: impl FnOnce(watch::Receiver<bool>) -> F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(task(shutdown_rx));
        Self { shutdown_tx, join }
    }

    /// Stop watching for identity changes.
    /// A fetch that is already running still completes and is applied.
    pub fn request_shutdown(&self) {
        // receivers may already be gone
        let _ = self.shutdown_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stop and wait for the trigger task.
    pub async fn shutdown(self) {
        self.request_shutdown();
        if let Err(err) = self.join.await {
            tracing::warn!(error = %err, "activation task ended abnormally");
        }
    }
}

impl<K: ResourceKind> ResourceCollection<K> {
    /// Fetch whenever a (different) identity becomes available.
    ///
    /// Signing out leaves the list as it is; signing in again fetches.
    pub fn activate(self: &Arc<Self>) -> Activation {
        let collection = Arc::clone(self);
        let mut identity_rx = self.identity().watch();

        Activation::spawn(move |mut shutdown_rx| async move {
            let mut fetched_for: Option<UserId> = None;
            loop {
                if *shutdown_rx.borrow() {
                    break;
                }

                let current = identity_rx
                    .borrow_and_update()
                    .as_ref()
                    .map(|identity: &Identity| identity.id.clone());
                match current {
                    Some(id) if fetched_for.as_ref() != Some(&id) => {
                        fetched_for = Some(id);
                        // not raced against shutdown: an in-flight fetch always lands
                        collection.fetch_all().await;
                        continue;
                    }
                    Some(_) => {}
                    None => fetched_for = None,
                }

                tokio::select! {
                    changed = identity_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
        })
    }
}

impl<K: ResourceKind> PublishedCollection<K> {
    /// Fetch once.
    pub fn activate(self: &Arc<Self>) -> Activation {
        let collection = Arc::clone(self);
        Activation::spawn(move |_shutdown_rx| async move {
            collection.refetch().await;
        })
    }
}
