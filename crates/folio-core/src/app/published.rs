//! PublishedCollection - 公開済みレコードだけの読み取り専用ビュー
//!
//! identity に依存せず、mutation も持ちません。

use tokio::sync::watch;

use super::state::CollectionState;
use super::sync_core::SyncCore;
use crate::domain::{ErrorInfo, PublicationStatus, ResourceKind};
use crate::ports::Query;

pub struct PublishedCollection<K: ResourceKind> {
    core: SyncCore<K>,
}

impl<K: ResourceKind> PublishedCollection<K> {
    pub(crate) fn new(core: SyncCore<K>) -> Self {
        Self { core }
    }

    pub fn table(&self) -> &str {
        self.core.table()
    }

    pub fn items(&self) -> Vec<K::Record> {
        self.core.items()
    }

    pub fn is_loading(&self) -> bool {
        self.core.is_loading()
    }

    pub fn last_error(&self) -> Option<ErrorInfo> {
        self.core.last_error()
    }

    pub fn snapshot(&self) -> CollectionState<K::Record> {
        self.core.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<CollectionState<K::Record>> {
        self.core.subscribe()
    }

    /// `status = published`, latest `published_at` first.
    pub fn fetch_query(&self) -> Query {
        Query::table(self.core.table())
            .filter_eq("status", PublicationStatus::Published.as_str())
            .order_by("published_at", true)
    }

    pub async fn refetch(&self) {
        self.core.fetch(&self.fetch_query()).await;
    }
}
