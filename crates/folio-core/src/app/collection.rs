//! ResourceCollection - 読み書きできるコレクション
//!
//! 1 種類のリソース（投稿・作品）の一覧をメモリに保持し、Remote Store と
//! 同期します。
//!
//! # 不変条件
//! - リスト内の id は一意
//! - 並び順は直近の fetch の順（create は先頭に追加）
//! - `author_id` は呼び出し時の identity から注入され、呼び出し側は指定できない
//!
//! # 失敗の扱い
//! - fetch の失敗は `last_error` に入り、呼び出し側には返さない
//! - mutation の失敗は `Err(SyncError)` で返し、リストは変更しない

use std::sync::Arc;

use tokio::sync::watch;

use super::state::CollectionState;
use super::sync_core::SyncCore;
use crate::domain::{
    Draft, ErrorInfo, Id, MutationOp, Patch, ResourceKind, SyncError, to_row,
};
use crate::ports::{Clock, IdentityProvider, Query};

pub struct ResourceCollection<K: ResourceKind> {
    core: SyncCore<K>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
}

impl<K: ResourceKind> ResourceCollection<K> {
    pub(crate) fn new(
        core: SyncCore<K>,
        identity: Arc<dyn IdentityProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            core,
            identity,
            clock,
        }
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

    pub(crate) fn identity(&self) -> &Arc<dyn IdentityProvider> {
        &self.identity
    }

    /// Every record of the kind, newest `created_at` first.
    pub fn fetch_query(&self) -> Query {
        Query::table(self.core.table()).order_by("created_at", true)
    }

    /// Replace the list with the store's current contents.
    pub async fn fetch_all(&self) {
        self.core.fetch(&self.fetch_query()).await;
    }

    pub async fn refetch(&self) {
        self.fetch_all().await;
    }

    /// Insert a new record authored by the acting identity.
    ///
    /// Fails with `Unauthenticated` before any store call when nobody is
    /// signed in. On success the stored record is placed at the front.
    pub async fn create(&self, draft: Draft<K::Fields>) -> Result<K::Record, SyncError> {
        let result = self.try_create(draft).await;
        self.core.report(
            MutationOp::Create,
            result,
            |record| K::id(record).to_string(),
            None,
        )
    }

    async fn try_create(&self, draft: Draft<K::Fields>) -> Result<K::Record, SyncError> {
        let identity = self.identity.current().ok_or(SyncError::Unauthenticated)?;
        let row = draft.into_insert_row::<K>(&identity.id, self.clock.now());

        let stored = self
            .core
            .store()
            .insert(self.table(), row)
            .await
            .map_err(|source| self.core.write_error(None, source))?
            .ok_or_else(|| SyncError::EmptyWriteResult {
                table: self.table().to_string(),
            })?;

        let record = self.core.decode(stored)?;
        self.core.prepend(record.clone());
        Ok(record)
    }

    /// Apply `patch` to the record with `id`.
    ///
    /// Publishing without a publication time stamps it with the current time.
    /// The local entry keeps its position; when it is not in the list the
    /// list is left alone.
    pub async fn update(
        &self,
        id: &Id<K>,
        patch: Patch<K::PatchFields>,
    ) -> Result<K::Record, SyncError> {
        let result = self.try_update(id, patch).await;
        self.core.report(
            MutationOp::Update,
            result,
            |record| K::id(record).to_string(),
            Some(id.as_str()),
        )
    }

    async fn try_update(
        &self,
        id: &Id<K>,
        mut patch: Patch<K::PatchFields>,
    ) -> Result<K::Record, SyncError> {
        patch.stamp_publication(self.clock.now());
        let row = to_row(&patch).map_err(|source| SyncError::Encode {
            table: self.table().to_string(),
            source,
        })?;

        let returned = self
            .core
            .store()
            .update(self.table(), id.as_str(), row)
            .await
            .map_err(|source| self.core.write_error(Some(id.as_str()), source))?
            .ok_or_else(|| SyncError::EmptyWriteResult {
                table: self.table().to_string(),
            })?;

        self.core.merge(id, returned)
    }

    /// Delete the record with `id` and drop it from the list.
    pub async fn remove(&self, id: &Id<K>) -> Result<(), SyncError> {
        let result = self
            .core
            .store()
            .delete(self.table(), id.as_str())
            .await
            .map_err(|source| self.core.write_error(Some(id.as_str()), source))
            .map(|()| self.core.remove(id));
        self.core.report(
            MutationOp::Remove,
            result,
            |_| id.to_string(),
            Some(id.as_str()),
        )
    }
}
