//! CollectionBuilder - コレクションの構築とワイヤリング
//!
//! # ポイント
//! - ports の実装を 1 か所で受け取り、種類ごとのコレクションを生成
//! - 起動時検証（設定不正・依存不足は build 時に BuildError）

use std::sync::Arc;

use super::collection::ResourceCollection;
use super::published::PublishedCollection;
use super::sync_core::SyncCore;
use crate::config::{ConfigError, SyncConfig};
use crate::domain::ResourceKind;
use crate::impls::NoopEventSink;
use crate::ports::{Clock, EventSink, IdentityProvider, RemoteStore, SystemClock};

/// CollectionBuilder はコレクションを構築
///
/// # 使用例
/// ```ignore
/// let builder = CollectionBuilder::new()
///     .store(store)
///     .identity(session)
///     .config(config);
/// let posts = builder.full::<Post>()?;
/// let published_works = builder.published::<Work>()?;
/// ```
#[derive(Clone)]
pub struct CollectionBuilder {
    store: Option<Arc<dyn RemoteStore>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    config: SyncConfig,
}

/// BuildError はコレクション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no remote store configured")]
    MissingStore,

    #[error("no identity provider configured; full-access collections need one")]
    MissingIdentity,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CollectionBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            identity: None,
            clock: Arc::new(SystemClock),
            events: Arc::new(NoopEventSink),
            config: SyncConfig::default(),
        }
    }

    pub fn store(mut self, store: Arc<dyn RemoteStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Build a read-write collection for `K`.
    pub fn full<K: ResourceKind>(&self) -> Result<ResourceCollection<K>, BuildError> {
        let core = self.core::<K>()?;
        let identity = self.identity.clone().ok_or(BuildError::MissingIdentity)?;
        Ok(ResourceCollection::new(core, identity, Arc::clone(&self.clock)))
    }

    /// Build a published-only view of `K`. No identity is needed.
    pub fn published<K: ResourceKind>(&self) -> Result<PublishedCollection<K>, BuildError> {
        Ok(PublishedCollection::new(self.core::<K>()?))
    }

    fn core<K: ResourceKind>(&self) -> Result<SyncCore<K>, BuildError> {
        self.config.validate()?;
        let store = self.store.clone().ok_or(BuildError::MissingStore)?;
        Ok(SyncCore::new(
            K::table(&self.config.tables),
            store,
            Arc::clone(&self.events),
            self.config.fetch.discard_stale_results,
        ))
    }
}

impl Default for CollectionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
