#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::{Notify, oneshot};

use folio_core::app::{CollectionBuilder, ResourceCollection};
use folio_core::config::SyncConfig;
use folio_core::domain::{Post, Row, StoreError, Work};
use folio_core::impls::{InMemoryRemoteStore, RecordingEventSink, SessionIdentity};
use folio_core::ports::{FixedClock, Identity, Query, RemoteStore, SequentialIdGenerator};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
}

pub fn row(value: Value) -> Row {
    value.as_object().cloned().expect("row literal must be an object")
}

pub fn post_row(id: &str, title: &str, status: &str, created_at: &str) -> Row {
    row(json!({
        "id": id,
        "title": title,
        "slug": title.to_lowercase(),
        "excerpt": null,
        "content": "",
        "featured_image": null,
        "status": status,
        "tags": [],
        "author_id": "seed",
        "published_at": if status == "published" { Value::from(created_at) } else { Value::Null },
        "created_at": created_at,
        "updated_at": created_at,
    }))
}

/// Everything a collection test needs, wired to in-memory adapters.
pub struct Harness {
    pub clock: Arc<FixedClock>,
    pub store: Arc<InMemoryRemoteStore>,
    pub session: Arc<SessionIdentity>,
    pub events: Arc<RecordingEventSink>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::new(t0()));
        let store = Arc::new(InMemoryRemoteStore::new(
            Arc::new(SequentialIdGenerator::new()),
            clock.clone(),
        ));
        Self {
            clock,
            store,
            session: Arc::new(SessionIdentity::anonymous()),
            events: Arc::new(RecordingEventSink::new()),
        }
    }

    pub fn signed_in(self, user: &str) -> Self {
        self.session.sign_in(Identity::new(user));
        self
    }

    pub fn builder(&self, store: Arc<dyn RemoteStore>) -> CollectionBuilder {
        CollectionBuilder::new()
            .store(store)
            .identity(self.session.clone())
            .clock(self.clock.clone())
            .events(self.events.clone())
    }

    pub fn posts(&self) -> ResourceCollection<Post> {
        self.builder(self.store.clone())
            .full::<Post>()
            .expect("builder is fully wired")
    }

    pub fn works(&self) -> ResourceCollection<Work> {
        self.builder(self.store.clone())
            .full::<Work>()
            .expect("builder is fully wired")
    }

    /// Posts backed by a store whose next query can be held open.
    pub fn gated_posts(&self, config: SyncConfig) -> (Arc<ResourceCollection<Post>>, Arc<GatedStore>) {
        let gated = Arc::new(GatedStore::new(self.store.clone()));
        let posts = self
            .builder(gated.clone())
            .config(config)
            .full::<Post>()
            .expect("builder is fully wired");
        (Arc::new(posts), gated)
    }
}

/// Wraps the in-memory store. An armed query reads the rows immediately,
/// then waits for the gate before returning them.
pub struct GatedStore {
    inner: Arc<InMemoryRemoteStore>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub reached: Notify,
}

impl GatedStore {
    pub fn new(inner: Arc<InMemoryRemoteStore>) -> Self {
        Self {
            inner,
            gate: Mutex::new(None),
            reached: Notify::new(),
        }
    }

    /// Hold the next query until the returned sender fires.
    pub fn arm(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }
}

#[async_trait]
impl RemoteStore for GatedStore {
    async fn query_all(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let snapshot = self.inner.query_all(query).await;
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.reached.notify_one();
            let _ = gate.await;
        }
        snapshot
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Option<Row>, StoreError> {
        self.inner.insert(table, row).await
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Option<Row>, StoreError> {
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        self.inner.delete(table, id).await
    }
}
