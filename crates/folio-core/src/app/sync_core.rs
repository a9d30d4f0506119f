//! SyncCore - 両コレクション共通の同期ロジック
//!
//! リストは `watch::Sender` の中にあり、変更はすべて `send_modify` /
//! `send_if_modified` で行います。ロックを保持したまま await しません。
//! Remote Store の呼び出しが解決した順にリストへ反映されます。

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;

use super::state::{CollectionState, SyncPhase};
use crate::domain::{
    ErrorInfo, Id, MutationOp, ResourceKind, Row, StoreError, SyncError, SyncEvent, to_row,
};
use crate::ports::{EventSink, Query, RemoteStore};

pub(crate) struct SyncCore<K: ResourceKind> {
    table: String,
    store: Arc<dyn RemoteStore>,
    events: Arc<dyn EventSink>,
    discard_stale: bool,
    state: watch::Sender<CollectionState<K::Record>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> SyncCore<K> {
    pub(crate) fn new(
        table: impl Into<String>,
        store: Arc<dyn RemoteStore>,
        events: Arc<dyn EventSink>,
        discard_stale: bool,
    ) -> Self {
        let (state, _rx) = watch::channel(CollectionState::default());
        Self {
            table: table.into(),
            store,
            events,
            discard_stale,
            state,
            _kind: PhantomData,
        }
    }

    pub(crate) fn table(&self) -> &str {
        &self.table
    }

    pub(crate) fn store(&self) -> &dyn RemoteStore {
        self.store.as_ref()
    }

    pub(crate) fn snapshot(&self) -> CollectionState<K::Record> {
        self.state.borrow().clone()
    }

    pub(crate) fn items(&self) -> Vec<K::Record> {
        self.state.borrow().items.clone()
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub(crate) fn last_error(&self) -> Option<ErrorInfo> {
        self.state.borrow().last_error.clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<CollectionState<K::Record>> {
        self.state.subscribe()
    }

    /// Run one fetch and fold its outcome into the state.
    ///
    /// Failures land in `last_error`; nothing is returned to the caller.
    pub(crate) async fn fetch(&self, query: &Query) {
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.phase = SyncPhase::Loading;
            state.last_error = None;
            generation = state.generation;
        });
        self.emit(SyncEvent::FetchStarted {
            table: self.table.clone(),
            generation,
        });

        let result = match self.store.query_all(query).await {
            Ok(rows) => self.decode_all(rows),
            Err(source) => Err(SyncError::RemoteReadFailed {
                table: self.table.clone(),
                source,
            }),
        };

        let discard_stale = self.discard_stale;
        let outcome = match &result {
            Ok(items) => Ok(items.len()),
            Err(err) => Err(ErrorInfo::from(err)),
        };
        let mut latest = generation;
        let applied = self.state.send_if_modified(|state| {
            latest = state.generation;
            if discard_stale && state.generation != generation {
                return false;
            }
            match result {
                Ok(items) => {
                    state.items = items;
                    state.phase = SyncPhase::Ready;
                }
                Err(err) => {
                    state.last_error = Some(ErrorInfo::from(&err));
                    state.phase = SyncPhase::Errored;
                }
            }
            true
        });

        let table = self.table.clone();
        let event = match outcome {
            _ if !applied => SyncEvent::StaleFetchDiscarded {
                table,
                generation,
                latest,
            },
            Ok(count) => SyncEvent::FetchCompleted {
                table,
                generation,
                count,
            },
            Err(error) => SyncEvent::FetchFailed {
                table,
                generation,
                error,
            },
        };
        self.emit(event);
    }

    pub(crate) fn decode(&self, row: Row) -> Result<K::Record, SyncError> {
        serde_json::from_value(Value::Object(row)).map_err(|source| SyncError::Decode {
            table: self.table.clone(),
            source,
        })
    }

    fn decode_all(&self, rows: Vec<Row>) -> Result<Vec<K::Record>, SyncError> {
        rows.into_iter().map(|row| self.decode(row)).collect()
    }

    /// Insert at the front, replacing any entry with the same id.
    pub(crate) fn prepend(&self, record: K::Record) {
        self.state.send_modify(|state| {
            let id = K::id(&record);
            state.items.retain(|item| K::id(item) != id);
            state.items.insert(0, record);
        });
    }

    /// Shallow-merge `returned` over the local entry with `id`.
    ///
    /// Columns in `returned` win. Without a local entry the list is left
    /// untouched and the decoded row is returned as-is.
    pub(crate) fn merge(&self, id: &Id<K>, returned: Row) -> Result<K::Record, SyncError> {
        let mut merged = None;
        self.state.send_if_modified(|state| {
            let Some(slot) = state.items.iter_mut().find(|item| K::id(item) == id) else {
                merged = Some(self.decode(returned));
                return false;
            };
            let result = to_row(&*slot)
                .map_err(|source| SyncError::Encode {
                    table: self.table.clone(),
                    source,
                })
                .and_then(|mut row| {
                    row.extend(returned);
                    self.decode(row)
                });
            let changed = match &result {
                Ok(record) => {
                    *slot = record.clone();
                    true
                }
                Err(_) => false,
            };
            merged = Some(result);
            changed
        });
        // send_if_modified always runs the closure
        merged.unwrap_or_else(|| {
            Err(SyncError::EmptyWriteResult {
                table: self.table.clone(),
            })
        })
    }

    pub(crate) fn remove(&self, id: &Id<K>) {
        self.state.send_if_modified(|state| {
            let before = state.items.len();
            state.items.retain(|item| K::id(item) != id);
            state.items.len() != before
        });
    }

    /// Map a store failure on a write addressed to `id`.
    pub(crate) fn write_error(&self, id: Option<&str>, source: StoreError) -> SyncError {
        match id {
            Some(id) if source.is_not_found() => SyncError::NotFound {
                table: self.table.clone(),
                id: id.to_string(),
                source,
            },
            _ => SyncError::RemoteWriteFailed {
                table: self.table.clone(),
                source,
            },
        }
    }

    /// Emit the mutation outcome and pass the result through.
    pub(crate) fn report<T>(
        &self,
        op: MutationOp,
        result: Result<T, SyncError>,
        id_of: impl FnOnce(&T) -> String,
        target: Option<&str>,
    ) -> Result<T, SyncError> {
        let event = match &result {
            Ok(value) => SyncEvent::MutationSucceeded {
                table: self.table.clone(),
                op,
                id: id_of(value),
            },
            Err(err) => SyncEvent::MutationFailed {
                table: self.table.clone(),
                op,
                id: target.map(str::to_string),
                error: err.to_string(),
            },
        };
        self.emit(event);
        result
    }

    fn emit(&self, event: SyncEvent) {
        self.events.emit(&event);
    }
}
