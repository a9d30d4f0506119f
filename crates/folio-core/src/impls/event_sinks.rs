//! EventSink の実装
//!
//! - `NoopEventSink`: 捨てる
//! - `TracingEventSink`: `tracing` の構造化ログに変換
//! - `RecordingEventSink`: 受け取った順に保持（テスト・デバッグ用）

use std::sync::{Mutex, PoisonError};

use crate::domain::SyncEvent;
use crate::ports::EventSink;

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn emit(&self, _event: &SyncEvent) {}
}

/// Fetch lifecycle goes to `debug`, completed mutations to `info`,
/// failures to `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &SyncEvent) {
        match event {
            SyncEvent::FetchStarted { table, generation } => {
                tracing::debug!(table = %table, generation, "fetch started");
            }
            SyncEvent::FetchCompleted {
                table,
                generation,
                count,
            } => {
                tracing::debug!(table = %table, generation, count, "fetch completed");
            }
            SyncEvent::FetchFailed {
                table,
                generation,
                error,
            } => {
                tracing::warn!(
                    table = %table,
                    generation,
                    code = error.code.as_deref().unwrap_or(""),
                    details = error.details.as_deref().unwrap_or(""),
                    "fetch failed: {}",
                    error.message
                );
            }
            SyncEvent::StaleFetchDiscarded {
                table,
                generation,
                latest,
            } => {
                tracing::debug!(table = %table, generation, latest, "stale fetch discarded");
            }
            SyncEvent::MutationSucceeded { table, op, id } => {
                tracing::info!(table = %table, op = %op, id = %id, "mutation applied");
            }
            SyncEvent::MutationFailed {
                table,
                op,
                id,
                error,
            } => {
                tracing::warn!(
                    table = %table,
                    op = %op,
                    id = id.as_deref().unwrap_or(""),
                    "mutation failed: {error}"
                );
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SyncEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SyncEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take(&self) -> Vec<SyncEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn failures(&self) -> Vec<SyncEvent> {
        self.events()
            .into_iter()
            .filter(SyncEvent::is_failure)
            .collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &SyncEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MutationOp;

    #[test]
    fn recording_sink_keeps_order_and_filters_failures() {
        let sink = RecordingEventSink::new();
        sink.emit(&SyncEvent::FetchStarted {
            table: "t".into(),
            generation: 1,
        });
        sink.emit(&SyncEvent::MutationFailed {
            table: "t".into(),
            op: MutationOp::Create,
            id: None,
            error: "user not authenticated".into(),
        });

        assert_eq!(sink.events().len(), 2);
        assert_eq!(sink.failures().len(), 1);
        assert_eq!(sink.take().len(), 2);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn tracing_sink_accepts_every_event_without_a_subscriber() {
        let sink = TracingEventSink;
        sink.emit(&SyncEvent::MutationSucceeded {
            table: "t".into(),
            op: MutationOp::Remove,
            id: "1".into(),
        });
        NoopEventSink.emit(&SyncEvent::FetchStarted {
            table: "t".into(),
            generation: 0,
        });
    }
}
