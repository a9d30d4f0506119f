//! Events - コレクション同期で発生するイベント
//!
//! コアはコンソールに直接出力しません。各ステップは `SyncEvent` として
//! `EventSink` に渡され、ログ出力や計測は sink 側の責務になります。

use std::fmt;

use super::errors::ErrorInfo;

/// Which mutation an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationOp {
    Create,
    Update,
    Remove,
}

impl MutationOp {
    pub fn as_str(self) -> &'static str {
        match self {
            MutationOp::Create => "create",
            MutationOp::Update => "update",
            MutationOp::Remove => "remove",
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SyncEvent はコレクションで発生した出来事
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    /// A fetch was dispatched.
    FetchStarted { table: String, generation: u64 },

    /// A fetch replaced the list.
    FetchCompleted {
        table: String,
        generation: u64,
        count: usize,
    },

    /// A fetch failed; the list was kept.
    FetchFailed {
        table: String,
        generation: u64,
        error: ErrorInfo,
    },

    /// A fetch resolved after a newer one was dispatched and was dropped.
    StaleFetchDiscarded {
        table: String,
        generation: u64,
        latest: u64,
    },

    MutationSucceeded {
        table: String,
        op: MutationOp,
        id: String,
    },

    MutationFailed {
        table: String,
        op: MutationOp,
        id: Option<String>,
        error: String,
    },
}

impl SyncEvent {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            SyncEvent::FetchFailed { .. } | SyncEvent::MutationFailed { .. }
        )
    }
}
