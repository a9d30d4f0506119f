//! CollectionState - プレゼンテーション層から見える状態
//!
//! ```text
//! Idle ──fetch──▶ Loading ──ok──▶ Ready
//!                    │              │
//!                    └──err──▶ Errored
//!          (次の fetch で再び Loading)
//! ```
//!
//! mutation は phase を変えません（Loading / Errored を経由しない）。

use serde::Serialize;

use crate::domain::ErrorInfo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    /// No fetch has been dispatched yet.
    #[default]
    Idle,
    Loading,
    Ready,
    /// The most recent fetch failed; `items` still holds the previous list.
    Errored,
}

/// Snapshot of one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionState<R> {
    pub items: Vec<R>,
    pub phase: SyncPhase,
    pub last_error: Option<ErrorInfo>,
    /// Number of fetches dispatched so far.
    pub generation: u64,
}

impl<R> Default for CollectionState<R> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            phase: SyncPhase::Idle,
            last_error: None,
            generation: 0,
        }
    }
}

impl<R> CollectionState<R> {
    pub fn is_loading(&self) -> bool {
        self.phase == SyncPhase::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_empty() {
        let state = CollectionState::<String>::default();
        assert_eq!(state.phase, SyncPhase::Idle);
        assert!(!state.is_loading());
        assert!(state.items.is_empty());
        assert!(state.last_error.is_none());
    }
}
