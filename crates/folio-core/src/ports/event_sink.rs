//! EventSink port - イベント記録の抽象化
//!
//! # 実装
//! - NoopEventSink: 何もしない
//! - TracingEventSink: `tracing` に構造化ログとして流す
//! - RecordingEventSink: メモリに溜める（テスト用）

use crate::domain::SyncEvent;

/// EventSink は同期イベントを受け取る
///
/// `emit` は同期的で失敗しません。重い処理は sink 側でバッファしてください。
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &SyncEvent);
}
