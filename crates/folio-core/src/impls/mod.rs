//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryRemoteStore**: 開発用の Remote Store（障害注入つき）
//! - **SessionIdentity**: プロセス内のサインイン状態
//! - **EventSink**: Noop / Tracing / Recording
//!
//! ホスト型バックエンドへの接続は別クレートに置く想定です。

pub mod event_sinks;
pub mod identity;
pub mod inmem_store;

// 主要な型を再エクスポート
pub use self::event_sinks::{NoopEventSink, RecordingEventSink, TracingEventSink};
pub use self::identity::{SessionIdentity, StaticIdentity};
pub use self::inmem_store::{InMemoryRemoteStore, StoreCall, StoreOp};
