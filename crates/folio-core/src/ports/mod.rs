//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（ホスト型バックエンド、認証、時刻、ログ）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - Remote Store が source of truth（正本）
//! - メモリ上のリストは手動で無効化するキャッシュ
//! - 認証は外部の協調者（identity を受け取るだけ）

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod identity;
pub mod remote_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, SequentialIdGenerator, UlidGenerator};
pub use self::identity::{Identity, IdentityProvider};
pub use self::remote_store::{Filter, OrderBy, Query, RemoteStore};
