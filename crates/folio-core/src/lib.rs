//! folio-core
//!
//! Resource collection synchronization for an author portfolio: blog posts and
//! literary works kept in sync with a hosted Remote Store.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, status, slug, kind, post, work, errors, events）
//! - **ports**: 抽象化レイヤー（RemoteStore, IdentityProvider, Clock, IdGenerator, EventSink）
//! - **app**: アプリケーションロジック（builder, collection, published, activation）
//! - **impls**: 実装（InMemoryRemoteStore, SessionIdentity, EventSink 各種）
//! - **listing**: 取得済みリストの検索・並べ替え・表示用ヘルパー
//! - **config**: TOML 設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod listing;
pub mod ports;
