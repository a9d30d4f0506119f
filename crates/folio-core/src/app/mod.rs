//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてコレクション同期を実装します。
//!
//! # 主要コンポーネント
//! - **CollectionBuilder**: コレクションの構築とワイヤリング
//! - **ResourceCollection**: 読み書きできるコレクション（create / update / remove / refetch）
//! - **PublishedCollection**: 公開済みだけの読み取り専用ビュー
//! - **Activation**: 自動 fetch のトリガー

pub mod activation;
pub mod builder;
pub mod collection;
pub mod published;
pub mod state;
mod sync_core;

// 主要な型を再エクスポート
pub use self::activation::Activation;
pub use self::builder::{BuildError, CollectionBuilder};
pub use self::collection::ResourceCollection;
pub use self::published::PublishedCollection;
pub use self::state::{CollectionState, SyncPhase};
