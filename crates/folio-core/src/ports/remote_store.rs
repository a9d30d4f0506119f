//! RemoteStore port - ホスト型バックエンド（source of truth）
//!
//! RemoteStore はテーブル単位の query / insert / update / delete を提供します。
//! 行は JSON オブジェクト（`Row`）としてやりとりします。
//!
//! # 設計原則
//! - 1 呼び出し = 1 リクエスト（リトライしない）
//! - 各呼び出しの効果はストア側でアトミック
//! - タイムアウトはトランスポート側の責務

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Row, StoreError};

/// Column filter applied by `query_all`.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
}

impl Filter {
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq { column, value } => row.get(column).unwrap_or(&Value::Null) == value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

/// `SELECT * FROM table [WHERE column = value] [ORDER BY column]`
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub table: String,
    pub filter: Option<Filter>,
    pub order: Option<OrderBy>,
}

impl Query {
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filter: None,
            order: None,
        }
    }

    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending,
        });
        self
    }
}

/// RemoteStore はレコードの正本
///
/// `insert` / `update` は書き込んだ行を返すよう要求します。ストアが書き込みを
/// 受け付けたのに行を返さなかった場合は `Ok(None)` です（エラーとは区別する）。
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn query_all(&self, query: &Query) -> Result<Vec<Row>, StoreError>;

    async fn insert(&self, table: &str, row: Row) -> Result<Option<Row>, StoreError>;

    /// Update the row whose `id` matches. A missing row is `StoreErrorKind::NotFound`.
    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Option<Row>, StoreError>;

    /// Delete the row whose `id` matches. Deleting a missing row succeeds.
    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError>;
}
