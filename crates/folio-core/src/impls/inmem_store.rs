//! InMemoryRemoteStore - 開発・テスト用の Remote Store
//!
//! ホスト型バックエンドの振る舞いを最小限で再現します。
//!
//! # 再現している振る舞い
//! - `id` / `created_at` / `updated_at` はストア側で払い出す
//! - `query_all` は等値フィルタと 1 カラムのソート（NULL は DESC で先頭）
//! - 該当行のない `update` は NotFound（`PGRST116`）
//! - 該当行のない `delete` は成功
//!
//! # テスト用の機能
//! - `fail_next` / `empty_next`: 次の 1 回の呼び出しに障害を注入
//! - `calls`: 呼び出し履歴（送信された payload を含む）

use std::cmp::Ordering;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::domain::{Row, StoreError, timestamp_value};
use crate::ports::{Clock, IdGenerator, Query, RemoteStore};

/// Which store call a fault or log entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    Query,
    Insert,
    Update,
    Delete,
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub table: String,
    pub id: Option<String>,
    pub payload: Option<Row>,
}

#[derive(Debug, Clone)]
enum Fault {
    Error(StoreError),
    /// Apply the write but return no row.
    Empty,
}

#[derive(Default)]
struct StoreState {
    tables: HashMap<String, Vec<Row>>,
    faults: HashMap<StoreOp, VecDeque<Fault>>,
    calls: Vec<StoreCall>,
}

impl StoreState {
    fn record(&mut self, op: StoreOp, table: &str, id: Option<&str>, payload: Option<&Row>) {
        self.calls.push(StoreCall {
            op,
            table: table.to_string(),
            id: id.map(str::to_string),
            payload: payload.cloned(),
        });
    }

    fn take_fault(&mut self, op: StoreOp) -> Option<Fault> {
        self.faults.get_mut(&op).and_then(VecDeque::pop_front)
    }
}

/// In-memory implementation of [`RemoteStore`].
pub struct InMemoryRemoteStore {
    state: Mutex<StoreState>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRemoteStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            ids,
            clock,
        }
    }

    /// Put rows into a table as-is (no id or timestamp assignment).
    pub async fn seed(&self, table: &str, rows: impl IntoIterator<Item = Row>) {
        let mut state = self.state.lock().await;
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .extend(rows);
    }

    /// Snapshot of a table in storage order.
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        let state = self.state.lock().await;
        state.tables.get(table).cloned().unwrap_or_default()
    }

    /// Fail the next call of `op` with `error`.
    pub async fn fail_next(&self, op: StoreOp, error: StoreError) {
        let mut state = self.state.lock().await;
        state
            .faults
            .entry(op)
            .or_default()
            .push_back(Fault::Error(error));
    }

    /// Accept the next write of `op` but return no row.
    pub async fn empty_next(&self, op: StoreOp) {
        let mut state = self.state.lock().await;
        state.faults.entry(op).or_default().push_back(Fault::Empty);
    }

    pub async fn calls(&self) -> Vec<StoreCall> {
        let state = self.state.lock().await;
        state.calls.clone()
    }

    pub async fn call_count(&self, op: StoreOp) -> usize {
        let state = self.state.lock().await;
        state.calls.iter().filter(|c| c.op == op).count()
    }

    fn now_value(&self) -> Value {
        timestamp_value(Some(self.clock.now()))
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn query_all(&self, query: &Query) -> Result<Vec<Row>, StoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreOp::Query, &query.table, None, None);
        if let Some(Fault::Error(err)) = state.take_fault(StoreOp::Query) {
            return Err(err);
        }

        let mut rows: Vec<Row> = state
            .tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filter.as_ref().is_none_or(|f| f.matches(row)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(&order.column).unwrap_or(&Value::Null);
                let b = b.get(&order.column).unwrap_or(&Value::Null);
                let ord = compare_values(a, b);
                if order.descending { ord.reverse() } else { ord }
            });
        }

        Ok(rows)
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Option<Row>, StoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreOp::Insert, table, None, Some(&row));
        let fault = state.take_fault(StoreOp::Insert);
        if let Some(Fault::Error(err)) = fault {
            return Err(err);
        }

        let now = self.now_value();
        row.entry("id")
            .or_insert_with(|| Value::String(self.ids.generate_record_id()));
        row.insert("created_at".into(), now.clone());
        row.insert("updated_at".into(), now);

        let rows = state.tables.entry(table.to_string()).or_default();
        let id = row.get("id").cloned();
        if rows.iter().any(|existing| existing.get("id") == id.as_ref()) {
            return Err(StoreError::rejected(format!(
                "duplicate key value violates unique constraint \"{table}_pkey\""
            ))
            .with_code("23505"));
        }
        rows.push(row.clone());

        match fault {
            Some(Fault::Empty) => Ok(None),
            _ => Ok(Some(row)),
        }
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Option<Row>, StoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreOp::Update, table, Some(id), Some(&patch));
        let fault = state.take_fault(StoreOp::Update);
        if let Some(Fault::Error(err)) = fault {
            return Err(err);
        }

        let now = self.now_value();
        let Some(row) = state
            .tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|row| row_has_id(row, id)))
        else {
            return Err(
                StoreError::not_found("JSON object requested, multiple (or no) rows returned")
                    .with_details("The result contains 0 rows")
                    .with_code("PGRST116"),
            );
        };

        for (column, value) in patch {
            // id は不変
            if column != "id" {
                row.insert(column, value);
            }
        }
        row.insert("updated_at".into(), now);

        match fault {
            Some(Fault::Empty) => Ok(None),
            _ => Ok(Some(row.clone())),
        }
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.record(StoreOp::Delete, table, Some(id), None);
        if let Some(Fault::Error(err)) = state.take_fault(StoreOp::Delete) {
            return Err(err);
        }

        if let Some(rows) = state.tables.get_mut(table) {
            rows.retain(|row| !row_has_id(row, id));
        }
        Ok(())
    }
}

fn row_has_id(row: &Row, id: &str) -> bool {
    row.get("id").and_then(Value::as_str) == Some(id)
}

/// Postgres-like ordering: NULL sorts above every value, so it comes first
/// in descending order. Values of different JSON types are ordered by type,
/// and RFC 3339 strings sort before other strings.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => match (parse_timestamp(a), parse_timestamp(b)) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        },
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreErrorKind;
    use crate::ports::{FixedClock, SequentialIdGenerator};
    use chrono::TimeZone;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn store() -> (InMemoryRemoteStore, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let store = InMemoryRemoteStore::new(Arc::new(SequentialIdGenerator::new()), clock.clone());
        (store, clock)
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let (store, _) = store();
        let inserted = store
            .insert("blog_posts", row(json!({"title": "X"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(inserted["id"], "1");
        assert_eq!(inserted["created_at"], "2024-01-01T00:00:00.000000Z");
        assert_eq!(inserted["created_at"], inserted["updated_at"]);
        assert_eq!(store.rows("blog_posts").await.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let (store, _) = store();
        store
            .insert("t", row(json!({"id": "a"})))
            .await
            .unwrap();
        let err = store
            .insert("t", row(json!({"id": "a"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Rejected);
        assert_eq!(err.code.as_deref(), Some("23505"));
    }

    #[tokio::test]
    async fn query_filters_and_orders_with_nulls_first_descending() {
        let (store, _) = store();
        store
            .seed(
                "blog_posts",
                [
                    row(json!({"id": "a", "status": "published", "published_at": "2024-01-02T00:00:00Z"})),
                    row(json!({"id": "b", "status": "draft", "published_at": null})),
                    row(json!({"id": "c", "status": "published", "published_at": "2024-01-03T00:00:00.5Z"})),
                    row(json!({"id": "d", "status": "published", "published_at": null})),
                ],
            )
            .await;

        let rows = store
            .query_all(
                &Query::table("blog_posts")
                    .filter_eq("status", "published")
                    .order_by("published_at", true),
            )
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["d", "c", "a"]);

        let rows = store
            .query_all(&Query::table("blog_posts").order_by("published_at", false))
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["a", "c", "b", "d"]);
    }

    #[tokio::test]
    async fn query_of_unknown_table_is_empty() {
        let (store, _) = store();
        let rows = store.query_all(&Query::table("nope")).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn update_merges_patch_and_bumps_updated_at() {
        let (store, clock) = store();
        store
            .insert("t", row(json!({"title": "old", "status": "draft"})))
            .await
            .unwrap();
        clock.advance(chrono::Duration::seconds(30));

        let updated = store
            .update("t", "1", row(json!({"title": "new", "id": "hijack"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated["id"], "1");
        assert_eq!(updated["title"], "new");
        assert_eq!(updated["status"], "draft");
        assert_eq!(updated["updated_at"], "2024-01-01T00:00:30.000000Z");
        assert_eq!(updated["created_at"], "2024-01-01T00:00:00.000000Z");
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let (store, _) = store();
        let err = store.update("t", "missing", Row::new()).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.code.as_deref(), Some("PGRST116"));
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (store, _) = store();
        store.insert("t", row(json!({"title": "x"}))).await.unwrap();
        store.delete("t", "1").await.unwrap();
        store.delete("t", "1").await.unwrap();
        assert!(store.rows("t").await.is_empty());
        assert_eq!(store.call_count(StoreOp::Delete).await, 2);
    }

    #[tokio::test]
    async fn injected_faults_apply_once() {
        let (store, _) = store();
        store
            .fail_next(StoreOp::Query, StoreError::unavailable("offline"))
            .await;

        let err = store.query_all(&Query::table("t")).await.unwrap_err();
        assert_eq!(err.message, "offline");
        assert!(store.query_all(&Query::table("t")).await.is_ok());
    }

    #[tokio::test]
    async fn empty_result_still_applies_the_write() {
        let (store, _) = store();
        store.empty_next(StoreOp::Insert).await;

        let result = store.insert("t", row(json!({"title": "x"}))).await.unwrap();
        assert!(result.is_none());
        assert_eq!(store.rows("t").await.len(), 1);
    }

    #[tokio::test]
    async fn calls_record_payloads() {
        let (store, _) = store();
        store.insert("t", row(json!({"title": "x"}))).await.unwrap();
        store
            .update("t", "1", row(json!({"title": "y"})))
            .await
            .unwrap();

        let calls = store.calls().await;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].op, StoreOp::Update);
        assert_eq!(calls[1].id.as_deref(), Some("1"));
        assert_eq!(calls[1].payload.as_ref().unwrap()["title"], "y");
    }

    #[test]
    fn value_order_is_total_over_mixed_columns() {
        let early = json!("2024-01-02T00:00:00Z");
        let late = json!("2024-01-01T23:00:00-05:00");
        let plain = json!("2024-01-01 noon");

        // time order disagrees with lexical order here
        assert_eq!(compare_values(&early, &late), Ordering::Less);
        assert_eq!(compare_values(&late, &plain), Ordering::Less);
        assert_eq!(compare_values(&early, &plain), Ordering::Less);

        let mut values = vec![
            json!(null),
            plain.clone(),
            json!(f64::MAX),
            json!(["x"]),
            late.clone(),
            json!(true),
            json!(1),
            early.clone(),
            json!({"k": 1}),
            json!(false),
        ];
        values.sort_by(compare_values);
        assert_eq!(
            values,
            vec![
                json!(false),
                json!(true),
                json!(1),
                json!(f64::MAX),
                early,
                late,
                plain,
                json!(["x"]),
                json!({"k": 1}),
                json!(null),
            ]
        );
    }
}
