//! IdGenerator port - レコード ID 生成の抽象化
//!
//! Remote Store 側で ID を払い出すための interface です。
//! in-memory store が使います（本物のバックエンドは自前で払い出す）。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（Clock の時刻を使う）
//! - **SequentialIdGenerator**: "1", "2", ... の連番（テスト用）

use std::sync::atomic::{AtomicU64, Ordering};

use ulid::Ulid;

use crate::ports::Clock;

/// IdGenerator は store が払い出すレコード ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数タスクから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_record_id(&self) -> String;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_record_id(&self) -> String {
        let timestamp_ms = self.clock.now().timestamp_millis().max(0) as u64;
        Ulid::from_parts(timestamp_ms, rand::random()).to_string()
    }
}

/// 連番の ID 生成器
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn generate_record_id(&self) -> String {
        self.next.fetch_add(1, Ordering::SeqCst).to_string()
    }
}
