//! Errors - Remote Store のエラーと同期エラーの分類
//!
//! - `StoreError`: Remote Store が報告するエラー（message / details / hint / code）
//! - `SyncError`: コレクション操作の失敗（呼び出し側に返す）
//! - `ErrorInfo`: `last_error` に保持する表示用のエラー情報

use serde::{Deserialize, Serialize};

/// StoreErrorKind は Remote Store エラーの分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreErrorKind {
    /// 対象のレコードが存在しない
    NotFound,
    /// 制約違反・権限不足などで拒否された
    Rejected,
    /// ストアに到達できない
    Unavailable,
}

/// An error reported by the Remote Store.
///
/// Mirrors the shape of the hosted backend's error objects so nothing is lost
/// on the way to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub message: String,
    pub details: Option<String>,
    pub hint: Option<String>,
    pub code: Option<String>,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            hint: None,
            code: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::NotFound, message)
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Rejected, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorKind::Unavailable, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == StoreErrorKind::NotFound
    }
}

/// Failure of a collection operation.
///
/// Mutations (`create` / `update` / `remove`) return these to the caller.
/// Fetch failures never surface as `Err`; they are folded into `last_error`.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("user not authenticated")]
    Unauthenticated,

    #[error("write to `{table}` failed: {source}")]
    RemoteWriteFailed {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("write to `{table}` was accepted but no record was returned")]
    EmptyWriteResult { table: String },

    #[error("no record `{id}` in `{table}`")]
    NotFound {
        table: String,
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("read of `{table}` failed: {source}")]
    RemoteReadFailed {
        table: String,
        #[source]
        source: StoreError,
    },

    #[error("row from `{table}` does not match the record shape: {source}")]
    Decode {
        table: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload for `{table}` could not be encoded: {source}")]
    Encode {
        table: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    /// The store-reported error behind this failure, if there is one.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            SyncError::RemoteWriteFailed { source, .. }
            | SyncError::NotFound { source, .. }
            | SyncError::RemoteReadFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// What the presentation layer sees in `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<&StoreError> for ErrorInfo {
    fn from(err: &StoreError) -> Self {
        Self {
            message: err.message.clone(),
            details: err.details.clone(),
            hint: err.hint.clone(),
            code: err.code.clone(),
        }
    }
}

impl From<&SyncError> for ErrorInfo {
    fn from(err: &SyncError) -> Self {
        match err.store_error() {
            Some(store) => store.into(),
            None => Self {
                message: err.to_string(),
                details: None,
                hint: None,
                code: None,
            },
        }
    }
}
