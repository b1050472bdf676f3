//! Errors - エラー型と分類
//!
//! ルール層は独自のエラー分類を持ちません。外部ストアの失敗は
//! `StoreError` としてそのまま呼び出し側へ伝播します（catch/retry/変換なし）。

use thiserror::Error;

/// StoreError は外部エンティティストア（および認証）の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("store rejected the request: {0}")]
    Rejected(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("no authenticated user")]
    Unauthenticated,
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Unavailable のみ一時的な失敗として扱う（リトライは呼び出し側の判断）
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}
