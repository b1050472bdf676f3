//! AuthProvider port - 認証コラボレータ

use async_trait::async_trait;

use crate::domain::{StoreError, User};

/// AuthProvider は現在のユーザー（email キー）を返す
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn me(&self) -> Result<User, StoreError>;
}
