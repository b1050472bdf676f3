//! StaticAuth - 固定ユーザーを返す AuthProvider（開発用・テスト用）

use async_trait::async_trait;

use crate::domain::{StoreError, User};
use crate::ports::AuthProvider;

#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn signed_out() -> Self {
        Self { user: None }
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn me(&self) -> Result<User, StoreError> {
        self.user.clone().ok_or(StoreError::Unauthenticated)
    }
}
