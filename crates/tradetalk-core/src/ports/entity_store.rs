//! EntityStore port - 外部エンティティストア（backend-as-a-service）
//!
//! エンティティ型ごとに list / filter / create / update / delete を提供します。
//! 実装の詳細（HTTP, SDK, InMemory）はこの trait の向こう側に隠蔽されます。
//!
//! # 前提
//! - トランザクションなし、楽観ロックなし（last-write-wins）
//! - タイムアウト・キャンセルはストア側のリクエストセマンティクスに従う

use async_trait::async_trait;

use crate::domain::{Entity, SortSpec, StoreError};

/// EntityStore は 1 エンティティ型ぶんの永続化インターフェース
///
/// # 使用例
/// ```ignore
/// let threads = stores.threads.filter(&ThreadFilter::direct(trade_id)).await?;
/// let thread = stores.threads.create(ThreadDraft::direct(trade_id)).await?;
/// ```
#[async_trait]
pub trait EntityStore<E: Entity>: Send + Sync {
    /// 全件取得（`sort` 指定がなければストアの既定順）
    async fn list(&self, sort: Option<SortSpec>) -> Result<Vec<E>, StoreError>;

    /// フィールドの等値一致で絞り込み
    async fn filter(&self, filter: &E::Filter) -> Result<Vec<E>, StoreError>;

    async fn create(&self, draft: E::Draft) -> Result<E, StoreError>;

    /// 部分更新。更新後のレコードを返す
    async fn update(&self, id: E::Id, patch: E::Patch) -> Result<E, StoreError>;

    async fn delete(&self, id: E::Id) -> Result<(), StoreError>;

    /// 一括作成。既定では 1 件ずつ create する（途中失敗時はそれまでの作成分が残る）
    async fn bulk_create(&self, drafts: Vec<E::Draft>) -> Result<Vec<E>, StoreError> {
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(self.create(draft).await?);
        }
        Ok(created)
    }
}
