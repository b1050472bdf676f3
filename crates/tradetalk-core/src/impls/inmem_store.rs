//! InMemoryEntityStore - 開発用・テスト用のエンティティストア
//!
//! # 実装詳細
//! - Vec<E> に挿入順で保持（list の既定順 = 作成順）
//! - tokio::sync::Mutex で排他制御（await をまたいでロックを保持しない）
//! - ID は IdGenerator、created_at は Clock から

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::trace;

use crate::domain::{
    Announcement, AnnouncementReceipt, Entity, Message, Profile, Project, ProjectTradeLink,
    RolodexLink, SortSpec, StoreError, Thread,
};
use crate::ports::{Clock, EntityStore, IdGenerator, Stores, UlidGenerator};

pub struct InMemoryEntityStore<E: Entity> {
    records: Mutex<Vec<E>>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<E: Entity> InMemoryEntityStore<E> {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            ids,
            clock,
        }
    }

    /// ULID の timestamp にも同じ Clock を使う
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let ids = Arc::new(UlidGenerator::new(clock.clone()));
        Self::new(ids, clock)
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.records.lock().await.len()
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryEntityStore<E> {
    async fn list(&self, sort: Option<SortSpec>) -> Result<Vec<E>, StoreError> {
        let mut records = self.records.lock().await.clone();
        if let Some(spec) = sort {
            // stable: ties keep insertion order
            records.sort_by(|a, b| spec.compare(a, b));
        }
        Ok(records)
    }

    async fn filter(&self, filter: &E::Filter) -> Result<Vec<E>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.iter().filter(|r| r.matches(filter)).cloned().collect())
    }

    async fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        let id: E::Id = self.ids.next_ulid().into();
        let record = E::from_draft(id, self.clock.now(), draft);
        self.records.lock().await.push(record.clone());
        trace!(entity = E::NAME, id = %id, "created");
        Ok(record)
    }

    async fn update(&self, id: E::Id, patch: E::Patch) -> Result<E, StoreError> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(E::NAME, id))?;
        record.apply(patch);
        trace!(entity = E::NAME, id = %id, "updated");
        Ok(record.clone())
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let index = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(E::NAME, id))?;
        records.remove(index);
        trace!(entity = E::NAME, id = %id, "deleted");
        Ok(())
    }
}

impl Stores {
    /// すべてのエンティティ型を InMemoryEntityStore で揃えた Stores
    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self {
            threads: Arc::new(InMemoryEntityStore::<Thread>::with_clock(clock.clone())),
            messages: Arc::new(InMemoryEntityStore::<Message>::with_clock(clock.clone())),
            announcements: Arc::new(InMemoryEntityStore::<Announcement>::with_clock(
                clock.clone(),
            )),
            receipts: Arc::new(InMemoryEntityStore::<AnnouncementReceipt>::with_clock(
                clock.clone(),
            )),
            project_trade_links: Arc::new(InMemoryEntityStore::<ProjectTradeLink>::with_clock(
                clock.clone(),
            )),
            rolodex_links: Arc::new(InMemoryEntityStore::<RolodexLink>::with_clock(
                clock.clone(),
            )),
            profiles: Arc::new(InMemoryEntityStore::<Profile>::with_clock(clock.clone())),
            projects: Arc::new(InMemoryEntityStore::<Project>::with_clock(clock)),
        }
    }
}
