//! FaultyEntityStore - 障害注入用のラッパー
//!
//! 内側のストアに処理を委譲しつつ、指定回数の成功後に create / update / delete を
//! `StoreError::Unavailable` で失敗させます。ルール層の非アトミックな
//! 部分失敗（fan-out の取りこぼし、merge 後の delete 失敗）を再現するために使います。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::{Entity, SortSpec, StoreError};
use crate::ports::EntityStore;

/// 何回成功した後に失敗させるか（`None` は失敗させない）
#[derive(Debug, Default)]
struct Budget {
    limit: Option<usize>,
    used: AtomicUsize,
}

impl Budget {
    fn after(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            used: AtomicUsize::new(0),
        }
    }

    fn take(&self, op: &str) -> Result<(), StoreError> {
        let Some(limit) = self.limit else {
            return Ok(());
        };
        let used = self.used.fetch_add(1, Ordering::SeqCst);
        if used >= limit {
            return Err(StoreError::Unavailable(format!("injected {op} failure")));
        }
        Ok(())
    }
}

pub struct FaultyEntityStore<E: Entity> {
    inner: Arc<dyn EntityStore<E>>,
    create: Budget,
    update: Budget,
    delete: Budget,
}

impl<E: Entity> FaultyEntityStore<E> {
    pub fn new(inner: Arc<dyn EntityStore<E>>) -> Self {
        Self {
            inner,
            create: Budget::default(),
            update: Budget::default(),
            delete: Budget::default(),
        }
    }

    pub fn fail_create_after(mut self, successes: usize) -> Self {
        self.create = Budget::after(successes);
        self
    }

    pub fn fail_update_after(mut self, successes: usize) -> Self {
        self.update = Budget::after(successes);
        self
    }

    pub fn fail_delete_after(mut self, successes: usize) -> Self {
        self.delete = Budget::after(successes);
        self
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for FaultyEntityStore<E> {
    async fn list(&self, sort: Option<SortSpec>) -> Result<Vec<E>, StoreError> {
        self.inner.list(sort).await
    }

    async fn filter(&self, filter: &E::Filter) -> Result<Vec<E>, StoreError> {
        self.inner.filter(filter).await
    }

    async fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        self.create.take("create")?;
        self.inner.create(draft).await
    }

    async fn update(&self, id: E::Id, patch: E::Patch) -> Result<E, StoreError> {
        self.update.take("update")?;
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: E::Id) -> Result<(), StoreError> {
        self.delete.take("delete")?;
        self.inner.delete(id).await
    }
}
