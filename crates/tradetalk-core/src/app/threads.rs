//! Thread provisioning and promotion.
//!
//! Find-or-create is idempotent for a single writer. Two clients racing on the
//! same key can both miss and both create; the store keeps both (last write wins).

use tracing::{debug, info, warn};

use super::fanout::for_each_bounded;
use crate::config::RulesConfig;
use crate::domain::{
    MessageFilter, MessagePatch, ProfileId, ProjectId, StoreError, Thread, ThreadDraft,
    ThreadFilter, ThreadId, ThreadPatch,
};
use crate::ports::Stores;

/// Looks a thread up by id in the full listing (the store has no get-by-id).
pub async fn find_thread(stores: &Stores, thread_id: ThreadId) -> Result<Option<Thread>, StoreError> {
    let threads = stores.threads.list(None).await?;
    Ok(threads.into_iter().find(|t| t.id == thread_id))
}

pub async fn find_or_create_direct_thread(
    stores: &Stores,
    trade_id: ProfileId,
) -> Result<Thread, StoreError> {
    let candidates = stores.threads.filter(&ThreadFilter::direct(trade_id)).await?;
    if let Some(thread) = candidates.into_iter().find(|t| t.project_id.is_none()) {
        debug!(thread_id = %thread.id, trade_id = %trade_id, "direct thread exists");
        return Ok(thread);
    }

    let thread = stores.threads.create(ThreadDraft::direct(trade_id)).await?;
    info!(thread_id = %thread.id, trade_id = %trade_id, "created direct thread");
    Ok(thread)
}

pub async fn ensure_project_thread(
    stores: &Stores,
    project_id: ProjectId,
    trade_id: ProfileId,
) -> Result<Thread, StoreError> {
    let existing = stores
        .threads
        .filter(&ThreadFilter::project(project_id, trade_id))
        .await?;
    if let Some(thread) = existing.into_iter().next() {
        debug!(thread_id = %thread.id, project_id = %project_id, trade_id = %trade_id, "project thread exists");
        return Ok(thread);
    }

    let thread = stores
        .threads
        .create(ThreadDraft::project(project_id, trade_id))
        .await?;
    info!(thread_id = %thread.id, project_id = %project_id, trade_id = %trade_id, "created project thread");
    Ok(thread)
}

/// The returned thread is always pinned; an unpinned one is re-pinned first.
pub async fn ensure_announcement_thread(
    stores: &Stores,
    project_id: ProjectId,
) -> Result<Thread, StoreError> {
    let existing = stores
        .threads
        .filter(&ThreadFilter::announcement(project_id))
        .await?;
    if let Some(thread) = existing.into_iter().find(Thread::is_announcement) {
        if thread.pinned {
            debug!(thread_id = %thread.id, project_id = %project_id, "announcement thread exists");
            return Ok(thread);
        }
        info!(thread_id = %thread.id, project_id = %project_id, "re-pinning announcement thread");
        return stores.threads.update(thread.id, ThreadPatch::pinned(true)).await;
    }

    let thread = stores
        .threads
        .create(ThreadDraft::announcement(project_id))
        .await?;
    info!(thread_id = %thread.id, project_id = %project_id, "created announcement thread");
    Ok(thread)
}

/// Moves a direct thread under a project.
///
/// - If a project thread for (project, trade) already exists, the source
///   thread's messages are reassigned to it one by one and the source thread
///   is deleted. The existing thread is returned.
/// - Otherwise the source thread itself becomes the project thread and is
///   returned as re-read from the store.
///
/// Not atomic. If the delete fails after the messages moved, an empty source
/// thread is left behind and the error is returned. An unknown `thread_id`
/// yields `Ok(None)` and nothing is written.
pub async fn move_thread_to_project(
    stores: &Stores,
    config: &RulesConfig,
    thread_id: ThreadId,
    project_id: ProjectId,
    trade_id: ProfileId,
) -> Result<Option<Thread>, StoreError> {
    if find_thread(stores, thread_id).await?.is_none() {
        warn!(thread_id = %thread_id, project_id = %project_id, "cannot promote unknown thread");
        return Ok(None);
    }

    let target = stores
        .threads
        .filter(&ThreadFilter::project(project_id, trade_id))
        .await?
        .into_iter()
        .next();

    match target {
        Some(target) if target.id == thread_id => Ok(Some(target)),
        Some(target) => {
            let messages = stores
                .messages
                .filter(&MessageFilter::in_thread(thread_id))
                .await?;
            let store = stores.messages.clone();
            let target_id = target.id;
            let moved = for_each_bounded(messages, config.fanout_concurrency, move |message| {
                let store = store.clone();
                async move {
                    store
                        .update(message.id, MessagePatch::reassign(target_id))
                        .await
                        .map(|_| ())
                }
            })
            .await
            .inspect_err(|err| {
                warn!(thread_id = %thread_id, target_id = %target_id, error = %err, "message reassignment stopped early");
            })?;

            stores.threads.delete(thread_id).await.inspect_err(|err| {
                warn!(thread_id = %thread_id, target_id = %target_id, error = %err, "merged thread could not be deleted");
            })?;

            info!(thread_id = %thread_id, target_id = %target_id, moved, "merged direct thread into project thread");
            Ok(Some(target))
        }
        None => {
            stores
                .threads
                .update(thread_id, ThreadPatch::promote(project_id))
                .await?;
            info!(thread_id = %thread_id, project_id = %project_id, "converted direct thread to project thread");
            find_thread(stores, thread_id).await
        }
    }
}
