//! Posting messages and the per-thread inbox state (unread counters,
//! last-message preview, pin/archive).

use tracing::{debug, info};

use super::threads::find_thread;
use crate::config::RulesConfig;
use crate::domain::{
    Entity, Message, MessageDraft, MessageFilter, ProfileId, Role, SortKey, SortSpec,
    StoreError, Thread, ThreadId, ThreadPatch,
};
use crate::ports::Stores;

/// Creates the message, then stamps the thread with the preview and bumps
/// the unread counter of the side that did not send it.
pub async fn post_message(
    stores: &Stores,
    config: &RulesConfig,
    thread_id: ThreadId,
    sender_profile_id: ProfileId,
    sender_role: Role,
    body: impl Into<String>,
) -> Result<Message, StoreError> {
    let thread = find_thread(stores, thread_id)
        .await?
        .ok_or_else(|| StoreError::not_found(Thread::NAME, thread_id))?;

    let message = stores
        .messages
        .create(MessageDraft {
            thread_id,
            sender_profile_id,
            sender_role,
            body: body.into(),
        })
        .await?;

    let recipient = sender_role.counterpart();
    let unread = thread.unread_for(recipient).saturating_add(1);
    let patch = ThreadPatch {
        last_message_at: Some(message.created_at),
        last_message_preview: Some(message.body.chars().take(config.preview_len).collect()),
        ..ThreadPatch::unread(recipient, unread)
    };
    stores.threads.update(thread_id, patch).await?;

    info!(thread_id = %thread_id, message_id = %message.id, sender = %sender_profile_id, "posted message");
    Ok(message)
}

/// Messages of a thread, oldest first.
pub async fn list_thread_messages(
    stores: &Stores,
    thread_id: ThreadId,
) -> Result<Vec<Message>, StoreError> {
    let mut messages = stores
        .messages
        .filter(&MessageFilter::in_thread(thread_id))
        .await?;
    let order = SortSpec::oldest_first(SortKey::CreatedAt);
    messages.sort_by(|a, b| order.compare(a, b));
    Ok(messages)
}

/// Zeroes the reader's unread counter. No write when it is already zero.
pub async fn mark_thread_read(
    stores: &Stores,
    thread_id: ThreadId,
    reader: Role,
) -> Result<Thread, StoreError> {
    let thread = find_thread(stores, thread_id)
        .await?
        .ok_or_else(|| StoreError::not_found(Thread::NAME, thread_id))?;
    if thread.unread_for(reader) == 0 {
        debug!(thread_id = %thread_id, ?reader, "thread already read");
        return Ok(thread);
    }
    stores
        .threads
        .update(thread_id, ThreadPatch::unread(reader, 0))
        .await
}

pub async fn set_thread_pinned(
    stores: &Stores,
    thread_id: ThreadId,
    pinned: bool,
) -> Result<Thread, StoreError> {
    stores
        .threads
        .update(thread_id, ThreadPatch::pinned(pinned))
        .await
}

pub async fn set_thread_archived(
    stores: &Stores,
    thread_id: ThreadId,
    archived: bool,
) -> Result<Thread, StoreError> {
    stores
        .threads
        .update(thread_id, ThreadPatch::archived(archived))
        .await
}

/// Pinned threads first, then most recent activity; quiet threads last.
pub async fn list_inbox(stores: &Stores, include_archived: bool) -> Result<Vec<Thread>, StoreError> {
    let mut threads = stores
        .threads
        .list(Some(SortSpec::newest_first(SortKey::LastMessageAt)))
        .await?;
    if !include_archived {
        threads.retain(|t| !t.archived);
    }
    threads.sort_by_key(|t| !t.pinned);
    Ok(threads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{fixture, profile, project};
    use crate::app::threads::{
        ensure_announcement_thread, ensure_project_thread, find_or_create_direct_thread,
    };
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[case::gc_sends(Role::Gc, 0, 1)]
    #[case::trade_sends(Role::Trade, 1, 0)]
    #[tokio::test]
    async fn post_bumps_the_other_sides_counter(
        #[case] sender_role: Role,
        #[case] expected_gc: u32,
        #[case] expected_trade: u32,
    ) {
        let (stores, _) = fixture();
        let sender = profile(&stores, sender_role, "Sender").await;
        let trade = profile(&stores, Role::Trade, "Electrician").await;
        let thread = find_or_create_direct_thread(&stores, trade.id).await.unwrap();

        let message = post_message(
            &stores,
            &RulesConfig::default(),
            thread.id,
            sender.id,
            sender_role,
            "Panel is in",
        )
        .await
        .unwrap();

        let thread = find_thread(&stores, thread.id).await.unwrap().unwrap();
        assert_eq!(thread.unread_count_gc, expected_gc);
        assert_eq!(thread.unread_count_trade, expected_trade);
        assert_eq!(thread.last_message_at, Some(message.created_at));
        assert_eq!(thread.last_message_preview.as_deref(), Some("Panel is in"));
    }

    #[tokio::test]
    async fn preview_is_truncated_by_characters() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let trade = profile(&stores, Role::Trade, "Carpenter").await;
        let thread = find_or_create_direct_thread(&stores, trade.id).await.unwrap();
        let config = RulesConfig {
            preview_len: 5,
            ..RulesConfig::default()
        };

        let message = post_message(&stores, &config, thread.id, gc.id, Role::Gc, "Ångström units")
            .await
            .unwrap();

        let thread = find_thread(&stores, thread.id).await.unwrap().unwrap();
        assert_eq!(thread.last_message_preview.as_deref(), Some("Ångst"));
        assert_eq!(message.body, "Ångström units");
    }

    #[tokio::test]
    async fn post_to_unknown_thread_creates_nothing() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let ghost = ThreadId::from(ulid::Ulid::new());

        let err = post_message(&stores, &RulesConfig::default(), ghost, gc.id, Role::Gc, "hello?")
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::NotFound { entity: "Thread", .. }));
        assert!(stores.messages.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_read_zeroes_only_the_reader() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let trade = profile(&stores, Role::Trade, "Hvac").await;
        let thread = find_or_create_direct_thread(&stores, trade.id).await.unwrap();
        let config = RulesConfig::default();
        post_message(&stores, &config, thread.id, gc.id, Role::Gc, "one").await.unwrap();
        post_message(&stores, &config, thread.id, gc.id, Role::Gc, "two").await.unwrap();
        post_message(&stores, &config, thread.id, trade.id, Role::Trade, "ack").await.unwrap();

        let read = mark_thread_read(&stores, thread.id, Role::Trade).await.unwrap();

        assert_eq!(read.unread_count_trade, 0);
        assert_eq!(read.unread_count_gc, 1);

        let again = mark_thread_read(&stores, thread.id, Role::Trade).await.unwrap();
        assert_eq!(again, read);
    }

    #[tokio::test]
    async fn messages_are_listed_oldest_first() {
        let (stores, clock) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let trade = profile(&stores, Role::Trade, "Paver").await;
        let thread = find_or_create_direct_thread(&stores, trade.id).await.unwrap();
        let config = RulesConfig::default();

        let first = post_message(&stores, &config, thread.id, gc.id, Role::Gc, "first").await.unwrap();
        clock.advance(Duration::minutes(1));
        let second = post_message(&stores, &config, thread.id, trade.id, Role::Trade, "second")
            .await
            .unwrap();

        let listed = list_thread_messages(&stores, thread.id).await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[tokio::test]
    async fn inbox_orders_pinned_then_recent_and_hides_archived() {
        let (stores, clock) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let a = profile(&stores, Role::Trade, "Alpha").await;
        let b = profile(&stores, Role::Trade, "Bravo").await;
        let c = profile(&stores, Role::Trade, "Charlie").await;
        let job = project(&stores, gc.id, "Depot").await;
        let config = RulesConfig::default();

        let quiet = find_or_create_direct_thread(&stores, a.id).await.unwrap();
        let older = find_or_create_direct_thread(&stores, b.id).await.unwrap();
        let newer = ensure_project_thread(&stores, job.id, b.id).await.unwrap();
        let archived = find_or_create_direct_thread(&stores, c.id).await.unwrap();
        let announcements = ensure_announcement_thread(&stores, job.id).await.unwrap();

        post_message(&stores, &config, older.id, gc.id, Role::Gc, "older").await.unwrap();
        clock.advance(Duration::minutes(5));
        post_message(&stores, &config, newer.id, gc.id, Role::Gc, "newer").await.unwrap();
        post_message(&stores, &config, archived.id, gc.id, Role::Gc, "gone").await.unwrap();
        set_thread_archived(&stores, archived.id, true).await.unwrap();

        let inbox: Vec<ThreadId> = list_inbox(&stores, false)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(inbox, vec![announcements.id, newer.id, older.id, quiet.id]);

        let everything = list_inbox(&stores, true).await.unwrap();
        assert_eq!(everything.len(), 5);
    }

    #[tokio::test]
    async fn pin_and_unpin() {
        let (stores, _) = fixture();
        let trade = profile(&stores, Role::Trade, "Glazier").await;
        let thread = find_or_create_direct_thread(&stores, trade.id).await.unwrap();

        assert!(set_thread_pinned(&stores, thread.id, true).await.unwrap().pinned);
        assert!(!set_thread_pinned(&stores, thread.id, false).await.unwrap().pinned);
    }
}
