//! Announcement broadcast and read receipts.

use tracing::{debug, info, warn};

use super::fanout::for_each_bounded;
use crate::config::RulesConfig;
use crate::domain::{
    Announcement, AnnouncementDraft, AnnouncementFilter, ProfileId, ProjectId,
    ProjectTradeLinkFilter, ReceiptDraft, ReceiptFilter, ReceiptPatch, SortKey, SortSpec,
    StoreError,
};
use crate::ports::{Clock, Stores};

/// Creates a pinned announcement and one unread receipt per trade linked to
/// the project.
///
/// The fan-out is not atomic. When a receipt cannot be created the error is
/// returned; the trades handled before it keep their receipts and the rest
/// get none, so they never see the announcement as unread.
pub async fn create_announcement_for_project(
    stores: &Stores,
    config: &RulesConfig,
    project_id: ProjectId,
    user_id: &str,
    profile_id: ProfileId,
    body: impl Into<String>,
) -> Result<Announcement, StoreError> {
    let announcement = stores
        .announcements
        .create(AnnouncementDraft {
            project_id,
            created_by_user_id: user_id.to_string(),
            created_by_profile_id: profile_id,
            body: body.into(),
        })
        .await?;

    let links = stores
        .project_trade_links
        .filter(&ProjectTradeLinkFilter {
            project_id: Some(project_id),
            ..ProjectTradeLinkFilter::default()
        })
        .await?;
    let targets = links.len();

    let receipts = stores.receipts.clone();
    let announcement_id = announcement.id;
    let created = for_each_bounded(links, config.fanout_concurrency, move |link| {
        let receipts = receipts.clone();
        async move {
            receipts
                .create(ReceiptDraft {
                    announcement_id,
                    project_id,
                    trade_profile_id: link.contact_id,
                })
                .await
                .map(|_| ())
        }
    })
    .await
    .inspect_err(|err| {
        warn!(announcement_id = %announcement_id, project_id = %project_id, targets, error = %err, "receipt fan-out stopped early");
    })?;

    info!(announcement_id = %announcement_id, project_id = %project_id, receipts = created, "announcement broadcast");
    Ok(announcement)
}

/// Announcements of a project, newest first.
pub async fn list_project_announcements(
    stores: &Stores,
    project_id: ProjectId,
) -> Result<Vec<Announcement>, StoreError> {
    let mut announcements = stores
        .announcements
        .filter(&AnnouncementFilter {
            project_id: Some(project_id),
        })
        .await?;
    let order = SortSpec::newest_first(SortKey::CreatedAt);
    announcements.sort_by(|a, b| order.compare(a, b));
    Ok(announcements)
}

pub async fn get_unread_announcement_count(
    stores: &Stores,
    project_id: ProjectId,
    trade_id: ProfileId,
) -> Result<usize, StoreError> {
    let receipts = stores
        .receipts
        .filter(&ReceiptFilter::for_trade(project_id, trade_id))
        .await?;
    Ok(receipts.iter().filter(|r| r.is_unread()).count())
}

/// Marks every unread receipt of the (project, trade) pair as read now.
/// Returns how many were updated; a second call updates nothing.
pub async fn mark_announcements_read(
    stores: &Stores,
    clock: &dyn Clock,
    config: &RulesConfig,
    project_id: ProjectId,
    trade_id: ProfileId,
) -> Result<usize, StoreError> {
    let unread: Vec<_> = stores
        .receipts
        .filter(&ReceiptFilter::for_trade(project_id, trade_id))
        .await?
        .into_iter()
        .filter(|r| r.is_unread())
        .collect();
    if unread.is_empty() {
        debug!(project_id = %project_id, trade_id = %trade_id, "no unread announcements");
        return Ok(0);
    }

    let now = clock.now();
    let receipts = stores.receipts.clone();
    let marked = for_each_bounded(unread, config.fanout_concurrency, move |receipt| {
        let receipts = receipts.clone();
        async move {
            receipts
                .update(receipt.id, ReceiptPatch::read_at(now))
                .await
                .map(|_| ())
        }
    })
    .await
    .inspect_err(|err| {
        warn!(project_id = %project_id, trade_id = %trade_id, error = %err, "marking receipts stopped early");
    })?;

    info!(project_id = %project_id, trade_id = %trade_id, marked, "marked announcements read");
    Ok(marked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::contacts::link_trade_to_project;
    use crate::app::testing::{fixture, profile, project};
    use crate::domain::{Profile, Project, Role};
    use crate::impls::FaultyEntityStore;
    use chrono::Duration;
    use rstest::rstest;
    use std::sync::Arc;

    async fn linked_project(stores: &Stores, trades: usize) -> (Profile, Project, Vec<Profile>) {
        let gc = profile(stores, Role::Gc, "Builder").await;
        let job = project(stores, gc.id, "Tower").await;
        let mut linked = Vec::new();
        for i in 0..trades {
            let trade = profile(stores, Role::Trade, &format!("Trade{i}")).await;
            link_trade_to_project(stores, job.id, trade.id).await.unwrap();
            linked.push(trade);
        }
        (gc, job, linked)
    }

    #[rstest]
    #[case::none(0)]
    #[case::one(1)]
    #[case::several(5)]
    #[tokio::test]
    async fn broadcast_creates_one_unread_receipt_per_linked_trade(#[case] trades: usize) {
        let (stores, _) = fixture();
        let (gc, job, linked) = linked_project(&stores, trades).await;

        let announcement = create_announcement_for_project(
            &stores,
            &RulesConfig::default(),
            job.id,
            "builder@example.com",
            gc.id,
            "Crane delivery Tuesday",
        )
        .await
        .unwrap();

        assert!(announcement.pinned);
        let receipts = stores
            .receipts
            .filter(&ReceiptFilter::for_announcement(announcement.id))
            .await
            .unwrap();
        assert_eq!(receipts.len(), trades);
        assert!(receipts.iter().all(|r| r.read_at.is_none()));
        for trade in &linked {
            assert_eq!(
                get_unread_announcement_count(&stores, job.id, trade.id).await.unwrap(),
                1
            );
        }
    }

    #[tokio::test]
    async fn broadcast_ignores_other_projects_links() {
        let (stores, _) = fixture();
        let (gc, job, _) = linked_project(&stores, 2).await;
        let other = project(&stores, gc.id, "Annex").await;
        let outsider = profile(&stores, Role::Trade, "Outsider").await;
        link_trade_to_project(&stores, other.id, outsider.id).await.unwrap();

        create_announcement_for_project(&stores, &RulesConfig::default(), job.id, "u", gc.id, "hi")
            .await
            .unwrap();

        assert_eq!(stores.receipts.list(None).await.unwrap().len(), 2);
        assert_eq!(
            get_unread_announcement_count(&stores, other.id, outsider.id).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn partial_fanout_failure_silently_misses_later_trades() {
        let (mut stores, _) = fixture();
        let (gc, job, linked) = linked_project(&stores, 4).await;
        stores.receipts =
            Arc::new(FaultyEntityStore::new(stores.receipts.clone()).fail_create_after(2));

        let err = create_announcement_for_project(
            &stores,
            &RulesConfig::default(),
            job.id,
            "u",
            gc.id,
            "Inspection moved",
        )
        .await
        .unwrap_err();

        assert!(err.is_transient());
        // the announcement itself survives
        assert_eq!(list_project_announcements(&stores, job.id).await.unwrap().len(), 1);
        let counts = [
            get_unread_announcement_count(&stores, job.id, linked[0].id).await.unwrap(),
            get_unread_announcement_count(&stores, job.id, linked[1].id).await.unwrap(),
            get_unread_announcement_count(&stores, job.id, linked[2].id).await.unwrap(),
            get_unread_announcement_count(&stores, job.id, linked[3].id).await.unwrap(),
        ];
        assert_eq!(counts, [1, 1, 0, 0]);
    }

    #[tokio::test]
    async fn mark_read_clears_count_and_is_idempotent() {
        let (stores, clock) = fixture();
        let (gc, job, linked) = linked_project(&stores, 2).await;
        let config = RulesConfig::default();
        for body in ["one", "two", "three"] {
            create_announcement_for_project(&stores, &config, job.id, "u", gc.id, body)
                .await
                .unwrap();
        }
        let trade = &linked[0];
        assert_eq!(get_unread_announcement_count(&stores, job.id, trade.id).await.unwrap(), 3);

        clock.advance(Duration::hours(2));
        let marked = mark_announcements_read(&stores, &*clock, &config, job.id, trade.id)
            .await
            .unwrap();
        assert_eq!(marked, 3);
        assert_eq!(get_unread_announcement_count(&stores, job.id, trade.id).await.unwrap(), 0);

        let read_at: Vec<_> = stores
            .receipts
            .filter(&ReceiptFilter::for_trade(job.id, trade.id))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.read_at)
            .collect();
        assert!(read_at.iter().all(|at| *at == Some(clock.now())));

        clock.advance(Duration::hours(1));
        let again = mark_announcements_read(&stores, &*clock, &config, job.id, trade.id)
            .await
            .unwrap();
        assert_eq!(again, 0);
        assert_eq!(get_unread_announcement_count(&stores, job.id, trade.id).await.unwrap(), 0);

        // other trades untouched
        assert_eq!(
            get_unread_announcement_count(&stores, job.id, linked[1].id).await.unwrap(),
            3
        );
    }

    #[tokio::test]
    async fn interrupted_mark_read_keeps_earlier_receipts_read() {
        let (mut stores, clock) = fixture();
        let (gc, job, linked) = linked_project(&stores, 1).await;
        let config = RulesConfig::default();
        for body in ["one", "two", "three"] {
            create_announcement_for_project(&stores, &config, job.id, "u", gc.id, body)
                .await
                .unwrap();
        }
        stores.receipts =
            Arc::new(FaultyEntityStore::new(stores.receipts.clone()).fail_update_after(1));
        let trade = &linked[0];

        let err = mark_announcements_read(&stores, &*clock, &config, job.id, trade.id)
            .await
            .unwrap_err();

        assert!(err.is_transient());
        let receipts = stores
            .receipts
            .filter(&ReceiptFilter::for_trade(job.id, trade.id))
            .await
            .unwrap();
        assert_eq!(receipts.iter().filter(|r| !r.is_unread()).count(), 1);
        assert_eq!(get_unread_announcement_count(&stores, job.id, trade.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn announcements_list_newest_first() {
        let (stores, clock) = fixture();
        let (gc, job, _) = linked_project(&stores, 0).await;
        let config = RulesConfig::default();

        let first = create_announcement_for_project(&stores, &config, job.id, "u", gc.id, "first")
            .await
            .unwrap();
        clock.advance(Duration::minutes(1));
        let second = create_announcement_for_project(&stores, &config, job.id, "u", gc.id, "second")
            .await
            .unwrap();

        let listed = list_project_announcements(&stores, job.id).await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }
}
