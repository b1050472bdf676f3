//! Rolodex links, project ↔ trade links and the current profile.
//!
//! The store offers no server-side join, so the lookups here resolve link
//! rows first and cross-reference them against a full listing client-side.

use std::collections::HashSet;

use tracing::{debug, info};

use crate::domain::{
    Profile, ProfileId, Project, ProjectId, ProjectTradeLink, ProjectTradeLinkDraft,
    ProjectTradeLinkFilter, Role, RolodexLink, RolodexLinkDraft, RolodexLinkFilter,
    RolodexSource, StoreError,
};
use crate::ports::{AuthProvider, Stores};

/// Returns `Ok(None)` without calling the store when either id is missing.
pub async fn ensure_rolodex_link(
    stores: &Stores,
    gc_id: Option<ProfileId>,
    trade_id: Option<ProfileId>,
    source: RolodexSource,
) -> Result<Option<RolodexLink>, StoreError> {
    let (Some(gc_id), Some(trade_id)) = (gc_id, trade_id) else {
        debug!("rolodex link skipped: missing profile id");
        return Ok(None);
    };

    let existing = stores
        .rolodex_links
        .filter(&RolodexLinkFilter {
            gc_profile_id: Some(gc_id),
            trade_profile_id: Some(trade_id),
        })
        .await?;
    if let Some(link) = existing.into_iter().next() {
        return Ok(Some(link));
    }

    let link = stores
        .rolodex_links
        .create(RolodexLinkDraft {
            gc_profile_id: gc_id,
            trade_profile_id: trade_id,
            source,
        })
        .await?;
    info!(gc_id = %gc_id, trade_id = %trade_id, ?source, "added trade to rolodex");
    Ok(Some(link))
}

/// Trade profiles in the GC's rolodex, in profile listing order.
pub async fn get_linked_trades(stores: &Stores, gc_id: ProfileId) -> Result<Vec<Profile>, StoreError> {
    let linked: HashSet<ProfileId> = stores
        .rolodex_links
        .filter(&RolodexLinkFilter {
            gc_profile_id: Some(gc_id),
            ..RolodexLinkFilter::default()
        })
        .await?
        .into_iter()
        .map(|link| link.trade_profile_id)
        .collect();
    if linked.is_empty() {
        return Ok(Vec::new());
    }

    let profiles = stores.profiles.list(None).await?;
    Ok(profiles
        .into_iter()
        .filter(|p| p.role == Role::Trade && linked.contains(&p.id))
        .collect())
}

/// Find-or-create the (project, trade) link that makes the trade an
/// announcement recipient.
pub async fn link_trade_to_project(
    stores: &Stores,
    project_id: ProjectId,
    contact_id: ProfileId,
) -> Result<ProjectTradeLink, StoreError> {
    let existing = stores
        .project_trade_links
        .filter(&ProjectTradeLinkFilter {
            project_id: Some(project_id),
            contact_id: Some(contact_id),
        })
        .await?;
    if let Some(link) = existing.into_iter().next() {
        return Ok(link);
    }

    let link = stores
        .project_trade_links
        .create(ProjectTradeLinkDraft {
            project_id,
            contact_id,
        })
        .await?;
    info!(project_id = %project_id, contact_id = %contact_id, "linked trade to project");
    Ok(link)
}

/// Projects the trade is linked to.
pub async fn get_trade_projects(stores: &Stores, trade_id: ProfileId) -> Result<Vec<Project>, StoreError> {
    let linked: HashSet<ProjectId> = stores
        .project_trade_links
        .filter(&ProjectTradeLinkFilter {
            contact_id: Some(trade_id),
            ..ProjectTradeLinkFilter::default()
        })
        .await?
        .into_iter()
        .map(|link| link.project_id)
        .collect();
    if linked.is_empty() {
        return Ok(Vec::new());
    }

    let projects = stores.projects.list(None).await?;
    Ok(projects
        .into_iter()
        .filter(|p| linked.contains(&p.id))
        .collect())
}

/// Profile of the signed-in user, matched on email (case-insensitive).
pub async fn current_profile(
    stores: &Stores,
    auth: &dyn AuthProvider,
) -> Result<Option<Profile>, StoreError> {
    let user = auth.me().await?;
    let profiles = stores.profiles.list(None).await?;
    Ok(profiles
        .into_iter()
        .find(|p| p.email.eq_ignore_ascii_case(&user.email)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::testing::{fixture, profile, project};
    use crate::domain::User;
    use crate::impls::StaticAuth;

    #[tokio::test]
    async fn rolodex_link_is_created_once() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let trade = profile(&stores, Role::Trade, "Plasterer").await;

        let first = ensure_rolodex_link(&stores, Some(gc.id), Some(trade.id), RolodexSource::Manual)
            .await
            .unwrap()
            .unwrap();
        let second = ensure_rolodex_link(&stores, Some(gc.id), Some(trade.id), RolodexSource::Invite)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first.id, second.id);
        // the first source tag sticks
        assert_eq!(second.source, RolodexSource::Manual);
        assert_eq!(stores.rolodex_links.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rolodex_link_requires_both_ids() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;

        let missing_trade = ensure_rolodex_link(&stores, Some(gc.id), None, RolodexSource::Manual)
            .await
            .unwrap();
        let missing_gc = ensure_rolodex_link(&stores, None, Some(gc.id), RolodexSource::Manual)
            .await
            .unwrap();

        assert!(missing_trade.is_none());
        assert!(missing_gc.is_none());
        assert!(stores.rolodex_links.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn linked_trades_join_keeps_only_linked_trade_profiles() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let other_gc = profile(&stores, Role::Gc, "Rival").await;
        let plumber = profile(&stores, Role::Trade, "Plumber").await;
        let roofer = profile(&stores, Role::Trade, "Roofer").await;
        let stranger = profile(&stores, Role::Trade, "Stranger").await;

        ensure_rolodex_link(&stores, Some(gc.id), Some(plumber.id), RolodexSource::Manual)
            .await
            .unwrap();
        ensure_rolodex_link(&stores, Some(gc.id), Some(roofer.id), RolodexSource::Project)
            .await
            .unwrap();
        // a link pointing at a GC profile is not a trade
        ensure_rolodex_link(&stores, Some(gc.id), Some(other_gc.id), RolodexSource::Manual)
            .await
            .unwrap();
        ensure_rolodex_link(&stores, Some(other_gc.id), Some(stranger.id), RolodexSource::Manual)
            .await
            .unwrap();

        let trades = get_linked_trades(&stores, gc.id).await.unwrap();

        assert_eq!(trades, vec![plumber, roofer]);
        assert!(get_linked_trades(&stores, stranger.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn project_link_is_deduplicated() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let trade = profile(&stores, Role::Trade, "Excavator").await;
        let job = project(&stores, gc.id, "Basement").await;

        let a = link_trade_to_project(&stores, job.id, trade.id).await.unwrap();
        let b = link_trade_to_project(&stores, job.id, trade.id).await.unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(stores.project_trade_links.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn trade_projects_are_joined_from_links() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let trade = profile(&stores, Role::Trade, "Surveyor").await;
        let north = project(&stores, gc.id, "North").await;
        let _south = project(&stores, gc.id, "South").await;
        let east = project(&stores, gc.id, "East").await;
        link_trade_to_project(&stores, east.id, trade.id).await.unwrap();
        link_trade_to_project(&stores, north.id, trade.id).await.unwrap();

        let projects = get_trade_projects(&stores, trade.id).await.unwrap();

        assert_eq!(projects, vec![north, east]);
    }

    #[tokio::test]
    async fn current_profile_matches_email_case_insensitively() {
        let (stores, _) = fixture();
        let gc = profile(&stores, Role::Gc, "Builder").await;
        let auth = StaticAuth::signed_in(User {
            email: "BUILDER@Example.com".into(),
            full_name: None,
        });

        let me = current_profile(&stores, &auth).await.unwrap();
        assert_eq!(me, Some(gc));

        let nobody = StaticAuth::signed_in(User {
            email: "ghost@example.com".into(),
            full_name: None,
        });
        assert_eq!(current_profile(&stores, &nobody).await.unwrap(), None);
    }

    #[tokio::test]
    async fn current_profile_propagates_auth_failure() {
        let (stores, _) = fixture();
        let err = current_profile(&stores, &StaticAuth::signed_out())
            .await
            .unwrap_err();
        assert_eq!(err, StoreError::Unauthenticated);
    }
}
