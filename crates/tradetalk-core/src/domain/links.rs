//! Association rows: project ↔ trade and GC ↔ trade (rolodex).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, field_matches};
use super::ids::{ProfileId, ProjectId, ProjectTradeLinkId, RolodexLinkId};

/// A trade linked to a project. These rows are the announcement fan-out targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTradeLink {
    pub id: ProjectTradeLinkId,
    pub project_id: ProjectId,
    pub contact_id: ProfileId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTradeLinkDraft {
    pub project_id: ProjectId,
    pub contact_id: ProfileId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectTradeLinkFilter {
    pub project_id: Option<ProjectId>,
    pub contact_id: Option<ProfileId>,
}

impl Entity for ProjectTradeLink {
    type Id = ProjectTradeLinkId;
    type Draft = ProjectTradeLinkDraft;
    type Patch = ();
    type Filter = ProjectTradeLinkFilter;

    const NAME: &'static str = "ProjectTradeLink";

    fn id(&self) -> ProjectTradeLinkId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(
        id: ProjectTradeLinkId,
        created_at: DateTime<Utc>,
        draft: ProjectTradeLinkDraft,
    ) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            contact_id: draft.contact_id,
            created_at,
        }
    }

    fn apply(&mut self, _patch: ()) {}

    fn matches(&self, filter: &ProjectTradeLinkFilter) -> bool {
        field_matches(&filter.project_id, &self.project_id)
            && field_matches(&filter.contact_id, &self.contact_id)
    }
}

/// How a trade ended up in a GC's rolodex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolodexSource {
    Manual,
    Project,
    Invite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolodexLink {
    pub id: RolodexLinkId,
    pub gc_profile_id: ProfileId,
    pub trade_profile_id: ProfileId,
    pub source: RolodexSource,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolodexLinkDraft {
    pub gc_profile_id: ProfileId,
    pub trade_profile_id: ProfileId,
    pub source: RolodexSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolodexLinkFilter {
    pub gc_profile_id: Option<ProfileId>,
    pub trade_profile_id: Option<ProfileId>,
}

impl Entity for RolodexLink {
    type Id = RolodexLinkId;
    type Draft = RolodexLinkDraft;
    type Patch = ();
    type Filter = RolodexLinkFilter;

    const NAME: &'static str = "RolodexLink";

    fn id(&self) -> RolodexLinkId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: RolodexLinkId, created_at: DateTime<Utc>, draft: RolodexLinkDraft) -> Self {
        Self {
            id,
            gc_profile_id: draft.gc_profile_id,
            trade_profile_id: draft.trade_profile_id,
            source: draft.source,
            created_at,
        }
    }

    fn apply(&mut self, _patch: ()) {}

    fn matches(&self, filter: &RolodexLinkFilter) -> bool {
        field_matches(&filter.gc_profile_id, &self.gc_profile_id)
            && field_matches(&filter.trade_profile_id, &self.trade_profile_id)
    }
}
