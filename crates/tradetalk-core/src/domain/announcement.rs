//! Announcements and their per-trade read receipts.

use std::convert::Infallible;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, field_matches};
use super::ids::{AnnouncementId, ProfileId, ProjectId, ReceiptId};

/// Project-wide broadcast. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: AnnouncementId,
    pub project_id: ProjectId,
    pub created_by_user_id: String,
    pub created_by_profile_id: ProfileId,
    pub body: String,
    pub pinned: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementDraft {
    pub project_id: ProjectId,
    pub created_by_user_id: String,
    pub created_by_profile_id: ProfileId,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnouncementFilter {
    pub project_id: Option<ProjectId>,
}

impl Entity for Announcement {
    type Id = AnnouncementId;
    type Draft = AnnouncementDraft;
    // no update path: an `Infallible` patch cannot be constructed
    type Patch = Infallible;
    type Filter = AnnouncementFilter;

    const NAME: &'static str = "Announcement";

    fn id(&self) -> AnnouncementId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: AnnouncementId, created_at: DateTime<Utc>, draft: AnnouncementDraft) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            created_by_user_id: draft.created_by_user_id,
            created_by_profile_id: draft.created_by_profile_id,
            body: draft.body,
            pinned: true,
            created_at,
        }
    }

    fn apply(&mut self, patch: Infallible) {
        match patch {}
    }

    fn matches(&self, filter: &AnnouncementFilter) -> bool {
        field_matches(&filter.project_id, &self.project_id)
    }
}

/// One receipt per (announcement, trade). `read_at` goes from null to a
/// timestamp once and stays there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementReceipt {
    pub id: ReceiptId,
    pub announcement_id: AnnouncementId,
    pub project_id: ProjectId,
    pub trade_profile_id: ProfileId,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl AnnouncementReceipt {
    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDraft {
    pub announcement_id: AnnouncementId,
    pub project_id: ProjectId,
    pub trade_profile_id: ProfileId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptPatch {
    pub read_at: Option<DateTime<Utc>>,
}

impl ReceiptPatch {
    pub fn read_at(at: DateTime<Utc>) -> Self {
        Self { read_at: Some(at) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptFilter {
    pub announcement_id: Option<AnnouncementId>,
    pub project_id: Option<ProjectId>,
    pub trade_profile_id: Option<ProfileId>,
}

impl ReceiptFilter {
    pub fn for_trade(project_id: ProjectId, trade_id: ProfileId) -> Self {
        Self {
            project_id: Some(project_id),
            trade_profile_id: Some(trade_id),
            ..Self::default()
        }
    }

    pub fn for_announcement(announcement_id: AnnouncementId) -> Self {
        Self {
            announcement_id: Some(announcement_id),
            ..Self::default()
        }
    }
}

impl Entity for AnnouncementReceipt {
    type Id = ReceiptId;
    type Draft = ReceiptDraft;
    type Patch = ReceiptPatch;
    type Filter = ReceiptFilter;

    const NAME: &'static str = "AnnouncementReceipt";

    fn id(&self) -> ReceiptId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: ReceiptId, created_at: DateTime<Utc>, draft: ReceiptDraft) -> Self {
        Self {
            id,
            announcement_id: draft.announcement_id,
            project_id: draft.project_id,
            trade_profile_id: draft.trade_profile_id,
            read_at: None,
            created_at,
        }
    }

    fn apply(&mut self, patch: ReceiptPatch) {
        // no un-read: the first timestamp wins
        if self.read_at.is_none() {
            self.read_at = patch.read_at;
        }
    }

    fn matches(&self, filter: &ReceiptFilter) -> bool {
        field_matches(&filter.announcement_id, &self.announcement_id)
            && field_matches(&filter.project_id, &self.project_id)
            && field_matches(&filter.trade_profile_id, &self.trade_profile_id)
    }
}
