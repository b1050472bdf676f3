//! Thread record and the thread classifier.
//!
//! A thread is one of three kinds:
//! - `direct`: GC ↔ trade, not tied to a project (`project_id` is null)
//! - `project`: scoped to one (project, trade) pair
//! - `announcement`: one broadcast channel per project (`trade_profile_id` is null)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, SortKey, field_matches, nullable_matches};
use super::ids::{ProfileId, ProjectId, ThreadId};
use super::profile::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThreadType {
    Direct,
    Project,
    Announcement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: ThreadId,
    pub project_id: Option<ProjectId>,
    pub trade_profile_id: Option<ProfileId>,
    pub thread_type: ThreadType,
    pub pinned: bool,
    pub archived: bool,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_message_preview: Option<String>,
    pub unread_count_gc: u32,
    pub unread_count_trade: u32,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    pub fn is_direct(&self) -> bool {
        self.thread_type == ThreadType::Direct && self.project_id.is_none()
    }

    pub fn is_project_thread(&self) -> bool {
        self.thread_type == ThreadType::Project && self.project_id.is_some()
    }

    pub fn is_announcement(&self) -> bool {
        self.thread_type == ThreadType::Announcement && self.trade_profile_id.is_none()
    }

    /// `thread_type` とフィールドの null 性が一致しないレコードは `None`
    pub fn classify(&self) -> Option<ThreadType> {
        if self.is_direct() {
            Some(ThreadType::Direct)
        } else if self.is_project_thread() {
            Some(ThreadType::Project)
        } else if self.is_announcement() {
            Some(ThreadType::Announcement)
        } else {
            None
        }
    }

    /// Unread counter as seen by the given side of the conversation.
    pub fn unread_for(&self, role: Role) -> u32 {
        match role {
            Role::Gc => self.unread_count_gc,
            Role::Trade => self.unread_count_trade,
        }
    }
}

/// Fields for `create`. Use the constructors; they uphold the per-type
/// nullability rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadDraft {
    pub project_id: Option<ProjectId>,
    pub trade_profile_id: Option<ProfileId>,
    pub thread_type: ThreadType,
    pub pinned: bool,
    pub archived: bool,
}

impl ThreadDraft {
    pub fn direct(trade_id: ProfileId) -> Self {
        Self {
            project_id: None,
            trade_profile_id: Some(trade_id),
            thread_type: ThreadType::Direct,
            pinned: false,
            archived: false,
        }
    }

    pub fn project(project_id: ProjectId, trade_id: ProfileId) -> Self {
        Self {
            project_id: Some(project_id),
            trade_profile_id: Some(trade_id),
            thread_type: ThreadType::Project,
            pinned: false,
            archived: false,
        }
    }

    /// Announcement threads are always created pinned.
    pub fn announcement(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            trade_profile_id: None,
            thread_type: ThreadType::Announcement,
            pinned: true,
            archived: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadPatch {
    pub project_id: Option<ProjectId>,
    pub thread_type: Option<ThreadType>,
    pub pinned: Option<bool>,
    pub archived: Option<bool>,
    pub last_message_at: Option<DateTime<Utc>>,
    pub last_message_preview: Option<String>,
    pub unread_count_gc: Option<u32>,
    pub unread_count_trade: Option<u32>,
}

impl ThreadPatch {
    /// Promotion of a direct thread to a project thread.
    pub fn promote(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            thread_type: Some(ThreadType::Project),
            ..Self::default()
        }
    }

    pub fn pinned(pinned: bool) -> Self {
        Self {
            pinned: Some(pinned),
            ..Self::default()
        }
    }

    pub fn archived(archived: bool) -> Self {
        Self {
            archived: Some(archived),
            ..Self::default()
        }
    }

    pub fn unread(role: Role, count: u32) -> Self {
        match role {
            Role::Gc => Self {
                unread_count_gc: Some(count),
                ..Self::default()
            },
            Role::Trade => Self {
                unread_count_trade: Some(count),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadFilter {
    pub project_id: Option<ProjectId>,
    pub trade_profile_id: Option<ProfileId>,
    pub thread_type: Option<ThreadType>,
}

impl ThreadFilter {
    pub fn direct(trade_id: ProfileId) -> Self {
        Self {
            trade_profile_id: Some(trade_id),
            thread_type: Some(ThreadType::Direct),
            ..Self::default()
        }
    }

    pub fn project(project_id: ProjectId, trade_id: ProfileId) -> Self {
        Self {
            project_id: Some(project_id),
            trade_profile_id: Some(trade_id),
            thread_type: Some(ThreadType::Project),
        }
    }

    pub fn announcement(project_id: ProjectId) -> Self {
        Self {
            project_id: Some(project_id),
            thread_type: Some(ThreadType::Announcement),
            ..Self::default()
        }
    }
}

impl Entity for Thread {
    type Id = ThreadId;
    type Draft = ThreadDraft;
    type Patch = ThreadPatch;
    type Filter = ThreadFilter;

    const NAME: &'static str = "Thread";

    fn id(&self) -> ThreadId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: ThreadId, created_at: DateTime<Utc>, draft: ThreadDraft) -> Self {
        Self {
            id,
            project_id: draft.project_id,
            trade_profile_id: draft.trade_profile_id,
            thread_type: draft.thread_type,
            pinned: draft.pinned,
            archived: draft.archived,
            last_message_at: None,
            last_message_preview: None,
            unread_count_gc: 0,
            unread_count_trade: 0,
            created_at,
        }
    }

    fn apply(&mut self, patch: ThreadPatch) {
        if let Some(project_id) = patch.project_id {
            self.project_id = Some(project_id);
        }
        if let Some(thread_type) = patch.thread_type {
            self.thread_type = thread_type;
        }
        if let Some(pinned) = patch.pinned {
            self.pinned = pinned;
        }
        if let Some(archived) = patch.archived {
            self.archived = archived;
        }
        if let Some(at) = patch.last_message_at {
            self.last_message_at = Some(at);
        }
        if let Some(preview) = patch.last_message_preview {
            self.last_message_preview = Some(preview);
        }
        if let Some(count) = patch.unread_count_gc {
            self.unread_count_gc = count;
        }
        if let Some(count) = patch.unread_count_trade {
            self.unread_count_trade = count;
        }
    }

    fn matches(&self, filter: &ThreadFilter) -> bool {
        nullable_matches(&filter.project_id, &self.project_id)
            && nullable_matches(&filter.trade_profile_id, &self.trade_profile_id)
            && field_matches(&filter.thread_type, &self.thread_type)
    }

    fn sort_value(&self, key: SortKey) -> Option<DateTime<Utc>> {
        match key {
            SortKey::CreatedAt => Some(self.created_at),
            SortKey::LastMessageAt => self.last_message_at,
        }
    }
}
