use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, field_matches};
use super::ids::{MessageId, ProfileId, ThreadId};
use super::profile::Role;

/// A message belongs to exactly one thread. `thread_id` only changes when
/// a direct thread is merged into an existing project thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub thread_id: ThreadId,
    pub sender_profile_id: ProfileId,
    pub sender_role: Role,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub thread_id: ThreadId,
    pub sender_profile_id: ProfileId,
    pub sender_role: Role,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePatch {
    pub thread_id: Option<ThreadId>,
}

impl MessagePatch {
    pub fn reassign(thread_id: ThreadId) -> Self {
        Self {
            thread_id: Some(thread_id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub thread_id: Option<ThreadId>,
}

impl MessageFilter {
    pub fn in_thread(thread_id: ThreadId) -> Self {
        Self {
            thread_id: Some(thread_id),
        }
    }
}

impl Entity for Message {
    type Id = MessageId;
    type Draft = MessageDraft;
    type Patch = MessagePatch;
    type Filter = MessageFilter;

    const NAME: &'static str = "Message";

    fn id(&self) -> MessageId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: MessageId, created_at: DateTime<Utc>, draft: MessageDraft) -> Self {
        Self {
            id,
            thread_id: draft.thread_id,
            sender_profile_id: draft.sender_profile_id,
            sender_role: draft.sender_role,
            body: draft.body,
            created_at,
        }
    }

    fn apply(&mut self, patch: MessagePatch) {
        if let Some(thread_id) = patch.thread_id {
            self.thread_id = thread_id;
        }
    }

    fn matches(&self, filter: &MessageFilter) -> bool {
        field_matches(&filter.thread_id, &self.thread_id)
    }
}
