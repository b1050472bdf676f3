//! Profiles, projects and the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, field_matches};
use super::ids::{ProfileId, ProjectId};

/// Account role. GCs own projects; trades are linked to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Gc,
    Trade,
}

impl Role {
    /// The other side of a GC ↔ trade conversation.
    pub fn counterpart(self) -> Self {
        match self {
            Role::Gc => Role::Trade,
            Role::Trade => Role::Gc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub email: String,
    pub role: Role,
    pub display_name: String,
    pub company_name: Option<String>,
    pub trade_category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    pub email: String,
    pub role: Role,
    pub display_name: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub trade_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub display_name: Option<String>,
    pub company_name: Option<String>,
    pub trade_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFilter {
    pub role: Option<Role>,
    pub email: Option<String>,
}

impl Entity for Profile {
    type Id = ProfileId;
    type Draft = ProfileDraft;
    type Patch = ProfilePatch;
    type Filter = ProfileFilter;

    const NAME: &'static str = "Profile";

    fn id(&self) -> ProfileId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: ProfileId, created_at: DateTime<Utc>, draft: ProfileDraft) -> Self {
        Self {
            id,
            email: draft.email,
            role: draft.role,
            display_name: draft.display_name,
            company_name: draft.company_name,
            trade_category: draft.trade_category,
            created_at,
        }
    }

    fn apply(&mut self, patch: ProfilePatch) {
        if let Some(name) = patch.display_name {
            self.display_name = name;
        }
        if let Some(company) = patch.company_name {
            self.company_name = Some(company);
        }
        if let Some(category) = patch.trade_category {
            self.trade_category = Some(category);
        }
    }

    fn matches(&self, filter: &ProfileFilter) -> bool {
        field_matches(&filter.role, &self.role) && field_matches(&filter.email, &self.email)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub gc_profile_id: ProfileId,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,
    pub gc_profile_id: ProfileId,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectFilter {
    pub gc_profile_id: Option<ProfileId>,
}

impl Entity for Project {
    type Id = ProjectId;
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;
    type Filter = ProjectFilter;

    const NAME: &'static str = "Project";

    fn id(&self) -> ProjectId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: ProjectId, created_at: DateTime<Utc>, draft: ProjectDraft) -> Self {
        Self {
            id,
            name: draft.name,
            gc_profile_id: draft.gc_profile_id,
            address: draft.address,
            created_at,
        }
    }

    fn apply(&mut self, patch: ProjectPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = Some(address);
        }
    }

    fn matches(&self, filter: &ProjectFilter) -> bool {
        field_matches(&filter.gc_profile_id, &self.gc_profile_id)
    }
}

/// Identity returned by the auth collaborator's `me()`. Email-keyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub full_name: Option<String>,
}
