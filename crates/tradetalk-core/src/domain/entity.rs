//! Entity trait: the record shape shared by every store-backed type.
//!
//! The external store is schemaless; on our side every entity type declares
//! its id, creation draft, partial patch and match-field filter explicitly.
//! Adapters validate responses against these types at the boundary.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub trait Entity: Clone + fmt::Debug + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + fmt::Display + From<Ulid> + Send + Sync + 'static;

    /// Fields supplied on `create`.
    type Draft: Send + 'static;

    /// Partial-field update; `None` fields are left untouched.
    type Patch: Send + 'static;

    /// Equality match on a subset of fields (`filter(matchFields)`).
    type Filter: Default + Send + Sync + 'static;

    /// Entity name as the external store knows it.
    const NAME: &'static str;

    fn id(&self) -> Self::Id;

    fn created_at(&self) -> DateTime<Utc>;

    fn from_draft(id: Self::Id, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn sort_value(&self, key: SortKey) -> Option<DateTime<Utc>> {
        match key {
            SortKey::CreatedAt => Some(self.created_at()),
            SortKey::LastMessageAt => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    CreatedAt,
    LastMessageAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// `list(sortSpec)` の並び順
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl SortSpec {
    pub fn newest_first(key: SortKey) -> Self {
        Self {
            key,
            order: SortOrder::Descending,
        }
    }

    pub fn oldest_first(key: SortKey) -> Self {
        Self {
            key,
            order: SortOrder::Ascending,
        }
    }

    /// Records without a value for the key sort last in either order.
    pub fn compare<E: Entity>(&self, a: &E, b: &E) -> Ordering {
        match (a.sort_value(self.key), b.sort_value(self.key)) {
            (Some(x), Some(y)) => match self.order {
                SortOrder::Ascending => x.cmp(&y),
                SortOrder::Descending => y.cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Filter helper: an unset filter field matches everything.
pub(crate) fn field_matches<T: PartialEq>(want: &Option<T>, have: &T) -> bool {
    want.as_ref().is_none_or(|w| w == have)
}

/// Filter helper for nullable record fields: a set filter field never
/// matches a null value.
pub(crate) fn nullable_matches<T: PartialEq>(want: &Option<T>, have: &Option<T>) -> bool {
    match want {
        None => true,
        Some(w) => have.as_ref() == Some(w),
    }
}
