//! Domain model (IDs, records, drafts/patches/filters, errors).
//!
//! - ids: ULID ベースの型付き ID
//! - entity: ストアに置かれるレコードの共通 trait
//! - thread / message / announcement / links / profile: 各エンティティ
//! - errors: StoreError

pub mod announcement;
pub mod entity;
pub mod errors;
pub mod ids;
pub mod links;
pub mod message;
pub mod profile;
pub mod thread;

pub use announcement::{
    Announcement, AnnouncementDraft, AnnouncementFilter, AnnouncementReceipt, ReceiptDraft,
    ReceiptFilter, ReceiptPatch,
};
pub use entity::{Entity, SortKey, SortOrder, SortSpec};
pub use errors::StoreError;
pub use ids::{
    AnnouncementId, Id, IdMarker, MessageId, ProfileId, ProjectId, ProjectTradeLinkId, ReceiptId,
    RolodexLinkId, ThreadId,
};
pub use links::{
    ProjectTradeLink, ProjectTradeLinkDraft, ProjectTradeLinkFilter, RolodexLink,
    RolodexLinkDraft, RolodexLinkFilter, RolodexSource,
};
pub use message::{Message, MessageDraft, MessageFilter, MessagePatch};
pub use profile::{
    Profile, ProfileDraft, ProfileFilter, ProfilePatch, Project, ProjectDraft, ProjectFilter,
    ProjectPatch, Role, User,
};
pub use thread::{Thread, ThreadDraft, ThreadFilter, ThreadPatch, ThreadType};
