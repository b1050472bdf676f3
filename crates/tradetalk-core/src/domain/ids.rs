//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID + Phantom type
//! すべてのエンティティ ID は ULID を内部に持つ `Id<T>` で表現します。
//! `T` は実行時には使わないマーカー型で、ThreadId と MessageId のような
//! 異なる ID をコンパイル時に混同できないようにします。
//!
//! ## ULID の特性
//! - **時刻でソート可能**: 生成順序でソートできる
//! - **分散生成可能**: 外部ストアとクライアントの双方で生成できる
//!
//! シリアライズ時は ULID 文字列そのもの（プレフィックスなし）になります。
//! Display のみ `thread-01H...` のようにプレフィックスを付けます。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"thread-", "msg-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let thread_id: ThreadId = Id::from(Ulid::new());
/// let message_id: MessageId = Id::from(Ulid::new());
/// // thread_id と message_id は異なる型なので、混同できない
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

macro_rules! id_marker {
    ($(#[$doc:meta])* $marker:ident, $alias:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $marker {}

        impl IdMarker for $marker {
            fn prefix() -> &'static str {
                $prefix
            }
        }

        $(#[$doc])*
        pub type $alias = Id<$marker>;
    };
}

id_marker!(
    /// Identifier of a messaging thread (direct, project or announcement).
    Thread, ThreadId, "thread-"
);
id_marker!(
    /// Identifier of a single message inside a thread.
    Message, MessageId, "msg-"
);
id_marker!(
    /// Identifier of a project-wide announcement.
    Announcement, AnnouncementId, "ann-"
);
id_marker!(
    /// Identifier of a per-trade announcement read receipt.
    Receipt, ReceiptId, "receipt-"
);
id_marker!(
    /// Identifier of a (project, trade) link row.
    ProjectTradeLink, ProjectTradeLinkId, "ptl-"
);
id_marker!(
    /// Identifier of a GC → trade rolodex entry.
    Rolodex, RolodexLinkId, "rolodex-"
);
id_marker!(
    /// Identifier of a GC or trade profile.
    Profile, ProfileId, "profile-"
);
id_marker!(
    /// Identifier of a construction project.
    Project, ProjectId, "project-"
);
