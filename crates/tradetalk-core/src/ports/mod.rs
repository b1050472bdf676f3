//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! ルール層は外部のエンティティストアと認証サービスをこれらの trait 越しにのみ扱い、
//! グローバルなクライアントシングルトンは持ちません。
//!
//! # 設計原則
//! - 永続化・クエリ・認証はすべて外部サービスに委譲
//! - ルール関数には `Stores` を明示的に渡す（テストでは InMemory を差し込む）

pub mod auth;
pub mod clock;
pub mod entity_store;
pub mod id_generator;

use std::sync::Arc;

use crate::domain::{
    Announcement, AnnouncementReceipt, Message, Profile, Project, ProjectTradeLink, RolodexLink,
    Thread,
};

pub use self::auth::AuthProvider;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::entity_store::EntityStore;
pub use self::id_generator::{IdGenerator, UlidGenerator};

/// Stores は注入される永続化ポート（エンティティ型ごとに 1 つ）
///
/// フィールドは公開されているので、テストでは 1 つだけ差し替えられます。
/// ```ignore
/// let mut stores = Stores::in_memory(clock);
/// stores.receipts = Arc::new(FaultyEntityStore::new(stores.receipts.clone()).fail_create_after(2));
/// ```
#[derive(Clone)]
pub struct Stores {
    pub threads: Arc<dyn EntityStore<Thread>>,
    pub messages: Arc<dyn EntityStore<Message>>,
    pub announcements: Arc<dyn EntityStore<Announcement>>,
    pub receipts: Arc<dyn EntityStore<AnnouncementReceipt>>,
    pub project_trade_links: Arc<dyn EntityStore<ProjectTradeLink>>,
    pub rolodex_links: Arc<dyn EntityStore<RolodexLink>>,
    pub profiles: Arc<dyn EntityStore<Profile>>,
    pub projects: Arc<dyn EntityStore<Project>>,
}
