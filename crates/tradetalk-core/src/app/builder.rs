//! AppBuilder - ルール層の構築とワイヤリング
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）

use std::sync::Arc;

use crate::config::{ConfigError, RulesConfig};
use crate::domain::{
    Announcement, Message, Profile, ProfileId, Project, ProjectId, ProjectTradeLink, Role,
    RolodexLink, RolodexSource, StoreError, Thread, ThreadId,
};
use crate::ports::{AuthProvider, Clock, Stores, SystemClock};

use super::{announcements, contacts, messages, threads};

/// AppBuilder は App を構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .stores(Stores::in_memory(clock.clone()))
///     .auth(StaticAuth::signed_in(user))
///     .clock(clock)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - Stores と AuthProvider は必須
/// - build() 時に RulesConfig を検証
pub struct AppBuilder {
    stores: Option<Stores>,
    auth: Option<Arc<dyn AuthProvider>>,
    clock: Arc<dyn Clock>,
    config: RulesConfig,
}

/// BuildError は App 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no entity stores were provided")]
    MissingStores,

    #[error("no auth provider was provided")]
    MissingAuth,

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            stores: None,
            auth: None,
            clock: Arc::new(SystemClock),
            config: RulesConfig::default(),
        }
    }

    pub fn stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    pub fn auth(mut self, auth: impl AuthProvider + 'static) -> Self {
        self.auth = Some(Arc::new(auth));
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(mut self, config: RulesConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let stores = self.stores.ok_or(BuildError::MissingStores)?;
        let auth = self.auth.ok_or(BuildError::MissingAuth)?;
        self.config.validate()?;
        Ok(App {
            stores,
            auth,
            clock: self.clock,
            config: self.config,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App は注入済みのポートを保持し、各ルールをメソッドとして公開する
#[derive(Clone)]
pub struct App {
    stores: Stores,
    auth: Arc<dyn AuthProvider>,
    clock: Arc<dyn Clock>,
    config: RulesConfig,
}

impl App {
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    // -- Threads --

    pub async fn find_or_create_direct_thread(&self, trade_id: ProfileId) -> Result<Thread, StoreError> {
        threads::find_or_create_direct_thread(&self.stores, trade_id).await
    }

    pub async fn ensure_project_thread(
        &self,
        project_id: ProjectId,
        trade_id: ProfileId,
    ) -> Result<Thread, StoreError> {
        threads::ensure_project_thread(&self.stores, project_id, trade_id).await
    }

    pub async fn ensure_announcement_thread(&self, project_id: ProjectId) -> Result<Thread, StoreError> {
        threads::ensure_announcement_thread(&self.stores, project_id).await
    }

    pub async fn move_thread_to_project(
        &self,
        thread_id: ThreadId,
        project_id: ProjectId,
        trade_id: ProfileId,
    ) -> Result<Option<Thread>, StoreError> {
        threads::move_thread_to_project(&self.stores, &self.config, thread_id, project_id, trade_id)
            .await
    }

    // -- Messages --

    pub async fn post_message(
        &self,
        thread_id: ThreadId,
        sender_profile_id: ProfileId,
        sender_role: Role,
        body: impl Into<String>,
    ) -> Result<Message, StoreError> {
        messages::post_message(
            &self.stores,
            &self.config,
            thread_id,
            sender_profile_id,
            sender_role,
            body,
        )
        .await
    }

    pub async fn list_thread_messages(&self, thread_id: ThreadId) -> Result<Vec<Message>, StoreError> {
        messages::list_thread_messages(&self.stores, thread_id).await
    }

    pub async fn mark_thread_read(&self, thread_id: ThreadId, reader: Role) -> Result<Thread, StoreError> {
        messages::mark_thread_read(&self.stores, thread_id, reader).await
    }

    pub async fn set_thread_pinned(&self, thread_id: ThreadId, pinned: bool) -> Result<Thread, StoreError> {
        messages::set_thread_pinned(&self.stores, thread_id, pinned).await
    }

    pub async fn set_thread_archived(
        &self,
        thread_id: ThreadId,
        archived: bool,
    ) -> Result<Thread, StoreError> {
        messages::set_thread_archived(&self.stores, thread_id, archived).await
    }

    pub async fn list_inbox(&self, include_archived: bool) -> Result<Vec<Thread>, StoreError> {
        messages::list_inbox(&self.stores, include_archived).await
    }

    // -- Announcements --

    pub async fn create_announcement_for_project(
        &self,
        project_id: ProjectId,
        user_id: &str,
        profile_id: ProfileId,
        body: impl Into<String>,
    ) -> Result<Announcement, StoreError> {
        announcements::create_announcement_for_project(
            &self.stores,
            &self.config,
            project_id,
            user_id,
            profile_id,
            body,
        )
        .await
    }

    pub async fn list_project_announcements(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<Announcement>, StoreError> {
        announcements::list_project_announcements(&self.stores, project_id).await
    }

    pub async fn get_unread_announcement_count(
        &self,
        project_id: ProjectId,
        trade_id: ProfileId,
    ) -> Result<usize, StoreError> {
        announcements::get_unread_announcement_count(&self.stores, project_id, trade_id).await
    }

    pub async fn mark_announcements_read(
        &self,
        project_id: ProjectId,
        trade_id: ProfileId,
    ) -> Result<usize, StoreError> {
        announcements::mark_announcements_read(
            &self.stores,
            self.clock.as_ref(),
            &self.config,
            project_id,
            trade_id,
        )
        .await
    }

    // -- Contacts --

    pub async fn ensure_rolodex_link(
        &self,
        gc_id: Option<ProfileId>,
        trade_id: Option<ProfileId>,
        source: RolodexSource,
    ) -> Result<Option<RolodexLink>, StoreError> {
        contacts::ensure_rolodex_link(&self.stores, gc_id, trade_id, source).await
    }

    pub async fn get_linked_trades(&self, gc_id: ProfileId) -> Result<Vec<Profile>, StoreError> {
        contacts::get_linked_trades(&self.stores, gc_id).await
    }

    pub async fn link_trade_to_project(
        &self,
        project_id: ProjectId,
        contact_id: ProfileId,
    ) -> Result<ProjectTradeLink, StoreError> {
        contacts::link_trade_to_project(&self.stores, project_id, contact_id).await
    }

    pub async fn get_trade_projects(&self, trade_id: ProfileId) -> Result<Vec<Project>, StoreError> {
        contacts::get_trade_projects(&self.stores, trade_id).await
    }

    pub async fn current_profile(&self) -> Result<Option<Profile>, StoreError> {
        contacts::current_profile(&self.stores, self.auth.as_ref()).await
    }
}
