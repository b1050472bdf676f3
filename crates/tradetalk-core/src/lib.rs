//! tradetalk-core
//!
//! Messaging rules for the TradeTalk construction-management client:
//! thread lifecycle (direct / project / announcement), announcement fan-out
//! with read receipts, and the GC rolodex.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, thread, message, announcement, links, profile, errors）
//! - **ports**: 抽象化レイヤー（EntityStore, Stores, AuthProvider, Clock, IdGenerator）
//! - **app**: ビジネスルール（threads, messages, announcements, contacts, builder）
//! - **impls**: 実装（InMemoryEntityStore など開発用・テスト用）
//! - **config**: RulesConfig

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{App, AppBuilder, BuildError};
pub use config::{ConfigError, RulesConfig};
pub use domain::StoreError;
pub use ports::Stores;
