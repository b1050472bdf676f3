//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **InMemoryEntityStore**: エンティティ型ごとのインメモリストア
//! - **StaticAuth**: 固定ユーザーの AuthProvider
//! - **FaultyEntityStore**: 障害注入ラッパー
//!
//! 本番用の実装（BaaS SDK / HTTP アダプタ）は別クレートに置く想定です。

pub mod faulty;
pub mod inmem_store;
pub mod static_auth;

pub use self::faulty::FaultyEntityStore;
pub use self::inmem_store::InMemoryEntityStore;
pub use self::static_auth::StaticAuth;
