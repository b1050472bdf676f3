//! App - アプリケーション層（ビジネスルール）
//!
//! このモジュールは ports を組み合わせてメッセージングのルールを実装します。
//! 各ルール関数は `Stores` を明示的に受け取り、内部状態を持ちません。
//!
//! # 主要コンポーネント
//! - **threads**: direct / project / announcement スレッドの find-or-create と昇格（merge / convert）
//! - **messages**: 投稿、未読カウンタ、ピン留め・アーカイブ、受信箱
//! - **announcements**: アナウンスの fan-out と既読レシート
//! - **contacts**: rolodex リンク、プロジェクト ↔ trade リンク、現在のプロフィール
//! - **AppBuilder / App**: ポートのワイヤリングとメソッド形式の入口

pub mod announcements;
pub mod builder;
pub mod contacts;
mod fanout;
pub mod messages;
pub mod threads;

#[cfg(test)]
pub(crate) mod testing;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
