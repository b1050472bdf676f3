//! IdGenerator port - ID 生成の抽象化
//!
//! ストアが採番する ID は ULID です。テスト容易性のために trait として抽象化し、
//! Clock を差し替えれば timestamp 部分を決定的にできます。
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は ULID を生成
///
/// 型付き ID（`ThreadId` など）は `From<Ulid>` で変換します。
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数タスクから使える）
pub trait IdGenerator: Send + Sync {
    fn next_ulid(&self) -> Ulid;
}

/// UlidGenerator は Clock の現在時刻 + 乱数で ULID を生成
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn next_ulid(&self) -> Ulid {
        // pre-epoch clocks clamp to 0
        let timestamp_ms = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}
