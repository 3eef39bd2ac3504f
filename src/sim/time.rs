//! 仿真时间类型
//!
//! 仿真时间是抽象的整数 tick，不对应真实时钟。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 仿真时间（tick）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);
    pub const MAX: SimTime = SimTime(u64::MAX);

    /// 当前时间之后 `delay` 个 tick（饱和加法）
    pub fn after(self, delay: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(delay.0))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
