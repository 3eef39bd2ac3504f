//! 调度事件
//!
//! 定义调度事件结构及其优先级比较，以及同时刻事件的决胜键。

use super::event::Event;
use super::time::SimTime;
use std::cmp::Ordering;

/// 调度事件，包含执行时间、决胜键、序列号和事件对象。
///
/// 排序键为 `(at, tie, seq)`：`tie` 由事件内容决定，`seq` 只在
/// `tie` 完全相同时兜底，保证顺序是全序。
pub struct ScheduledEvent {
    pub(crate) at: SimTime,
    pub(crate) tie: u64,
    pub(crate) seq: u64,
    pub(crate) ev: Box<dyn Event>,
}

// BinaryHeap 是 max-heap；我们需要最小时间优先，因此反向比较。
impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.at
            .cmp(&other.at)
            .then(self.tie.cmp(&other.tie))
            .then(self.seq.cmp(&other.seq))
            .reverse()
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at && self.tie == other.tie && self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

/// 由若干整数字段计算决胜键。
///
/// 各字段按十进制拼接成字符串后做 FNV-1a，再经过 splitmix64 打散。
/// 与平台/进程无关：同样的输入在任何实现上都得到同样的顺序。
pub fn tie_break_key(parts: &[u64]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut h = FNV_OFFSET;
    for part in parts {
        for b in part.to_string().bytes() {
            h ^= b as u64;
            h = h.wrapping_mul(FNV_PRIME);
        }
    }
    mix64(h)
}

/// 一个简单、确定性的 64-bit mixing（替代 RandomState，避免每次运行 hash 不稳定）。
fn mix64(mut x: u64) -> u64 {
    // splitmix64
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
