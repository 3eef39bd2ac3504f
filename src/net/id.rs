//! 标识符类型
//!
//! 定义节点和链路的唯一标识符。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点标识符
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// 广播地址：表示“所有邻居”，不能分配给真实节点或链路端点
    pub const BROADCAST: NodeId = NodeId(u32::MAX);

    pub fn is_broadcast(self) -> bool {
        self == Self::BROADCAST
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// 链路标识符：有向边 (from, to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkId {
    pub from: NodeId,
    pub to: NodeId,
}

impl LinkId {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// 反方向的链路
    pub fn reversed(self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)
    }
}
