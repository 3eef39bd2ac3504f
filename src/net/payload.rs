//! 数据包负载
//!
//! 数据负载只携带文本消息；控制负载是一条链路状态通告。

use super::id::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 一条有向链路的 (容量, 已占用) 快照
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkState {
    pub capacity: f64,
    pub occupied: f64,
}

impl LinkState {
    /// 剩余可用带宽
    pub fn headroom(&self) -> f64 {
        self.capacity - self.occupied
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPayload {
    pub msg: String,
}

/// 链路状态通告：通告者 id + 它到每个邻居的链路状态
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPayload {
    pub msg: String,
    pub advertiser: NodeId,
    links: BTreeMap<NodeId, LinkState>,
}

impl Default for ControlPayload {
    fn default() -> Self {
        Self {
            msg: String::new(),
            advertiser: NodeId::BROADCAST,
            links: BTreeMap::new(),
        }
    }
}

impl ControlPayload {
    pub fn add_link_state(&mut self, neighbor: NodeId, state: LinkState) {
        self.links.insert(neighbor, state);
    }

    pub fn link_states(&self) -> &BTreeMap<NodeId, LinkState> {
        &self.links
    }
}

/// 由负载注册表产出的负载
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Data(DataPayload),
    Control(ControlPayload),
}
