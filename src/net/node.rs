//! 节点类型
//!
//! 定义网络节点 trait、节点公共部分，以及交换机实现。
//! 交换机的路由算法见 `routing.rs`。

use super::id::NodeId;
use super::network::Network;
use super::packet::Packet;
use super::registry::tags;
use super::routing::RoutingState;
use crate::sim::Simulator;
use std::any::Any;
use std::collections::BTreeSet;
use tracing::debug;

/// 节点接口
pub trait Node: Send {
    fn base(&self) -> &NodeBase;

    fn base_mut(&mut self) -> &mut NodeBase;

    /// 注册表中的类型标签
    fn kind(&self) -> &'static str;

    /// 处理到达的数据包；包在处理完之后即被丢弃
    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network);

    /// (远端节点, 首跳邻居) 列表，用于最终报告
    fn first_hops(&self) -> Vec<(NodeId, NodeId)> {
        Vec::new()
    }

    fn as_any(&self) -> &dyn Any;

    /// 获取节点标识符
    fn id(&self) -> NodeId {
        self.base().id()
    }

    fn neighbors(&self) -> &BTreeSet<NodeId> {
        self.base().neighbors()
    }

    fn label_budget(&self) -> u32 {
        self.base().label_budget
    }
}

/// 所有节点共有的状态：id、邻居集合、标签预算
#[derive(Debug, Clone)]
pub struct NodeBase {
    id: NodeId,
    neighbors: BTreeSet<NodeId>,
    /// 本节点发出/转发的包最多可携带的额外标签开销
    pub label_budget: u32,
}

impl NodeBase {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            neighbors: BTreeSet::new(),
            label_budget: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn neighbors(&self) -> &BTreeSet<NodeId> {
        &self.neighbors
    }

    pub fn has_neighbor(&self, id: NodeId) -> bool {
        self.neighbors.contains(&id)
    }

    pub(crate) fn add_neighbor(&mut self, id: NodeId) -> bool {
        self.neighbors.insert(id)
    }

    pub(crate) fn remove_neighbor(&mut self, id: NodeId) -> bool {
        self.neighbors.remove(&id)
    }
}

/// 交换机节点：链路状态泛洪 + 标签栈段路由
#[derive(Debug)]
pub struct Switch {
    base: NodeBase,
    pub(crate) routing: RoutingState,
}

impl Switch {
    /// 创建新交换机
    pub fn new(id: NodeId) -> Self {
        Self {
            base: NodeBase::new(id),
            routing: RoutingState::default(),
        }
    }

    /// 本地学到的路由状态（只读）
    pub fn routing(&self) -> &RoutingState {
        &self.routing
    }
}

impl Node for Switch {
    fn base(&self) -> &NodeBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut NodeBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        tags::SWITCH
    }

    #[tracing::instrument(skip(self, pkt, sim, net), fields(node_id = %self.id(), pkt_id = pkt.id(), pkt_kind = %pkt.kind()))]
    fn on_packet(&mut self, pkt: Packet, sim: &mut Simulator, net: &mut Network) {
        debug!("🔀 Switch 处理数据包");
        match pkt {
            Packet::Control(p) => self.on_control(p, sim, net),
            Packet::Data(p) => self.on_data(p, sim, net),
        }
    }

    fn first_hops(&self) -> Vec<(NodeId, NodeId)> {
        self.routing
            .entry_table()
            .iter()
            .filter_map(|(&dst, hops)| hops.first().map(|&hop| (dst, hop)))
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
