//! 网络拓扑管理
//!
//! 持有节点表、链路表、数据包序列号计数器和类型注册表；
//! 负责节点出站扇出、`send_handler` 以及对外的边界操作。

use std::collections::BTreeMap;

use super::error::NetError;
use super::gen_packet::{GenCtrlPacket, GenDataPacket};
use super::id::{LinkId, NodeId};
use super::link::{Link, LinkParams};
use super::node::Node;
use super::packet::{DataPacket, Packet, PacketKind, PacketParts};
use super::payload::LinkState;
use super::recv_packet::RecvPacket;
use super::registry::{tags, TypeRegistry};
use super::send_packet::SendPacket;
use super::stats::Stats;
use crate::journal::{EventJournal, LogLine};
use crate::sim::{SimTime, Simulator};
use std::any::Any;
use tracing::{debug, info, trace, warn};

/// 建立邻居关系时的链路参数（未给出的使用链路类型默认值）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LinkConfig {
    pub capacity: Option<f64>,
    pub latency: Option<SimTime>,
}

/// 网络拓扑
#[derive(Default)]
pub struct Network {
    registry: TypeRegistry,
    // 节点处理数据包期间会被暂时取出，槽位保留，节点数不变
    nodes: BTreeMap<NodeId, Option<Box<dyn Node>>>,
    links: BTreeMap<LinkId, Box<dyn Link>>,
    next_pkt_id: u64,
    pub stats: Stats,
    pub journal: Option<EventJournal>,
}

impl Network {
    /// 使用自定义注册表创建网络
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// 按类型标签创建节点
    #[tracing::instrument(skip(self))]
    pub fn create_node(&mut self, kind: &str, id: NodeId) -> Result<NodeId, NetError> {
        if id.is_broadcast() {
            warn!("广播地址不能作为节点 id");
            return Err(NetError::ReservedId(id));
        }
        if self.nodes.contains_key(&id) {
            warn!("duplicate node id");
            return Err(NetError::DuplicateId(id));
        }
        let node = self.registry.nodes.create(kind, id)?;
        self.nodes.insert(id, Some(node));
        debug!(node_count = self.nodes.len(), "节点已创建");
        Ok(id)
    }

    /// 从节点表中删除节点（它的链路保留）
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), NetError> {
        match self.nodes.remove(&id) {
            Some(_) => Ok(()),
            None => Err(NetError::UnknownId(id)),
        }
    }

    /// 在 `node` 上添加一条到 `neighbor` 的有向链路
    #[tracing::instrument(skip(self))]
    pub fn add_neighbor(
        &mut self,
        node: NodeId,
        neighbor: NodeId,
        link_kind: &str,
        cfg: LinkConfig,
    ) -> Result<(), NetError> {
        if node.is_broadcast() || neighbor.is_broadcast() {
            return Err(NetError::ReservedId(NodeId::BROADCAST));
        }
        if node == neighbor {
            return Err(NetError::SelfLoop(node));
        }
        if !self.contains_node(neighbor) {
            return Err(NetError::UnknownId(neighbor));
        }
        let id = LinkId::new(node, neighbor);
        {
            let n = self.node(node).ok_or(NetError::UnknownId(node))?;
            if n.base().has_neighbor(neighbor) || self.links.contains_key(&id) {
                return Err(NetError::DuplicateLink(id));
            }
        }

        let link = self.registry.links.create(
            link_kind,
            LinkParams {
                from: node,
                to: neighbor,
                capacity: cfg.capacity,
                latency: cfg.latency,
            },
        )?;
        self.links.insert(id, link);
        if let Some(n) = self.node_mut(node) {
            n.base_mut().add_neighbor(neighbor);
        }
        debug!(link = %id, "链路已创建");
        Ok(())
    }

    /// 删除邻居关系（链路对象保留）
    pub fn remove_neighbor(&mut self, node: NodeId, neighbor: NodeId) -> Result<(), NetError> {
        let n = self.node_mut(node).ok_or(NetError::UnknownId(node))?;
        if n.base_mut().remove_neighbor(neighbor) {
            Ok(())
        } else {
            Err(NetError::UnknownLink(LinkId::new(node, neighbor)))
        }
    }

    /// 删除一条有向链路
    pub fn remove_link(&mut self, id: LinkId) -> Result<(), NetError> {
        match self.links.remove(&id) {
            Some(_) => Ok(()),
            None => Err(NetError::UnknownLink(id)),
        }
    }

    pub fn set_label_budget(&mut self, id: NodeId, budget: u32) -> Result<(), NetError> {
        let n = self.node_mut(id).ok_or(NetError::UnknownId(id))?;
        n.base_mut().label_budget = budget;
        Ok(())
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// 存活节点数
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&dyn Node> {
        self.nodes.get(&id)?.as_deref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Box<dyn Node>> {
        self.nodes.get_mut(&id)?.as_mut()
    }

    /// 按 id 顺序遍历节点（只读）
    pub fn nodes(&self) -> impl Iterator<Item = &dyn Node> + '_ {
        self.nodes.values().filter_map(|n| n.as_deref())
    }

    pub fn link(&self, id: LinkId) -> Option<&dyn Link> {
        self.links.get(&id).map(|l| l.as_ref())
    }

    pub fn links(&self) -> impl Iterator<Item = &dyn Link> + '_ {
        self.links.values().map(|l| l.as_ref())
    }

    pub fn link_state(&self, id: LinkId) -> Option<LinkState> {
        self.links.get(&id).map(|l| l.state())
    }

    /// 创建数据包：头部、负载、数据包本身都经由注册表构造，序列号全局递增
    pub fn make_packet(&mut self, kind: PacketKind, size: f64) -> Result<Packet, NetError> {
        let header = self.registry.headers.create(kind.header_tag(), ())?;
        let payload = self.registry.payloads.create(kind.payload_tag(), ())?;
        let id = self.next_pkt_id;
        let pkt = self.registry.packets.create(
            kind.tag(),
            PacketParts {
                id,
                size,
                header,
                payload,
            },
        )?;
        self.next_pkt_id = self.next_pkt_id.wrapping_add(1);
        Ok(pkt)
    }

    /// 经由事件注册表创建事件并调度
    pub fn spawn<E: Any + Send>(
        &self,
        sim: &mut Simulator,
        tag: &str,
        at: SimTime,
        args: E,
    ) -> Result<(), NetError> {
        let ev = self.registry.events.create(tag, Box::new(args))?;
        sim.schedule_boxed(at, ev);
        Ok(())
    }

    /// 调度一次链路状态通告
    pub fn schedule_ctrl_advertisement(
        &mut self,
        src: NodeId,
        at: SimTime,
        msg: impl Into<String>,
        sim: &mut Simulator,
    ) -> Result<(), NetError> {
        if !self.contains_node(src) {
            warn!(node = %src, "id is incorrect");
            return Err(NetError::UnknownId(src));
        }
        self.spawn(
            sim,
            tags::CTRL_GEN_EVENT,
            at,
            GenCtrlPacket {
                src,
                msg: msg.into(),
            },
        )
    }

    /// 调度一条数据流（`dst` 可以是广播地址）
    pub fn schedule_data_flow(
        &mut self,
        src: NodeId,
        dst: NodeId,
        size: f64,
        at: SimTime,
        msg: impl Into<String>,
        sim: &mut Simulator,
    ) -> Result<(), NetError> {
        if !self.contains_node(src) {
            warn!(node = %src, "src is incorrect");
            return Err(NetError::UnknownId(src));
        }
        if !dst.is_broadcast() && !self.contains_node(dst) {
            warn!(node = %dst, "dst is incorrect");
            return Err(NetError::UnknownId(dst));
        }
        if !size.is_finite() || size < 0.0 {
            warn!(size, "size is incorrect");
            return Err(NetError::InvalidSize(size));
        }
        self.spawn(
            sim,
            tags::DATA_GEN_EVENT,
            at,
            GenDataPacket {
                src,
                dst,
                size,
                msg: msg.into(),
            },
        )
    }

    /// 将数据包交付给节点处理
    #[tracing::instrument(skip(self, pkt, sim), fields(pkt_id = pkt.id()))]
    pub fn deliver(&mut self, to: NodeId, pkt: Packet, sim: &mut Simulator) -> Result<(), NetError> {
        // 暂时把节点取出来，避免 &mut self 与 &mut node 的重叠借用。
        let mut node = self
            .nodes
            .get_mut(&to)
            .and_then(Option::take)
            .ok_or(NetError::UnknownId(to))?;
        trace!("取出节点");

        node.on_packet(pkt, sim, self);

        trace!("节点处理完成，放回节点");
        if let Some(slot) = self.nodes.get_mut(&to) {
            *slot = Some(node);
        }
        Ok(())
    }

    /// 出站扇出：把包发给 nexID 指定的邻居（广播则为全部邻居）。
    ///
    /// 链路余量不够时只对该邻居丢包，不重试；能通过的链路预留带宽，
    /// 在 `now + 链路时延` 调度邻居的接收事件，携带同序列号的副本。
    #[tracing::instrument(skip(self, pkt, sim), fields(pkt_id = pkt.id()))]
    pub fn send_from(&mut self, from: NodeId, pkt: Packet, sim: &mut Simulator) -> Result<(), NetError> {
        let neighbors: Vec<NodeId> = self
            .node(from)
            .ok_or(NetError::UnknownId(from))?
            .neighbors()
            .iter()
            .copied()
            .collect();
        let nex = pkt.fields().nex;
        let size = pkt.size();

        for nb in neighbors {
            if nb != nex && !nex.is_broadcast() {
                continue;
            }
            let id = LinkId::new(from, nb);
            let Some(link) = self.links.get_mut(&id) else {
                warn!(link = %id, "邻居没有对应链路");
                continue;
            };
            if !link.reserve(size) {
                debug!(link = %id, size, "链路容量不足，丢包");
                self.stats.link_drops += 1;
                continue;
            }
            let at = sim.now().after(link.latency());
            trace!(link = %id, arrive = %at, "调度接收事件");

            let recv = RecvPacket {
                sender: from,
                receiver: nb,
                pkt: pkt.replicate(),
            };
            if let Err(err) = self.spawn(sim, tags::RECV_EVENT, at, recv) {
                warn!(%err, "无法调度接收事件");
            }
        }
        Ok(())
    }

    /// 节点路由逻辑把包交给扇出机制：在当前时刻调度 pre -> nex 的发送事件
    pub fn send_handler(&mut self, pkt: Packet, sim: &mut Simulator) -> Result<(), NetError> {
        let f = *pkt.fields();
        self.spawn(
            sim,
            tags::SEND_EVENT,
            sim.now(),
            SendPacket {
                sender: f.pre,
                receiver: f.nex,
                pkt,
            },
        )
    }

    /// 数据包送达目的地时的处理
    pub(crate) fn on_delivered(&mut self, at: NodeId, pkt: &DataPacket, sim: &Simulator) {
        info!(pkt_id = pkt.id, node = %at, now = %sim.now(), "✅ 数据包送达目的地");
        self.stats.delivered_pkts += 1;
        self.stats.delivered_size += pkt.size;
    }

    /// 记录一行事件日志
    pub fn record(&mut self, line: LogLine) {
        info!("{line}");
        if let Some(j) = &mut self.journal {
            j.push(line);
        }
    }
}
