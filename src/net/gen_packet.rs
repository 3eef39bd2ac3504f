//! 数据包生成事件
//!
//! 生成的包先“到达”它自己的源节点（接收事件，receiver = src），
//! 从而和转发来的包走同一条路由流程。

use super::id::NodeId;
use super::net_world::net_of;
use super::network::Network;
use super::packet::{Packet, PacketKind};
use super::recv_packet::RecvPacket;
use super::registry::tags;
use crate::journal::{LogKind, LogLine};
use crate::sim::{tie_break_key, Event, SimTime, Simulator, World};
use tracing::{debug, warn};

/// 事件：在 `src` 生成一个发往 `dst` 的数据包
#[derive(Debug, Clone)]
pub struct GenDataPacket {
    pub src: NodeId,
    pub dst: NodeId,
    pub size: f64,
    pub msg: String,
}

/// 事件：在 `src` 生成一条链路状态通告
#[derive(Debug, Clone)]
pub struct GenCtrlPacket {
    pub src: NodeId,
    pub msg: String,
}

/// 新建包、填好头部和负载，然后在当前时刻交给源节点
fn inject(
    net: &mut Network,
    sim: &mut Simulator,
    kind: PacketKind,
    src: NodeId,
    dst: NodeId,
    size: f64,
    msg: String,
) {
    let mut pkt = match net.make_packet(kind, size) {
        Ok(pkt) => pkt,
        Err(err) => {
            warn!(%err, "无法创建数据包");
            return;
        }
    };

    let f = pkt.fields_mut();
    f.src = src;
    f.dst = dst;
    f.pre = src;
    f.nex = src;
    pkt.set_msg(msg);
    if let Packet::Control(p) = &mut pkt {
        p.payload.advertiser = src;
    }
    debug!(pkt_id = pkt.id(), %src, %dst, %kind, "生成数据包");

    let recv = RecvPacket {
        sender: src,
        receiver: src,
        pkt,
    };
    if let Err(err) = net.spawn(sim, tags::RECV_EVENT, sim.now(), recv) {
        warn!(%err, "无法调度接收事件");
    }
}

impl Event for GenDataPacket {
    #[tracing::instrument(skip(self, sim, world), fields(src = %self.src, dst = %self.dst))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let GenDataPacket { src, dst, size, msg } = *self;

        let Some(net) = net_of(world) else {
            warn!("world is not a NetWorld");
            return;
        };
        net.record(LogLine::generating(
            sim.now(),
            LogKind::GenData,
            src,
            dst,
            PacketKind::Data,
        ));

        if !net.contains_node(src) {
            warn!(node = %src, "data_pkt_gen_event: 源节点不存在");
            return;
        }
        if !dst.is_broadcast() && !net.contains_node(dst) {
            warn!(node = %dst, "data_pkt_gen_event: 目的节点不存在");
            return;
        }
        inject(net, sim, PacketKind::Data, src, dst, size, msg);
    }

    fn tie_break(&self, at: SimTime) -> u64 {
        tie_break_key(&[at.0, self.src.0 as u64, self.dst.0 as u64])
    }

    fn kind(&self) -> &'static str {
        tags::DATA_GEN_EVENT
    }
}

impl Event for GenCtrlPacket {
    #[tracing::instrument(skip(self, sim, world), fields(src = %self.src))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let GenCtrlPacket { src, msg } = *self;

        let Some(net) = net_of(world) else {
            warn!("world is not a NetWorld");
            return;
        };
        net.record(LogLine::generating(
            sim.now(),
            LogKind::GenCtrl,
            src,
            NodeId::BROADCAST,
            PacketKind::Control,
        ));

        if !net.contains_node(src) {
            warn!(node = %src, "ctrl_pkt_gen_event: 源节点不存在");
            return;
        }
        // 通告大小为 0，总能通过链路
        inject(net, sim, PacketKind::Control, src, NodeId::BROADCAST, 0.0, msg);
    }

    fn tie_break(&self, at: SimTime) -> u64 {
        tie_break_key(&[at.0, self.src.0 as u64, NodeId::BROADCAST.0 as u64])
    }

    fn kind(&self) -> &'static str {
        tags::CTRL_GEN_EVENT
    }
}
