//! 数据包发送事件
//!
//! 由发送节点把包扇出给匹配 nexID 的邻居。

use super::id::NodeId;
use super::net_world::net_of;
use super::packet::Packet;
use crate::journal::{LogKind, LogLine};
use crate::sim::{tie_break_key, Event, SimTime, Simulator, World};
use tracing::warn;

/// 事件：`sender` 把 `pkt` 发往 `receiver`（可以是广播地址）
#[derive(Debug)]
pub struct SendPacket {
    pub sender: NodeId,
    pub receiver: NodeId,
    pub pkt: Packet,
}

impl Event for SendPacket {
    #[tracing::instrument(skip(self, sim, world), fields(pkt_id = self.pkt.id(), from = %self.sender))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let SendPacket { sender, pkt, .. } = *self;

        let Some(net) = net_of(world) else {
            warn!("world is not a NetWorld, packet dropped");
            return;
        };
        net.record(LogLine::for_packet(sim.now(), LogKind::Send, sender, &pkt));

        if let Err(err) = net.send_from(sender, pkt, sim) {
            warn!(%err, "send_event: 发送节点不存在，丢弃");
        }
    }

    fn tie_break(&self, at: SimTime) -> u64 {
        tie_break_key(&[
            at.0,
            self.sender.0 as u64,
            self.receiver.0 as u64,
            self.pkt.id(),
        ])
    }

    fn kind(&self) -> &'static str {
        super::registry::tags::SEND_EVENT
    }
}
