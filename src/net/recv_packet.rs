//! 数据包接收事件
//!
//! 把一个包交给接收节点处理；包归本事件独占，处理完即丢弃。

use super::id::NodeId;
use super::net_world::net_of;
use super::packet::Packet;
use crate::journal::{LogKind, LogLine};
use crate::sim::{tie_break_key, Event, SimTime, Simulator, World};
use tracing::{trace, warn};

/// 事件：`receiver` 收到 `sender` 发来的 `pkt`
#[derive(Debug)]
pub struct RecvPacket {
    pub sender: NodeId,
    pub receiver: NodeId,
    pub pkt: Packet,
}

impl Event for RecvPacket {
    #[tracing::instrument(skip(self, sim, world), fields(pkt_id = self.pkt.id(), to = %self.receiver))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let RecvPacket {
            sender,
            receiver,
            pkt,
        } = *self;

        let Some(net) = net_of(world) else {
            warn!("world is not a NetWorld, packet dropped");
            return;
        };
        net.record(LogLine::for_packet(sim.now(), LogKind::Recv, receiver, &pkt));
        trace!(%sender, "📨 数据包到达事件执行");

        if let Err(err) = net.deliver(receiver, pkt, sim) {
            warn!(%err, "recv_event: 接收节点不存在，丢弃");
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
        super::registry::tags::RECV_EVENT
    }
}
