//! 交换机路由算法
//!
//! 每个交换机只依靠本地收到的信息独立运行：
//!
//! - 控制面：链路状态通告泛洪 + 按序列号去重。第一次看到某通告者的
//!   通告时，记录上一跳为到达它的首跳；之后从其它邻居收到的重复通告
//!   作为备选首跳追加在后面。
//! - 数据面：标签栈段路由。源节点把目的地压栈，途经节点到达栈顶标签
//!   时出栈；下一跳链路余量不足时，在标签预算允许的情况下压入一个
//!   绕行邻居。

use std::collections::BTreeMap;

use super::header::HeaderFields;
use super::id::{LinkId, NodeId};
use super::network::Network;
use super::node::{Node, Switch};
use super::packet::{ControlPacket, DataPacket, Packet};
use super::payload::LinkState;
use crate::sim::Simulator;
use tracing::{debug, info, trace, warn};

/// 一条外来通告被处理后的结论
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advert {
    /// 第一次看到该通告者：记录首跳并继续泛洪
    First,
    /// 比已记录的序列号新：更新拓扑并继续泛洪
    Newer,
    /// 旧序列号，但来自一个新的邻居：记为备选首跳，不再泛洪
    AlternatePath,
    /// 沿已知路径到达的重复包：直接丢弃
    Duplicate,
}

/// 交换机本地的路由状态
#[derive(Debug, Default, Clone)]
pub struct RoutingState {
    /// 通告者 -> 已处理过的最大序列号
    last_seen: BTreeMap<NodeId, u64>,
    /// 远端节点 -> 首跳邻居列表（第一个为主首跳）
    entry_table: BTreeMap<NodeId, Vec<NodeId>>,
    /// (节点, 邻居) -> 从通告中学到的链路状态
    network: BTreeMap<(NodeId, NodeId), LinkState>,
}

impl RoutingState {
    /// `seq` 是否比已记录的 `advertiser` 序列号新（没有记录也算新）
    pub fn is_newer(&self, advertiser: NodeId, seq: u64) -> bool {
        self.last_seen.get(&advertiser).is_none_or(|&last| seq > last)
    }

    pub fn last_seen(&self, advertiser: NodeId) -> Option<u64> {
        self.last_seen.get(&advertiser).copied()
    }

    /// 记录本节点自己发出的通告
    pub fn record_own(&mut self, me: NodeId, seq: u64, links: &BTreeMap<NodeId, LinkState>) {
        for (&nb, &state) in links {
            self.network.insert((me, nb), state);
        }
        self.last_seen.insert(me, seq);
    }

    /// 处理一条来自其它节点的通告
    pub fn learn(
        &mut self,
        advertiser: NodeId,
        pre: NodeId,
        seq: u64,
        links: &BTreeMap<NodeId, LinkState>,
    ) -> Advert {
        match self.last_seen.get(&advertiser).copied() {
            None => {
                self.entry_table.insert(advertiser, vec![pre]);
                self.last_seen.insert(advertiser, seq);
                for (&nb, &state) in links {
                    self.network.entry((advertiser, nb)).or_insert(state);
                }
                Advert::First
            }
            Some(last) if seq > last => {
                for (&nb, &state) in links {
                    self.network.insert((advertiser, nb), state);
                }
                self.last_seen.insert(advertiser, seq);
                Advert::Newer
            }
            Some(_) => {
                let hops = self.entry_table.entry(advertiser).or_default();
                if hops.contains(&pre) {
                    Advert::Duplicate
                } else {
                    hops.push(pre);
                    Advert::AlternatePath
                }
            }
        }
    }

    /// 是否已学到除自己以外所有存活节点的首跳
    pub fn warmed_up(&self, live_nodes: usize) -> bool {
        self.entry_table.len() + 1 >= live_nodes
    }

    pub fn entry_table(&self) -> &BTreeMap<NodeId, Vec<NodeId>> {
        &self.entry_table
    }

    /// 到达 `dst` 的首跳候选（按记录顺序）
    pub fn entries(&self, dst: NodeId) -> &[NodeId] {
        self.entry_table.get(&dst).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 到达 `dst` 的主首跳
    pub fn first_hop(&self, dst: NodeId) -> Option<NodeId> {
        self.entries(dst).first().copied()
    }

    pub fn link_state(&self, from: NodeId, to: NodeId) -> Option<LinkState> {
        self.network.get(&(from, to)).copied()
    }

    /// 快照中 from->to 的剩余带宽；没有快照时视为没有余量
    pub fn headroom(&self, from: NodeId, to: NodeId) -> f64 {
        self.link_state(from, to)
            .map(|s| s.headroom())
            .unwrap_or(0.0)
    }

    /// 在 `dst` 的首跳候选里找一个绕行邻居。
    ///
    /// 只扫描前 `len / 2 + 1` 个候选；取第一个未访问且余量严格大于
    /// `size` 的邻居。
    pub fn detour(
        &self,
        me: NodeId,
        dst: NodeId,
        size: f64,
        visited: impl Fn(NodeId) -> bool,
    ) -> Option<NodeId> {
        let entries = self.entries(dst);
        let bound = (entries.len() / 2 + 1).min(entries.len());
        entries[..bound]
            .iter()
            .copied()
            .find(|&nb| !visited(nb) && self.headroom(me, nb) > size)
    }
}

impl Switch {
    /// 控制面：泛洪 + 去重
    pub(super) fn on_control(&mut self, mut pkt: ControlPacket, sim: &mut Simulator, net: &mut Network) {
        let me = self.id();

        if pkt.header.fields.src == me {
            if !self.routing.is_newer(me, pkt.id) {
                trace!(pkt_id = pkt.id, "自己发出的旧通告，丢弃");
                net.stats.stale_ctrl_drops += 1;
                return;
            }

            // 把自己到每个邻居的链路状态写进通告
            pkt.payload.advertiser = me;
            for &nb in self.neighbors() {
                let state = net.link_state(LinkId::new(me, nb)).unwrap_or_default();
                pkt.payload.add_link_state(nb, state);
            }
            self.routing.record_own(me, pkt.id, pkt.payload.link_states());
            debug!(pkt_id = pkt.id, neighbors = pkt.payload.link_states().len(), "发出链路状态通告");
        } else {
            let advertiser = pkt.payload.advertiser;
            let pre = pkt.header.fields.pre;
            match self
                .routing
                .learn(advertiser, pre, pkt.id, pkt.payload.link_states())
            {
                Advert::First | Advert::Newer => {
                    trace!(%advertiser, %pre, pkt_id = pkt.id, "学到新通告");
                }
                Advert::AlternatePath => {
                    trace!(%advertiser, %pre, "记录备选首跳");
                    return;
                }
                Advert::Duplicate => {
                    trace!(%advertiser, %pre, "重复通告，丢弃");
                    net.stats.stale_ctrl_drops += 1;
                    return;
                }
            }
        }

        pkt.header.fields = HeaderFields {
            pre: me,
            nex: NodeId::BROADCAST,
            dst: NodeId::BROADCAST,
            ..pkt.header.fields
        };
        net.stats.ctrl_floods += 1;
        if let Err(err) = net.send_handler(Packet::Control(pkt), sim) {
            warn!(%err, "通告转发失败");
        }
    }

    /// 数据面：标签栈段路由 + 拥塞绕行
    pub(super) fn on_data(&mut self, mut pkt: DataPacket, sim: &mut Simulator, net: &mut Network) {
        let me = self.id();

        if !self.routing.warmed_up(net.node_count()) {
            debug!(pkt_id = pkt.id, known = self.routing.entry_table().len(), "路由表未就绪，丢弃");
            net.stats.not_ready_drops += 1;
            return;
        }

        let HeaderFields { src, dst, .. } = pkt.header.fields;
        if me == dst {
            info!(pkt_id = pkt.id, "已到达目的地");
            net.on_delivered(me, &pkt, sim);
            return;
        }
        if me == src {
            pkt.header.push_label(dst);
            pkt.header.fields.dst = dst;
        } else if pkt.header.top_label() == Some(me) {
            pkt.header.pop_label();
        }

        let Some(top) = pkt.header.top_label() else {
            warn!(pkt_id = pkt.id, "标签栈为空，无法路由");
            net.stats.unroutable_drops += 1;
            return;
        };
        let Some(mut next) = self.routing.first_hop(top) else {
            warn!(pkt_id = pkt.id, label = %top, "没有到达标签的首跳");
            net.stats.unroutable_drops += 1;
            return;
        };

        if self.routing.headroom(me, next) < pkt.size {
            // 压一个标签至多花 2，预算要留够
            let within_budget = pkt.header.used_labels() + 1 < self.label_budget();
            let detour = if within_budget {
                self.routing
                    .detour(me, dst, pkt.size, |nb| pkt.header.visited(nb))
            } else {
                None
            };
            match detour {
                Some(nb) => {
                    debug!(pkt_id = pkt.id, congested = %next, detour = %nb, "拥塞，压入绕行标签");
                    pkt.header.push_label(nb);
                    next = nb;
                }
                None => {
                    debug!(
                        pkt_id = pkt.id,
                        congested = %next,
                        used_labels = pkt.header.used_labels(),
                        within_budget,
                        "拥塞且无可用绕行，丢弃"
                    );
                    net.stats.congestion_drops += 1;
                    return;
                }
            }
        }

        if pkt.header.visited(next) {
            debug!(pkt_id = pkt.id, next = %next, "下一跳已访问过，丢弃以避免环路");
            net.stats.loop_drops += 1;
            return;
        }

        pkt.header.visit(me);
        pkt.header.fields.pre = me;
        pkt.header.fields.nex = next;
        trace!(pkt_id = pkt.id, next = %next, label = %top, "转发数据包");
        if let Err(err) = net.send_handler(Packet::Data(pkt), sim) {
            warn!(%err, "数据包转发失败");
        }
    }
}
