//! 测试用的小拓扑

use crate::Simulation;
use crate::journal::{LogKind, LogLine};
use crate::net::{LinkConfig, NodeId, tags};
use crate::scenario::{FlowSpec, LinkSpec, ScenarioSpec};
use crate::sim::SimTime;

pub fn link(src: u32, dst: u32, capacity: f64) -> LinkSpec {
    LinkSpec {
        id: None,
        src: NodeId(src),
        dst: NodeId(dst),
        capacity,
        latency: None,
    }
}

pub fn flow(src: u32, dst: u32, size: f64, time: u64) -> FlowSpec {
    FlowSpec {
        id: None,
        src: NodeId(src),
        dst: NodeId(dst),
        size,
        time,
        msg: None,
    }
}

/// 0 - 1 - ... - (n-1) 的链状拓扑，只在 t=0 通告一次
pub fn line(n: u32, capacity: f64) -> ScenarioSpec {
    ScenarioSpec {
        switches: n,
        label_budget: 0,
        period: None,
        horizon: 1000,
        links: (0..n.saturating_sub(1))
            .map(|i| link(i, i + 1, capacity))
            .collect(),
        flows: Vec::new(),
    }
}

/// 建好、开启日志并运行到截止时间
pub fn run(spec: &ScenarioSpec) -> Simulation {
    let mut s = spec.build().expect("build scenario").with_journal();
    s.run(spec.horizon()).expect("run scenario");
    s
}

/// 手工搭一个全部由交换机组成的网络（双向链路）
pub fn switches(n: u32, edges: &[(u32, u32)], cfg: LinkConfig) -> Simulation {
    let mut s = Simulation::new().with_journal();
    for i in 0..n {
        s.create_node(tags::SWITCH, NodeId(i)).expect("create switch");
    }
    for &(a, b) in edges {
        s.connect(NodeId(a), NodeId(b), tags::SIMPLE_LINK, cfg)
            .expect("connect");
    }
    s
}

/// 某个数据包依次到达的节点
pub fn recv_path(lines: &[LogLine], pkt_id: u64) -> Vec<(SimTime, NodeId)> {
    lines
        .iter()
        .filter(|l| l.kind == LogKind::Recv && l.pkt_id == Some(pkt_id))
        .filter_map(|l| Some((l.time, l.node?)))
        .collect()
}

/// 第一个数据包的序列号
pub fn first_data_pkt(lines: &[LogLine]) -> Option<u64> {
    lines
        .iter()
        .find(|l| l.kind == LogKind::Recv && l.pkt_kind == crate::net::PacketKind::Data)
        .and_then(|l| l.pkt_id)
}
