//! 仿真结束后的报告：每个节点学到的首跳表、链路占用和统计信息。

use serde::Serialize;
use std::fmt::Write as _;

use crate::net::{LinkId, LinkState, NodeId, Stats};
use crate::sim::SimTime;
use crate::simulation::Simulation;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteEntry {
    pub dst: NodeId,
    pub first_hop: NodeId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeReport {
    pub id: NodeId,
    pub kind: &'static str,
    pub first_hops: Vec<RouteEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkReport {
    pub id: LinkId,
    #[serde(flatten)]
    pub state: LinkState,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub end_time: SimTime,
    pub nodes: Vec<NodeReport>,
    pub links: Vec<LinkReport>,
    pub stats: Stats,
}

impl Report {
    pub fn collect(s: &Simulation) -> Self {
        let mut nodes = Vec::new();
        s.for_each_node(|node| {
            nodes.push(NodeReport {
                id: node.id(),
                kind: node.kind(),
                first_hops: node
                    .first_hops()
                    .into_iter()
                    .map(|(dst, first_hop)| RouteEntry { dst, first_hop })
                    .collect(),
            });
        });
        let links = s
            .net()
            .links()
            .map(|l| LinkReport {
                id: l.id(),
                state: l.state(),
            })
            .collect();

        Self {
            end_time: s.now(),
            nodes,
            links,
            stats: s.net().stats.clone(),
        }
    }

    /// 文本格式：每个节点一行 id，随后每行 `目的 首跳`
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            let _ = writeln!(out, "{}", node.id);
            for e in &node.first_hops {
                let _ = writeln!(out, "{} {}", e.dst, e.first_hop);
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
