use serde::{Deserialize, Serialize};
use std::fmt;

use crate::net::{NodeId, Packet, PacketKind};
use crate::sim::SimTime;

/// 日志行对应的事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// 节点收到一个包
    Recv,
    /// 节点把一个包扇出到邻居
    Send,
    /// 生成数据包
    GenData,
    /// 生成控制通告
    GenCtrl,
}

/// 一行事件日志
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogLine {
    pub time: SimTime,
    pub kind: LogKind,
    /// recv 为接收方，send 为发送方；生成事件没有
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pkt_id: Option<u64>,
    pub src: NodeId,
    pub dst: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nex: Option<NodeId>,
    pub pkt_kind: PacketKind,
    /// 数据包已用的标签开销（含目的地标签）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used_labels: Option<u32>,
    /// 数据包为 ` label <栈顶>`，控制包为 ` from <通告者>`
    pub note: String,
}

impl LogLine {
    /// 收发事件的日志行
    pub fn for_packet(time: SimTime, kind: LogKind, node: NodeId, pkt: &Packet) -> Self {
        let f = pkt.fields();
        Self {
            time,
            kind,
            node: Some(node),
            pkt_id: Some(pkt.id()),
            src: f.src,
            dst: f.dst,
            pre: Some(f.pre),
            nex: Some(f.nex),
            pkt_kind: pkt.kind(),
            used_labels: match pkt {
                Packet::Data(p) => Some(p.header.used_labels()),
                Packet::Control(_) => None,
            },
            note: pkt.annotation(),
        }
    }

    /// 生成事件的日志行
    pub fn generating(
        time: SimTime,
        kind: LogKind,
        src: NodeId,
        dst: NodeId,
        pkt_kind: PacketKind,
    ) -> Self {
        Self {
            time,
            kind,
            node: None,
            pkt_id: None,
            src,
            dst,
            pre: None,
            nex: None,
            pkt_kind,
            used_labels: None,
            note: " generating".to_string(),
        }
    }
}

/// 缺失的列用空白占位，保证各列对齐
fn column(f: &mut fmt::Formatter<'_>, name: &str, value: Option<impl fmt::Display>) -> fmt::Result {
    match value {
        Some(v) => write!(f, "   {name}{v:>11}"),
        None => write!(f, "   {:5}{:>11}", "", ""),
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time {:>11}", self.time.0)?;
        let node_col = match self.kind {
            LogKind::Send => "senID",
            _ => "recID",
        };
        column(f, node_col, self.node)?;
        column(f, "pktID", self.pkt_id)?;
        column(f, "srcID", Some(self.src))?;
        column(f, "dstID", Some(self.dst))?;
        column(f, "preID", self.pre)?;
        column(f, "nexID", self.nex)?;
        write!(f, "   {}{}", self.pkt_kind, self.note)
    }
}

/// 一个简单的日志收集器（存内存，仿真结束后输出）
#[derive(Debug, Default)]
pub struct EventJournal {
    pub lines: Vec<LogLine>,
}

impl EventJournal {
    pub fn push(&mut self, line: LogLine) {
        self.lines.push(line);
    }
}
