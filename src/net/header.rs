//! 数据包头部
//!
//! 公共字段（src/dst/pre/nex）加上各类型自己的路由元数据。

use super::id::NodeId;
use std::collections::BTreeSet;

/// 所有头部共有的寻址字段。新建时全部为广播地址。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderFields {
    pub src: NodeId,
    pub dst: NodeId,
    /// 上一跳
    pub pre: NodeId,
    /// 下一跳（或广播地址）
    pub nex: NodeId,
}

impl Default for HeaderFields {
    fn default() -> Self {
        Self {
            src: NodeId::BROADCAST,
            dst: NodeId::BROADCAST,
            pre: NodeId::BROADCAST,
            nex: NodeId::BROADCAST,
        }
    }
}

/// 数据头部：标签栈 + 已用标签开销 + 已访问节点集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataHeader {
    pub fields: HeaderFields,
    labels: Vec<NodeId>,
    used_labels: u32,
    visited: BTreeSet<NodeId>,
}

impl DataHeader {
    /// 压入一个标签。
    ///
    /// 标签等于源节点、当前栈顶或下一跳时开销为 1，否则为 2。
    pub fn push_label(&mut self, id: NodeId) {
        let cheap =
            id == self.fields.src || Some(id) == self.top_label() || id == self.fields.nex;
        self.used_labels += if cheap { 1 } else { 2 };
        self.labels.push(id);
    }

    pub fn pop_label(&mut self) -> Option<NodeId> {
        self.labels.pop()
    }

    /// 当前栈顶，即当前的路由目标
    pub fn top_label(&self) -> Option<NodeId> {
        self.labels.last().copied()
    }

    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    pub fn used_labels(&self) -> u32 {
        self.used_labels
    }

    pub fn visit(&mut self, id: NodeId) {
        self.visited.insert(id);
    }

    pub fn visited(&self, id: NodeId) -> bool {
        self.visited.contains(&id)
    }

    pub fn visited_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.visited.iter().copied()
    }
}

/// 控制头部：只有公共字段
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlHeader {
    pub fields: HeaderFields,
}

/// 由头部注册表产出的头部
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Data(DataHeader),
    Control(ControlHeader),
}

impl Header {
    pub fn fields(&self) -> &HeaderFields {
        match self {
            Header::Data(h) => &h.fields,
            Header::Control(h) => &h.fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut HeaderFields {
        match self {
            Header::Data(h) => &mut h.fields,
            Header::Control(h) => &mut h.fields,
        }
    }
}
