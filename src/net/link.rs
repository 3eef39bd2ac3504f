//! 链路类型
//!
//! 有向链路：容量、已占用带宽和固定时延。双向连接由两条独立链路表示。
//! 占用只增不减（一次性预留模型，没有释放步骤）。

use super::id::{LinkId, NodeId};
use super::payload::LinkState;
use crate::sim::SimTime;
use std::fmt::Debug;
use tracing::trace;

/// 链路接口
pub trait Link: Send + Debug {
    fn id(&self) -> LinkId;

    /// 注册表中的类型标签
    fn kind(&self) -> &'static str;

    fn latency(&self) -> SimTime;

    /// 当前是否还能容纳 `size` 的传输（`size` 为负或 NaN 时为 false）
    fn can_transmit(&self, size: f64) -> bool;

    /// 预留带宽；容纳不下时不做任何修改并返回 false
    fn reserve(&mut self, size: f64) -> bool;

    /// 当前 (容量, 已占用) 快照
    fn state(&self) -> LinkState;
}

/// 链路构造参数；未给出的字段使用链路类型自己的默认值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkParams {
    pub from: NodeId,
    pub to: NodeId,
    pub capacity: Option<f64>,
    pub latency: Option<SimTime>,
}

/// 最简单的链路：固定容量与时延
#[derive(Debug)]
pub struct SimpleLink {
    id: LinkId,
    capacity: f64,
    occupied: f64,
    latency: SimTime,
}

impl SimpleLink {
    pub const DEFAULT_CAPACITY: f64 = 100.0;
    /// 单跳时延
    pub const DEFAULT_LATENCY: SimTime = SimTime(10);

    pub fn new(params: LinkParams) -> Self {
        Self {
            id: LinkId::new(params.from, params.to),
            capacity: params.capacity.unwrap_or(Self::DEFAULT_CAPACITY),
            occupied: 0.0,
            latency: params.latency.unwrap_or(Self::DEFAULT_LATENCY),
        }
    }
}

impl Link for SimpleLink {
    fn id(&self) -> LinkId {
        self.id
    }

    fn kind(&self) -> &'static str {
        super::registry::tags::SIMPLE_LINK
    }

    fn latency(&self) -> SimTime {
        self.latency
    }

    fn can_transmit(&self, size: f64) -> bool {
        // 负数或 NaN 会让占用低于 0
        size >= 0.0 && self.occupied + size <= self.capacity
    }

    fn reserve(&mut self, size: f64) -> bool {
        if !self.can_transmit(size) {
            return false;
        }
        self.occupied += size;
        trace!(link = %self.id, occupied = self.occupied, capacity = self.capacity, "预留带宽");
        true
    }

    fn state(&self) -> LinkState {
        LinkState {
            capacity: self.capacity,
            occupied: self.occupied,
        }
    }
}
