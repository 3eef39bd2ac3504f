//! 仿真器
//!
//! 定义事件驱动仿真器，维护当前时间与事件队列。

use super::error::SimError;
use super::event::Event;
use super::scheduled_event::ScheduledEvent;
use super::time::SimTime;
use super::world::World;
use serde::Serialize;
use std::collections::BinaryHeap;
use tracing::{debug, error, info, trace};

/// 一条执行记录：(触发时间, 决胜键, 事件类型)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fired {
    pub at: SimTime,
    pub tie: u64,
    pub kind: &'static str,
}

/// 一次 `run_until` 的结果摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RunSummary {
    /// 本次执行的事件数
    pub executed: u64,
    /// 结束时的仿真时间
    pub now: SimTime,
    /// 因超过截止时间而被丢弃的事件触发时间
    pub discarded_at: Option<SimTime>,
}

/// 事件驱动仿真器：维护当前时间与事件队列。
#[derive(Default)]
pub struct Simulator {
    now: SimTime,
    next_seq: u64,
    q: BinaryHeap<ScheduledEvent>,
    journal: Option<Vec<Fired>>,
}

impl Simulator {
    /// 创建一个记录执行顺序的仿真器（用于确定性比对）
    pub fn with_journal() -> Self {
        Self {
            journal: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// 开启执行顺序记录（已入队的事件保留）
    pub fn enable_journal(&mut self) {
        self.journal.get_or_insert_with(Vec::new);
    }

    /// 获取当前仿真时间
    pub fn now(&self) -> SimTime {
        self.now
    }

    /// 队列中尚未执行的事件数
    pub fn pending(&self) -> usize {
        self.q.len()
    }

    /// 已执行事件的记录（未开启时为 None）
    pub fn journal(&self) -> Option<&[Fired]> {
        self.journal.as_deref()
    }

    /// 调度事件在指定时间执行
    pub fn schedule<E: Event>(&mut self, at: SimTime, ev: E) {
        self.schedule_boxed(at, Box::new(ev));
    }

    /// 调度一个已装箱的事件（来自类型注册表的事件走这里）
    #[tracing::instrument(skip(self, ev), fields(event_type = ev.kind(), schedule_at = %at))]
    pub fn schedule_boxed(&mut self, at: SimTime, ev: Box<dyn Event>) {
        let seq = self.next_seq;
        let tie = ev.tie_break(at);
        trace!(now = %self.now, seq, tie, "调度事件");

        self.next_seq = self.next_seq.wrapping_add(1);
        self.q.push(ScheduledEvent { at, tie, seq, ev });

        debug!(queue_size = self.q.len(), "事件已加入队列");
    }

    /// 运行直到事件队列为空或下一个事件晚于 `until`。
    ///
    /// 第一个晚于 `until` 的事件被弹出并丢弃，不会重新入队。
    /// 若弹出的事件早于当前时间，说明时间单调性被破坏，立即中止。
    #[tracing::instrument(skip(self, world), fields(until = %until))]
    pub fn run_until(
        &mut self,
        until: SimTime,
        world: &mut dyn World,
    ) -> Result<RunSummary, SimError> {
        info!("▶️  开始运行仿真");
        debug!(now = %self.now, queue_size = self.q.len(), "初始状态");

        let mut summary = RunSummary {
            now: self.now,
            ..RunSummary::default()
        };

        while let Some(item) = self.q.pop() {
            if item.at > until {
                debug!(at = %item.at, kind = item.ev.kind(), "超过截止时间，丢弃事件");
                summary.discarded_at = Some(item.at);
                break;
            }
            if item.at < self.now {
                error!(now = %self.now, at = %item.at, kind = item.ev.kind(), "事件时间倒退");
                return Err(SimError::OrderingViolation {
                    now: self.now,
                    at: item.at,
                });
            }

            self.now = item.at;
            summary.executed += 1;
            trace!(
                event_num = summary.executed,
                now = %self.now,
                seq = item.seq,
                tie = item.tie,
                remaining_queue = self.q.len(),
                "执行事件"
            );

            if let Some(journal) = &mut self.journal {
                journal.push(Fired {
                    at: item.at,
                    tie: item.tie,
                    kind: item.ev.kind(),
                });
            }

            item.ev.execute(self, world);
            world.on_tick(self);
        }

        summary.now = self.now;
        info!(
            total_events = summary.executed,
            final_time = %self.now,
            "✅ 仿真完成"
        );
        Ok(summary)
    }

    /// 运行所有事件直到队列为空。
    pub fn run(&mut self, world: &mut dyn World) -> Result<RunSummary, SimError> {
        self.run_until(SimTime::MAX, world)
    }

    /// 清空队列，按执行顺序返回被丢弃的事件（调试用）
    pub fn drain(&mut self) -> Vec<Fired> {
        let mut out = Vec::with_capacity(self.q.len());
        while let Some(item) = self.q.pop() {
            out.push(Fired {
                at: item.at,
                tie: item.tie,
                kind: item.ev.kind(),
            });
        }
        out
    }
}
