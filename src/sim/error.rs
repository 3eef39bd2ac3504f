//! 仿真核心错误

use super::time::SimTime;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// 弹出的事件早于当前时间：内部不变量被破坏，仿真必须中止
    #[error("event ordering violated: current time {now}, event scheduled at {at}")]
    OrderingViolation { now: SimTime, at: SimTime },
}
