//! 事件 trait
//!
//! 定义仿真事件接口。

use super::simulator::Simulator;
use super::time::SimTime;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以支持 move/所有权转移。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);

    /// 同一触发时刻下的确定性排序键（越小越先执行）。
    ///
    /// 只用于打破同时刻事件的顺序，不是随机源；默认全部为 0，
    /// 此时退化为按调度顺序执行。
    fn tie_break(&self, _at: SimTime) -> u64 {
        0
    }

    /// 事件类型名，用于日志和执行记录
    fn kind(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
