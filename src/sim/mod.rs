//! 仿真核心模块
//!
//! 此模块包含事件驱动仿真的核心组件，如仿真时间、事件、世界和仿真器。
//! 完全单线程：一个事件（包括它引发的所有调度）处理完毕后才会弹出下一个。

// 子模块声明
mod error;
mod event;
mod scheduled_event;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use error::SimError;
pub use event::Event;
pub use scheduled_event::{tie_break_key, ScheduledEvent};
pub use simulator::{Fired, RunSummary, Simulator};
pub use time::SimTime;
pub use world::World;
