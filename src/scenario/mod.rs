//! 场景描述与构建
//!
//! 场景 = 交换机数量、链路、数据流、标签预算、通告周期和仿真截止时间。
//! 支持 JSON 和按空白分隔的文本两种输入格式。

mod error;
mod spec;
mod text;

pub use error::ScenarioError;
pub use spec::{FlowSpec, LinkSpec, ScenarioSpec};
pub use text::parse_text;
