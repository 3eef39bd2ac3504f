//! 事件日志
//!
//! 每个被执行的事件产生一行日志：时间、收发节点、包 id、
//! src/dst/pre/nex、包类型和附加信息。结构化保存，可以直接序列化成 JSON，
//! 也可以按固定列宽渲染成文本。

mod types;

pub use types::{EventJournal, LogKind, LogLine};
