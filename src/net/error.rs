//! 网络层错误
//!
//! 跨组件调用（节点、链路、注册表）都返回这里的错误，由调用方检查；
//! 缺失的节点/链路只会导致操作被跳过，不会让进程崩溃。

use super::id::{LinkId, NodeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetError {
    /// 注册表中没有该类型标签
    #[error("no such {family} type: {tag}")]
    UnknownType { family: &'static str, tag: String },

    /// 引用了不存在的节点
    #[error("no such node: {0}")]
    UnknownId(NodeId),

    /// 引用了不存在的链路
    #[error("no such link: {0}")]
    UnknownLink(LinkId),

    #[error("duplicate node id: {0}")]
    DuplicateId(NodeId),

    /// 广播地址不能作为节点 id 或链路端点
    #[error("reserved id cannot be used: {0}")]
    ReservedId(NodeId),

    #[error("duplicate link: {0}")]
    DuplicateLink(LinkId),

    #[error("self loop rejected at node {0}")]
    SelfLoop(NodeId),

    /// 包大小必须是非负有限数
    #[error("invalid packet size: {0}")]
    InvalidSize(f64),

    /// 构造函数收到的部件与类型不匹配（例如数据包拿到控制头部）
    #[error("{family} type {tag} got incompatible parts")]
    TypeMismatch { family: &'static str, tag: String },
}
