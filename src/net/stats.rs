//! 统计信息
//!
//! 定义网络仿真统计数据结构。丢包不会作为错误返回给调用方，只体现在这里。

use serde::Serialize;

/// 网络统计信息
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Stats {
    /// 到达目的地的数据包
    pub delivered_pkts: u64,
    pub delivered_size: f64,
    /// 链路余量不足且没有可用绕行
    pub congestion_drops: u64,
    /// 下一跳已被访问过
    pub loop_drops: u64,
    /// 扇出时链路容纳不下
    pub link_drops: u64,
    /// 路由表未就绪
    pub not_ready_drops: u64,
    /// 没有到达栈顶标签的首跳
    pub unroutable_drops: u64,
    /// 陈旧或重复的通告
    pub stale_ctrl_drops: u64,
    /// 控制通告的转发次数
    pub ctrl_floods: u64,
}
