//! 仿真上下文
//!
//! 把仿真器和网络世界打包在一起，向驱动层（CLI、场景构建、测试）提供边界操作。
//! 所有可变状态都在这个对象里，两次运行之间互不影响。

use crate::journal::{EventJournal, LogLine};
use crate::net::{LinkConfig, LinkId, NetError, NetWorld, Network, Node, NodeId, TypeRegistry};
use crate::sim::{Fired, RunSummary, SimError, SimTime, Simulator};

#[derive(Default)]
pub struct Simulation {
    pub sim: Simulator,
    pub world: NetWorld,
}

impl Simulation {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用自定义类型注册表
    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self {
            sim: Simulator::default(),
            world: NetWorld {
                net: Network::with_registry(registry),
            },
        }
    }

    /// 开启事件日志与执行顺序记录
    pub fn with_journal(mut self) -> Self {
        self.sim.enable_journal();
        self.world.net.journal.get_or_insert_with(EventJournal::default);
        self
    }

    pub fn net(&self) -> &Network {
        &self.world.net
    }

    pub fn net_mut(&mut self) -> &mut Network {
        &mut self.world.net
    }

    pub fn now(&self) -> SimTime {
        self.sim.now()
    }

    pub fn create_node(&mut self, kind: &str, id: NodeId) -> Result<NodeId, NetError> {
        self.world.net.create_node(kind, id)
    }

    pub fn add_neighbor(
        &mut self,
        node: NodeId,
        neighbor: NodeId,
        link_kind: &str,
        cfg: LinkConfig,
    ) -> Result<(), NetError> {
        self.world.net.add_neighbor(node, neighbor, link_kind, cfg)
    }

    /// 双向连接：两条参数相同的独立有向链路
    pub fn connect(
        &mut self,
        a: NodeId,
        b: NodeId,
        link_kind: &str,
        cfg: LinkConfig,
    ) -> Result<(), NetError> {
        let forward = LinkId::new(a, b);
        self.add_neighbor(forward.from, forward.to, link_kind, cfg)?;
        let back = forward.reversed();
        self.add_neighbor(back.from, back.to, link_kind, cfg)
    }

    pub fn set_label_budget(&mut self, id: NodeId, budget: u32) -> Result<(), NetError> {
        self.world.net.set_label_budget(id, budget)
    }

    pub fn schedule_ctrl_advertisement(
        &mut self,
        src: NodeId,
        at: SimTime,
        msg: impl Into<String>,
    ) -> Result<(), NetError> {
        self.world
            .net
            .schedule_ctrl_advertisement(src, at, msg, &mut self.sim)
    }

    pub fn schedule_data_flow(
        &mut self,
        src: NodeId,
        dst: NodeId,
        size: f64,
        at: SimTime,
        msg: impl Into<String>,
    ) -> Result<(), NetError> {
        self.world
            .net
            .schedule_data_flow(src, dst, size, at, msg, &mut self.sim)
    }

    /// 执行事件队列直到 `until`
    pub fn run(&mut self, until: SimTime) -> Result<RunSummary, SimError> {
        self.sim.run_until(until, &mut self.world)
    }

    /// 运行结束后只读遍历所有节点
    pub fn for_each_node(&self, mut visitor: impl FnMut(&dyn Node)) {
        for node in self.world.net.nodes() {
            visitor(node);
        }
    }

    /// 事件日志（未开启时为空）
    pub fn log_lines(&self) -> &[LogLine] {
        self.world
            .net
            .journal
            .as_ref()
            .map(|j| j.lines.as_slice())
            .unwrap_or(&[])
    }

    /// (时间, 决胜键, 事件类型) 执行序列（未开启时为空）
    pub fn fired(&self) -> &[Fired] {
        self.sim.journal().unwrap_or(&[])
    }
}
