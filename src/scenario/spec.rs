use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::ScenarioError;
use crate::net::{tags, LinkConfig, NetError, NodeId, SimpleLink};
use crate::sim::SimTime;
use crate::simulation::Simulation;

/// 数据流、通告的调试消息默认值
const DEFAULT_MSG: &str = "default";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioSpec {
    /// 交换机数量，id 为 0..switches
    pub switches: u32,
    /// 每个交换机的标签预算
    #[serde(default)]
    pub label_budget: u32,
    /// 通告周期；缺省或 0 表示只在 t=0 通告一次
    #[serde(default)]
    pub period: Option<u64>,
    /// 仿真截止时间
    pub horizon: u64,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub flows: Vec<FlowSpec>,
}

/// 一条双向连接（建成两条有向链路）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkSpec {
    #[serde(default)]
    pub id: Option<u32>,
    pub src: NodeId,
    pub dst: NodeId,
    #[serde(default = "default_capacity")]
    pub capacity: f64,
    #[serde(default)]
    pub latency: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowSpec {
    #[serde(default)]
    pub id: Option<u32>,
    pub src: NodeId,
    pub dst: NodeId,
    pub size: f64,
    pub time: u64,
    #[serde(default)]
    pub msg: Option<String>,
}

fn default_capacity() -> f64 {
    SimpleLink::DEFAULT_CAPACITY
}

impl ScenarioSpec {
    pub fn from_json(raw: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn horizon(&self) -> SimTime {
        SimTime(self.horizon)
    }

    /// 每个交换机发通告的时刻：0, period, 2*period, ... <= horizon（惰性产生）
    pub fn advertisement_times(&self) -> impl Iterator<Item = SimTime> + use<> {
        let (end, step) = match self.period {
            Some(p) if p > 0 => (self.horizon, usize::try_from(p).unwrap_or(usize::MAX)),
            _ => (0, 1),
        };
        (0..=end).step_by(step).map(SimTime)
    }

    /// 构建一个可以直接运行的仿真
    pub fn build(&self) -> Result<Simulation, ScenarioError> {
        self.build_into(Simulation::new())
    }

    /// 在给定的（通常是空的）仿真上下文中构建场景
    pub fn build_into(&self, mut s: Simulation) -> Result<Simulation, ScenarioError> {
        for raw in 0..self.switches {
            let id = s.create_node(tags::SWITCH, NodeId(raw))?;
            s.set_label_budget(id, self.label_budget)?;
            for t in self.advertisement_times() {
                s.schedule_ctrl_advertisement(id, t, DEFAULT_MSG)?;
            }
        }

        for link in &self.links {
            let cfg = LinkConfig {
                capacity: Some(link.capacity),
                latency: link.latency.map(SimTime),
            };
            for (from, to) in [(link.src, link.dst), (link.dst, link.src)] {
                match s.add_neighbor(from, to, tags::SIMPLE_LINK, cfg) {
                    Ok(()) => {}
                    // 重复的连接行直接忽略
                    Err(NetError::DuplicateLink(id)) => warn!(link = %id, "重复链路，忽略"),
                    Err(err) => return Err(err.into()),
                }
            }
        }

        for flow in &self.flows {
            let msg = flow.msg.as_deref().unwrap_or(DEFAULT_MSG);
            s.schedule_data_flow(flow.src, flow.dst, flow.size, SimTime(flow.time), msg)?;
        }

        debug!(
            switches = self.switches,
            links = self.links.len(),
            flows = self.flows.len(),
            "场景构建完成"
        );
        Ok(s)
    }
}
