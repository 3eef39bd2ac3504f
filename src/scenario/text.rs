//! 文本场景格式（按空白分隔）：
//!
//! ```text
//! nSwitch nLink nPair nLabel period simulate_time
//! id src dst capacity          (nLink 行，每行一条双向连接)
//! id src dst size time         (nPair 行，每行一条数据流)
//! ```

use std::str::{FromStr, SplitWhitespace};

use super::error::ScenarioError;
use super::spec::{FlowSpec, LinkSpec, ScenarioSpec};
use crate::net::NodeId;

struct Tokens<'a> {
    it: SplitWhitespace<'a>,
}

impl Tokens<'_> {
    fn next<T: FromStr>(&mut self, what: &'static str) -> Result<T, ScenarioError> {
        let token = self.it.next().ok_or(ScenarioError::UnexpectedEof(what))?;
        token.parse().map_err(|_| ScenarioError::InvalidToken {
            what,
            token: token.to_string(),
        })
    }

    fn node(&mut self, what: &'static str) -> Result<NodeId, ScenarioError> {
        self.next::<u32>(what).map(NodeId)
    }
}

pub fn parse_text(input: &str) -> Result<ScenarioSpec, ScenarioError> {
    let mut t = Tokens {
        it: input.split_whitespace(),
    };

    let switches: u32 = t.next("switch count")?;
    let n_links: usize = t.next("link count")?;
    let n_flows: usize = t.next("flow count")?;
    let label_budget: u32 = t.next("label budget")?;
    let period: u64 = t.next("advertisement period")?;
    let horizon: u64 = t.next("simulate time")?;

    let mut links = Vec::new();
    for _ in 0..n_links {
        links.push(LinkSpec {
            id: Some(t.next("link id")?),
            src: t.node("link src")?,
            dst: t.node("link dst")?,
            capacity: t.next("link capacity")?,
            latency: None,
        });
    }

    let mut flows = Vec::new();
    for _ in 0..n_flows {
        flows.push(FlowSpec {
            id: Some(t.next("flow id")?),
            src: t.node("flow src")?,
            dst: t.node("flow dst")?,
            size: t.next("flow size")?,
            time: t.next("flow time")?,
            msg: None,
        });
    }

    Ok(ScenarioSpec {
        switches,
        label_budget,
        period: (period > 0).then_some(period),
        horizon,
        links,
        flows,
    })
}
