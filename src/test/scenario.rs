use std::collections::BTreeMap;

use super::support::{first_data_pkt, flow, line, link, recv_path, run};
use crate::journal::LogKind;
use crate::net::{NetError, NodeId, PacketKind, Switch};
use crate::scenario::{ScenarioError, ScenarioSpec, parse_text};
use crate::sim::SimTime;

fn triangle(budget: u32) -> ScenarioSpec {
    ScenarioSpec {
        switches: 3,
        label_budget: budget,
        period: None,
        horizon: 1000,
        links: vec![link(0, 1, 4.0), link(1, 2, 100.0), link(0, 2, 100.0)],
        flows: vec![flow(1, 0, 5.0, 100)],
    }
}

fn path_nodes(path: &[(SimTime, NodeId)]) -> Vec<u32> {
    path.iter().map(|(_, n)| n.0).collect()
}

#[test]
fn packet_follows_shortest_path_on_a_line() {
    let mut spec = line(5, 5.0);
    spec.flows.push(flow(4, 0, 5.0, 200));
    let s = run(&spec);

    assert_eq!(s.net().stats.delivered_pkts, 1);
    assert_eq!(s.net().stats.delivered_size, 5.0);

    let pkt = first_data_pkt(s.log_lines()).expect("data packet");
    let path = recv_path(s.log_lines(), pkt);
    assert_eq!(
        path,
        vec![
            (SimTime(200), NodeId(4)),
            (SimTime(210), NodeId(3)),
            (SimTime(220), NodeId(2)),
            (SimTime(230), NodeId(1)),
            (SimTime(240), NodeId(0)),
        ]
    );
    // 链路预留只增不减
    for (a, b) in [(4, 3), (3, 2), (2, 1), (1, 0)] {
        let st = s
            .net()
            .link_state(crate::net::LinkId::new(NodeId(a), NodeId(b)))
            .expect("link");
        assert_eq!(st.occupied, 5.0);
    }
}

#[test]
fn flow_before_convergence_is_dropped() {
    let mut spec = line(3, 100.0);
    spec.flows.push(flow(2, 0, 1.0, 0));
    let s = run(&spec);

    assert_eq!(s.net().stats.not_ready_drops, 1);
    assert_eq!(s.net().stats.delivered_pkts, 0);
}

#[test]
fn congestion_without_budget_drops_the_packet() {
    let mut spec = ScenarioSpec {
        links: vec![link(0, 1, 4.0), link(1, 2, 100.0)],
        ..line(3, 100.0)
    };
    spec.flows.push(flow(2, 0, 5.0, 100));
    let s = run(&spec);

    assert_eq!(s.net().stats.congestion_drops, 1);
    assert_eq!(s.net().stats.delivered_pkts, 0);
    let pkt = first_data_pkt(s.log_lines()).expect("data packet");
    assert_eq!(path_nodes(&recv_path(s.log_lines(), pkt)), vec![2, 1]);
}

#[test]
fn congestion_with_budget_takes_a_detour() {
    let s = run(&triangle(5));

    assert_eq!(s.net().stats.delivered_pkts, 1);
    assert_eq!(s.net().stats.congestion_drops, 0);
    let pkt = first_data_pkt(s.log_lines()).expect("data packet");
    let path = recv_path(s.log_lines(), pkt);
    assert_eq!(
        path,
        vec![
            (SimTime(100), NodeId(1)),
            (SimTime(110), NodeId(2)),
            (SimTime(120), NodeId(0)),
        ]
    );

    // 1 转发时栈顶为绕行标签，2 出栈后栈顶回到目的地
    let labels: Vec<_> = s
        .log_lines()
        .iter()
        .filter(|l| l.kind == LogKind::Send && l.pkt_id == Some(pkt))
        .map(|l| l.note.as_str())
        .collect();
    assert_eq!(labels, vec![" label 2", " label 0"]);
}

#[test]
fn detour_needs_enough_label_budget() {
    // 压入目的地花 2：目的地 0 不等于 src(1)、空栈的栈顶、nex(1)。
    // 压绕行需要 2 + 1 < 预算，预算 3 不够，只能丢包。
    let s = run(&triangle(3));
    assert_eq!(s.net().stats.congestion_drops, 1);
    assert_eq!(s.net().stats.delivered_pkts, 0);
}

#[test]
fn every_switch_floods_each_advertisement_once() {
    let spec = ScenarioSpec {
        period: Some(100),
        horizon: 250,
        ..line(5, 100.0)
    };
    let s = run(&spec);

    // 3 轮通告 * 5 个通告者 * 5 个转发者
    assert_eq!(s.net().stats.ctrl_floods, 75);

    let mut sends: BTreeMap<(NodeId, u64), usize> = BTreeMap::new();
    for l in s.log_lines() {
        if l.kind == LogKind::Send && l.pkt_kind == PacketKind::Control {
            let key = (l.node.expect("sender"), l.pkt_id.expect("pkt id"));
            *sends.entry(key).or_default() += 1;
        }
    }
    assert_eq!(sends.len(), 75);
    assert!(sends.values().all(|&n| n == 1));

    s.for_each_node(|node| {
        let sw = node.as_any().downcast_ref::<Switch>().expect("switch");
        assert_eq!(sw.routing().entry_table().len(), 4, "node {}", node.id());
    });
}

#[test]
fn same_scenario_runs_identically() {
    let mut spec = ScenarioSpec {
        period: Some(50),
        horizon: 400,
        links: vec![
            link(0, 1, 20.0),
            link(1, 2, 20.0),
            link(2, 3, 20.0),
            link(3, 0, 20.0),
            link(0, 2, 8.0),
        ],
        ..line(4, 100.0)
    };
    spec.label_budget = 4;
    spec.flows = vec![
        flow(0, 2, 6.0, 100),
        flow(1, 3, 6.0, 100),
        flow(3, 1, 6.0, 120),
        flow(2, 0, 9.0, 150),
    ];

    let a = run(&spec);
    let b = run(&spec);

    assert!(!a.fired().is_empty());
    assert_eq!(a.fired(), b.fired());
    assert_eq!(a.log_lines(), b.log_lines());
    assert_eq!(a.net().stats, b.net().stats);
}

#[test]
fn advertisement_schedule() {
    let times = |spec: &ScenarioSpec| spec.advertisement_times().collect::<Vec<_>>();
    let mut spec = line(2, 100.0);
    assert_eq!(times(&spec), vec![SimTime::ZERO]);

    spec.period = Some(0);
    assert_eq!(times(&spec), vec![SimTime::ZERO]);

    spec.period = Some(100);
    spec.horizon = 250;
    assert_eq!(times(&spec), vec![SimTime(0), SimTime(100), SimTime(200)]);

    // 超长的截止时间也只是按需产生
    spec.period = Some(1);
    spec.horizon = u64::MAX;
    let head: Vec<_> = spec.advertisement_times().take(3).collect();
    assert_eq!(head, vec![SimTime(0), SimTime(1), SimTime(2)]);
}

#[test]
fn duplicate_link_lines_are_ignored() {
    let spec = ScenarioSpec {
        links: vec![link(0, 1, 10.0), link(1, 0, 30.0)],
        ..line(2, 100.0)
    };
    let s = spec.build().expect("build");
    assert_eq!(s.net().links().count(), 2);
    let st = s
        .net()
        .link_state(crate::net::LinkId::new(NodeId(1), NodeId(0)))
        .expect("link");
    assert_eq!(st.capacity, 10.0);
}

#[test]
fn flow_with_negative_size_fails_the_build() {
    let mut spec = line(2, 10.0);
    spec.flows.push(flow(1, 0, -5.0, 100));
    let err = spec.build().err().expect("negative size");
    assert!(matches!(err, ScenarioError::Net(NetError::InvalidSize(_))));
}

#[test]
fn flow_with_unknown_node_fails_the_build() {
    let mut spec = line(2, 100.0);
    spec.flows.push(flow(0, 7, 1.0, 10));
    let err = spec.build().err().expect("unknown dst");
    assert!(matches!(
        err,
        ScenarioError::Net(NetError::UnknownId(NodeId(7)))
    ));
}

#[test]
fn text_format_parses_header_links_and_flows() {
    let raw = "5 4 1 2 0 1000\n\
               0 0 1 5\n1 1 2 5\n2 2 3 5\n3 3 4 5\n\
               0 4 0 5 200\n";
    let spec = parse_text(raw).expect("parse");

    assert_eq!(spec.switches, 5);
    assert_eq!(spec.label_budget, 2);
    assert_eq!(spec.period, None);
    assert_eq!(spec.horizon, 1000);
    assert_eq!(spec.links.len(), 4);
    assert_eq!(spec.links[3].src, NodeId(3));
    assert_eq!(spec.links[3].capacity, 5.0);
    assert_eq!(spec.flows.len(), 1);
    assert_eq!(spec.flows[0].src, NodeId(4));
    assert_eq!(spec.flows[0].time, 200);

    let s = run(&spec);
    assert_eq!(s.net().stats.delivered_pkts, 1);
}

#[test]
fn text_format_errors() {
    assert!(matches!(
        parse_text("3 1 0 0 10"),
        Err(ScenarioError::UnexpectedEof("simulate time"))
    ));
    assert!(matches!(
        parse_text("3 1 0 0 10 100\n0 0 x 5"),
        Err(ScenarioError::InvalidToken { what: "link dst", .. })
    ));
    // 声明的数量远大于实际内容：读到末尾报错，不预先分配
    assert!(matches!(
        parse_text("3 18446744073709551615 0 0 0 10"),
        Err(ScenarioError::UnexpectedEof("link id"))
    ));
    assert!(matches!(
        parse_text("3 0 18446744073709551615 0 0 10"),
        Err(ScenarioError::UnexpectedEof("flow id"))
    ));
}

#[test]
fn json_scenario_uses_defaults() {
    let spec = ScenarioSpec::from_json(
        r#"{ "switches": 2, "horizon": 50, "links": [ { "src": 0, "dst": 1 } ] }"#,
    )
    .expect("parse json");

    assert_eq!(spec.label_budget, 0);
    assert_eq!(spec.period, None);
    assert_eq!(spec.links[0].capacity, 100.0);
    assert_eq!(spec.links[0].latency, None);
    assert!(spec.flows.is_empty());

    assert!(matches!(
        ScenarioSpec::from_json("{ \"switches\": 2 }"),
        Err(ScenarioError::Json(_))
    ));
}

#[test]
fn packet_heading_back_to_a_visited_node_is_dropped() {
    let spec = line(3, 100.0);
    let mut s = spec.build().expect("build").with_journal();
    s.run(SimTime(100)).expect("converge");

    let mut pkt = s
        .net_mut()
        .make_packet(PacketKind::Data, 1.0)
        .expect("packet");
    if let crate::net::Packet::Data(p) = &mut pkt {
        p.header.fields.src = NodeId(2);
        p.header.fields.dst = NodeId(0);
        p.header.push_label(NodeId(0));
        // 0 已经走过：从 1 再发往 0 会成环
        p.header.visit(NodeId(0));
    }
    s.world
        .net
        .deliver(NodeId(1), pkt, &mut s.sim)
        .expect("deliver");

    assert_eq!(s.net().stats.loop_drops, 1);
    assert_eq!(s.sim.pending(), 0);
}

/// 某个数据包在每次发送时记录的标签开销
fn sent_label_costs(s: &crate::Simulation, pkt: u64) -> Vec<u32> {
    s.log_lines()
        .iter()
        .filter(|l| l.kind == LogKind::Send && l.pkt_id == Some(pkt))
        .filter_map(|l| l.used_labels)
        .collect()
}

#[test]
fn label_budget_limits_labels_beyond_the_destination() {
    // 预算 0：目的地标签总会压入，不受预算限制
    let mut spec = line(3, 100.0);
    spec.flows.push(flow(2, 0, 5.0, 100));
    let s = run(&spec);
    assert_eq!(s.net().stats.delivered_pkts, 1);
    let pkt = first_data_pkt(s.log_lines()).expect("data packet");
    assert_eq!(sent_label_costs(&s, pkt), vec![2, 2]);

    // 绕行标签才受预算约束：2 (目的地) + 2 (绕行) = 4 < 5
    let s = run(&triangle(5));
    let pkt = first_data_pkt(s.log_lines()).expect("data packet");
    let costs = sent_label_costs(&s, pkt);
    assert_eq!(costs, vec![4, 4]);
    assert!(costs.iter().all(|&c| c <= 5));
}
