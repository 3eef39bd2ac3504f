use super::support::{flow, line, run};
use crate::journal::{LogKind, LogLine};
use crate::net::{NodeId, PacketKind};
use crate::report::Report;
use crate::sim::SimTime;

#[test]
fn text_report_lists_first_hops_per_node() {
    let s = run(&line(3, 100.0));
    let report = Report::collect(&s);

    assert_eq!(report.render_text(), "0\n1 1\n2 1\n1\n0 0\n2 2\n2\n0 1\n1 1\n");
    assert_eq!(report.nodes.len(), 3);
    assert_eq!(report.links.len(), 4);
    assert_eq!(report.end_time, s.now());
}

#[test]
fn json_report_carries_stats_and_link_state() {
    let mut spec = line(2, 10.0);
    spec.flows.push(flow(0, 1, 3.0, 100));
    let s = run(&spec);

    let raw = Report::collect(&s).to_json().expect("json");
    let v: serde_json::Value = serde_json::from_str(&raw).expect("parse report");

    assert_eq!(v["stats"]["delivered_pkts"], 1);
    assert_eq!(v["nodes"][0]["kind"], "switch");
    assert_eq!(v["nodes"][0]["first_hops"][0]["dst"], 1);
    let links = v["links"].as_array().expect("links");
    let used = links
        .iter()
        .find(|l| l["id"]["from"] == 0 && l["id"]["to"] == 1)
        .expect("link 0->1");
    assert_eq!(used["capacity"], 10.0);
    assert_eq!(used["occupied"], 3.0);
}

#[test]
fn log_line_rendering() {
    let gen_line = LogLine::generating(
        SimTime(5),
        LogKind::GenCtrl,
        NodeId(2),
        NodeId::BROADCAST,
        PacketKind::Control,
    );
    let text = gen_line.to_string();
    assert!(text.starts_with("time           5"));
    assert!(text.ends_with("ctrl_packet generating"));
    assert!(text.contains(&format!("dstID{:>11}", u32::MAX)));
    assert!(!text.contains("pktID"));

    let json = serde_json::to_value(&gen_line).expect("json");
    assert_eq!(json["kind"], "gen_ctrl");
    assert!(json.get("pkt_id").is_none());
}
