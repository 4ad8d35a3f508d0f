//! Tests for the flowchart model, the generator's structural invariants,
//! matrix derivation, diagram scripts, and persistence.
mod common;
use common::{decision_chart, minimal_decision_chart, normal_chart};
use nagarezu::chart::Direction;
use nagarezu::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

#[test]
fn test_generated_charts_satisfy_structural_invariants() {
    let builder = FlowchartBuilder::new(25);
    for seed in 0..200 {
        let mut rng = StdRng::seed_from_u64(seed);
        let chart = builder.build(&mut rng);

        assert!((3..=25).contains(&chart.node_count()), "seed {seed}");
        assert_eq!(chart.node_count(), chart.nodes().len());

        let mut seen_pairs = HashSet::new();
        for edge in chart.edges() {
            assert!(edge.from < chart.node_count(), "seed {seed}");
            assert!(edge.to < chart.node_count(), "seed {seed}");
            assert_ne!(edge.from, edge.to, "self-loop at seed {seed}");
            assert!(
                seen_pairs.insert((edge.from, edge.to)),
                "duplicate edge at seed {seed}"
            );
        }

        for (id, (_, kind)) in chart.nodes().iter().enumerate() {
            let out_edges: Vec<_> = chart.edges().iter().filter(|e| e.from == id).collect();
            match kind {
                NodeKind::Decision => {
                    assert_eq!(out_edges.len(), 2, "decision outdegree at seed {seed}");
                    let labels: Vec<_> = out_edges.iter().map(|e| e.label).collect();
                    assert!(labels.contains(&EdgeLabel::Yes), "seed {seed}");
                    assert!(labels.contains(&EdgeLabel::No), "seed {seed}");
                }
                NodeKind::Normal => {
                    assert!(
                        out_edges.iter().all(|e| e.label == EdgeLabel::Plain),
                        "labeled edge from normal node at seed {seed}"
                    );
                    if id < chart.node_count() - 1 {
                        assert!(
                            out_edges.iter().any(|e| e.to > id),
                            "missing forward edge at seed {seed}"
                        );
                    }
                }
            }
        }

        match chart.kind() {
            ChartKind::Normal => assert!(
                chart.nodes().iter().all(|(_, k)| *k == NodeKind::Normal),
                "decision node in normal chart at seed {seed}"
            ),
            ChartKind::Decision => assert!(
                chart.nodes().iter().any(|(_, k)| *k == NodeKind::Decision),
                "decision chart without decision nodes at seed {seed}"
            ),
        }
    }
}

#[test]
fn test_generated_names_are_well_formed() {
    let builder = FlowchartBuilder::new(25);
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let chart = builder.build(&mut rng);
        for (name, _) in chart.nodes() {
            assert!(!name.is_empty() && name.len() <= 16);
            assert!(name.chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}

#[test]
fn test_matrix_encoding() {
    let chart = minimal_decision_chart();
    let matrix = chart.matrix();
    assert_eq!(matrix.size(), 3);
    assert_eq!(matrix.get(0, 1), 1);
    assert_eq!(matrix.get(1, 2), YES_ID);
    assert_eq!(matrix.get(0, 0), 0);
    assert_eq!(matrix.get(2, 0), 0);

    let full = decision_chart().matrix();
    assert_eq!(full.get(1, 2), YES_ID);
    assert_eq!(full.get(1, 3), NO_ID);
    assert_eq!(full.get(2, 3), 1);
}

#[test]
fn test_matrix_derivation_is_deterministic() {
    let builder = FlowchartBuilder::new(25);
    let mut rng = StdRng::seed_from_u64(9);
    let chart = builder.build(&mut rng);
    assert_eq!(chart.matrix(), chart.matrix());
}

#[test]
fn test_node_data_codes_follow_position() {
    let nodes = normal_chart().node_data();
    let codes: Vec<char> = nodes.iter().map(|n| n.code).collect();
    assert_eq!(codes, vec!['A', 'B', 'C', 'D']);
    assert_eq!(nodes[0].id, 0);
    assert_eq!(nodes[0].name, "fetch");
}

#[test]
fn test_mermaid_script_shape() {
    let script = decision_chart().mermaid_script_with(Direction::LeftRight);
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines[0], "flowchart LR");
    assert_eq!(lines.len(), 1 + decision_chart().edges().len());
    assert_eq!(lines[1], "\tA(intake)-->B{inspect}");
    assert_eq!(lines[2], "\tB{inspect}-- Y -->C(accept)");
    assert_eq!(lines[3], "\tB{inspect}-- N -->D(reject)");
    assert_eq!(lines[4], "\tC(accept)-->D(reject)");

    let top_bottom = decision_chart().mermaid_script_with(Direction::TopBottom);
    assert!(top_bottom.starts_with("flowchart TB\n"));
}

#[test]
fn test_save_load_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("0.chart");

    for chart in [minimal_decision_chart(), decision_chart(), normal_chart()] {
        chart.save(&path).expect("save");
        let loaded = Flowchart::load(&path).expect("load");
        assert_eq!(chart, loaded);
    }
}

#[test]
fn test_generated_chart_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let builder = FlowchartBuilder::new(25);
    let mut rng = StdRng::seed_from_u64(17);
    for i in 0..20 {
        let chart = builder.build(&mut rng);
        let path = dir.path().join(format!("{i}.chart"));
        chart.save(&path).expect("save");
        assert_eq!(chart, Flowchart::load(&path).expect("load"));
    }
}

#[test]
fn test_load_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    assert!(Flowchart::load(dir.path().join("missing.chart")).is_err());
}

#[test]
fn test_flowchart_statistics_summary() {
    let mut stats = FlowchartStatistics::new();
    stats.add_flowchart(&normal_chart());
    stats.add_flowchart(&decision_chart());
    assert_eq!(stats.total(), 2);

    let summary = stats.summary();
    assert!(summary.contains("Total Flowcharts: 2"));
    assert!(summary.contains("Normal Flowcharts: 1"));
    assert!(summary.contains("Decision Flowcharts: 1"));
    assert!(summary.contains("Node Count Distribution: {4: 2}"));
}
