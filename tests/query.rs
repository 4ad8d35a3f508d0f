//! Tests for the query engine's semantics and cross-accessor consistency.
mod common;
use common::{decision_chart, minimal_decision_chart};
use nagarezu::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_example_matrix_answers() {
    let matrix = minimal_decision_chart().matrix();
    assert_eq!(
        matrix,
        AdjacencyMatrix::from_rows(vec![vec![0, 1, 0], vec![0, 0, 10], vec![0, 0, 0]])
    );
    let solver = QuerySolver::new(&matrix);

    assert!(solver.next_ok(0, 1));
    assert!(!solver.next_ok(0, 2));
    assert_eq!(solver.all_next(0), vec![1]);
    assert_eq!(solver.all_next(2), Vec::<usize>::new());
    assert_eq!(solver.all_prev(2), vec![1]);
    assert_eq!(solver.cond_next(1, YES_ID), vec![2]);
    assert_eq!(solver.cond_next(1, NO_ID), Vec::<usize>::new());
    assert!(solver.is_valid_sequence(&[0, 1, 2]));
    assert!(!solver.is_valid_sequence(&[0, 2]));
}

#[test]
fn test_trivial_sequences_are_valid() {
    let matrix = minimal_decision_chart().matrix();
    let solver = QuerySolver::new(&matrix);
    assert!(solver.is_valid_sequence(&[]));
    for id in 0..3 {
        assert!(solver.is_valid_sequence(&[id]));
    }
}

#[test]
fn test_conditional_edges_count_as_transitions() {
    let matrix = decision_chart().matrix();
    let solver = QuerySolver::new(&matrix);
    // 1 -Y-> 2 and 1 -N-> 3 are both valid next steps.
    assert!(solver.next_ok(1, 2));
    assert!(solver.next_ok(1, 3));
    assert_eq!(solver.all_next(1), vec![2, 3]);
    assert!(solver.is_valid_sequence(&[0, 1, 3]));
}

#[test]
fn test_accessor_consistency_on_generated_charts() {
    let builder = FlowchartBuilder::new(25);
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let chart = builder.build(&mut rng);
        let matrix = chart.matrix();
        let solver = QuerySolver::new(&matrix);
        let n = chart.node_count();

        for from in 0..n {
            for to in 0..n {
                let reachable = solver.next_ok(from, to);
                assert_eq!(reachable, solver.all_next(from).contains(&to));
                assert_eq!(reachable, solver.all_prev(to).contains(&from));
            }
        }
    }
}

#[test]
fn test_cond_next_partitions_decision_successors() {
    let builder = FlowchartBuilder::new(25);
    let mut decision_charts_seen = 0;
    for seed in 0..300 {
        let mut rng = StdRng::seed_from_u64(seed);
        let chart = builder.build(&mut rng);
        if chart.kind() != ChartKind::Decision {
            continue;
        }
        decision_charts_seen += 1;

        let matrix = chart.matrix();
        let solver = QuerySolver::new(&matrix);
        for (id, (_, kind)) in chart.nodes().iter().enumerate() {
            if *kind != NodeKind::Decision {
                continue;
            }
            let yes = solver.cond_next(id, YES_ID);
            let no = solver.cond_next(id, NO_ID);
            assert!(yes.iter().all(|t| !no.contains(t)), "seed {seed}");

            let mut union: Vec<usize> = yes.iter().chain(no.iter()).copied().collect();
            union.sort_unstable();
            assert_eq!(union, solver.all_next(id), "seed {seed}");
        }
    }
    assert!(decision_charts_seen > 0, "no decision charts in 300 draws");
}

#[test]
fn test_walks_over_plain_and_conditional_edges() {
    let matrix = decision_chart().matrix();
    let solver = QuerySolver::new(&matrix);
    assert!(solver.is_valid_sequence(&[0, 1, 2, 3]));
    assert!(!solver.is_valid_sequence(&[3, 2, 1]));
    // A repeated id fails naturally: the diagonal is always empty.
    assert!(!solver.is_valid_sequence(&[1, 1]));
}
