//! Stochastic construction of structurally valid flowcharts.

use super::{ChartKind, Edge, EdgeLabel, Flowchart, NodeKind};
use crate::sampling::{normal_int, random_name};
use rand::Rng;
use rand::seq::index;
use std::ops::Range;

/// Probability that a generated flowchart is a decision flowchart.
pub const DECISION_CHART_PROB: f64 = 0.2;

/// Node-count distribution parameters.
pub const NODE_COUNT_MEAN: f64 = 6.5;
pub const NODE_COUNT_STD: f64 = 1.0;

/// Std dev of the decision-node count draw; its mean is `node_count / 4`.
pub const DECISION_COUNT_STD: f64 = 1.0;

/// Forward-edge count distribution for normal nodes.
pub const FORWARD_COUNT_MEAN: f64 = 1.2;
pub const FORWARD_COUNT_STD: f64 = 0.8;

/// Chance for a non-first normal node to gain one backward edge.
pub const BACK_EDGE_PROB: f64 = 0.15;

/// Probability bands for the decision-node out-edge policy: a roll below
/// the first band prefers two forward targets, below the second prefers two
/// backward targets, and the remainder mixes one of each.
pub const FORWARD_PAIR_BAND: f64 = 0.8;
pub const BACKWARD_PAIR_BAND: f64 = 0.9;

/// Builds one random flowchart under the configured node ceiling.
///
/// The construction guarantees the structural invariants the query layers
/// rely on: node count within `[3, max_node_num]`, no self-loops, no
/// duplicate `(from, to)` pairs, and exactly one `Y` plus one `N` out-edge
/// per decision node.
#[derive(Debug, Clone)]
pub struct FlowchartBuilder {
    max_node_num: usize,
}

impl FlowchartBuilder {
    pub fn new(max_node_num: usize) -> Self {
        Self { max_node_num }
    }

    /// Draws one flowchart.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Flowchart {
        let kind = if rng.random_bool(DECISION_CHART_PROB) {
            ChartKind::Decision
        } else {
            ChartKind::Normal
        };
        let node_count = normal_int(
            rng,
            NODE_COUNT_MEAN,
            NODE_COUNT_STD,
            3,
            self.max_node_num as i64,
        ) as usize;

        let nodes = match kind {
            ChartKind::Normal => (0..node_count)
                .map(|_| (random_name(rng), NodeKind::Normal))
                .collect::<Vec<_>>(),
            ChartKind::Decision => {
                let decision_count = normal_int(
                    rng,
                    node_count as f64 / 4.0,
                    DECISION_COUNT_STD,
                    1,
                    node_count as i64,
                ) as usize;
                let decision_positions = index::sample(rng, node_count, decision_count);
                let mut nodes = (0..node_count)
                    .map(|_| (random_name(rng), NodeKind::Normal))
                    .collect::<Vec<_>>();
                for position in decision_positions.iter() {
                    nodes[position].1 = NodeKind::Decision;
                }
                nodes
            }
        };

        let mut edges = Vec::new();
        for (i, (_, node_kind)) in nodes.iter().enumerate() {
            match node_kind {
                NodeKind::Normal => edges.extend(Self::normal_node_edges(rng, i, node_count)),
                NodeKind::Decision => edges.extend(Self::decision_node_edges(rng, i, node_count)),
            }
        }

        Flowchart::new(kind, node_count, nodes, edges)
    }

    /// Edges for a normal node: 1..=(remaining forward positions) forward
    /// edges, plus at most one backward edge.
    fn normal_node_edges<R: Rng + ?Sized>(rng: &mut R, id: usize, node_count: usize) -> Vec<Edge> {
        let mut edges = Vec::new();
        // The last node gets no forward edges; everything else gets at least one.
        if id < node_count - 1 {
            let forward_count = normal_int(
                rng,
                FORWARD_COUNT_MEAN,
                FORWARD_COUNT_STD,
                1,
                (node_count - id - 1) as i64,
            ) as usize;
            for target in sample_from_range(rng, id + 1..node_count, forward_count) {
                edges.push(Edge::plain(id, target));
            }
        }
        if id > 0 && rng.random_bool(BACK_EDGE_PROB) {
            edges.push(Edge::plain(id, rng.random_range(0..id)));
        }
        edges
    }

    /// Edges for a decision node: exactly two, the first labeled `Y` and the
    /// second `N`, with targets chosen by the banded forward/backward policy.
    /// Feasible for every position as long as `node_count >= 3`.
    fn decision_node_edges<R: Rng + ?Sized>(rng: &mut R, id: usize, node_count: usize) -> Vec<Edge> {
        let predecessors = id;
        let successors = node_count - id - 1;
        let forward = id + 1..node_count;
        let backward = 0..id;

        let roll: f64 = rng.random();
        let targets = if roll < FORWARD_PAIR_BAND {
            if successors >= 2 {
                sample_from_range(rng, forward, 2)
            } else if successors == 1 {
                vec![rng.random_range(backward), id + 1]
            } else {
                sample_from_range(rng, backward, 2)
            }
        } else if roll < BACKWARD_PAIR_BAND {
            if predecessors >= 2 {
                sample_from_range(rng, backward, 2)
            } else if predecessors == 1 {
                vec![id - 1, rng.random_range(forward)]
            } else {
                sample_from_range(rng, forward, 2)
            }
        } else if predecessors >= 1 && successors >= 1 {
            vec![rng.random_range(backward), rng.random_range(forward)]
        } else if predecessors >= 2 {
            sample_from_range(rng, backward, 2)
        } else {
            sample_from_range(rng, forward, 2)
        };

        vec![
            Edge::labeled(id, targets[0], EdgeLabel::Yes),
            Edge::labeled(id, targets[1], EdgeLabel::No),
        ]
    }
}

/// Samples `amount` distinct positions from `range` without replacement,
/// in draw order.
fn sample_from_range<R: Rng + ?Sized>(
    rng: &mut R,
    range: Range<usize>,
    amount: usize,
) -> Vec<usize> {
    let start = range.start;
    index::sample(rng, range.len(), amount)
        .iter()
        .map(|offset| start + offset)
        .collect()
}
