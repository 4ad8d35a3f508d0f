use super::{ChartKind, Flowchart, NodeKind};
use crate::error::StoreError;
use ahash::AHashMap;
use itertools::Itertools;
use std::fs;
use std::path::Path;

/// Aggregate shape statistics over one batch of generated flowcharts.
///
/// Purely observational; adding a flowchart never influences generation.
#[derive(Debug, Default)]
pub struct FlowchartStatistics {
    total: usize,
    normal: usize,
    decision: usize,
    node_counts: AHashMap<usize, usize>,
    edge_counts: AHashMap<usize, usize>,
    decision_node_counts: AHashMap<usize, usize>,
    density_sum: f64,
}

impl FlowchartStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_flowchart(&mut self, chart: &Flowchart) {
        self.total += 1;
        match chart.kind() {
            ChartKind::Normal => self.normal += 1,
            ChartKind::Decision => self.decision += 1,
        }

        *self.node_counts.entry(chart.node_count()).or_default() += 1;
        let edge_count = chart.edges().len();
        *self.edge_counts.entry(edge_count).or_default() += 1;
        self.density_sum += edge_count as f64 / chart.node_count() as f64;

        let decision_nodes = chart
            .nodes()
            .iter()
            .filter(|(_, kind)| *kind == NodeKind::Decision)
            .count();
        *self.decision_node_counts.entry(decision_nodes).or_default() += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Human-readable report over the whole batch.
    pub fn summary(&self) -> String {
        let total = self.total.max(1) as f64;
        let decision_total = self.decision.max(1) as f64;
        format!(
            "--- Flowchart Statistics ---\n\
             Total Flowcharts: {}\n\
             Normal Flowcharts: {} ({:.2}%)\n\
             Decision Flowcharts: {} ({:.2}%)\n\
             Node Count Distribution: {}\n\
             \x20 Avg Node Count: {:.2}\n\
             Edge Count Distribution: {}\n\
             \x20 Avg Edge Count: {:.2}\n\
             \x20 Avg Edge Density: {:.2}\n\
             Decision Node Count Distribution: {}\n\
             \x20 Avg Decision Node Count: {:.2}",
            self.total,
            self.normal,
            self.normal as f64 / total * 100.0,
            self.decision,
            self.decision as f64 / total * 100.0,
            format_distribution(&self.node_counts),
            weighted_sum(&self.node_counts) / total,
            format_distribution(&self.edge_counts),
            weighted_sum(&self.edge_counts) / total,
            self.density_sum / total,
            format_distribution(&self.decision_node_counts),
            weighted_sum(&self.decision_node_counts) / decision_total,
        )
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        fs::write(path, self.summary()).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Formats a count distribution as `{key: count, ...}` with ascending keys.
fn format_distribution(counts: &AHashMap<usize, usize>) -> String {
    let body = counts
        .iter()
        .sorted()
        .map(|(key, count)| format!("{key}: {count}"))
        .join(", ");
    format!("{{{body}}}")
}

fn weighted_sum(counts: &AHashMap<usize, usize>) -> f64 {
    counts.iter().map(|(key, count)| (key * count) as f64).sum()
}
