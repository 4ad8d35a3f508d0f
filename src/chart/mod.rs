//! The logical flowchart model: nodes, edges, the derived adjacency matrix,
//! diagram-script emission, and binary persistence.

use crate::error::StoreError;
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

pub mod builder;
pub mod matrix;
pub mod node;
pub mod statistics;

pub use builder::FlowchartBuilder;
pub use matrix::{AdjacencyMatrix, INVALID_ID, NO_ID, PLAIN_ID, YES_ID};
pub use node::{NodeData, NodeKind};
pub use statistics::FlowchartStatistics;

/// Whether a flowchart contains decision nodes at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartKind {
    Normal,
    Decision,
}

/// Edge annotation. Plain edges render without a label; the conditional
/// labels render as `Y` / `N` on the arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeLabel {
    Plain,
    Yes,
    No,
}

impl fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeLabel::Plain => Ok(()),
            EdgeLabel::Yes => write!(f, "Y"),
            EdgeLabel::No => write!(f, "N"),
        }
    }
}

/// A directed edge between two node positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub label: EdgeLabel,
}

impl Edge {
    pub fn plain(from: usize, to: usize) -> Self {
        Self {
            from,
            to,
            label: EdgeLabel::Plain,
        }
    }

    pub fn labeled(from: usize, to: usize, label: EdgeLabel) -> Self {
        Self { from, to, label }
    }
}

/// Diagram layout direction. Presentation-only; not part of the logical
/// model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftRight,
    TopBottom,
}

impl Direction {
    fn as_str(self) -> &'static str {
        match self {
            Direction::LeftRight => "LR",
            Direction::TopBottom => "TB",
        }
    }
}

/// A generated flowchart.
///
/// Node identity is positional: the node at index `i` has id `i` and display
/// code `'A' + i`. Node and edge order therefore matter and are preserved
/// exactly through persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flowchart {
    kind: ChartKind,
    node_count: usize,
    nodes: Vec<(String, NodeKind)>,
    edges: Vec<Edge>,
}

impl Flowchart {
    pub fn new(
        kind: ChartKind,
        node_count: usize,
        nodes: Vec<(String, NodeKind)>,
        edges: Vec<Edge>,
    ) -> Self {
        debug_assert_eq!(node_count, nodes.len());
        Self {
            kind,
            node_count,
            nodes,
            edges,
        }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn nodes(&self) -> &[(String, NodeKind)] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Resolves the positional node list into display-ready node data.
    pub fn node_data(&self) -> Vec<NodeData> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, (name, kind))| NodeData::new(i, name.clone(), *kind))
            .collect()
    }

    /// Derives the adjacency matrix. Deterministic given the edge list.
    pub fn matrix(&self) -> AdjacencyMatrix {
        AdjacencyMatrix::from_chart(self)
    }

    /// Emits the diagram script with a randomly chosen layout direction
    /// (70% left-right, 30% top-bottom).
    pub fn mermaid_script<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let direction = if rng.random_bool(0.7) {
            Direction::LeftRight
        } else {
            Direction::TopBottom
        };
        self.mermaid_script_with(direction)
    }

    /// Emits the diagram script with a fixed layout direction.
    pub fn mermaid_script_with(&self, direction: Direction) -> String {
        let node_data = self.node_data();
        let mut script = format!("flowchart {}\n", direction.as_str());
        for edge in &self.edges {
            script.push_str(&Self::edge_line(edge, &node_data));
            script.push('\n');
        }
        script
    }

    /// Renders one edge as a script line, with the node glyph depending on
    /// the node kind: `A(name)` for normal nodes, `A{name}` for decision
    /// nodes.
    fn edge_line(edge: &Edge, node_data: &[NodeData]) -> String {
        let first = &node_data[edge.from];
        let second = &node_data[edge.to];
        match edge.label {
            EdgeLabel::Plain => format!("\t{first}-->{second}"),
            label => format!("\t{first}-- {label} -->{second}"),
        }
    }

    /// Writes the diagram script to a file, choosing the layout direction at
    /// random.
    pub fn save_mermaid<R: Rng + ?Sized>(
        &self,
        path: impl AsRef<Path>,
        rng: &mut R,
    ) -> Result<(), StoreError> {
        let path = path.as_ref();
        fs::write(path, self.mermaid_script(rng)).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Saves the flowchart in binary form. Round-trips exactly: kind, node
    /// order, and edge order are all preserved.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let bytes =
            encode_to_vec(self, standard()).map_err(|e| StoreError::Encode(e.to_string()))?;
        fs::write(path, bytes).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Loads a flowchart previously written by [`Flowchart::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| StoreError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        decode_from_slice(&bytes, standard())
            .map(|(chart, _)| chart) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| StoreError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}
