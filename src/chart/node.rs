use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a node carries conditional branching semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A plain step with unconditional outgoing edges.
    Normal,
    /// A boolean branch with exactly one `Y` and one `N` outgoing edge.
    Decision,
}

/// Resolved per-node data: the positional id, the single-letter display code
/// derived from it, the random name, and the node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Position in the flowchart's node list; also the matrix index.
    pub id: usize,
    /// Display code `A`, `B`, `C`, ... assigned by position.
    pub code: char,
    /// Random lowercase name shown inside the node glyph.
    pub name: String,
    pub kind: NodeKind,
}

impl NodeData {
    pub fn new(id: usize, name: String, kind: NodeKind) -> Self {
        debug_assert!(id < 26, "display codes are exhausted beyond 'Z'");
        Self {
            id,
            code: (b'A' + id as u8) as char,
            name,
            kind,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Normal => write!(f, "{}({})", self.code, self.name),
            NodeKind::Decision => write!(f, "{}{{{}}}", self.code, self.name),
        }
    }
}
