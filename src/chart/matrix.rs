use super::{EdgeLabel, Flowchart};

/// Matrix cell for "no edge".
pub const INVALID_ID: u8 = 0;
/// Matrix cell for an unconditional edge.
pub const PLAIN_ID: u8 = 1;
/// Matrix cell for an edge labeled `Y`.
pub const YES_ID: u8 = 10;
/// Matrix cell for an edge labeled `N`.
pub const NO_ID: u8 = 11;

/// Dense adjacency matrix derived from a flowchart's edge list.
///
/// Cell values are `INVALID_ID` (no edge), `PLAIN_ID` (unconditional edge),
/// `YES_ID` or `NO_ID` (conditional edges). Multi-edges between the same
/// ordered pair are not representable; the generator never produces them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<u8>,
}

impl AdjacencyMatrix {
    /// Builds the matrix from a flowchart. Deterministic given the edge list.
    pub fn from_chart(chart: &Flowchart) -> Self {
        let size = chart.node_count();
        let mut cells = vec![INVALID_ID; size * size];
        for edge in chart.edges() {
            cells[edge.from * size + edge.to] = match edge.label {
                EdgeLabel::Plain => PLAIN_ID,
                EdgeLabel::Yes => YES_ID,
                EdgeLabel::No => NO_ID,
            };
        }
        Self { size, cells }
    }

    /// Builds a matrix directly from rows. Rows must be square.
    pub fn from_rows(rows: Vec<Vec<u8>>) -> Self {
        let size = rows.len();
        assert!(rows.iter().all(|row| row.len() == size), "matrix must be square");
        Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, from: usize, to: usize) -> u8 {
        self.cells[from * self.size + to]
    }
}
