//! Pure reachability and validity queries over an adjacency matrix.

use crate::chart::matrix::{AdjacencyMatrix, INVALID_ID};

/// Answers the five query classes against one flowchart's adjacency matrix.
///
/// Stateless beyond the borrowed matrix: every method is deterministic for a
/// fixed matrix, and none of them mutate anything.
pub struct QuerySolver<'a> {
    matrix: &'a AdjacencyMatrix,
}

impl<'a> QuerySolver<'a> {
    pub fn new(matrix: &'a AdjacencyMatrix) -> Self {
        Self { matrix }
    }

    pub fn node_count(&self) -> usize {
        self.matrix.size()
    }

    /// Whether `to` can directly follow `from`. Conditional edges count.
    pub fn next_ok(&self, from: usize, to: usize) -> bool {
        self.matrix.get(from, to) != INVALID_ID && to != from
    }

    /// All direct successors of `from`, in ascending id order.
    pub fn all_next(&self, from: usize) -> Vec<usize> {
        (0..self.matrix.size())
            .filter(|&to| self.next_ok(from, to))
            .collect()
    }

    /// All direct predecessors of `to`, in ascending id order.
    pub fn all_prev(&self, to: usize) -> Vec<usize> {
        (0..self.matrix.size())
            .filter(|&from| self.next_ok(from, to))
            .collect()
    }

    /// All successors of `from` reached under the given condition id, in
    /// ascending id order.
    pub fn cond_next(&self, from: usize, condition: u8) -> Vec<usize> {
        (0..self.matrix.size())
            .filter(|&to| self.matrix.get(from, to) == condition && to != from)
            .collect()
    }

    /// Whether every consecutive transition in `sequence` exists. Empty and
    /// single-element sequences are trivially valid.
    pub fn is_valid_sequence(&self, sequence: &[usize]) -> bool {
        sequence
            .windows(2)
            .all(|pair| self.next_ok(pair[0], pair[1]))
    }
}
