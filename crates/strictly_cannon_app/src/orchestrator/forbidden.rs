//! Forbidden successor states.
//!
//! Every live move records the board it produced under the position it
//! was played from. Bots receive the list for the current position and
//! are expected to avoid returning to any of those boards.

use std::collections::HashMap;
use strictly_cannon::{Board, Side};
use tracing::trace;

/// Successor boards already reached from each (board, side to move) pair.
#[derive(Debug, Clone, Default)]
pub struct ForbiddenStates {
    table: HashMap<(Board, Side), Vec<Board>>,
}

impl ForbiddenStates {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `after` was reached from `before` with `side` to move.
    pub fn record(&mut self, before: Board, side: Side, after: Board) {
        let successors = self.table.entry((before, side)).or_default();
        if !successors.contains(&after) {
            successors.push(after);
        }
        trace!(known = successors.len(), "Forbidden successor recorded");
    }

    /// Successors already reached from this position, oldest first.
    pub fn successors(&self, board: &Board, side: Side) -> &[Board] {
        self.table
            .get(&(*board, side))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when `candidate` was already reached from this position.
    pub fn is_forbidden(&self, board: &Board, side: Side, candidate: &Board) -> bool {
        self.successors(board, side).contains(candidate)
    }

    /// Number of positions with at least one recorded successor.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.table.clear();
    }
}
