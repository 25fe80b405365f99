//! First-class move types for Cannon.
//!
//! Moves are domain events: they are produced by the target generator or
//! decoded from a log record, validated against a board, and only then
//! applied.

use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Kind of move, as written in a move record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum MoveKind {
    /// Quiet move onto an empty square (`M`).
    #[strum(serialize = "M")]
    Advance,
    /// Capture at range without moving (`B`).
    #[strum(serialize = "B")]
    Strike,
}

/// A move in Cannon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Relocate the soldier at `from` onto the empty square `to`.
    Advance {
        /// Square of the moving soldier.
        from: Position,
        /// Destination square.
        to: Position,
    },
    /// Remove the enemy piece at `target`. The soldier at `from` stays put.
    Strike {
        /// Square of the acting soldier.
        from: Position,
        /// Square of the captured piece.
        target: Position,
    },
}

impl Move {
    /// Builds a move of the given kind.
    pub fn new(kind: MoveKind, from: Position, target: Position) -> Self {
        match kind {
            MoveKind::Advance => Move::Advance { from, to: target },
            MoveKind::Strike => Move::Strike { from, target },
        }
    }

    /// The kind of this move.
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Advance { .. } => MoveKind::Advance,
            Move::Strike { .. } => MoveKind::Strike,
        }
    }

    /// The acting soldier's square.
    pub fn from(&self) -> Position {
        match *self {
            Move::Advance { from, .. } | Move::Strike { from, .. } => from,
        }
    }

    /// The square the move is aimed at.
    pub fn target(&self) -> Position {
        match *self {
            Move::Advance { to, .. } => to,
            Move::Strike { target, .. } => target,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Move::Advance { from, to } => write!(f, "{} -> {}", from, to),
            Move::Strike { from, target } => write!(f, "{} x {}", from, target),
        }
    }
}

/// Error that can occur when building, validating or applying a move.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Coordinates outside the 8x8 board.
    #[display("Position ({}, {}) is off the board", row, col)]
    InvalidPosition {
        /// Requested row.
        row: i32,
        /// Requested column.
        col: i32,
    },

    /// The move is not among the targets available on this board.
    #[display("Illegal move {}: {}", mv, reason)]
    IllegalMove {
        /// Rejected move.
        mv: Move,
        /// Why it was rejected.
        reason: String,
    },

    /// A move was proposed without a selected soldier.
    #[display("No soldier is selected")]
    NoSelection,

    /// The board cannot structurally take this move.
    #[display("Cannot apply {}: {}", mv, reason)]
    InvalidTransition {
        /// Move that could not be applied.
        mv: Move,
        /// What was wrong with the board.
        reason: String,
    },
}

impl std::error::Error for MoveError {}
