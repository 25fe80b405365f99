//! First-class invariants for Cannon boards.
//!
//! Invariants are logical properties that must hold throughout a game.
//! They are checked after every transition in debug builds and can be
//! tested independently.

use crate::types::{Board, Side};

/// Soldiers per side at the start of a game.
pub const INITIAL_SOLDIERS: usize = 12;
/// Townhalls per side at the start of a game.
pub const INITIAL_TOWNHALLS: usize = 4;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// A property relating the state before and after a transition.
pub trait TransitionInvariant<S> {
    /// Checks if the invariant holds across the transition.
    fn holds(before: &S, after: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Invariant: no side ever has more pieces than it started with.
pub struct PieceCountsBounded;

impl Invariant<Board> for PieceCountsBounded {
    fn holds(board: &Board) -> bool {
        [Side::Black, Side::White].into_iter().all(|side| {
            board.soldiers(side) <= INITIAL_SOLDIERS && board.townhalls(side) <= INITIAL_TOWNHALLS
        })
    }

    fn description() -> &'static str {
        "Piece counts never exceed the starting counts"
    }
}

/// Invariant: a transition never adds pieces to either side.
pub struct PieceCountsNeverGrow;

impl TransitionInvariant<Board> for PieceCountsNeverGrow {
    fn holds(before: &Board, after: &Board) -> bool {
        [Side::Black, Side::White].into_iter().all(|side| {
            after.soldiers(side) <= before.soldiers(side)
                && after.townhalls(side) <= before.townhalls(side)
        })
    }

    fn description() -> &'static str {
        "Transitions only ever remove pieces"
    }
}

/// Invariant: a transition removes at most one piece.
pub struct AtMostOneCapture;

impl TransitionInvariant<Board> for AtMostOneCapture {
    fn holds(before: &Board, after: &Board) -> bool {
        let pieces = |b: &Board| 64 - b.count(crate::types::Square::Empty);
        pieces(before) <= pieces(after) + 1
    }

    fn description() -> &'static str {
        "A single move captures at most one piece"
    }
}

/// Checks every board invariant across a transition.
pub fn check_transition(before: &Board, after: &Board) -> Result<(), Vec<InvariantViolation>> {
    let mut violations = Vec::new();

    if !PieceCountsBounded::holds(after) {
        violations.push(InvariantViolation::new(PieceCountsBounded::description()));
    }

    if !PieceCountsNeverGrow::holds(before, after) {
        violations.push(InvariantViolation::new(PieceCountsNeverGrow::description()));
    }

    if !AtMostOneCapture::holds(before, after) {
        violations.push(InvariantViolation::new(AtMostOneCapture::description()));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
