//! State transition: applying a validated move.

use crate::action::{Move, MoveError};
use crate::types::{Board, Square};
use tracing::{debug, instrument};

/// Applies `mv` to `board`, returning the next board.
///
/// Callers validate first; this only checks that the board can
/// structurally take the move. The input board is never modified.
#[instrument(skip(board, mv), fields(mv = %mv))]
pub fn apply(board: &Board, mv: &Move) -> Result<Board, MoveError> {
    let invalid = |reason: &str| MoveError::InvalidTransition {
        mv: *mv,
        reason: reason.to_string(),
    };

    let next = match *mv {
        Move::Advance { from, to } => {
            let piece = board.get(from);
            if !matches!(piece, Square::Soldier(_)) {
                return Err(invalid("no soldier on the source square"));
            }
            if !board.is_empty(to) {
                return Err(invalid("destination is occupied"));
            }
            board.with(from, Square::Empty).with(to, piece)
        }
        Move::Strike { target, .. } => {
            if board.is_empty(target) {
                return Err(invalid("nothing to capture on the target square"));
            }
            board.with(target, Square::Empty)
        }
    };

    #[cfg(debug_assertions)]
    if let Err(violations) = crate::invariants::check_transition(board, &next) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(invalid(&format!("Postcondition failed: {}", descriptions)));
    }

    debug!("Move applied");
    Ok(next)
}
