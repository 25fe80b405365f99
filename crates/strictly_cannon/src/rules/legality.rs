//! Move validation.
//!
//! Legality is recomputed from the target generator every time, so the
//! validator and the guide overlay cannot disagree.

use crate::action::{Move, MoveError};
use crate::formation::RuleSet;
use crate::guide::Marker;
use crate::targets::guide_after_selection;
use crate::types::{Board, Side};
use tracing::{instrument, warn};

/// Checks a move, explaining any rejection.
#[instrument(skip(board, rules, mv), fields(mv = %mv))]
pub fn check_legal(board: &Board, side: Side, mv: &Move, rules: &RuleSet) -> Result<(), MoveError> {
    let reject = |reason: &str| {
        warn!(reason, "Move rejected");
        Err(MoveError::IllegalMove {
            mv: *mv,
            reason: reason.to_string(),
        })
    };

    if !board.get(mv.from()).is_soldier_of(side) {
        return reject("acting square does not hold a soldier of the side to move");
    }

    let guide = guide_after_selection(board, mv.from(), rules);
    if guide.marker(mv.target()) != Marker::for_kind(mv.kind()) {
        return reject("target is not marked for this move kind");
    }

    Ok(())
}

/// True when `mv` is legal for `side` on `board`.
pub fn is_legal(board: &Board, side: Side, mv: &Move, rules: &RuleSet) -> bool {
    check_legal(board, side, mv, rules).is_ok()
}
