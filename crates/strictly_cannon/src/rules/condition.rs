//! Win and stalemate evaluation.

use crate::formation::RuleSet;
use crate::phases::GameCondition;
use crate::targets::guide_after_selection;
use crate::types::{Board, Side};
use tracing::{debug, info, instrument};

/// Evaluates the board after `side_just_moved` has played.
///
/// Townhall counts are checked first and regardless of whose turn is next.
/// Otherwise the side to move must have at least one target somewhere,
/// or the game is a stalemate. A running game returns `prior` unchanged.
#[instrument(skip(board, rules))]
pub fn evaluate(
    prior: GameCondition,
    board: &Board,
    side_just_moved: Side,
    rules: &RuleSet,
) -> GameCondition {
    for side in [Side::Black, Side::White] {
        if board.townhalls(side) <= rules.min_townhalls {
            let winner = side.opponent();
            info!(loser = %side, winner = %winner, "Townhall threshold reached");
            return GameCondition::win_for(winner);
        }
    }

    let to_move = side_just_moved.opponent();
    let can_move = board
        .soldier_positions(to_move)
        .any(|pos| guide_after_selection(board, pos, rules).has_targets());

    if can_move {
        debug!(to_move = %to_move, "Game continues");
        prior
    } else {
        info!(to_move = %to_move, "No targets available");
        GameCondition::Stalemate
    }
}
