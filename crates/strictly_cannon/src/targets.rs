//! Target generation: where a selected soldier may move or capture.
//!
//! All functions here are total. An empty result means no such target
//! exists on this board.

use crate::action::{Move, MoveKind};
use crate::formation::{Formation, RuleSet, formations_with_middle, formations_with_rear};
use crate::guide::{GuideState, Marker};
use crate::types::{Board, Position, Side, Square};
use tracing::{debug, instrument};

/// Empty squares directly beyond the front of each rear-rooted formation.
///
/// Moving there slides the rear soldier past the front of its cannon.
pub fn quiet_move_targets(board: &Board, rear_formations: &[Formation]) -> Vec<Position> {
    rear_formations
        .iter()
        .filter_map(|formation| formation.beyond_front(1))
        .filter(|&pos| board.is_empty(pos))
        .collect()
}

/// Enemy pieces in range of each formation.
///
/// For every configured offset the target lies that many squares beyond
/// the front; each square strictly between the front and the target must
/// be empty.
pub fn capture_targets(board: &Board, formations: &[Formation], rules: &RuleSet) -> Vec<Position> {
    let mut targets = Vec::new();
    for formation in formations {
        let Some(side) = board.get(formation.front).owner() else {
            continue;
        };
        for &offset in &rules.capture_offsets {
            let Some(offset) = i8::try_from(offset).ok().filter(|&o| o > 0) else {
                continue;
            };
            let Some(target) = formation.beyond_front(offset) else {
                continue;
            };
            let lane_clear = (1..offset).all(|step| {
                formation
                    .beyond_front(step)
                    .is_some_and(|pos| board.is_empty(pos))
            });
            if lane_clear && board.get(target).is_enemy_of(side) {
                targets.push(target);
            }
        }
    }
    targets
}

/// Diagonal-forward empty neighbours of the soldier at `pos`.
pub fn soldier_step_targets(board: &Board, pos: Position) -> Vec<Position> {
    let Square::Soldier(side) = board.get(pos) else {
        return Vec::new();
    };
    [-1, 1]
        .into_iter()
        .filter_map(|dc| pos.offset(side.forward(), dc, 1))
        .filter(|&target| board.is_empty(target))
        .collect()
}

/// Guide overlay for selecting the soldier at `selected`.
///
/// Squares that do not hold a soldier produce a blank guide.
#[instrument(skip(board, rules))]
pub fn guide_after_selection(board: &Board, selected: Position, rules: &RuleSet) -> GuideState {
    if !matches!(board.get(selected), Square::Soldier(_)) {
        return GuideState::new();
    }

    let rear = formations_with_rear(board, selected, rules);
    let middle = formations_with_middle(board, selected, rules);

    let mut quiet = quiet_move_targets(board, &rear);
    quiet.extend(soldier_step_targets(board, selected));

    let mut captures = capture_targets(board, &rear, rules);
    captures.extend(capture_targets(board, &middle, rules));

    let mut guide = GuideState::selecting(selected);
    for pos in quiet {
        guide.mark(pos, Marker::QuietMove);
    }
    for pos in captures {
        guide.mark(pos, Marker::Capture);
    }

    debug!(
        quiet = guide.positions_with(Marker::QuietMove).len(),
        captures = guide.positions_with(Marker::Capture).len(),
        "Guide computed"
    );
    guide
}

/// Every move available to the soldier at `from`.
pub fn moves_from(board: &Board, from: Position, rules: &RuleSet) -> Vec<Move> {
    let guide = guide_after_selection(board, from, rules);
    Position::all()
        .filter_map(|target| match guide.marker(target) {
            Marker::None => None,
            Marker::QuietMove => Some(Move::new(MoveKind::Advance, from, target)),
            Marker::Capture => Some(Move::new(MoveKind::Strike, from, target)),
        })
        .collect()
}

/// Every move available to `side`, soldiers in row-major order.
#[instrument(skip(board, rules))]
pub fn legal_moves(board: &Board, side: Side, rules: &RuleSet) -> Vec<Move> {
    board
        .soldier_positions(side)
        .flat_map(|from| moves_from(board, from, rules))
        .collect()
}
