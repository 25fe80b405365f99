//! Rules engine scenarios and properties over reachable boards.

use strictly_cannon::{
    Board, GameCondition, GuideState, Marker, Move, MoveKind, Position, RuleSet, Side, Square,
    capture_targets, decode, encode, formations_with_middle, formations_with_rear,
    guide_after_selection, legal_moves, rules,
};

fn pos(row: i32, col: i32) -> Position {
    Position::new(row, col).unwrap()
}

fn place(board: Board, squares: &[(i32, i32, Square)]) -> Board {
    squares
        .iter()
        .fold(board, |b, &(r, c, sq)| b.with(pos(r, c), sq))
}

/// Boards reachable from the initial layout in at most `depth` plies,
/// paired with the side to move.
fn reachable(depth: usize, rules: &RuleSet) -> Vec<(Board, Side)> {
    let mut frontier = vec![(Board::initial(), Side::Black)];
    let mut all = frontier.clone();
    for _ in 0..depth {
        let mut next = Vec::new();
        for (board, side) in &frontier {
            for mv in legal_moves(board, *side, rules) {
                let after = rules::apply(board, &mv).unwrap();
                next.push((after, side.opponent()));
            }
        }
        all.extend(next.iter().copied());
        frontier = next;
    }
    all
}

#[test]
fn test_initial_board_has_advances_and_no_strikes() {
    let moves = legal_moves(&Board::initial(), Side::Black, &RuleSet::standard());
    assert!(moves.iter().any(|m| m.kind() == MoveKind::Advance));
    assert!(moves.iter().all(|m| m.kind() != MoveKind::Strike));
}

#[test]
fn test_horizontal_formation_single_capture() {
    let board = place(
        Board::empty(),
        &[
            (4, 1, Square::Soldier(Side::Black)),
            (4, 2, Square::Soldier(Side::Black)),
            (4, 3, Square::Soldier(Side::Black)),
            (4, 5, Square::Soldier(Side::White)),
        ],
    );
    let guide = guide_after_selection(&board, pos(4, 1), &RuleSet::standard());
    assert_eq!(guide.positions_with(Marker::Capture), vec![pos(4, 5)]);
    assert_eq!(guide.selected(), Some(pos(4, 1)));
}

#[test]
fn test_townhall_threshold_wins_regardless_of_turn() {
    let board = place(
        Board::initial(),
        &[(7, 1, Square::Empty), (7, 3, Square::Empty)],
    );
    assert_eq!(board.townhalls(Side::Black), 2);
    for prior in [GameCondition::AwaitingHumanMove, GameCondition::Replaying] {
        assert_eq!(
            rules::evaluate(prior, &board, Side::White, &RuleSet::standard()),
            GameCondition::WhiteWins
        );
        assert_eq!(
            rules::evaluate(prior, &board, Side::Black, &RuleSet::standard()),
            GameCondition::WhiteWins
        );
    }
}

fn stuck_board() -> Board {
    place(
        Board::empty(),
        &[
            (0, 0, Square::Soldier(Side::Black)),
            (7, 1, Square::Townhall(Side::Black)),
            (7, 3, Square::Townhall(Side::Black)),
            (7, 5, Square::Townhall(Side::Black)),
            (0, 3, Square::Townhall(Side::White)),
            (0, 5, Square::Townhall(Side::White)),
            (0, 7, Square::Townhall(Side::White)),
            (3, 4, Square::Soldier(Side::White)),
        ],
    )
}

#[test]
fn test_side_without_targets_is_stalemate() {
    let result = rules::evaluate(
        GameCondition::AwaitingHumanMove,
        &stuck_board(),
        Side::White,
        &RuleSet::standard(),
    );
    assert_eq!(result, GameCondition::Stalemate);
}

#[test]
fn test_terminal_evaluation_is_idempotent() {
    let rules = RuleSet::standard();
    let won = place(Board::initial(), &[(0, 0, Square::Empty), (0, 2, Square::Empty)]);
    for (board, just_moved) in [(won, Side::Black), (stuck_board(), Side::White)] {
        let first = rules::evaluate(GameCondition::AwaitingHumanMove, &board, just_moved, &rules);
        assert!(first.is_game_over());
        let second = rules::evaluate(first, &board, just_moved, &rules);
        assert_eq!(first, second);
    }
}

#[test]
fn test_captures_only_target_enemies_on_reachable_boards() {
    let rules = RuleSet::standard();
    for (board, _) in reachable(2, &rules) {
        for pos in Position::all() {
            let Square::Soldier(side) = board.get(pos) else {
                continue;
            };
            let mut formations = formations_with_rear(&board, pos, &rules);
            formations.extend(formations_with_middle(&board, pos, &rules));
            for target in capture_targets(&board, &formations, &rules) {
                assert!(
                    board.get(target).is_enemy_of(side),
                    "capture of {:?} at {} from {}",
                    board.get(target),
                    target,
                    pos
                );
            }
        }
    }
}

#[test]
fn test_codec_round_trips_generated_moves() {
    let rules = RuleSet::standard();
    for (board, side) in reachable(2, &rules) {
        for mv in legal_moves(&board, side, &rules) {
            assert_eq!(decode(&encode(&mv)).unwrap(), mv);
        }
    }
}

#[test]
fn test_advance_vacates_source() {
    let rules = RuleSet::standard();
    for (board, side) in reachable(1, &rules) {
        for mv in legal_moves(&board, side, &rules) {
            let Move::Advance { from, to } = mv else {
                continue;
            };
            let after = rules::apply(&board, &mv).unwrap();
            assert_eq!(after.get(from), Square::Empty);
            assert_eq!(after.get(to), Square::Soldier(side));
            assert_eq!(guide_after_selection(&after, from, &rules), GuideState::new());
        }
    }
}

#[test]
fn test_strike_keeps_shooter_and_removes_target() {
    let board = place(
        Board::empty(),
        &[
            (4, 1, Square::Soldier(Side::Black)),
            (4, 2, Square::Soldier(Side::Black)),
            (4, 3, Square::Soldier(Side::Black)),
            (4, 5, Square::Townhall(Side::White)),
        ],
    );
    let mv = Move::Strike {
        from: pos(4, 1),
        target: pos(4, 5),
    };
    rules::check_legal(&board, Side::Black, &mv, &RuleSet::standard()).unwrap();
    let after = rules::apply(&board, &mv).unwrap();
    assert_eq!(after.get(pos(4, 5)), Square::Empty);
    assert_eq!(after.get(pos(4, 1)), Square::Soldier(Side::Black));
    assert_eq!(board.get(pos(4, 5)), Square::Townhall(Side::White));
}

#[test]
fn test_orthogonal_rules_ignore_diagonal_cannons() {
    let board = place(
        Board::empty(),
        &[
            (6, 1, Square::Soldier(Side::Black)),
            (5, 2, Square::Soldier(Side::Black)),
            (4, 3, Square::Soldier(Side::Black)),
            (2, 5, Square::Soldier(Side::White)),
        ],
    );
    let diagonal = guide_after_selection(&board, pos(6, 1), &RuleSet::standard());
    assert_eq!(diagonal.positions_with(Marker::Capture), vec![pos(2, 5)]);
    let orthogonal = guide_after_selection(&board, pos(6, 1), &RuleSet::orthogonal());
    assert!(orthogonal.positions_with(Marker::Capture).is_empty());
}
