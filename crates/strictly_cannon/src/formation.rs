//! Formation ("cannon") detection.
//!
//! A formation is three same-owner soldiers on consecutive squares along
//! one of the rule set's directions. The square a query starts from is
//! either the Rear or the Middle; the Front is the far end in the
//! direction of travel.

use crate::types::{Board, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

/// A unit step on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    /// Row delta (-1, 0 or 1).
    pub dr: i8,
    /// Column delta (-1, 0 or 1).
    pub dc: i8,
}

impl Direction {
    /// Creates a direction.
    pub const fn new(dr: i8, dc: i8) -> Self {
        Self { dr, dc }
    }

    /// The four horizontal and vertical directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::new(-1, 0),
        Direction::new(1, 0),
        Direction::new(0, -1),
        Direction::new(0, 1),
    ];

    /// The four diagonal directions.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::new(-1, -1),
        Direction::new(-1, 1),
        Direction::new(1, -1),
        Direction::new(1, 1),
    ];

    /// The position `steps` away from `from` along this direction.
    pub fn step(self, from: Position, steps: i8) -> Option<Position> {
        from.offset(self.dr, self.dc, steps)
    }
}

/// Role of the queried square inside a formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The end opposite the front.
    Rear,
    /// The centre piece.
    Middle,
}

/// Tunable rule table for formations, captures and the win threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Axes along which three soldiers form a cannon.
    pub directions: Vec<Direction>,
    /// Distances beyond the front at which a formation can capture.
    pub capture_offsets: Vec<u8>,
    /// A side whose townhall count drops to this value loses.
    pub min_townhalls: usize,
}

impl RuleSet {
    /// Standard rules: orthogonal and diagonal cannons, capture two beyond the front.
    pub fn standard() -> Self {
        Self {
            directions: Direction::ORTHOGONAL
                .iter()
                .chain(Direction::DIAGONAL.iter())
                .copied()
                .collect(),
            capture_offsets: vec![2],
            min_townhalls: 2,
        }
    }

    /// Standard rules restricted to horizontal and vertical cannons.
    pub fn orthogonal() -> Self {
        Self {
            directions: Direction::ORTHOGONAL.to_vec(),
            ..Self::standard()
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Three consecutive same-owner soldiers, oriented rear to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Formation {
    /// Rear soldier.
    pub rear: Position,
    /// Middle soldier.
    pub middle: Position,
    /// Front soldier.
    pub front: Position,
    /// Direction of travel, rear to front.
    pub direction: Direction,
    /// Role of the square the formation was found from.
    pub role: Role,
}

impl Formation {
    /// The square `steps` beyond the front, if on the board.
    pub fn beyond_front(&self, steps: i8) -> Option<Position> {
        self.direction.step(self.front, steps)
    }
}

/// Formations in which `pos` is the rear soldier.
#[instrument(skip(board, rules))]
pub fn formations_with_rear(board: &Board, pos: Position, rules: &RuleSet) -> Vec<Formation> {
    let Square::Soldier(side) = board.get(pos) else {
        return Vec::new();
    };

    let found: Vec<Formation> = rules
        .directions
        .iter()
        .filter_map(|&direction| {
            let middle = direction.step(pos, 1)?;
            let front = direction.step(pos, 2)?;
            let formed =
                board.get(middle).is_soldier_of(side) && board.get(front).is_soldier_of(side);
            formed.then_some(Formation {
                rear: pos,
                middle,
                front,
                direction,
                role: Role::Rear,
            })
        })
        .collect();

    trace!(count = found.len(), "Rear formations");
    found
}

/// Formations in which `pos` is the middle soldier.
#[instrument(skip(board, rules))]
pub fn formations_with_middle(board: &Board, pos: Position, rules: &RuleSet) -> Vec<Formation> {
    let Square::Soldier(side) = board.get(pos) else {
        return Vec::new();
    };

    let found: Vec<Formation> = rules
        .directions
        .iter()
        .filter_map(|&direction| {
            let rear = direction.step(pos, -1)?;
            let front = direction.step(pos, 1)?;
            let formed =
                board.get(rear).is_soldier_of(side) && board.get(front).is_soldier_of(side);
            formed.then_some(Formation {
                rear,
                middle: pos,
                front,
                direction,
                role: Role::Middle,
            })
        })
        .collect();

    trace!(count = found.len(), "Middle formations");
    found
}
