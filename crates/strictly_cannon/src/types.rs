//! Core domain types for Cannon.

use crate::action::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows on the board.
pub const NUM_ROWS: u8 = 8;
/// Number of columns on the board.
pub const NUM_COLUMNS: u8 = 8;

/// Side in the game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Black (starts at the bottom, moves first).
    Black,
    /// White (starts at the top).
    White,
}

impl Side {
    /// Returns the opposing side.
    pub fn opponent(self) -> Self {
        match self {
            Side::Black => Side::White,
            Side::White => Side::Black,
        }
    }

    /// Row delta that moves a soldier of this side toward the opponent.
    pub fn forward(self) -> i8 {
        match self {
            Side::Black => -1,
            Side::White => 1,
        }
    }
}

/// Content of a single square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Square {
    /// Nothing here.
    #[default]
    Empty,
    /// A mobile soldier.
    Soldier(Side),
    /// An immobile townhall.
    Townhall(Side),
}

impl Square {
    /// Owner of the piece on this square, if any.
    pub fn owner(self) -> Option<Side> {
        match self {
            Square::Empty => None,
            Square::Soldier(side) | Square::Townhall(side) => Some(side),
        }
    }

    /// True when this square holds a soldier of `side`.
    pub fn is_soldier_of(self, side: Side) -> bool {
        self == Square::Soldier(side)
    }

    /// True when this square holds any piece of `side`'s opponent.
    pub fn is_enemy_of(self, side: Side) -> bool {
        self.owner() == Some(side.opponent())
    }

    /// Wire code used by move logs and the bot protocol.
    pub fn code(self) -> &'static str {
        match self {
            Square::Empty => "E",
            Square::Soldier(Side::Black) => "B",
            Square::Soldier(Side::White) => "W",
            Square::Townhall(Side::Black) => "Tb",
            Square::Townhall(Side::White) => "Tw",
        }
    }

    /// Parses a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "E" => Some(Square::Empty),
            "B" => Some(Square::Soldier(Side::Black)),
            "W" => Some(Square::Soldier(Side::White)),
            "Tb" => Some(Square::Townhall(Side::Black)),
            "Tw" => Some(Square::Townhall(Side::White)),
            _ => None,
        }
    }
}

impl From<Square> for String {
    fn from(square: Square) -> Self {
        square.code().to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        Square::from_code(&code).ok_or_else(|| format!("unknown square code '{}'", code))
    }
}

/// A square coordinate, 0-indexed from the top-left.
///
/// Always on the board: construction and deserialization both go through
/// [`Position::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPosition")]
pub struct Position {
    row: u8,
    col: u8,
}

/// Unchecked wire form of a [`Position`].
#[derive(Deserialize)]
struct RawPosition {
    row: i32,
    col: i32,
}

impl TryFrom<RawPosition> for Position {
    type Error = MoveError;

    fn try_from(raw: RawPosition) -> Result<Self, Self::Error> {
        Position::new(raw.row, raw.col)
    }
}

impl Position {
    /// Creates a position, rejecting off-board coordinates.
    pub fn new(row: i32, col: i32) -> Result<Self, MoveError> {
        if (0..NUM_ROWS as i32).contains(&row) && (0..NUM_COLUMNS as i32).contains(&col) {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(MoveError::InvalidPosition { row, col })
        }
    }

    /// Row index.
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column index.
    pub fn col(self) -> u8 {
        self.col
    }

    /// The position `steps` times `(dr, dc)` away, if still on the board.
    pub fn offset(self, dr: i8, dc: i8, steps: i8) -> Option<Self> {
        let row = self.row as i32 + dr as i32 * steps as i32;
        let col = self.col as i32 + dc as i32 * steps as i32;
        Self::new(row, col).ok()
    }

    /// Every square on the board in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..NUM_ROWS).flat_map(|row| (0..NUM_COLUMNS).map(move |col| Position { row, col }))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// 8x8 Cannon board.
///
/// Boards are plain `Copy` values. A transition always produces a new
/// board, so snapshots held by the log, the replay path or the forbidden
/// table can never observe later moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board {
    cells: [[Square; NUM_COLUMNS as usize]; NUM_ROWS as usize],
}

impl Board {
    /// A board with no pieces.
    pub fn empty() -> Self {
        Self {
            cells: [[Square::Empty; NUM_COLUMNS as usize]; NUM_ROWS as usize],
        }
    }

    /// The standard starting layout.
    ///
    /// White holds the top three rows, Black the bottom three. Each side
    /// has four townhalls on its home row and twelve soldiers in four
    /// columns of three.
    #[instrument]
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for col in 0..NUM_COLUMNS as usize {
            if col % 2 == 0 {
                board.cells[0][col] = Square::Townhall(Side::White);
                for row in 5..8 {
                    board.cells[row][col] = Square::Soldier(Side::Black);
                }
            } else {
                board.cells[7][col] = Square::Townhall(Side::Black);
                for row in 0..3 {
                    board.cells[row][col] = Square::Soldier(Side::White);
                }
            }
        }
        board
    }

    /// Builds a board from rows of wire codes (`E`, `B`, `W`, `Tb`, `Tw`).
    pub fn from_codes(rows: &[[&str; NUM_COLUMNS as usize]; NUM_ROWS as usize]) -> Option<Self> {
        let mut board = Self::empty();
        for (r, row) in rows.iter().enumerate() {
            for (c, code) in row.iter().enumerate() {
                board.cells[r][c] = Square::from_code(code)?;
            }
        }
        Some(board)
    }

    /// Square content at `pos`.
    pub fn get(&self, pos: Position) -> Square {
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Returns a copy of this board with `pos` replaced by `square`.
    #[must_use]
    pub fn with(mut self, pos: Position, square: Square) -> Self {
        self.cells[pos.row as usize][pos.col as usize] = square;
        self
    }

    /// True when `pos` holds nothing.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Square::Empty
    }

    /// Number of squares holding exactly `square`.
    pub fn count(&self, square: Square) -> usize {
        self.cells.iter().flatten().filter(|&&s| s == square).count()
    }

    /// Surviving townhalls of `side`.
    pub fn townhalls(&self, side: Side) -> usize {
        self.count(Square::Townhall(side))
    }

    /// Surviving soldiers of `side`.
    pub fn soldiers(&self, side: Side) -> usize {
        self.count(Square::Soldier(side))
    }

    /// Positions of all soldiers belonging to `side`.
    pub fn soldier_positions(&self, side: Side) -> impl Iterator<Item = Position> + '_ {
        Position::all().filter(move |&pos| self.get(pos).is_soldier_of(side))
    }

    /// Rows of squares, top first.
    pub fn rows(&self) -> &[[Square; NUM_COLUMNS as usize]; NUM_ROWS as usize] {
        &self.cells
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        let mut result = String::from("   0  1  2  3  4  5  6  7\n");
        for (r, row) in self.cells.iter().enumerate() {
            result.push_str(&format!("{} ", r));
            for square in row {
                result.push_str(&format!("{:<3}", square.code()));
            }
            result.push('\n');
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}
