//! Cannon: soldiers and townhalls on an 8x8 board.
//!
//! Pure game logic with no I/O: the board model, formation detection, move
//! generation and validation, transitions, game-over evaluation and the
//! textual move record codec.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod action;
pub mod codec;
pub mod formation;
pub mod guide;
pub mod invariants;
pub mod phases;
pub mod rules;
pub mod targets;
pub mod types;

pub use action::{Move, MoveError, MoveKind};
pub use codec::{RecordError, decode, encode};
pub use formation::{
    Direction, Formation, Role, RuleSet, formations_with_middle, formations_with_rear,
};
pub use guide::{GuideState, Marker};
pub use phases::{BotSlot, GameCondition, Outcome};
pub use targets::{
    capture_targets, guide_after_selection, legal_moves, moves_from, quiet_move_targets,
    soldier_step_targets,
};
pub use types::{Board, NUM_COLUMNS, NUM_ROWS, Position, Side, Square};
