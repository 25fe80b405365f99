//! Game rules for Cannon.
//!
//! Pure functions over boards: validation, transitions and game-over
//! evaluation. Rules are separated from board storage so the orchestrator
//! can compose them without holding any rule state of its own.

pub mod condition;
pub mod legality;
pub mod transition;

pub use condition::evaluate;
pub use legality::{check_legal, is_legal};
pub use transition::apply;
