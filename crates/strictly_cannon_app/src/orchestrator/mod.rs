//! Turn and replay orchestration.

pub mod driver;
pub mod forbidden;
pub mod machine;
pub mod session;

pub use driver::{Command, GameDriver, GameEvent};
pub use forbidden::ForbiddenStates;
pub use machine::{Event, GameMode, TransitionError, transition};
pub use session::{GameSession, SessionError, Snapshot};
