//! Strictly Cannon application - turn orchestration, bots and replay for Cannon
//!
//! Cannon is played on an 8x8 board by two sides, Black and White, each with
//! soldiers and townhalls. Three same-side soldiers in a line form a cannon
//! that can slide forward or fire at an enemy piece beyond its front.
//!
//! # Architecture
//!
//! - **Rules** (`strictly_cannon`): board model, formation detection, move
//!   generation, validation, transitions, game-over evaluation and the codec
//! - **Orchestrator**: pure turn/replay state machine, forbidden-state
//!   table, the synchronous `GameSession` and the async `GameDriver`
//! - **Players**: bots that answer with move records (local, scripted, HTTP)
//! - **Config**: TOML configuration with environment overrides
//!
//! # Example
//!
//! ```
//! use strictly_cannon_app::{GameMode, GameSession, MoveKind, Position, RuleSet};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = GameSession::new(RuleSet::standard(), GameMode::PlayerVsPlayer);
//! session.start()?;
//! session.select(Position::new(5, 0)?);
//! let mv = session.propose(MoveKind::Advance, Position::new(4, 1)?)?;
//! session.stage(mv)?;
//! session.commit()?;
//! assert_eq!(session.log(), ["S 5 0 M 4 1"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod console;
pub mod orchestrator;
pub mod players;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, RulesConfig};

// Crate-level exports - Orchestration
pub use orchestrator::{
    Command, Event, ForbiddenStates, GameDriver, GameEvent, GameMode, GameSession, SessionError,
    Snapshot, TransitionError,
};

// Crate-level exports - Players
pub use players::{
    BotClient, BotError, BotErrorKind, BotRequest, HttpBotClient, LocalBot, ScriptedBot,
};

// Crate-level exports - Game types
pub use strictly_cannon::{
    Board, BotSlot, GameCondition, GuideState, Marker, Move, MoveError, MoveKind, Outcome,
    Position, RecordError, RuleSet, Side, Square,
};
