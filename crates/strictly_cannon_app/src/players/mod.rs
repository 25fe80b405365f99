//! Bot players.
//!
//! A bot receives the board, the side to move and the boards it must not
//! return to, and answers with a move record. Validation of the answer is
//! the orchestrator's job.

mod http;
mod local;
mod scripted;

pub use http::HttpBotClient;
pub use local::LocalBot;
pub use scripted::ScriptedBot;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_new::new;
use strictly_cannon::{Board, Side};
use tracing::instrument;

/// Everything a bot is told about the position it must move in.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct BotRequest {
    /// Current board.
    board: Board,
    /// Side the bot moves for.
    side: Side,
    /// Boards already reached from this position.
    forbidden: Vec<Board>,
}

/// What went wrong talking to a bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum BotErrorKind {
    /// The request could not be delivered.
    Transport,
    /// No answer within the configured timeout.
    Timeout,
    /// The answer was not shaped like a move reply.
    BadResponse,
    /// The bot has nothing left to play.
    Exhausted,
}

/// Bot communication error.
#[derive(Debug, Clone, Display, Error)]
#[display("Bot error ({}): {} at {}:{}", kind, message, file, line)]
pub struct BotError {
    /// Error category.
    pub kind: BotErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BotError {
    /// Creates a new bot error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: BotErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// A source of moves for one seat.
#[async_trait::async_trait]
pub trait BotClient: Send + Sync {
    /// Asks for a move record for the position in `request`.
    async fn fetch_move(&self, request: BotRequest) -> Result<String, BotError>;

    /// Returns the bot's display name.
    fn name(&self) -> &str;
}
