//! Game conditions for the turn/replay state machine.

use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Which of the two configured bots is being asked for a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BotSlot {
    /// The bot playing against a human, or the first bot in bot-vs-bot.
    Primary,
    /// The second bot in bot-vs-bot.
    Secondary,
}

impl BotSlot {
    /// The other bot.
    pub fn other(self) -> Self {
        match self {
            BotSlot::Primary => BotSlot::Secondary,
            BotSlot::Secondary => BotSlot::Primary,
        }
    }
}

/// Where the game currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameCondition {
    /// No game running.
    Idle,
    /// Waiting for a human to pick a move.
    AwaitingHumanMove,
    /// Waiting for a bot to return a move.
    AwaitingBotMove(BotSlot),
    /// Re-executing the recorded log.
    Replaying,
    /// Replay suspended by the user.
    ReplayPaused,
    /// Black captured enough townhalls.
    BlackWins,
    /// White captured enough townhalls.
    WhiteWins,
    /// The side to move has nothing to do.
    Stalemate,
}

impl GameCondition {
    /// Win condition for `side`.
    pub fn win_for(side: Side) -> Self {
        match side {
            Side::Black => GameCondition::BlackWins,
            Side::White => GameCondition::WhiteWins,
        }
    }

    /// True for BlackWins, WhiteWins and Stalemate.
    pub fn is_game_over(self) -> bool {
        matches!(
            self,
            GameCondition::BlackWins | GameCondition::WhiteWins | GameCondition::Stalemate
        )
    }

    /// True while live moves are being played.
    pub fn is_live(self) -> bool {
        matches!(
            self,
            GameCondition::AwaitingHumanMove | GameCondition::AwaitingBotMove(_)
        )
    }

    /// True while a replay is in progress or paused.
    pub fn is_replay(self) -> bool {
        matches!(self, GameCondition::Replaying | GameCondition::ReplayPaused)
    }

    /// Outcome of a finished game.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            GameCondition::BlackWins => Some(Outcome::Winner(Side::Black)),
            GameCondition::WhiteWins => Some(Outcome::Winner(Side::White)),
            GameCondition::Stalemate => Some(Outcome::Stalemate),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameCondition::Idle => write!(f, "Idle"),
            GameCondition::AwaitingHumanMove => write!(f, "Your move"),
            GameCondition::AwaitingBotMove(slot) => write!(f, "Waiting for {} bot", slot),
            GameCondition::Replaying => write!(f, "Replaying"),
            GameCondition::ReplayPaused => write!(f, "Replay paused"),
            GameCondition::BlackWins => write!(f, "Black wins"),
            GameCondition::WhiteWins => write!(f, "White wins"),
            GameCondition::Stalemate => write!(f, "Stalemate"),
        }
    }
}

/// Outcome of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// A side won.
    Winner(Side),
    /// Nobody can move.
    Stalemate,
}

impl Outcome {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Winner(side) => Some(*side),
            Outcome::Stalemate => None,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Winner(side) => write!(f, "{} wins", side),
            Outcome::Stalemate => write!(f, "Stalemate"),
        }
    }
}
