//! Turn/replay state machine.
//!
//! Every transition is a pure function of the current condition, the game
//! mode and an event. Nothing here touches boards or timers.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strictly_cannon::{BotSlot, GameCondition, Side};
use tracing::{debug, instrument};

/// Who plays which side.
///
/// Defaults to [`GameMode::PlayerVsPlayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans share the board.
    #[default]
    PlayerVsPlayer,
    /// A human against the primary bot.
    PlayerVsBot {
        /// Side the human plays.
        human: Side,
    },
    /// Primary bot against secondary bot.
    BotVsBot {
        /// Side the primary bot plays.
        primary: Side,
    },
}

impl GameMode {
    /// Returns display name.
    pub fn name(&self) -> &'static str {
        match self {
            GameMode::PlayerVsPlayer => "Player vs Player",
            GameMode::PlayerVsBot { .. } => "Player vs Bot",
            GameMode::BotVsBot { .. } => "Bot vs Bot",
        }
    }

    /// Condition a fresh game starts in. Black always moves first.
    pub fn opening_condition(&self) -> GameCondition {
        match *self {
            GameMode::PlayerVsPlayer => GameCondition::AwaitingHumanMove,
            GameMode::PlayerVsBot { human: Side::Black } => GameCondition::AwaitingHumanMove,
            GameMode::PlayerVsBot { human: Side::White } => {
                GameCondition::AwaitingBotMove(BotSlot::Primary)
            }
            GameMode::BotVsBot { primary: Side::Black } => {
                GameCondition::AwaitingBotMove(BotSlot::Primary)
            }
            GameMode::BotVsBot { primary: Side::White } => {
                GameCondition::AwaitingBotMove(BotSlot::Secondary)
            }
        }
    }
}

impl std::fmt::Display for GameMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Event {
    /// The user started a game.
    Start,
    /// A move was committed and the game continues.
    MoveCommitted,
    /// The evaluator reported a terminal condition.
    GameOver(GameCondition),
    /// The user quit, or the game was aborted.
    Quit,
    /// The user asked to replay the log.
    RequestReplay,
    /// The user paused the replay.
    Pause,
    /// The user resumed the replay.
    Resume,
    /// The replay consumed the last log record.
    ReplayExhausted,
}

/// An event that the current condition does not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("Event {} is not allowed while {:?} in {}", event, condition, mode)]
pub struct TransitionError {
    /// Condition when the event arrived.
    pub condition: GameCondition,
    /// Rejected event.
    pub event: Event,
    /// Active mode.
    pub mode: GameMode,
}

/// Computes the next condition.
#[instrument]
pub fn transition(
    condition: GameCondition,
    mode: GameMode,
    event: Event,
) -> Result<GameCondition, TransitionError> {
    use GameCondition as C;

    let next = match (condition, mode, event) {
        (_, _, Event::Quit) => Some(C::Idle),

        (C::Idle, _, Event::Start) => Some(mode.opening_condition()),

        (C::AwaitingHumanMove, GameMode::PlayerVsPlayer, Event::MoveCommitted) => {
            Some(C::AwaitingHumanMove)
        }
        (C::AwaitingHumanMove, GameMode::PlayerVsBot { .. }, Event::MoveCommitted) => {
            Some(C::AwaitingBotMove(BotSlot::Primary))
        }
        (
            C::AwaitingBotMove(BotSlot::Primary),
            GameMode::PlayerVsBot { .. },
            Event::MoveCommitted,
        ) => Some(C::AwaitingHumanMove),
        (C::AwaitingBotMove(slot), GameMode::BotVsBot { .. }, Event::MoveCommitted) => {
            Some(C::AwaitingBotMove(slot.other()))
        }

        (live, _, Event::GameOver(outcome)) if live.is_live() && outcome.is_game_over() => {
            Some(outcome)
        }

        (idle_or_over, _, Event::RequestReplay)
            if idle_or_over == C::Idle || idle_or_over.is_game_over() =>
        {
            Some(C::Replaying)
        }
        (C::Replaying, _, Event::MoveCommitted) => Some(C::Replaying),
        (C::Replaying, _, Event::Pause) => Some(C::ReplayPaused),
        (C::ReplayPaused, _, Event::Resume) => Some(C::Replaying),
        (C::Replaying, _, Event::ReplayExhausted) => Some(C::Idle),

        _ => None,
    };

    match next {
        Some(next) => {
            debug!(from = ?condition, to = ?next, "Condition transition");
            Ok(next)
        }
        None => Err(TransitionError {
            condition,
            event,
            mode,
        }),
    }
}
