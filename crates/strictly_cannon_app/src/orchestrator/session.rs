//! A single Cannon game: board, turn, log, forbidden states and condition.
//!
//! `GameSession` is synchronous. It owns every piece of per-game state and
//! drives the pure state machine in [`super::machine`]. Timers and bot
//! futures live in [`super::driver`], which calls into the session.

use super::forbidden::ForbiddenStates;
use super::machine::{Event, GameMode, TransitionError, transition};
use crate::players::{BotError, BotRequest};
use derive_more::{Display, Error, From};
use serde::Serialize;
use strictly_cannon::{
    Board, BotSlot, GameCondition, GuideState, Move, MoveError, MoveKind, Position, RecordError,
    RuleSet, Side, Square, codec, guide_after_selection, rules,
};
use tracing::{debug, info, instrument, warn};

/// Errors raised while driving a session.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// A proposed or replayed move was rejected.
    #[display("{}", _0)]
    #[from]
    Move(MoveError),

    /// A log record could not be decoded.
    #[display("{}", _0)]
    #[from]
    Record(RecordError),

    /// The state machine refused an event.
    #[display("{}", _0)]
    #[from]
    Transition(TransitionError),

    /// A bot returned something that is not a legal move.
    #[display("Protocol violation by {} bot with record '{}': {}", slot, record, reason)]
    ProtocolViolation {
        /// Offending bot.
        slot: BotSlot,
        /// Record the bot returned.
        record: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The bot could not be reached.
    #[display("{}", _0)]
    #[from]
    Transport(BotError),

    /// An operation arrived in the wrong condition.
    #[display("Cannot {} while {:?}", action, condition)]
    WrongCondition {
        /// What was attempted.
        action: &'static str,
        /// Condition at the time.
        condition: GameCondition,
    },

    /// A move is already being animated.
    #[display("A move is already pending")]
    MovePending,

    /// Replay was requested without a finished game or loaded log.
    #[display("No finished game to replay")]
    ReplayUnavailable,
}

/// Everything a renderer needs after a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Current board.
    pub board: Board,
    /// Current guide overlay.
    pub guide: GuideState,
    /// Current condition.
    pub condition: GameCondition,
    /// Side whose turn it is.
    pub side_to_move: Side,
    /// Active mode.
    pub mode: GameMode,
    /// Records logged so far.
    pub log: Vec<String>,
}

/// A Cannon game and its orchestration state.
#[derive(Debug, Clone)]
pub struct GameSession {
    rules: RuleSet,
    mode: GameMode,
    condition: GameCondition,
    board: Board,
    side_to_move: Side,
    guide: GuideState,
    pending: Option<Move>,
    log: Vec<String>,
    forbidden: ForbiddenStates,
    replay_cursor: usize,
    replay_available: bool,
}

impl GameSession {
    /// Creates an idle session.
    #[instrument(skip(rules))]
    pub fn new(rules: RuleSet, mode: GameMode) -> Self {
        info!(mode = %mode, "Creating game session");
        Self {
            rules,
            mode,
            condition: GameCondition::Idle,
            board: Board::initial(),
            side_to_move: Side::Black,
            guide: GuideState::new(),
            pending: None,
            log: Vec::new(),
            forbidden: ForbiddenStates::new(),
            replay_cursor: 0,
            replay_available: false,
        }
    }

    /// Current board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current guide overlay.
    pub fn guide(&self) -> &GuideState {
        &self.guide
    }

    /// Current condition.
    pub fn condition(&self) -> GameCondition {
        self.condition
    }

    /// Side whose turn it is.
    pub fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    /// Active mode.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Rules in force.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Move records of the current (or last finished) game.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Forbidden-state table of the current game.
    pub fn forbidden(&self) -> &ForbiddenStates {
        &self.forbidden
    }

    /// Move staged for animation, if any.
    pub fn pending(&self) -> Option<&Move> {
        self.pending.as_ref()
    }

    /// Index of the next log record a replay will execute.
    pub fn replay_cursor(&self) -> usize {
        self.replay_cursor
    }

    /// True when a replay can be requested.
    pub fn can_replay(&self) -> bool {
        self.replay_available
            && (self.condition == GameCondition::Idle || self.condition.is_game_over())
    }

    /// Renderer view of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            guide: self.guide.clone(),
            condition: self.condition,
            side_to_move: self.side_to_move,
            mode: self.mode,
            log: self.log.clone(),
        }
    }

    fn fire(&mut self, event: Event) -> Result<GameCondition, SessionError> {
        self.condition = transition(self.condition, self.mode, event)?;
        Ok(self.condition)
    }

    fn reset_board(&mut self) {
        self.board = Board::initial();
        self.side_to_move = Side::Black;
        self.guide = GuideState::new();
        self.pending = None;
    }

    /// Changes the mode of an idle session.
    pub fn set_mode(&mut self, mode: GameMode) -> Result<(), SessionError> {
        if self.condition != GameCondition::Idle {
            return Err(SessionError::WrongCondition {
                action: "change mode",
                condition: self.condition,
            });
        }
        self.mode = mode;
        Ok(())
    }

    /// Starts a new game, discarding the previous log.
    #[instrument(skip(self), fields(mode = %self.mode))]
    pub fn start(&mut self) -> Result<GameCondition, SessionError> {
        let condition = self.fire(Event::Start)?;
        self.reset_board();
        self.log.clear();
        self.forbidden.clear();
        self.replay_cursor = 0;
        self.replay_available = false;
        info!(condition = ?condition, "Game started");
        Ok(condition)
    }

    /// Abandons whatever is running and returns to idle.
    #[instrument(skip(self))]
    pub fn quit(&mut self) -> GameCondition {
        self.condition = GameCondition::Idle;
        self.reset_board();
        self.log.clear();
        self.forbidden.clear();
        self.replay_cursor = 0;
        self.replay_available = false;
        info!("Game quit");
        self.condition
    }

    /// Selects a square for the human to move from.
    ///
    /// Anything other than a soldier of the side to move, during a human
    /// turn with no move pending, clears the selection.
    #[instrument(skip(self))]
    pub fn select(&mut self, pos: Position) -> &GuideState {
        let selectable = self.condition == GameCondition::AwaitingHumanMove
            && self.pending.is_none()
            && self.board.get(pos) == Square::Soldier(self.side_to_move);
        self.guide = if selectable {
            guide_after_selection(&self.board, pos, &self.rules)
        } else {
            GuideState::new()
        };
        &self.guide
    }

    /// Turns the current selection and a chosen target into a validated move.
    ///
    /// Rejections leave the board and selection untouched.
    #[instrument(skip(self))]
    pub fn propose(&mut self, kind: MoveKind, target: Position) -> Result<Move, SessionError> {
        self.expect_condition("move", |c| c == GameCondition::AwaitingHumanMove)?;
        if self.pending.is_some() {
            return Err(SessionError::MovePending);
        }
        let from = self.guide.selected().ok_or(MoveError::NoSelection)?;
        let mv = Move::new(kind, from, target);
        rules::check_legal(&self.board, self.side_to_move, &mv, &self.rules)?;
        Ok(mv)
    }

    /// Validates a move submitted as a full record by a human.
    #[instrument(skip(self))]
    pub fn propose_record(&mut self, record: &str) -> Result<Move, SessionError> {
        self.expect_condition("move", |c| c == GameCondition::AwaitingHumanMove)?;
        if self.pending.is_some() {
            return Err(SessionError::MovePending);
        }
        let mv = codec::decode(record)?;
        rules::check_legal(&self.board, self.side_to_move, &mv, &self.rules)?;
        Ok(mv)
    }

    /// Request to send to the bot in `slot`.
    pub fn bot_request(&self, slot: BotSlot) -> Result<BotRequest, SessionError> {
        self.expect_condition("ask a bot", |c| c == GameCondition::AwaitingBotMove(slot))?;
        Ok(BotRequest::new(
            self.board,
            self.side_to_move,
            self.forbidden
                .successors(&self.board, self.side_to_move)
                .to_vec(),
        ))
    }

    /// Decodes and validates a bot's reply.
    ///
    /// Anything that is not a legal move is a protocol violation.
    #[instrument(skip(self))]
    pub fn accept_bot_record(&mut self, slot: BotSlot, record: &str) -> Result<Move, SessionError> {
        self.expect_condition("accept a bot move", |c| {
            c == GameCondition::AwaitingBotMove(slot)
        })?;
        if self.pending.is_some() {
            return Err(SessionError::MovePending);
        }
        let violation = |reason: String| SessionError::ProtocolViolation {
            slot,
            record: record.to_string(),
            reason,
        };
        let mv = codec::decode(record).map_err(|e| violation(e.message))?;
        rules::check_legal(&self.board, self.side_to_move, &mv, &self.rules)
            .map_err(|e| violation(e.to_string()))?;
        Ok(mv)
    }

    /// First animation phase: shows `mv` on the guide and holds it as pending.
    #[instrument(skip(self))]
    pub fn stage(&mut self, mv: Move) -> Result<&GuideState, SessionError> {
        self.expect_condition("stage a move", |c| {
            c.is_live() || c == GameCondition::Replaying
        })?;
        if self.pending.is_some() {
            return Err(SessionError::MovePending);
        }
        self.guide = GuideState::for_move(&mv);
        self.pending = Some(mv);
        debug!(mv = %mv, "Move staged");
        Ok(&self.guide)
    }

    /// Drops a staged move without applying it.
    pub fn unstage(&mut self) -> Option<Move> {
        self.guide = GuideState::new();
        self.pending.take()
    }

    /// Second animation phase: applies the staged move.
    ///
    /// Live moves are validated, logged, recorded in the forbidden table
    /// and followed by game-over evaluation. Replayed moves are validated
    /// and applied only.
    #[instrument(skip(self))]
    pub fn commit(&mut self) -> Result<GameCondition, SessionError> {
        let mv = self.pending.ok_or(SessionError::WrongCondition {
            action: "commit without a staged move",
            condition: self.condition,
        })?;
        self.expect_condition("commit a move", |c| {
            c.is_live() || c == GameCondition::Replaying
        })?;

        rules::check_legal(&self.board, self.side_to_move, &mv, &self.rules)?;
        let before = self.board;
        let mover = self.side_to_move;
        let after = rules::apply(&before, &mv)?;

        self.pending = None;
        self.board = after;
        self.side_to_move = mover.opponent();
        self.guide = GuideState::new();

        if self.condition == GameCondition::Replaying {
            self.replay_cursor += 1;
            debug!(cursor = self.replay_cursor, "Replayed move");
            return self.fire(Event::MoveCommitted);
        }

        self.forbidden.record(before, mover, after);
        self.log.push(codec::encode(&mv));
        info!(mv = %mv, side = %mover, "Move committed");

        let evaluated = rules::evaluate(self.condition, &self.board, mover, &self.rules);
        if evaluated.is_game_over() {
            self.replay_available = true;
            info!(outcome = ?evaluated.outcome(), "Game over");
            self.fire(Event::GameOver(evaluated))
        } else {
            self.fire(Event::MoveCommitted)
        }
    }

    /// Supplies a recorded log to replay from idle.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn load_log(&mut self, records: Vec<String>) -> Result<(), SessionError> {
        self.expect_condition("load a log", |c| c == GameCondition::Idle)?;
        for record in &records {
            codec::decode(record)?;
        }
        self.log = records;
        self.replay_available = !self.log.is_empty();
        Ok(())
    }

    /// Starts replaying the log from the initial board.
    #[instrument(skip(self))]
    pub fn request_replay(&mut self) -> Result<GameCondition, SessionError> {
        if !self.replay_available {
            return Err(SessionError::ReplayUnavailable);
        }
        let condition = self.fire(Event::RequestReplay)?;
        self.reset_board();
        self.replay_cursor = 0;
        info!(records = self.log.len(), "Replay started");
        Ok(condition)
    }

    /// Pauses the replay. A staged move is dropped and re-staged on resume.
    pub fn pause(&mut self) -> Result<GameCondition, SessionError> {
        let condition = self.fire(Event::Pause)?;
        if let Some(mv) = self.unstage() {
            debug!(mv = %mv, "Staged replay move dropped by pause");
        }
        Ok(condition)
    }

    /// Resumes a paused replay.
    pub fn resume(&mut self) -> Result<GameCondition, SessionError> {
        self.fire(Event::Resume)
    }

    /// Next move of the replay, or `None` once the log is exhausted.
    ///
    /// Exhausting the log moves the session to idle.
    #[instrument(skip(self))]
    pub fn next_replay_move(&mut self) -> Result<Option<Move>, SessionError> {
        self.expect_condition("replay", |c| c == GameCondition::Replaying)?;
        match self.log.get(self.replay_cursor) {
            Some(record) => Ok(Some(codec::decode(record)?)),
            None => {
                self.fire(Event::ReplayExhausted)?;
                info!("Replay finished");
                Ok(None)
            }
        }
    }

    fn expect_condition(
        &self,
        action: &'static str,
        accepts: impl Fn(GameCondition) -> bool,
    ) -> Result<(), SessionError> {
        if accepts(self.condition) {
            Ok(())
        } else {
            warn!(action, condition = ?self.condition, "Operation refused");
            Err(SessionError::WrongCondition {
                action,
                condition: self.condition,
            })
        }
    }
}
