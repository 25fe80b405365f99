//! Async driver: animation timers, bot requests and user commands.
//!
//! The driver owns a [`GameSession`] and at most one pending future, either
//! an animation timer or a bot request. Quitting drops that future, so a
//! late timer or bot reply never reaches a reset board.

use super::machine::GameMode;
use super::session::{GameSession, SessionError, Snapshot};
use crate::config::GameConfig;
use crate::players::{BotClient, BotError, BotErrorKind};
use futures::FutureExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use std::time::Duration;
use strictly_cannon::{BotSlot, GameCondition, Move, MoveKind, Outcome, Position};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Requests from the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new game in the given mode.
    Start(GameMode),
    /// Select a square to move from.
    Select(Position),
    /// Move the selected soldier.
    Move {
        /// Advance or strike.
        kind: MoveKind,
        /// Destination or captured square.
        target: Position,
    },
    /// Play a full move record.
    Record(String),
    /// Abandon the game.
    Quit,
    /// Replay the last finished game.
    Replay,
    /// Pause the replay.
    Pause,
    /// Resume the replay.
    Resume,
}

/// Messages sent from the driver to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// State changed; re-render.
    Snapshot(Snapshot),
    /// A bot has been asked for a move.
    BotThinking(BotSlot),
    /// A command was refused; nothing changed.
    Rejected {
        /// Why it was refused.
        reason: String,
    },
    /// A game finished.
    GameOver(Outcome),
    /// A replay consumed the whole log.
    ReplayFinished,
    /// A fatal bot or replay error ended the game.
    Aborted {
        /// What went wrong.
        reason: String,
    },
}

/// Something the pending future resolved to.
#[derive(Debug)]
enum Wakeup {
    ShowGuide(Move),
    Commit,
    BotReplied(BotSlot, Result<String, BotError>),
}

/// Runs one game session against user commands, timers and bots.
pub struct GameDriver {
    session: GameSession,
    primary: Arc<dyn BotClient>,
    secondary: Arc<dyn BotClient>,
    guide_delay: Duration,
    commit_delay: Duration,
    bot_timeout: Duration,
    events: mpsc::UnboundedSender<GameEvent>,
    pending: Option<BoxFuture<'static, Wakeup>>,
}

impl GameDriver {
    /// Creates a driver around `session`.
    pub fn new(
        session: GameSession,
        config: &GameConfig,
        primary: Arc<dyn BotClient>,
        secondary: Arc<dyn BotClient>,
        events: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            session,
            primary,
            secondary,
            guide_delay: config.guide_delay(),
            commit_delay: config.commit_delay(),
            bot_timeout: config.bot_timeout(),
            events,
            pending: None,
        }
    }

    /// Session being driven.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Spawns the driver on the runtime and returns its command channel.
    ///
    /// The task ends, returning the session, once every command sender is dropped.
    pub fn spawn(self) -> (mpsc::UnboundedSender<Command>, JoinHandle<GameSession>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, tokio::spawn(self.run(rx)))
    }

    /// Processes commands and wakeups until the command channel closes.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> GameSession {
        info!("Game driver running");
        self.emit_snapshot();
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                wakeup = next_wakeup(&mut self.pending) => {
                    self.pending = None;
                    self.handle_wakeup(wakeup);
                }
            }
        }
        info!("Command channel closed, driver stopping");
        self.session
    }

    #[instrument(skip(self))]
    fn handle_command(&mut self, command: Command) {
        let result = match command {
            Command::Start(mode) => self.start(mode),
            Command::Select(pos) => {
                self.session.select(pos);
                Ok(())
            }
            Command::Move { kind, target } => self
                .ensure_idle_driver()
                .and_then(|_| self.session.propose(kind, target))
                .map(|mv| self.animate(mv)),
            Command::Record(record) => self
                .ensure_idle_driver()
                .and_then(|_| self.session.propose_record(&record))
                .map(|mv| self.animate(mv)),
            Command::Quit => {
                self.cancel_pending();
                self.session.quit();
                Ok(())
            }
            Command::Replay => self.session.request_replay().map(|_| self.schedule_next()),
            Command::Pause => self.session.pause().map(|_| self.cancel_pending()),
            Command::Resume => self.session.resume().map(|_| self.schedule_next()),
        };

        if let Err(err) = result {
            warn!(error = %err, "Command rejected");
            self.emit(GameEvent::Rejected {
                reason: err.to_string(),
            });
        }
        self.emit_snapshot();
    }

    fn start(&mut self, mode: GameMode) -> Result<(), SessionError> {
        self.session.set_mode(mode)?;
        self.session.start()?;
        self.schedule_next();
        Ok(())
    }

    fn ensure_idle_driver(&self) -> Result<(), SessionError> {
        if self.pending.is_some() {
            Err(SessionError::MovePending)
        } else {
            Ok(())
        }
    }

    #[instrument(skip(self))]
    fn handle_wakeup(&mut self, wakeup: Wakeup) {
        match wakeup {
            Wakeup::ShowGuide(mv) => match self.session.stage(mv) {
                Ok(_) => self.pending = Some(sleep_then(self.commit_delay, Wakeup::Commit)),
                Err(err) => self.abort(err),
            },
            Wakeup::Commit => match self.session.commit() {
                Ok(condition) => {
                    if let Some(outcome) = condition.outcome() {
                        self.emit(GameEvent::GameOver(outcome));
                    }
                    self.schedule_next();
                }
                Err(err) => self.abort(err),
            },
            Wakeup::BotReplied(slot, Ok(record)) => {
                match self.session.accept_bot_record(slot, &record) {
                    Ok(mv) => self.animate(mv),
                    Err(err) => self.abort(err),
                }
            }
            Wakeup::BotReplied(_, Err(err)) => self.abort(err.into()),
        }
        self.emit_snapshot();
    }

    /// Starts the two-phase animation of a validated move.
    fn animate(&mut self, mv: Move) {
        debug!(mv = %mv, "Animating move");
        self.pending = Some(sleep_then(self.guide_delay, Wakeup::ShowGuide(mv)));
    }

    /// Queues whatever the current condition waits on.
    fn schedule_next(&mut self) {
        match self.session.condition() {
            GameCondition::AwaitingBotMove(slot) => self.ask_bot(slot),
            GameCondition::Replaying => match self.session.next_replay_move() {
                Ok(Some(mv)) => self.animate(mv),
                Ok(None) => self.emit(GameEvent::ReplayFinished),
                Err(err) => self.abort(err),
            },
            _ => {}
        }
    }

    fn ask_bot(&mut self, slot: BotSlot) {
        let request = match self.session.bot_request(slot) {
            Ok(request) => request,
            Err(err) => return self.abort(err),
        };
        let bot = match slot {
            BotSlot::Primary => Arc::clone(&self.primary),
            BotSlot::Secondary => Arc::clone(&self.secondary),
        };
        let timeout = self.bot_timeout;
        info!(slot = %slot, bot = bot.name(), "Requesting bot move");
        self.emit(GameEvent::BotThinking(slot));

        self.pending = Some(
            async move {
                let reply = match tokio::time::timeout(timeout, bot.fetch_move(request)).await {
                    Ok(reply) => reply,
                    Err(_) => Err(BotError::new(
                        BotErrorKind::Timeout,
                        format!("no answer within {:?}", timeout),
                    )),
                };
                Wakeup::BotReplied(slot, reply)
            }
            .boxed(),
        );
    }

    fn cancel_pending(&mut self) {
        if self.pending.take().is_some() {
            debug!("Pending timer or bot request dropped");
        }
    }

    /// Ends the game after an unrecoverable error.
    fn abort(&mut self, err: SessionError) {
        error!(error = %err, "Aborting game");
        self.cancel_pending();
        self.session.quit();
        self.emit(GameEvent::Aborted {
            reason: err.to_string(),
        });
    }

    fn emit_snapshot(&self) {
        self.emit(GameEvent::Snapshot(self.session.snapshot()));
    }

    fn emit(&self, event: GameEvent) {
        if self.events.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

fn sleep_then(delay: Duration, wakeup: Wakeup) -> BoxFuture<'static, Wakeup> {
    async move {
        tokio::time::sleep(delay).await;
        wakeup
    }
    .boxed()
}

async fn next_wakeup(pending: &mut Option<BoxFuture<'static, Wakeup>>) -> Wakeup {
    match pending.as_mut() {
        Some(future) => future.await,
        None => std::future::pending().await,
    }
}
