//! Async driver: animation, bot delegation, cancellation and replay.

mod common;

use common::BLACK_WINS_LOG;
use std::sync::Arc;
use std::time::Duration;
use strictly_cannon_app::{
    BotClient, BotError, BotRequest, Command, GameCondition, GameConfig, GameDriver, GameEvent,
    GameMode, GameSession, MoveKind, Outcome, Position, RuleSet, ScriptedBot, Side, Snapshot,
};
use tokio::sync::mpsc;

/// Bot that never answers.
struct SilentBot;

#[async_trait::async_trait]
impl BotClient for SilentBot {
    async fn fetch_move(&self, _request: BotRequest) -> Result<String, BotError> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "silent"
    }
}

fn instant_config() -> GameConfig {
    GameConfig::default()
        .with_guide_delay_ms(0)
        .with_commit_delay_ms(0)
}

fn pos(row: i32, col: i32) -> Position {
    Position::new(row, col).unwrap()
}

fn spawn(
    session: GameSession,
    config: &GameConfig,
    primary: Arc<dyn BotClient>,
    secondary: Arc<dyn BotClient>,
) -> (
    mpsc::UnboundedSender<Command>,
    mpsc::UnboundedReceiver<GameEvent>,
    tokio::task::JoinHandle<GameSession>,
) {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let driver = GameDriver::new(session, config, primary, secondary, event_tx);
    let (commands, handle) = driver.spawn();
    (commands, event_rx, handle)
}

/// Reads events until one matches, failing after a generous timeout.
async fn wait_for(
    events: &mut mpsc::UnboundedReceiver<GameEvent>,
    matches: impl Fn(&GameEvent) -> bool,
) -> GameEvent {
    tokio::time::timeout(Duration::from_secs(10), async {
        loop {
            let event = events.recv().await.expect("driver stopped");
            if matches(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

fn snapshot_where(pred: impl Fn(&Snapshot) -> bool) -> impl Fn(&GameEvent) -> bool {
    move |event: &GameEvent| matches!(event, GameEvent::Snapshot(s) if pred(s))
}

#[tokio::test]
async fn test_human_then_bot_move() {
    let config = instant_config();
    let mode = GameMode::PlayerVsBot { human: Side::Black };
    let session = GameSession::new(RuleSet::standard(), mode);
    let bot: Arc<dyn BotClient> = Arc::new(ScriptedBot::new("white", ["S 2 1 M 3 0"]));
    let (commands, mut events, handle) = spawn(session, &config, bot, Arc::new(SilentBot));

    commands.send(Command::Start(mode)).unwrap();
    commands.send(Command::Select(pos(5, 0))).unwrap();
    commands
        .send(Command::Move {
            kind: MoveKind::Advance,
            target: pos(4, 1),
        })
        .unwrap();

    wait_for(
        &mut events,
        snapshot_where(|s| s.log.len() == 2 && s.condition == GameCondition::AwaitingHumanMove),
    )
    .await;

    drop(commands);
    let session = handle.await.unwrap();
    assert_eq!(session.log(), ["S 5 0 M 4 1", "S 2 1 M 3 0"]);
    assert_eq!(session.side_to_move(), Side::Black);
    assert_eq!(session.forbidden().len(), 2);
}

#[tokio::test]
async fn test_move_without_selection_is_rejected() {
    let config = instant_config();
    let session = GameSession::new(RuleSet::standard(), GameMode::PlayerVsPlayer);
    let (commands, mut events, handle) =
        spawn(session, &config, Arc::new(SilentBot), Arc::new(SilentBot));

    commands.send(Command::Start(GameMode::PlayerVsPlayer)).unwrap();
    commands
        .send(Command::Move {
            kind: MoveKind::Advance,
            target: pos(4, 1),
        })
        .unwrap();
    let event = wait_for(&mut events, |e| matches!(e, GameEvent::Rejected { .. })).await;
    let GameEvent::Rejected { reason } = event else {
        unreachable!()
    };
    assert!(reason.contains("selected"), "{}", reason);

    drop(commands);
    let session = handle.await.unwrap();
    assert_eq!(session.condition(), GameCondition::AwaitingHumanMove);
    assert!(session.log().is_empty());
}

#[tokio::test]
async fn test_illegal_bot_move_aborts_game() {
    let config = instant_config();
    let mode = GameMode::BotVsBot { primary: Side::Black };
    let session = GameSession::new(RuleSet::standard(), mode);
    let primary: Arc<dyn BotClient> = Arc::new(ScriptedBot::new("black", ["S 5 0 M 3 3"]));
    let (commands, mut events, handle) = spawn(session, &config, primary, Arc::new(SilentBot));

    commands.send(Command::Start(mode)).unwrap();
    let event = wait_for(&mut events, |e| matches!(e, GameEvent::Aborted { .. })).await;
    let GameEvent::Aborted { reason } = event else {
        unreachable!()
    };
    assert!(reason.contains("Protocol violation"), "{}", reason);

    drop(commands);
    let session = handle.await.unwrap();
    assert_eq!(session.condition(), GameCondition::Idle);
    assert_eq!(session.board(), &strictly_cannon_app::Board::initial());
}

#[tokio::test]
async fn test_exhausted_bot_is_transport_failure() {
    let config = instant_config();
    let mode = GameMode::BotVsBot { primary: Side::Black };
    let session = GameSession::new(RuleSet::standard(), mode);
    let primary: Arc<dyn BotClient> = Arc::new(ScriptedBot::new("black", ["S 5 0 M 4 1"]));
    let secondary: Arc<dyn BotClient> = Arc::new(ScriptedBot::new("white", Vec::<String>::new()));
    let (commands, mut events, handle) = spawn(session, &config, primary, secondary);

    commands.send(Command::Start(mode)).unwrap();
    let event = wait_for(&mut events, |e| matches!(e, GameEvent::Aborted { .. })).await;
    let GameEvent::Aborted { reason } = event else {
        unreachable!()
    };
    assert!(reason.contains("Exhausted"), "{}", reason);

    drop(commands);
    assert_eq!(handle.await.unwrap().condition(), GameCondition::Idle);
}

#[tokio::test]
async fn test_quit_cancels_pending_bot_request() {
    let config = instant_config();
    let mode = GameMode::PlayerVsBot { human: Side::White };
    let session = GameSession::new(RuleSet::standard(), mode);
    let (commands, mut events, handle) =
        spawn(session, &config, Arc::new(SilentBot), Arc::new(SilentBot));

    commands.send(Command::Start(mode)).unwrap();
    wait_for(&mut events, |e| {
        matches!(e, GameEvent::BotThinking(strictly_cannon_app::BotSlot::Primary))
    })
    .await;
    commands.send(Command::Quit).unwrap();
    wait_for(
        &mut events,
        snapshot_where(|s| s.condition == GameCondition::Idle),
    )
    .await;

    drop(commands);
    let session = handle.await.unwrap();
    assert_eq!(session.condition(), GameCondition::Idle);
    assert!(session.log().is_empty());
}

#[tokio::test]
async fn test_quit_cancels_staged_animation() {
    let config = GameConfig::default()
        .with_guide_delay_ms(60_000)
        .with_commit_delay_ms(60_000);
    let session = GameSession::new(RuleSet::standard(), GameMode::PlayerVsPlayer);
    let (commands, mut events, handle) =
        spawn(session, &config, Arc::new(SilentBot), Arc::new(SilentBot));

    commands.send(Command::Start(GameMode::PlayerVsPlayer)).unwrap();
    commands.send(Command::Record("S 5 0 M 4 1".to_string())).unwrap();
    commands.send(Command::Record("S 5 2 M 4 3".to_string())).unwrap();
    wait_for(&mut events, |e| matches!(e, GameEvent::Rejected { .. })).await;
    commands.send(Command::Quit).unwrap();
    drop(commands);

    let session = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("driver kept waiting on a cancelled timer")
        .unwrap();
    assert_eq!(session.board(), &strictly_cannon_app::Board::initial());
    assert!(session.log().is_empty());
    assert!(session.pending().is_none());
}

#[tokio::test]
async fn test_replay_through_driver() {
    let config = instant_config();
    let mut session = GameSession::new(RuleSet::standard(), GameMode::PlayerVsPlayer);
    let log = vec![
        "S 5 0 M 4 1".to_string(),
        "S 2 1 M 3 0".to_string(),
        "S 5 2 M 4 3".to_string(),
    ];
    session.load_log(log.clone()).unwrap();
    let (commands, mut events, handle) =
        spawn(session, &config, Arc::new(SilentBot), Arc::new(SilentBot));

    commands.send(Command::Replay).unwrap();
    wait_for(&mut events, |e| matches!(e, GameEvent::ReplayFinished)).await;

    drop(commands);
    let session = handle.await.unwrap();
    assert_eq!(session.condition(), GameCondition::Idle);
    assert_eq!(session.log(), log.as_slice());
    assert_eq!(session.replay_cursor(), 3);
    assert!(session.forbidden().is_empty());
    assert_eq!(
        session.board().get(pos(3, 0)),
        strictly_cannon_app::Square::Soldier(Side::White)
    );
}

#[tokio::test]
async fn test_finished_game_replays_through_driver() {
    let config = instant_config();
    let session = GameSession::new(RuleSet::standard(), GameMode::PlayerVsPlayer);
    let (commands, mut events, handle) =
        spawn(session, &config, Arc::new(SilentBot), Arc::new(SilentBot));

    commands.send(Command::Start(GameMode::PlayerVsPlayer)).unwrap();
    let (winning, opening) = BLACK_WINS_LOG.split_last().unwrap();
    for (played, record) in opening.iter().enumerate() {
        commands.send(Command::Record(record.to_string())).unwrap();
        wait_for(&mut events, snapshot_where(|s| s.log.len() == played + 1)).await;
    }
    commands.send(Command::Record(winning.to_string())).unwrap();
    let event = wait_for(&mut events, |e| matches!(e, GameEvent::GameOver(_))).await;
    assert_eq!(event, GameEvent::GameOver(Outcome::Winner(Side::Black)));
    let GameEvent::Snapshot(finished) = wait_for(
        &mut events,
        snapshot_where(|s| s.condition == GameCondition::BlackWins),
    )
    .await
    else {
        unreachable!()
    };

    commands.send(Command::Replay).unwrap();
    wait_for(&mut events, |e| matches!(e, GameEvent::ReplayFinished)).await;

    drop(commands);
    let session = handle.await.unwrap();
    assert_eq!(session.condition(), GameCondition::Idle);
    assert_eq!(session.board(), &finished.board);
    assert_eq!(session.log(), BLACK_WINS_LOG);
    assert_eq!(session.replay_cursor(), BLACK_WINS_LOG.len());
}

#[tokio::test]
async fn test_pause_and_resume_restage_the_same_replay_move() {
    let config = GameConfig::default()
        .with_guide_delay_ms(0)
        .with_commit_delay_ms(60_000);
    let mut session = GameSession::new(RuleSet::standard(), GameMode::PlayerVsPlayer);
    session
        .load_log(vec!["S 5 0 M 4 1".to_string(), "S 2 1 M 3 0".to_string()])
        .unwrap();
    let (commands, mut events, handle) =
        spawn(session, &config, Arc::new(SilentBot), Arc::new(SilentBot));
    let staged_first = |s: &Snapshot| {
        s.condition == GameCondition::Replaying && s.guide.selected() == Some(pos(5, 0))
    };

    commands.send(Command::Replay).unwrap();
    wait_for(&mut events, snapshot_where(staged_first)).await;

    commands.send(Command::Pause).unwrap();
    let GameEvent::Snapshot(paused) = wait_for(
        &mut events,
        snapshot_where(|s| s.condition == GameCondition::ReplayPaused),
    )
    .await
    else {
        unreachable!()
    };
    assert_eq!(paused.guide.selected(), None);
    assert_eq!(paused.board, strictly_cannon_app::Board::initial());

    commands.send(Command::Resume).unwrap();
    let GameEvent::Snapshot(restaged) = wait_for(&mut events, snapshot_where(staged_first)).await
    else {
        unreachable!()
    };
    assert_eq!(restaged.board, strictly_cannon_app::Board::initial());

    commands.send(Command::Quit).unwrap();
    wait_for(
        &mut events,
        snapshot_where(|s| s.condition == GameCondition::Idle),
    )
    .await;
    drop(commands);

    let session = tokio::time::timeout(Duration::from_secs(10), handle)
        .await
        .expect("driver kept waiting on a cancelled timer")
        .unwrap();
    assert_eq!(session.condition(), GameCondition::Idle);
    assert_eq!(session.board(), &strictly_cannon_app::Board::initial());
    assert_eq!(session.replay_cursor(), 0);
    assert!(session.pending().is_none());
}
