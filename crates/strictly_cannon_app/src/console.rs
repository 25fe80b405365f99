//! Line-oriented terminal front end.
//!
//! Reads commands from stdin and prints the board after every change.

use crate::orchestrator::{Command, GameEvent, Snapshot};
use strictly_cannon::{Marker, MoveKind, Position};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Help text listing console commands.
pub const HELP: &str = "\
commands:
  select R C     choose the soldier at row R, column C
  move R C       advance the selected soldier to R C
  strike R C     fire the selected formation at R C
  S r c K r c    play a raw move record (K is M or B)
  replay         replay the last finished game
  pause | resume control a running replay
  quit           abandon the current game
  exit           leave the program";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Forward to the driver.
    Command(Command),
    /// Print help.
    Help,
    /// Leave the program.
    Exit,
}

/// Parses one line of user input.
pub fn parse_line(line: &str) -> Result<ConsoleInput, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let position = |args: &[&str]| -> Result<Position, String> {
        match args {
            [row, col] => {
                let row: i32 = row.parse().map_err(|_| format!("bad row '{}'", row))?;
                let col: i32 = col.parse().map_err(|_| format!("bad column '{}'", col))?;
                Position::new(row, col).map_err(|e| e.to_string())
            }
            _ => Err("expected a row and a column".to_string()),
        }
    };

    let input = match tokens.as_slice() {
        ["select", args @ ..] => ConsoleInput::Command(Command::Select(position(args)?)),
        ["move", args @ ..] => ConsoleInput::Command(Command::Move {
            kind: MoveKind::Advance,
            target: position(args)?,
        }),
        ["strike", args @ ..] => ConsoleInput::Command(Command::Move {
            kind: MoveKind::Strike,
            target: position(args)?,
        }),
        ["S", ..] => ConsoleInput::Command(Command::Record(tokens.join(" "))),
        ["replay"] => ConsoleInput::Command(Command::Replay),
        ["pause"] => ConsoleInput::Command(Command::Pause),
        ["resume"] => ConsoleInput::Command(Command::Resume),
        ["quit"] => ConsoleInput::Command(Command::Quit),
        ["help"] | [] => ConsoleInput::Help,
        ["exit"] => ConsoleInput::Exit,
        _ => return Err(format!("unknown command '{}'", line.trim())),
    };
    Ok(input)
}

/// Draws the board with guide markers.
///
/// `[..]` is the selected square, `*` a quiet move target, `x` a capture.
pub fn render(snapshot: &Snapshot) -> String {
    let mut out = String::from("    0   1   2   3   4   5   6   7\n");
    for (r, row) in snapshot.board.rows().iter().enumerate() {
        out.push_str(&format!("{} ", r));
        for (c, square) in row.iter().enumerate() {
            let cell = match Position::new(r as i32, c as i32) {
                Ok(pos) if snapshot.guide.selected() == Some(pos) => {
                    format!("[{:<2}]", square.code())
                }
                Ok(pos) => match snapshot.guide.marker(pos) {
                    Marker::QuietMove => format!(" {:<2}*", square.code()),
                    Marker::Capture => format!(" {:<2}x", square.code()),
                    Marker::None => format!(" {:<3}", square.code()),
                },
                Err(_) => String::new(),
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{} | {} | {} to move | {} moves logged\n",
        snapshot.mode, snapshot.condition, snapshot.side_to_move, snapshot.log.len()
    ));
    out
}

/// Pumps stdin into `commands` and prints `events` until exit.
///
/// With `exit_after_replay`, the console also returns once a replay finishes.
#[instrument(skip_all)]
pub async fn run(
    commands: mpsc::UnboundedSender<Command>,
    mut events: mpsc::UnboundedReceiver<GameEvent>,
    exit_after_replay: bool,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    println!("{}", HELP);

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match parse_line(&line) {
                    Ok(ConsoleInput::Command(command)) => {
                        debug!(command = ?command, "Console command");
                        if commands.send(command).is_err() {
                            break;
                        }
                    }
                    Ok(ConsoleInput::Help) => println!("{}", HELP),
                    Ok(ConsoleInput::Exit) => break,
                    Err(reason) => println!("? {}", reason),
                },
                Ok(None) | Err(_) => {
                    debug!("Stdin closed");
                    stdin_open = false;
                    if !exit_after_replay {
                        break;
                    }
                }
            },
            event = events.recv() => match event {
                Some(GameEvent::Snapshot(snapshot)) => print!("{}", render(&snapshot)),
                Some(GameEvent::BotThinking(slot)) => println!("{} bot is thinking...", slot),
                Some(GameEvent::Rejected { reason }) => println!("rejected: {}", reason),
                Some(GameEvent::GameOver(outcome)) => println!("game over: {}", outcome),
                Some(GameEvent::Aborted { reason }) => println!("game aborted: {}", reason),
                Some(GameEvent::ReplayFinished) => {
                    println!("replay finished");
                    if exit_after_replay {
                        break;
                    }
                }
                None => break,
            },
        }
    }
    info!("Console closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::GameMode;
    use strictly_cannon::{Board, GameCondition, GuideState, Side};

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_line("select 5 0").unwrap(),
            ConsoleInput::Command(Command::Select(pos(5, 0)))
        );
        assert_eq!(
            parse_line("  strike 2 2 ").unwrap(),
            ConsoleInput::Command(Command::Move {
                kind: MoveKind::Strike,
                target: pos(2, 2)
            })
        );
        assert_eq!(
            parse_line("S 5 0 M 4 1").unwrap(),
            ConsoleInput::Command(Command::Record("S 5 0 M 4 1".to_string()))
        );
        assert_eq!(parse_line("quit").unwrap(), ConsoleInput::Command(Command::Quit));
        assert_eq!(parse_line("").unwrap(), ConsoleInput::Help);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_line("select 9 0").is_err());
        assert!(parse_line("move 1").is_err());
        assert!(parse_line("dance").is_err());
    }

    #[test]
    fn test_render_marks_guide() {
        let mut guide = GuideState::selecting(pos(5, 0));
        guide.mark(pos(4, 1), Marker::QuietMove);
        let snapshot = Snapshot {
            board: Board::initial(),
            guide,
            condition: GameCondition::AwaitingHumanMove,
            side_to_move: Side::Black,
            mode: GameMode::PlayerVsPlayer,
            log: Vec::new(),
        };
        let text = render(&snapshot);
        let row5 = text.lines().nth(6).unwrap();
        let row4 = text.lines().nth(5).unwrap();
        assert!(row5.contains("[B "));
        assert!(row4.contains("E *"));
    }
}
