//! Command-line interface for the `cannon` binary.

use crate::orchestrator::GameMode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strictly_cannon::Side;

/// Strictly Cannon - Cannon board game with bots and replay
#[derive(Parser, Debug)]
#[command(name = "cannon")]
#[command(about = "Cannon board game with bot play and replay", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Who plays
        #[arg(long, value_enum, default_value_t = ModeArg::Pvp)]
        mode: ModeArg,

        /// Side of the human (pvb) or of the primary bot (bvb)
        #[arg(long, value_enum, default_value_t = SideArg::Black)]
        side: SideArg,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Replay a recorded move log, one record per line
    Replay {
        /// Path to the log file
        log: PathBuf,

        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Game mode as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Player vs player
    Pvp,
    /// Player vs bot
    Pvb,
    /// Bot vs bot
    Bvb,
}

/// Side as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SideArg {
    /// Black, moves first
    Black,
    /// White
    White,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Black => Side::Black,
            SideArg::White => Side::White,
        }
    }
}

impl ModeArg {
    /// Resolves the mode, seating `side` as the human or primary bot.
    pub fn with_side(self, side: SideArg) -> GameMode {
        match self {
            ModeArg::Pvp => GameMode::PlayerVsPlayer,
            ModeArg::Pvb => GameMode::PlayerVsBot { human: side.into() },
            ModeArg::Bvb => GameMode::BotVsBot {
                primary: side.into(),
            },
        }
    }
}
