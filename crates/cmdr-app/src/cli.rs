use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// cmdr - Elite Dangerous journal to Discord rich presence bridge.
#[derive(Parser, Debug)]
#[command(name = "cmdr", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level or filter override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Tail the journal directory and publish presence until Ctrl-C.
    Run {
        /// Journal directory; defaults to the game's Saved Games folder.
        #[arg(long)]
        journal_dir: Option<PathBuf>,

        /// Replay the newest journal from its first line.
        #[arg(long)]
        from_start: bool,
    },

    /// Feed one journal file through the bridge, then stop.
    Replay {
        file: PathBuf,
    },

    /// Turn presence publishing off.
    Disable,

    /// Turn presence publishing back on.
    Enable,

    /// Print the effective configuration as JSON.
    Config,
}

impl Args {
    /// `run` with its defaults when no subcommand was given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run {
            journal_dir: None,
            from_start: false,
        })
    }
}

pub fn parse() -> Args {
    Args::parse()
}
