//! Command-line interface for strictly_rl.

use clap::{Args, Parser, Subcommand};

/// Strictly RL - play tic-tac-toe against a remote reinforcement-learning agent
#[derive(Parser, Debug)]
#[command(name = "strictly_rl")]
#[command(about = "Tic-tac-toe against a remote RL agent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings shared by every command
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Overrides applied on top of file and environment configuration
#[derive(Args, Debug, Default)]
pub struct ConfigOverrides {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Agent service base URL (overrides AGENT_API)
    #[arg(long, global = true)]
    pub agent_api: Option<String>,

    /// Play-data service base URL (overrides PLAYDATA_API)
    #[arg(long, global = true)]
    pub playdata_api: Option<String>,

    /// Do not submit play data (overrides DISABLE_PLAYDATA)
    #[arg(long, global = true)]
    pub disable_playdata: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play on a terminal board
    Tui {
        /// File that receives log output while the board is on screen
        #[arg(long, default_value = "strictly_rl_tui.log")]
        log_file: std::path::PathBuf,
    },

    /// Serve the board as a JSON API for a browser frontend
    Serve {
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}
