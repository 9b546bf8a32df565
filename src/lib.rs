//! Strictly RL - tic-tac-toe against a remote reinforcement-learning agent.
//!
//! A human plays X; a remote agent reached over HTTP plays O. Every turn is
//! reported to a play-data collection endpoint for training.
//!
//! # Architecture
//!
//! - **Games**: pure tic-tac-toe board and terminal-state evaluation
//! - **Agent client**: asks the remote agent for its move
//! - **Play data**: pairs each agent move with the outcome of the next turn
//! - **Orchestrator**: serializes clicks into whole turns and resets finished games
//! - **Server / TUI**: thin rendering surfaces over the orchestrator
//!
//! # Example
//!
//! ```no_run
//! use strictly_rl::{
//!     GameConfig, HttpAgentClient, HttpPlaydataSink, PlaydataReporter, TurnOrchestrator,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::load(None)?;
//! let agent = HttpAgentClient::new(config.agent_api(), config.request_timeout())?;
//! let sink = HttpPlaydataSink::new(config.playdata_api(), config.request_timeout())?;
//! let reporter = PlaydataReporter::new(Box::new(sink), !*config.disable_playdata());
//! let orchestrator = TurnOrchestrator::new(Box::new(agent), reporter, config.reset_delay());
//!
//! orchestrator.handle_cell_click(4).await?;
//! println!("{}", orchestrator.view().board.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod agent_client;
mod config;
mod error;
mod games;
mod orchestrator;
mod playdata;
pub mod server;
pub mod tui;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, Cell, CellCodeError, EMPTY_CODE, Mark, Position, TurnOutcome, WIN_LINES, is_tie,
    winner,
};

// Crate-level exports - Agent client
pub use agent_client::{
    AGENT_MARK, AgentAction, AgentClient, AgentRequest, AgentResponse, HttpAgentClient,
};

// Crate-level exports - Play data
pub use playdata::{
    AgentStep, HttpPlaydataSink, PlaydataRecord, PlaydataReporter, PlaydataSink, reward_for,
};

// Crate-level exports - Orchestration
pub use orchestrator::{ClickOutcome, GameView, HUMAN_MARK, TurnOrchestrator};

// Crate-level exports - Errors and configuration
pub use config::{ConfigError, GameConfig};
pub use error::{ReportError, TurnError, TurnErrorKind};
