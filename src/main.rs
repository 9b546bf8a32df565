//! Strictly RL - Unified CLI
//!
//! Plays a human against the remote agent on a terminal board or serves
//! the board over HTTP for a browser frontend.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, ConfigOverrides};
use std::sync::Arc;
use strictly_rl::{
    GameConfig, HttpAgentClient, HttpPlaydataSink, PlaydataReporter, TurnOrchestrator, server, tui,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Tui { log_file } => {
            let log_file = std::fs::File::create(&log_file)
                .with_context(|| format!("Failed to create log file {}", log_file.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(default_filter())
                .with_writer(Arc::new(log_file))
                .with_ansi(false)
                .init();

            let orchestrator = build_orchestrator(&cli.overrides)?;
            tui::run_tui(orchestrator).await
        }
        Command::Serve { port, host } => {
            tracing_subscriber::fmt().with_env_filter(default_filter()).init();

            let orchestrator = build_orchestrator(&cli.overrides)?;
            info!(%host, port, "Starting board server");
            server::serve(orchestrator, host, port).await
        }
    }
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Resolves configuration and wires the HTTP clients into an orchestrator.
#[instrument]
fn build_orchestrator(overrides: &ConfigOverrides) -> Result<Arc<TurnOrchestrator>> {
    let mut config = GameConfig::load(overrides.config.as_deref())?;
    if let Some(url) = &overrides.agent_api {
        config = config.with_agent_api(url.trim_end_matches('/'));
    }
    if let Some(url) = &overrides.playdata_api {
        config = config.with_playdata_api(url.trim_end_matches('/'));
    }
    if overrides.disable_playdata {
        config = config.with_disable_playdata(true);
    }
    info!(?config, "Resolved configuration");

    let agent = HttpAgentClient::new(config.agent_api(), config.request_timeout())?;
    let sink = HttpPlaydataSink::new(config.playdata_api(), config.request_timeout())?;
    let reporter = PlaydataReporter::new(Box::new(sink), !*config.disable_playdata());

    Ok(Arc::new(TurnOrchestrator::new(
        Box::new(agent),
        reporter,
        config.reset_delay(),
    )))
}
