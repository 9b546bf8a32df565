//! HTTP rendering surface for a browser board.
//!
//! Exposes the published [`GameView`] and forwards cell clicks to the
//! [`TurnOrchestrator`]. All game rules live in the orchestrator.

use crate::error::{TurnError, TurnErrorKind};
use crate::orchestrator::{ClickOutcome, GameView, TurnOrchestrator};
use anyhow::{Context, Result};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Outcome label returned by `POST /api/cells/{index}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickStatus {
    /// The click changed nothing.
    Ignored,
    /// The game continues.
    Continued,
    /// The game ended and the board has been reset.
    GameOver,
}

impl From<&ClickOutcome> for ClickStatus {
    fn from(outcome: &ClickOutcome) -> Self {
        match outcome {
            ClickOutcome::Ignored => ClickStatus::Ignored,
            ClickOutcome::Continued { .. } => ClickStatus::Continued,
            ClickOutcome::GameOver { .. } => ClickStatus::GameOver,
        }
    }
}

/// Response body for a click.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickResponse {
    /// What the click did.
    pub outcome: ClickStatus,
    /// Snapshot after the click.
    pub view: GameView,
}

/// Error body for an aborted turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Builds the router.
#[instrument(skip(orchestrator))]
pub fn router(orchestrator: Arc<TurnOrchestrator>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/board", get(get_board))
        .route("/api/cells/{index}", post(click_cell))
        .with_state(orchestrator)
}

/// Serves the router on `host:port` until the process exits.
#[instrument(skip(orchestrator))]
pub async fn serve(orchestrator: Arc<TurnOrchestrator>, host: String, port: u16) -> Result<()> {
    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("Server ready at http://{}:{}/", host, port);
    axum::serve(listener, router(orchestrator)).await?;
    Ok(())
}

#[instrument]
async fn health() -> &'static str {
    "ok"
}

#[instrument(skip(orchestrator))]
async fn get_board(State(orchestrator): State<Arc<TurnOrchestrator>>) -> Json<GameView> {
    Json(orchestrator.view())
}

#[instrument(skip(orchestrator))]
async fn click_cell(
    State(orchestrator): State<Arc<TurnOrchestrator>>,
    Path(index): Path<usize>,
) -> Result<Json<ClickResponse>, (StatusCode, Json<ErrorResponse>)> {
    match orchestrator.handle_cell_click(index).await {
        Ok(outcome) => Ok(Json(ClickResponse {
            outcome: ClickStatus::from(&outcome),
            view: orchestrator.view(),
        })),
        Err(e) => {
            warn!(error = %e, "Click failed");
            Err((status_for(&e), Json(ErrorResponse { error: e.to_string() })))
        }
    }
}

fn status_for(error: &TurnError) -> StatusCode {
    match error.kind {
        TurnErrorKind::InvalidAgentResponse(_) => StatusCode::BAD_GATEWAY,
        TurnErrorKind::AgentUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
