//! Client for the remote reinforcement-learning agent.
//!
//! The agent receives the full board and replies with an "action" board in
//! which exactly one cell carries its mark.

use crate::error::TurnError;
use crate::games::tictactoe::{Board, Mark};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Mark played by the remote agent.
pub const AGENT_MARK: Mark = Mark::O;

/// Request body for `POST {agent_api}/action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Board the agent should move on.
    pub state: Board,
    /// Whether the agent plays X. Always false here.
    pub agent_is_x: bool,
}

/// Response body from `POST {agent_api}/action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Board holding only the agent's move.
    pub action: Board,
}

/// A validated agent move.
///
/// Holds the raw action board (as reported to play-data collection) and
/// the single cell it designates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentAction {
    board: Board,
    index: usize,
    mark: Mark,
}

impl AgentAction {
    /// Validates an action board against the board that was sent.
    ///
    /// The action must designate exactly one cell, that cell must be empty
    /// in `sent`, and the mark must be the agent's.
    #[instrument(skip(action, sent), fields(action = %action, sent = %sent))]
    pub fn validate(action: Board, sent: &Board) -> Result<Self, TurnError> {
        let mut occupied = action.occupied();
        let (index, mark) = occupied
            .next()
            .ok_or_else(|| TurnError::invalid_agent_response("action designates no cell"))?;
        if occupied.next().is_some() {
            return Err(TurnError::invalid_agent_response(format!(
                "action designates more than one cell: {}",
                action
            )));
        }
        if !sent.is_empty(index) {
            return Err(TurnError::invalid_agent_response(format!(
                "action designates occupied cell {}",
                index
            )));
        }
        if mark != AGENT_MARK {
            return Err(TurnError::invalid_agent_response(format!(
                "action places {} instead of {}",
                mark, AGENT_MARK
            )));
        }
        Ok(Self {
            board: action,
            index,
            mark,
        })
    }

    /// The raw action board.
    pub fn board(&self) -> Board {
        self.board
    }

    /// Index of the designated cell.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Mark placed by the action.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Applies this action to a copy of `board`.
    ///
    /// Returns `None` if the designated cell is occupied in `board`.
    #[instrument(skip(self, board), fields(index = self.index))]
    pub fn apply(&self, board: &Board) -> Option<Board> {
        board.place(self.index, self.mark)
    }
}

/// Source of agent moves.
#[async_trait::async_trait]
pub trait AgentClient: Send + Sync {
    /// Requests the agent's move for `board`.
    ///
    /// Fails with `AgentUnavailable` when the agent cannot be reached or its
    /// reply cannot be decoded, and with `InvalidAgentResponse` when the reply
    /// is not a legal move on `board`.
    async fn request_move(&self, board: &Board) -> Result<AgentAction, TurnError>;
}

/// Agent client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAgentClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpAgentClient {
    /// Creates a client for the agent at `base_url` with a per-request timeout.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, TurnError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                TurnError::agent_unavailable(format!("failed to build HTTP client: {}", e))
            })?;
        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl AgentClient for HttpAgentClient {
    #[instrument(skip(self, board), fields(base_url = %self.base_url, board = %board))]
    async fn request_move(&self, board: &Board) -> Result<AgentAction, TurnError> {
        let request = AgentRequest {
            state: *board,
            agent_is_x: AGENT_MARK == Mark::X,
        };
        debug!(?request, "Requesting agent action");

        let response = self
            .client
            .post(format!("{}/action", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Agent request failed");
                TurnError::agent_unavailable(format!("agent request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read agent response");
            TurnError::agent_unavailable(format!("failed to read agent response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, body = %body, "Agent returned error status");
            return Err(TurnError::agent_unavailable(format!(
                "agent returned {}: {}",
                status, body
            )));
        }

        let decoded: AgentResponse = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, body = %body, "Failed to decode agent response");
            TurnError::agent_unavailable(format!("failed to decode agent response: {}", e))
        })?;

        let action = AgentAction::validate(decoded.action, board)?;
        info!(index = action.index(), "Agent chose cell");
        Ok(action)
    }
}
