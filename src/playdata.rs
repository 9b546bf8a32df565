//! Play-data reporting.
//!
//! Each completed turn is paired with the agent step retained from the
//! turn before it, so a record describes the transition the agent caused:
//! the board it saw, the move it made, and the board it sees next along
//! with the reward that resulted. The first turn of a game only fills the
//! retained slot.

use crate::agent_client::AGENT_MARK;
use crate::error::ReportError;
use crate::games::tictactoe::{Board, Mark};
use derive_new::new;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Agent-side view of one turn, retained until the next turn resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct AgentStep {
    /// Board the agent was asked to move on.
    pub initial_state: Board,
    /// The agent's action board, or `None` when the human ended the game.
    pub action: Option<Board>,
}

/// One record sent to `POST {playdata_api}/submit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaydataRecord {
    /// Board the agent moved on.
    pub initial_state: Board,
    /// The agent's action board.
    pub action: Option<Board>,
    /// Board after the human's following move.
    pub resultant_state: Board,
    /// Reward from the agent's perspective.
    pub reward: i8,
    /// Whether the agent plays X. Always false here.
    pub agent_is_x: bool,
}

/// Reward for the agent given the winner of a turn.
///
/// +1 when the agent won, -1 when the human won, 0 otherwise.
#[instrument]
pub fn reward_for(winner: Option<Mark>) -> i8 {
    match winner {
        Some(mark) if mark == AGENT_MARK => 1,
        Some(_) => -1,
        None => 0,
    }
}

/// Destination for play-data records.
#[async_trait::async_trait]
pub trait PlaydataSink: Send + Sync {
    /// Submits a record.
    async fn submit(&self, record: &PlaydataRecord) -> Result<(), ReportError>;
}

/// Play-data sink posting JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPlaydataSink {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPlaydataSink {
    /// Creates a sink for the collection endpoint at `base_url`.
    #[instrument(skip(base_url), fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self, ReportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl PlaydataSink for HttpPlaydataSink {
    #[instrument(skip(self, record), fields(base_url = %self.base_url, reward = record.reward))]
    async fn submit(&self, record: &PlaydataRecord) -> Result<(), ReportError> {
        debug!(?record, "Submitting play data");
        let response = self
            .client
            .post(format!("{}/submit", self.base_url))
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::new(format!(
                "collection endpoint returned {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}

/// Builds and forwards lagged play-data records.
pub struct PlaydataReporter {
    sink: Box<dyn PlaydataSink>,
    enabled: bool,
    last_step: Option<AgentStep>,
}

impl PlaydataReporter {
    /// Creates a reporter. When `enabled` is false no record is ever sent,
    /// but the retained step is still maintained.
    #[instrument(skip(sink))]
    pub fn new(sink: Box<dyn PlaydataSink>, enabled: bool) -> Self {
        info!(enabled, "Creating play-data reporter");
        Self {
            sink,
            enabled,
            last_step: None,
        }
    }

    /// Whether records are forwarded to the sink.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The step retained from the previous turn.
    pub fn last_step(&self) -> Option<&AgentStep> {
        self.last_step.as_ref()
    }

    /// Forgets the retained step (new game).
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("Clearing retained agent step");
        self.last_step = None;
    }

    /// Reports a completed turn.
    ///
    /// `human_state` is the board right after the human's move and
    /// `agent_action` the agent's reply to it, if one was requested. Returns
    /// the record built from the previously retained step, or `None` on the
    /// first turn of a game. Submission failures are logged and swallowed.
    #[instrument(skip(self, human_state, agent_action), fields(human_state = %human_state))]
    pub async fn report(
        &mut self,
        human_state: &Board,
        agent_action: Option<Board>,
        winner: Option<Mark>,
    ) -> Option<PlaydataRecord> {
        let record = self.last_step.map(|step| PlaydataRecord {
            initial_state: step.initial_state,
            action: step.action,
            resultant_state: *human_state,
            reward: reward_for(winner),
            agent_is_x: AGENT_MARK == Mark::X,
        });

        match &record {
            None => debug!("First turn of game, nothing to report"),
            Some(record) if self.enabled => {
                if let Err(e) = self.sink.submit(record).await {
                    warn!(error = %e, "Failed to submit play data");
                } else {
                    info!(reward = record.reward, "Submitted play data");
                }
            }
            Some(_) => debug!("Play-data submission disabled"),
        }

        self.last_step = Some(AgentStep::new(*human_state, agent_action));
        record
    }
}

impl std::fmt::Debug for PlaydataReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaydataReporter")
            .field("enabled", &self.enabled)
            .field("last_step", &self.last_step)
            .finish_non_exhaustive()
    }
}
