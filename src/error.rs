//! Error types for turn handling and play-data reporting.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum TurnErrorKind {
    /// The agent named no cell, several cells, an occupied cell, or the wrong mark.
    #[display("invalid agent response: {}", _0)]
    InvalidAgentResponse(String),
    /// The agent could not be reached or its reply could not be decoded.
    #[display("agent unavailable: {}", _0)]
    AgentUnavailable(String),
}

/// Error that aborts a turn.
///
/// The board is left as it was before the turn started.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct TurnError {
    /// Error category.
    pub kind: TurnErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl TurnError {
    /// Creates a new turn error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: TurnErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for [`TurnErrorKind::InvalidAgentResponse`].
    #[track_caller]
    pub fn invalid_agent_response(message: impl Into<String>) -> Self {
        Self::new(TurnErrorKind::InvalidAgentResponse(message.into()))
    }

    /// Shorthand for [`TurnErrorKind::AgentUnavailable`].
    #[track_caller]
    pub fn agent_unavailable(message: impl Into<String>) -> Self {
        Self::new(TurnErrorKind::AgentUnavailable(message.into()))
    }

    /// Whether the agent replied with an unusable move.
    pub fn is_invalid_agent_response(&self) -> bool {
        matches!(self.kind, TurnErrorKind::InvalidAgentResponse(_))
    }

    /// Whether the agent could not be reached.
    pub fn is_agent_unavailable(&self) -> bool {
        matches!(self.kind, TurnErrorKind::AgentUnavailable(_))
    }
}

/// Failure to submit play data. Logged, never fatal to a turn.
#[derive(Debug, Clone, Display, Error)]
#[display("Play-data report error: {} at {}:{}", message, file, line)]
pub struct ReportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ReportError {
    /// Creates a new report error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<reqwest::Error> for ReportError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("HTTP error: {}", err))
    }
}
