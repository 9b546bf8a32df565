//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strictly_rl::{
    AgentAction, AgentClient, Board, PlaydataRecord, PlaydataReporter, PlaydataSink, ReportError,
    TurnError, TurnOrchestrator,
};
use tokio::sync::Notify;

/// Parses a compact board such as `"XX-OO----"`.
pub fn board(s: &str) -> Board {
    s.parse().expect("valid board literal")
}

/// Agent that replays a fixed list of replies and records every board it saw.
#[derive(Default)]
pub struct ScriptedAgent {
    replies: Mutex<VecDeque<Result<Board, TurnError>>>,
    seen: Arc<Mutex<Vec<Board>>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedAgent {
    /// Replies with the given action boards in order.
    pub fn new(actions: &[&str]) -> Self {
        Self {
            replies: Mutex::new(actions.iter().map(|a| Ok(board(a))).collect()),
            ..Self::default()
        }
    }

    /// Replies with the given results in order.
    pub fn with_replies(replies: Vec<Result<Board, TurnError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Holds every reply until `gate` is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Handle on the boards the agent was asked to move on.
    pub fn seen(&self) -> Arc<Mutex<Vec<Board>>> {
        Arc::clone(&self.seen)
    }
}

#[async_trait::async_trait]
impl AgentClient for ScriptedAgent {
    async fn request_move(&self, board: &Board) -> Result<AgentAction, TurnError> {
        self.seen.lock().unwrap().push(*board);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TurnError::agent_unavailable("script exhausted")));
        AgentAction::validate(reply?, board)
    }
}

/// Sink that keeps every submitted record.
#[derive(Default, Clone)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<PlaydataRecord>>>,
}

impl RecordingSink {
    /// Records submitted so far.
    pub fn records(&self) -> Vec<PlaydataRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PlaydataSink for RecordingSink {
    async fn submit(&self, record: &PlaydataRecord) -> Result<(), ReportError> {
        self.records.lock().unwrap().push(*record);
        Ok(())
    }
}

/// Sink that always fails.
pub struct FailingSink;

#[async_trait::async_trait]
impl PlaydataSink for FailingSink {
    async fn submit(&self, _record: &PlaydataRecord) -> Result<(), ReportError> {
        Err(ReportError::new("collection endpoint unreachable"))
    }
}

/// Orchestrator over the given agent and sink.
pub fn orchestrator_with_sink(
    agent: ScriptedAgent,
    sink: Box<dyn PlaydataSink>,
) -> TurnOrchestrator {
    let reporter = PlaydataReporter::new(sink, true);
    TurnOrchestrator::new(Box::new(agent), reporter, Duration::from_millis(1000))
}

/// Orchestrator over the given agent with a recording sink.
pub fn orchestrator(
    agent: ScriptedAgent,
    reporting_enabled: bool,
) -> (TurnOrchestrator, RecordingSink) {
    let sink = RecordingSink::default();
    let reporter = PlaydataReporter::new(Box::new(sink.clone()), reporting_enabled);
    let orchestrator =
        TurnOrchestrator::new(Box::new(agent), reporter, Duration::from_millis(1000));
    (orchestrator, sink)
}
