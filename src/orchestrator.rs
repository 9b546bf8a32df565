//! Turn orchestration between the human and the remote agent.
//!
//! One click drives one turn: the human move, the optional agent reply,
//! play-data reporting, and (when the game ends) the delayed reset. Turns
//! are serialized by an async mutex held across every suspension point,
//! so a click that arrives while the agent call is in flight can never
//! observe or modify a half-applied board.

use crate::agent_client::AgentClient;
use crate::error::TurnError;
use crate::games::tictactoe::{Board, Mark, TurnOutcome};
use crate::playdata::{AgentStep, PlaydataReporter};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{Instrument, debug, error, info, instrument, warn};

/// Mark played by the human.
pub const HUMAN_MARK: Mark = Mark::X;

/// Snapshot published to the rendering layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    /// Board to render.
    pub board: Board,
    /// Input is disabled while a turn is in flight or a finished game is shown.
    pub busy: bool,
    /// Message from the last aborted turn, cleared by the next accepted click.
    pub last_error: Option<String>,
}

/// Result of a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Click on an occupied or unknown cell, or while busy. Nothing changed.
    Ignored,
    /// Turn applied and the game goes on.
    Continued {
        /// Board after the human and agent moves.
        board: Board,
    },
    /// Turn ended the game. The board has already been reset.
    GameOver {
        /// Final board that was shown before the reset.
        board: Board,
        /// Terminal evaluation of the final board.
        outcome: TurnOutcome,
    },
}

struct TurnState {
    board: Board,
    reporter: PlaydataReporter,
}

/// Serialized state machine driving one game at a time.
///
/// Each accepted click runs as its own task, so a caller that stops
/// waiting (a dropped HTTP request) never cancels a turn halfway.
pub struct TurnOrchestrator {
    core: Arc<TurnCore>,
}

struct TurnCore {
    agent: Box<dyn AgentClient>,
    turn: Mutex<TurnState>,
    view: watch::Sender<GameView>,
    reset_delay: Duration,
}

impl TurnOrchestrator {
    /// Creates an orchestrator with an empty board.
    #[instrument(skip(agent, reporter))]
    pub fn new(
        agent: Box<dyn AgentClient>,
        reporter: PlaydataReporter,
        reset_delay: Duration,
    ) -> Self {
        info!(
            ?reset_delay,
            reporting = reporter.is_enabled(),
            "Creating turn orchestrator"
        );
        let (view, _) = watch::channel(GameView::default());
        Self {
            core: Arc::new(TurnCore {
                agent,
                turn: Mutex::new(TurnState {
                    board: Board::new(),
                    reporter,
                }),
                view,
                reset_delay,
            }),
        }
    }

    /// Subscribes to published snapshots.
    #[instrument(skip(self))]
    pub fn subscribe(&self) -> watch::Receiver<GameView> {
        self.core.view.subscribe()
    }

    /// Current published snapshot.
    pub fn view(&self) -> GameView {
        self.core.view.borrow().clone()
    }

    /// Whether input is currently disabled.
    pub fn is_busy(&self) -> bool {
        self.core.is_busy()
    }

    /// The agent step retained for the next play-data record.
    ///
    /// Waits for any in-flight turn to finish.
    #[instrument(skip(self))]
    pub async fn last_step(&self) -> Option<AgentStep> {
        self.core.turn.lock().await.reporter.last_step().copied()
    }

    /// Handles a click on cell `index` (0-8).
    ///
    /// Clicks on occupied or out-of-range cells and clicks while busy are
    /// ignored. On error the board is left as it was before the click and
    /// the error is also published in [`GameView::last_error`]. Dropping the
    /// returned future does not stop a turn that has already started.
    #[instrument(skip(self))]
    pub async fn handle_cell_click(&self, index: usize) -> Result<ClickOutcome, TurnError> {
        if self.is_busy() {
            debug!("Click ignored, turn in progress");
            return Ok(ClickOutcome::Ignored);
        }

        let core = Arc::clone(&self.core);
        let task = tokio::spawn(async move { core.click(index).await }.in_current_span());
        match task.await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                error!(error = %e, "Turn task cancelled");
                Err(TurnError::agent_unavailable(format!("turn cancelled: {}", e)))
            }
        }
    }

    /// Clears the board and the retained agent step.
    #[instrument(skip(self))]
    pub async fn restart(&self) {
        let mut turn = self.core.turn.lock().await;
        TurnCore::reset(&mut turn);
        self.core.view.send_replace(GameView::default());
        info!("Game restarted");
    }
}

impl TurnCore {
    fn is_busy(&self) -> bool {
        self.view.borrow().busy
    }

    #[instrument(skip(self))]
    async fn click(&self, index: usize) -> Result<ClickOutcome, TurnError> {
        let mut turn = self.turn.lock().await;

        if self.is_busy() {
            debug!("Click ignored, turn in progress");
            return Ok(ClickOutcome::Ignored);
        }
        let Some(human_board) = turn.board.place(index, HUMAN_MARK) else {
            warn!("Click ignored, cell unavailable");
            return Ok(ClickOutcome::Ignored);
        };

        self.view.send_modify(|view| {
            view.busy = true;
            view.last_error = None;
        });
        info!(board = %human_board, "Human move applied");

        let result = self.play_turn(&mut turn, human_board).await;
        if let Err(e) = &result {
            error!(error = %e, "Turn aborted");
            let board = turn.board;
            self.view.send_modify(|view| {
                view.board = board;
                view.busy = false;
                view.last_error = Some(e.to_string());
            });
        }
        result
    }

    async fn play_turn(
        &self,
        turn: &mut TurnState,
        human_board: Board,
    ) -> Result<ClickOutcome, TurnError> {
        let mut outcome = TurnOutcome::evaluate(&human_board);

        let (agent_board, action) = if outcome.is_terminal() {
            debug!(?outcome, "Human move ended the game, skipping agent");
            (human_board, None)
        } else {
            let action = self.agent.request_move(&human_board).await?;
            let agent_board = action.apply(&human_board).ok_or_else(|| {
                TurnError::invalid_agent_response(format!(
                    "action designates occupied cell {}",
                    action.index()
                ))
            })?;
            info!(board = %agent_board, "Agent move applied");
            outcome = TurnOutcome::evaluate(&agent_board);
            (agent_board, Some(action.board()))
        };

        turn.reporter
            .report(&human_board, action, outcome.winner)
            .await;

        turn.board = agent_board;
        if outcome.is_terminal() {
            info!(winner = ?outcome.winner, tied = outcome.tied, "Game over");
            self.view.send_modify(|view| view.board = agent_board);
            tokio::time::sleep(self.reset_delay).await;
            Self::reset(turn);
            self.view.send_modify(|view| {
                view.board = Board::new();
                view.busy = false;
            });
            info!("Board reset for a new game");
            Ok(ClickOutcome::GameOver {
                board: agent_board,
                outcome,
            })
        } else {
            self.view.send_modify(|view| {
                view.board = agent_board;
                view.busy = false;
            });
            Ok(ClickOutcome::Continued { board: agent_board })
        }
    }

    fn reset(turn: &mut TurnState) {
        turn.board = Board::new();
        turn.reporter.reset();
    }
}

impl std::fmt::Debug for TurnOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnOrchestrator")
            .field("view", &*self.core.view.borrow())
            .field("reset_delay", &self.core.reset_delay)
            .finish_non_exhaustive()
    }
}
