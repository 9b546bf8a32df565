//! Board API served over a real listener.

mod common;

use common::{ScriptedAgent, board, orchestrator};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use strictly_rl::server::{ClickResponse, ClickStatus, ErrorResponse, router};
use strictly_rl::{Board, GameView, TurnError, TurnOrchestrator};
use tokio::sync::Notify;

async fn spawn_with_orchestrator(agent: ScriptedAgent) -> (String, Arc<TurnOrchestrator>) {
    let (orchestrator, _sink) = orchestrator(agent, false);
    let orchestrator = Arc::new(orchestrator);
    let app = router(Arc::clone(&orchestrator));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (format!("http://{}", addr), orchestrator)
}

async fn spawn(agent: ScriptedAgent) -> String {
    spawn_with_orchestrator(agent).await.0
}

#[tokio::test]
async fn test_health() {
    let url = spawn(ScriptedAgent::default()).await;

    let body = reqwest::get(format!("{}/health", url))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_click_then_read_board() {
    let url = spawn(ScriptedAgent::new(&["O--------"])).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/cells/4", url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let click: ClickResponse = response.json().await.unwrap();
    assert_eq!(click.outcome, ClickStatus::Continued);
    assert_eq!(click.view.board, board("O---X----"));
    assert!(!click.view.busy);

    let view: GameView = client
        .get(format!("{}/api/board", url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.board, board("O---X----"));
}

#[tokio::test]
async fn test_occupied_cell_click_is_ignored() {
    let url = spawn(ScriptedAgent::new(&["O--------"])).await;
    let client = reqwest::Client::new();
    client
        .post(format!("{}/api/cells/4", url))
        .send()
        .await
        .unwrap();

    let click: ClickResponse = client
        .post(format!("{}/api/cells/0", url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(click.outcome, ClickStatus::Ignored);
    assert_eq!(click.view.board, board("O---X----"));
}

#[tokio::test]
async fn test_invalid_agent_reply_is_bad_gateway() {
    let url = spawn(ScriptedAgent::new(&["----O----"])).await;

    let response = reqwest::Client::new()
        .post(format!("{}/api/cells/4", url))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: ErrorResponse = response.json().await.unwrap();
    assert!(!error.error.is_empty());
}

#[tokio::test]
async fn test_unreachable_agent_is_service_unavailable() {
    let agent = ScriptedAgent::with_replies(vec![Err(TurnError::agent_unavailable("down"))]);
    let url = spawn(agent).await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/cells/4", url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let view: GameView = client
        .get(format!("{}/api/board", url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.board, Board::new());
    assert!(view.last_error.unwrap().contains("down"));
}

#[tokio::test]
async fn test_aborted_request_does_not_wedge_board() {
    let gate = Arc::new(Notify::new());
    let agent = ScriptedAgent::new(&["O--------", "-O-------"]).gated(Arc::clone(&gate));
    let (url, orchestrator) = spawn_with_orchestrator(agent).await;

    let impatient = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let aborted = impatient.post(format!("{}/api/cells/4", url)).send().await;
    assert!(aborted.is_err(), "agent reply is held back");

    gate.notify_one();
    tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.subscribe().wait_for(|view| !view.busy),
    )
    .await
    .unwrap()
    .unwrap();

    let client = reqwest::Client::new();
    let view: GameView = client
        .get(format!("{}/api/board", url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.board, board("O---X----"));
    assert!(!view.busy);

    gate.notify_one();
    let click: ClickResponse = client
        .post(format!("{}/api/cells/8", url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(click.outcome, ClickStatus::Continued);
    assert_eq!(click.view.board, board("OO--X---X"));
}
