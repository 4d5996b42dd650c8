//! HTTP API tests
//!
//! Drive the router in-process with `oneshot` and scripted model doubles.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use intake_agent::IntakeController;
use intake_config::{CallBudgets, IntakeConfig};
use intake_core::{ChatPurpose, LlmError};
use intake_llm::{MockLanguageModel, MockModeration};
use intake_server::{create_router, AppState, STAFF_TOKEN_HEADER};

const STAFF_TOKEN: &str = "staff-secret";

fn app_with(moderation: MockModeration, staff_token: Option<&str>) -> (Router, AppState) {
    let model = MockLanguageModel::new()
        .always(ChatPurpose::Extraction, r#"{"extracted_value": null}"#)
        .always(ChatPurpose::QuestionGeneration, "When did the accident happen?");
    let controller = IntakeController::new(
        &IntakeConfig::default(),
        &CallBudgets::default(),
        Arc::new(model),
        Arc::new(moderation),
    );
    let state = AppState::new(controller, staff_token.map(str::to_string));
    (create_router(state.clone()), state)
}

fn app() -> Router {
    app_with(MockModeration::clean(), Some(STAFF_TOKEN)).0
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn post(uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method("POST").uri(uri);
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn started_session(app: &Router) -> String {
    let (status, body) = send(app, post("/api/sessions", None)).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["session_id"].as_str().unwrap().to_string();

    let (status, _) = send(app, post(&format!("/api/sessions/{id}/start"), None)).await;
    assert_eq!(status, StatusCode::OK);
    id
}

#[tokio::test]
async fn test_create_session_shows_welcome() {
    let app = app();
    let (status, body) = send(&app, post("/api/sessions", None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["stage"], "welcome");
    assert_eq!(body["page"], "welcome");
    assert!(!body["disclaimer"].as_array().unwrap().is_empty());
    assert_eq!(body["input_sequence"], 0);
}

#[tokio::test]
async fn test_start_then_answer() {
    let app = app();
    let id = started_session(&app).await;

    let (_, view) = send(&app, get(&format!("/api/sessions/{id}"))).await;
    assert_eq!(view["stage"], "intake");
    assert_eq!(view["current_question"], "What is your full name?");

    let (status, body) = send(
        &app,
        post(
            &format!("/api/sessions/{id}/messages"),
            Some(json!({ "text": "Jane Doe" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["disposition"]["type"], "continued");
    assert_eq!(body["session"]["input_sequence"], 1);
    assert_eq!(
        body["session"]["current_question"],
        "What is the best phone number to reach you at?"
    );
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app();
    let (status, body) = send(&app, get("/api/sessions/does-not-exist")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn test_message_before_start_conflicts() {
    let app = app();
    let (_, body) = send(&app, post("/api/sessions", None)).await;
    let id = body["session_id"].as_str().unwrap();

    let (status, _) = send(
        &app,
        post(
            &format!("/api/sessions/{id}/messages"),
            Some(json!({ "text": "hello" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, post(&format!("/api/sessions/{id}/restart"), None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_flagged_input_is_rejected() {
    let (app, _) = app_with(MockModeration::flagging(&["harassment"]), Some(STAFF_TOKEN));
    let id = started_session(&app).await;

    let (status, body) = send(
        &app,
        post(
            &format!("/api/sessions/{id}/messages"),
            Some(json!({ "text": "something awful" })),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["disposition"]["type"], "rejected");
    assert_eq!(body["session"]["input_sequence"], 0);
    let transcript = body["session"]["transcript"].as_array().unwrap();
    assert!(transcript.iter().all(|m| m["role"] != "system"));
}

#[tokio::test]
async fn test_moderation_outage_reports_notice() {
    let (app, _) = app_with(
        MockModeration::failing(LlmError::Network("down".into())),
        Some(STAFF_TOKEN),
    );
    let id = started_session(&app).await;

    let (_, body) = send(
        &app,
        post(
            &format!("/api/sessions/{id}/messages"),
            Some(json!({ "text": "Jane Doe" })),
        ),
    )
    .await;

    assert_eq!(body["disposition"]["type"], "continued");
    assert_eq!(body["notices"][0]["kind"], "moderation");
}

#[tokio::test]
async fn test_exit_returns_to_welcome() {
    let app = app();
    let id = started_session(&app).await;

    let (status, body) = send(&app, post(&format!("/api/sessions/{id}/exit"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "welcome");
    assert_eq!(body["session_id"], id);
    assert!(body["transcript"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_internal_view_requires_staff_token() {
    let app = app();
    let id = started_session(&app).await;
    let uri = format!("/api/sessions/{id}/internal");

    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .uri(&uri)
        .header(STAFF_TOKEN_HEADER, "guess")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, wrong).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let authorized = Request::builder()
        .uri(&uri)
        .header(STAFF_TOKEN_HEADER, STAFF_TOKEN)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, authorized).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session_id"], id);
    assert_eq!(body["disqualified"], false);
}

#[tokio::test]
async fn test_internal_view_disabled_without_token() {
    let (app, _) = app_with(MockModeration::clean(), None);
    let id = started_session(&app).await;

    let request = Request::builder()
        .uri(format!("/api/sessions/{id}/internal"))
        .header(STAFF_TOKEN_HEADER, "anything")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_health_counts_sessions() {
    let (app, state) = app_with(MockModeration::clean(), None);
    send(&app, post("/api/sessions", None)).await;
    send(&app, post("/api/sessions", None)).await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sessions"], 2);
    assert_eq!(state.sessions.len(), 2);
}
