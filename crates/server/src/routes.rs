//! HTTP routes
//!
//! JSON in, JSON out. Every session route returns the rendered view so the
//! client never has to track state itself.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use intake_agent::{internal_view, render, InternalCaseData, SessionView, TurnOutcome};

use crate::error::ServerError;
use crate::sessions::SharedSession;
use crate::state::AppState;
use crate::telemetry;

/// Header carrying the staff token for the internal view
pub const STAFF_TOKEN_HEADER: &str = "x-staff-token";

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session))
        .route("/api/sessions/:id/start", post(start))
        .route("/api/sessions/:id/messages", post(submit))
        .route("/api/sessions/:id/restart", post(restart))
        .route("/api/sessions/:id/exit", post(exit))
        .route("/api/sessions/:id/internal", get(internal))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    #[serde(flatten)]
    pub outcome: TurnOutcome,
    pub session: SessionView,
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.len(),
    }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let shared = state.sessions.create();
    let session = shared.lock().await;
    telemetry::record_session_created();
    tracing::info!(session_id = %session.id(), "session created");
    (
        StatusCode::CREATED,
        Json(render(&session, state.controller.script())),
    )
}

fn lookup(state: &AppState, id: &str) -> Result<SharedSession, ServerError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let shared = lookup(&state, &id)?;
    let session = shared.lock().await;
    Ok(Json(render(&session, state.controller.script())))
}

async fn start(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let shared = lookup(&state, &id)?;
    let mut session = shared.lock().await;
    state.controller.begin(&mut session)?;
    Ok(Json(render(&session, state.controller.script())))
}

async fn submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<TurnResponse>, ServerError> {
    let shared = lookup(&state, &id)?;
    let mut session = shared.lock().await;

    let outcome = state.controller.submit(&mut session, &request.text).await?;
    telemetry::record_turn(&outcome);

    for notice in &outcome.notices {
        tracing::warn!(
            session_id = %id,
            step = notice.kind.as_str(),
            message = %notice.message,
            "pipeline step fell back to default"
        );
    }

    Ok(Json(TurnResponse {
        outcome,
        session: render(&session, state.controller.script()),
    }))
}

async fn restart(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let shared = lookup(&state, &id)?;
    let mut session = shared.lock().await;
    state.controller.restart(&mut session)?;
    Ok(Json(render(&session, state.controller.script())))
}

async fn exit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ServerError> {
    let shared = lookup(&state, &id)?;
    let mut session = shared.lock().await;
    state.controller.exit(&mut session)?;
    Ok(Json(render(&session, state.controller.script())))
}

async fn internal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<InternalCaseData>, ServerError> {
    let expected = state
        .staff_token
        .as_deref()
        .ok_or(ServerError::StaffAccessDisabled)?;
    let provided = headers
        .get(STAFF_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided != Some(expected) {
        return Err(ServerError::Unauthorized);
    }

    let shared = lookup(&state, &id)?;
    let session = shared.lock().await;
    Ok(Json(internal_view(&session)))
}
