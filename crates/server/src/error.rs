//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use intake_agent::AgentError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("internal case data is not enabled")]
    StaffAccessDisabled,

    #[error("missing or invalid staff token")]
    Unauthorized,
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Agent(_) => StatusCode::CONFLICT,
            ServerError::StaffAccessDisabled => StatusCode::FORBIDDEN,
            ServerError::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::Stage;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::SessionNotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        let stage = ServerError::from(AgentError::InvalidStage {
            action: "submit an answer",
            stage: Stage::Results,
        });
        assert_eq!(stage.status(), StatusCode::CONFLICT);
        assert_eq!(ServerError::StaffAccessDisabled.status(), StatusCode::FORBIDDEN);
        assert_eq!(ServerError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }
}
