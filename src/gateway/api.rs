//! REST API handlers for planning sessions.

use super::AppState;
use crate::sessions::SessionError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

// ── Request bodies ───────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateSessionBody {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinSessionBody {
    #[serde(default)]
    pub name: String,
}

// ── Error mapping ────────────────────────────────────────────────

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::DuplicateName(_) | SessionError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
        };
        error_response(status, self.to_string())
    }
}

/// Decode a JSON body regardless of content type; any failure is `InvalidInput`.
fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, SessionError> {
    serde_json::from_slice(body)
        .map_err(|e| SessionError::InvalidInput(format!("invalid request body: {e}")))
}

// ── Handlers ────────────────────────────────────────────────────

/// POST /sessions: create a planning session
pub async fn handle_create_session(State(state): State<AppState>, body: Bytes) -> Response {
    let req: CreateSessionBody = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    let session = state.store.create_session(&req.title).await;
    (StatusCode::CREATED, Json(session)).into_response()
}

/// GET /sessions/{id}: session with its current players
pub async fn handle_view_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match state.store.view_session(&id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /sessions/{id}/join: add a player by name
pub async fn handle_join_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    if !state.store.contains_session(&id).await {
        return SessionError::NotFound(id).into_response();
    }

    let req: JoinSessionBody = match decode_body(&body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    match state.store.join_session(&id, &req.name).await {
        Ok(player) => (StatusCode::CREATED, Json(player)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /health: liveness and registry size
pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "backend": state.store.name(),
        "sessions": state.store.session_count().await,
        "uptime_seconds": state.started_at.elapsed().as_secs(),
    }))
}

/// Fallback for unmatched routes.
pub async fn handle_not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "not found")
}
