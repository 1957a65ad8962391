use axum::{extract::State, http::StatusCode, Json};

use crate::api::routes::chat::status_for;
use crate::api::state::AppState;
use crate::domain::ChatSession;

/// Full session bodies, newest first, for the history sidebar.
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatSession>>, StatusCode> {
    let sessions = state.sessions.read_all().await.map_err(|e| {
        tracing::error!(error = %e, "failed to read sessions");
        status_for(&e)
    })?;

    Ok(Json(sessions))
}
