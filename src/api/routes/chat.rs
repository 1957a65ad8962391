use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::domain::{ChatSession, DomainError};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: Uuid,
    pub header: String,
    pub created_at: DateTime<Utc>,
    pub answer: String,
    pub rejected: bool,
    /// The assembled context block that grounded the answer, for debugging.
    pub context: String,
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let mut session = match request.conversation_id {
        Some(id) => state
            .sessions
            .get(id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to load session");
                status_for(&e)
            })?
            .ok_or(StatusCode::NOT_FOUND)?,
        None => ChatSession::new(&request.message),
    };

    let reply = state
        .engine
        .process_user_input(&request.message)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "turn failed");
            status_for(&e)
        })?;

    // Both turns are recorded together, and only now that the turn
    // succeeded; a failed generation leaves the session untouched.
    session.record_exchange(&request.message, &reply.answer);
    if let Err(e) = state.sessions.upsert(&session).await {
        // Persistence is best-effort; the user still gets the answer.
        tracing::warn!(error = %e, conversation_id = %session.conversation_id, "session not persisted");
    }

    Ok(Json(ChatResponse {
        conversation_id: session.conversation_id,
        header: session.header.clone(),
        created_at: session.created_at,
        answer: reply.answer,
        rejected: reply.rejected,
        context: reply.context,
    }))
}

pub fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        DomainError::ExternalService(_) | DomainError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            status_for(&DomainError::validation("empty")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DomainError::timeout("llm")),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&DomainError::external("provider")),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&DomainError::internal("bug")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
