//! AI chat route.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::services::ai::{self, AiError, AiMutation};
use crate::services::object::ObjectError;
use crate::state::{AppState, BoardObject};

#[derive(Deserialize)]
pub struct ChatBody {
    pub prompt: String,
    pub user_id: Option<Uuid>,
}

/// Mutations grouped by kind, plus the assistant's summary text.
#[derive(Debug, Serialize)]
pub struct ChatResult {
    pub message: Option<String>,
    pub created: Vec<BoardObject>,
    pub updated: Vec<BoardObject>,
    pub deleted: Vec<Uuid>,
}

/// `POST /api/boards/:id/chat` — run an AI prompt against a board.
pub async fn prompt(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResult>, StatusCode> {
    if body.prompt.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let Some(llm) = state.llm.clone() else {
        return Err(ai_error_to_status(&AiError::LlmNotConfigured));
    };

    let result = ai::handle_prompt(&state, &llm, board_id, body.user_id, &body.prompt)
        .await
        .map_err(|e| {
            error!(%board_id, error = %e, "chat: prompt failed");
            ai_error_to_status(&e)
        })?;

    let mut created = Vec::new();
    let mut updated = Vec::new();
    let mut deleted = Vec::new();
    for mutation in result.mutations {
        match mutation {
            AiMutation::Created(obj) => created.push(obj),
            AiMutation::Updated(obj) => updated.push(obj),
            AiMutation::Deleted(id) => deleted.push(id),
        }
    }

    Ok(Json(ChatResult { message: result.text, created, updated, deleted }))
}

pub(crate) fn ai_error_to_status(err: &AiError) -> StatusCode {
    match err {
        AiError::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
        AiError::BoardNotFound(_) => StatusCode::NOT_FOUND,
        AiError::Llm(_) => StatusCode::BAD_GATEWAY,
        AiError::Object(e) => match e {
            ObjectError::NotFound(_) | ObjectError::BoardNotFound(_) => StatusCode::NOT_FOUND,
            ObjectError::StaleUpdate { .. } => StatusCode::CONFLICT,
        },
    }
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
