//! Board and object REST routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::object::{self, NewObject, ObjectError, ObjectUpdate};
use crate::state::{AppState, BoardObject, BoardState, ObjectKind};

// ===== DTOS =====

#[derive(Deserialize)]
pub struct CreateBoardBody {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct BoardSummary {
    pub id: Uuid,
    pub name: String,
    pub object_count: usize,
}

#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub id: Uuid,
    pub name: String,
    pub objects: Vec<BoardObject>,
}

#[derive(Deserialize)]
pub struct CreateObjectBody {
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
    pub connected_from: Option<Uuid>,
    pub connected_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

/// Object patch with the writer's base version for LWW resolution.
#[derive(Deserialize)]
pub struct UpdateObjectBody {
    pub version: i32,
    #[serde(flatten)]
    pub updates: ObjectUpdate,
}

// ===== BOARD ROUTES =====

/// `POST /api/boards` — create a board.
pub async fn create_board(
    State(state): State<AppState>,
    Json(body): Json<CreateBoardBody>,
) -> Result<(StatusCode, Json<BoardSummary>), StatusCode> {
    if body.name.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let board_id = Uuid::new_v4();
    let mut boards = state.boards.write().await;
    boards.insert(board_id, BoardState::new(body.name.clone()));

    Ok((StatusCode::CREATED, Json(BoardSummary { id: board_id, name: body.name, object_count: 0 })))
}

/// `GET /api/boards` — list boards.
pub async fn list_boards(State(state): State<AppState>) -> Json<Vec<BoardSummary>> {
    let boards = state.boards.read().await;
    let mut summaries: Vec<BoardSummary> = boards
        .iter()
        .map(|(id, board)| BoardSummary { id: *id, name: board.name.clone(), object_count: board.objects.len() })
        .collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Json(summaries)
}

/// `GET /api/boards/:id` — board with all objects.
pub async fn get_board(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<BoardResponse>, StatusCode> {
    let boards = state.boards.read().await;
    let board = boards.get(&board_id).ok_or(StatusCode::NOT_FOUND)?;

    let mut objects: Vec<BoardObject> = board.objects.values().cloned().collect();
    objects.sort_by_key(|o| (o.z_index, o.id));

    Ok(Json(BoardResponse { id: board_id, name: board.name.clone(), objects }))
}

/// `DELETE /api/boards/:id` — delete a board and its objects.
pub async fn delete_board(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let mut boards = state.boards.write().await;
    if boards.remove(&board_id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

// ===== OBJECT ROUTES =====

/// `GET /api/boards/:id/objects` — list objects on a board.
pub async fn list_objects(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<BoardObject>>, StatusCode> {
    let boards = state.boards.read().await;
    let board = boards.get(&board_id).ok_or(StatusCode::NOT_FOUND)?;

    let mut objects: Vec<BoardObject> = board.objects.values().cloned().collect();
    objects.sort_by_key(|o| (o.z_index, o.id));
    Ok(Json(objects))
}

/// `POST /api/boards/:id/objects` — create an object.
///
/// Direct creates land exactly where the client asked; only the AI
/// placement path resolves overlaps.
pub async fn create_object(
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(body): Json<CreateObjectBody>,
) -> Result<(StatusCode, Json<BoardObject>), StatusCode> {
    let mut new = NewObject::with_defaults(body.kind, body.x, body.y);
    if let Some(width) = body.width {
        new.width = width;
    }
    if let Some(height) = body.height {
        new.height = height;
    }
    if let Some(rotation) = body.rotation {
        new.rotation = rotation;
    }
    if let Some(z_index) = body.z_index {
        new.z_index = z_index;
    }
    new.text = body.text;
    if let Some(color) = body.color {
        new.color = color;
    }
    new.font_size = body.font_size;
    new.connected_from = body.connected_from;
    new.connected_to = body.connected_to;
    new.created_by = body.created_by;

    let obj = object::create_object(&state, board_id, new)
        .await
        .map_err(object_error_to_status)?;
    Ok((StatusCode::CREATED, Json(obj)))
}

/// `GET /api/boards/:id/objects/:object_id` — fetch one object.
pub async fn get_object(
    State(state): State<AppState>,
    Path((board_id, object_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BoardObject>, StatusCode> {
    let boards = state.boards.read().await;
    let board = boards.get(&board_id).ok_or(StatusCode::NOT_FOUND)?;
    let obj = board.objects.get(&object_id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(obj.clone()))
}

/// `PATCH /api/boards/:id/objects/:object_id` — partial update with
/// last-writer-wins version checking.
pub async fn patch_object(
    State(state): State<AppState>,
    Path((board_id, object_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<UpdateObjectBody>,
) -> Result<Json<BoardObject>, StatusCode> {
    let obj = object::update_object(&state, board_id, object_id, &body.updates, body.version)
        .await
        .map_err(object_error_to_status)?;
    Ok(Json(obj))
}

/// `DELETE /api/boards/:id/objects/:object_id` — remove an object.
pub async fn delete_object(
    State(state): State<AppState>,
    Path((board_id, object_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    object::delete_object(&state, board_id, object_id)
        .await
        .map_err(object_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub(crate) fn object_error_to_status(err: ObjectError) -> StatusCode {
    match err {
        ObjectError::NotFound(_) | ObjectError::BoardNotFound(_) => StatusCode::NOT_FOUND,
        ObjectError::StaleUpdate { .. } => StatusCode::CONFLICT,
    }
}

#[cfg(test)]
#[path = "boards_test.rs"]
mod tests;
