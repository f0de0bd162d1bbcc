//! Object service: create, update, delete with LWW versioning.
//!
//! DESIGN
//! ======
//! Mutations apply to the in-memory board and return the updated
//! object for the response. LWW conflict resolution: an incoming
//! version must be >= the current version, otherwise the update is
//! rejected as stale. Positions are taken as given here; the AI path
//! resolves overlaps through a `PlacementSession` before calling in.

use uuid::Uuid;

use crate::state::{AppState, BoardObject, ObjectKind};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ObjectError {
    #[error("object not found: {0}")]
    NotFound(Uuid),
    #[error("board not found: {0}")]
    BoardNotFound(Uuid),
    #[error("stale update: incoming version {incoming} < current {current}")]
    StaleUpdate { incoming: i32, current: i32 },
}

/// Parameters for creating a board object.
#[derive(Debug, Clone)]
pub struct NewObject {
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i32,
    pub text: Option<String>,
    pub color: String,
    pub font_size: Option<f64>,
    pub connected_from: Option<Uuid>,
    pub connected_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
}

impl NewObject {
    /// Per-kind defaults at the given position.
    #[must_use]
    pub fn with_defaults(kind: ObjectKind, x: f64, y: f64) -> Self {
        let (width, height) = kind.default_size();
        Self {
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            text: None,
            color: kind.default_color().to_string(),
            font_size: None,
            connected_from: None,
            connected_to: None,
            created_by: None,
        }
    }
}

/// Field-level patch. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ObjectUpdate {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub z_index: Option<i32>,
    pub text: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<f64>,
}

// =============================================================================
// CREATE
// =============================================================================

/// Create a new object on a board.
///
/// # Errors
///
/// Returns `BoardNotFound` if the board doesn't exist.
pub async fn create_object(state: &AppState, board_id: Uuid, new: NewObject) -> Result<BoardObject, ObjectError> {
    let mut boards = state.boards.write().await;
    let board = boards
        .get_mut(&board_id)
        .ok_or(ObjectError::BoardNotFound(board_id))?;

    let obj = BoardObject {
        id: Uuid::new_v4(),
        board_id,
        kind: new.kind,
        x: new.x,
        y: new.y,
        width: new.width,
        height: new.height,
        rotation: new.rotation,
        z_index: new.z_index,
        text: new.text,
        color: new.color,
        font_size: new.font_size,
        connected_from: new.connected_from,
        connected_to: new.connected_to,
        created_by: new.created_by,
        version: 1,
    };

    let result = obj.clone();
    board.objects.insert(obj.id, obj);
    Ok(result)
}

// =============================================================================
// UPDATE
// =============================================================================

/// Update an existing object with LWW conflict resolution.
///
/// # Errors
///
/// Returns `StaleUpdate` if `incoming_version < current.version`.
pub async fn update_object(
    state: &AppState,
    board_id: Uuid,
    object_id: Uuid,
    updates: &ObjectUpdate,
    incoming_version: i32,
) -> Result<BoardObject, ObjectError> {
    let mut boards = state.boards.write().await;
    let board = boards
        .get_mut(&board_id)
        .ok_or(ObjectError::BoardNotFound(board_id))?;
    let obj = board
        .objects
        .get_mut(&object_id)
        .ok_or(ObjectError::NotFound(object_id))?;

    // LWW: reject stale updates.
    if incoming_version < obj.version {
        return Err(ObjectError::StaleUpdate { incoming: incoming_version, current: obj.version });
    }

    if let Some(x) = updates.x {
        obj.x = x;
    }
    if let Some(y) = updates.y {
        obj.y = y;
    }
    if let Some(w) = updates.width {
        obj.width = w;
    }
    if let Some(h) = updates.height {
        obj.height = h;
    }
    if let Some(r) = updates.rotation {
        obj.rotation = r;
    }
    if let Some(z) = updates.z_index {
        obj.z_index = z;
    }
    if let Some(text) = &updates.text {
        obj.text = Some(text.clone());
    }
    if let Some(color) = &updates.color {
        obj.color = color.clone();
    }
    if let Some(fs) = updates.font_size {
        obj.font_size = Some(fs);
    }

    obj.version += 1;
    Ok(obj.clone())
}

// =============================================================================
// DELETE
// =============================================================================

/// Delete an object from a board.
///
/// # Errors
///
/// Returns `NotFound` if the object doesn't exist.
pub async fn delete_object(state: &AppState, board_id: Uuid, object_id: Uuid) -> Result<(), ObjectError> {
    let mut boards = state.boards.write().await;
    let board = boards
        .get_mut(&board_id)
        .ok_or(ObjectError::BoardNotFound(board_id))?;

    if board.objects.remove(&object_id).is_none() {
        return Err(ObjectError::NotFound(object_id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_helpers;

    #[tokio::test]
    async fn create_object_succeeds() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let mut new = NewObject::with_defaults(ObjectKind::StickyNote, 10.0, 20.0);
        new.text = Some("hi".into());
        let obj = create_object(&state, board_id, new).await.unwrap();
        assert_eq!(obj.kind, ObjectKind::StickyNote);
        assert!((obj.x - 10.0).abs() < f64::EPSILON);
        assert!((obj.y - 20.0).abs() < f64::EPSILON);
        assert!((obj.width - 200.0).abs() < f64::EPSILON);
        assert_eq!(obj.color, "#fef08a");
        assert_eq!(obj.version, 1);

        let boards = state.boards.read().await;
        assert!(boards.get(&board_id).unwrap().objects.contains_key(&obj.id));
    }

    #[tokio::test]
    async fn create_object_board_not_found() {
        let state = test_helpers::test_app_state();
        let new = NewObject::with_defaults(ObjectKind::StickyNote, 0.0, 0.0);
        let result = create_object(&state, Uuid::new_v4(), new).await;
        assert!(matches!(result.unwrap_err(), ObjectError::BoardNotFound(_)));
    }

    #[tokio::test]
    async fn update_object_succeeds() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let new = NewObject::with_defaults(ObjectKind::Rectangle, 0.0, 0.0);
        let obj = create_object(&state, board_id, new).await.unwrap();

        let updates = ObjectUpdate { x: Some(50.0), y: Some(75.0), ..ObjectUpdate::default() };
        let updated = update_object(&state, board_id, obj.id, &updates, 1).await.unwrap();
        assert!((updated.x - 50.0).abs() < f64::EPSILON);
        assert!((updated.y - 75.0).abs() < f64::EPSILON);
        assert_eq!(updated.version, 2);
    }

    #[tokio::test]
    async fn update_object_lww_rejects_stale() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let new = NewObject::with_defaults(ObjectKind::Circle, 0.0, 0.0);
        let obj = create_object(&state, board_id, new).await.unwrap();

        let updates = ObjectUpdate { x: Some(10.0), ..ObjectUpdate::default() };
        let updated = update_object(&state, board_id, obj.id, &updates, 1).await.unwrap();
        assert_eq!(updated.version, 2);

        let result = update_object(&state, board_id, obj.id, &updates, 0).await;
        assert!(matches!(
            result.unwrap_err(),
            ObjectError::StaleUpdate { incoming: 0, current: 2 }
        ));
    }

    #[tokio::test]
    async fn update_object_not_found() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let result = update_object(&state, board_id, Uuid::new_v4(), &ObjectUpdate::default(), 0).await;
        assert!(matches!(result.unwrap_err(), ObjectError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_object_partial_fields() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let new = NewObject::with_defaults(ObjectKind::Text, 10.0, 20.0);
        let obj = create_object(&state, board_id, new).await.unwrap();

        let updates = ObjectUpdate { x: Some(99.0), ..ObjectUpdate::default() };
        let updated = update_object(&state, board_id, obj.id, &updates, 1).await.unwrap();
        assert!((updated.x - 99.0).abs() < f64::EPSILON);
        assert!((updated.y - 20.0).abs() < f64::EPSILON); // unchanged
    }

    #[tokio::test]
    async fn update_object_text_and_color() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let mut new = NewObject::with_defaults(ObjectKind::StickyNote, 0.0, 0.0);
        new.text = Some("old".into());
        let obj = create_object(&state, board_id, new).await.unwrap();

        let updates = ObjectUpdate {
            text: Some("new".into()),
            color: Some("#ef4444".into()),
            ..ObjectUpdate::default()
        };
        let updated = update_object(&state, board_id, obj.id, &updates, 1).await.unwrap();
        assert_eq!(updated.text.as_deref(), Some("new"));
        assert_eq!(updated.color, "#ef4444");
    }

    #[tokio::test]
    async fn delete_object_removes_from_board() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let new = NewObject::with_defaults(ObjectKind::Rectangle, 0.0, 0.0);
        let obj = create_object(&state, board_id, new).await.unwrap();

        delete_object(&state, board_id, obj.id).await.unwrap();
        let boards = state.boards.read().await;
        assert!(!boards.get(&board_id).unwrap().objects.contains_key(&obj.id));
    }

    #[tokio::test]
    async fn delete_object_not_found() {
        let state = test_helpers::test_app_state();
        let board_id = test_helpers::seed_board(&state).await;
        let result = delete_object(&state, board_id, Uuid::new_v4()).await;
        assert!(matches!(result.unwrap_err(), ObjectError::NotFound(_)));
    }
}
