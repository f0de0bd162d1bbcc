use axum::extract::{Path, State};
use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::state::test_helpers::{object_at, seed_board, seed_board_with_objects, test_app_state};

// ===== ERROR MAPPING =====

#[test]
fn object_error_to_status_maps_not_found() {
    assert_eq!(object_error_to_status(ObjectError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
    assert_eq!(object_error_to_status(ObjectError::BoardNotFound(Uuid::nil())), StatusCode::NOT_FOUND);
}

#[test]
fn object_error_to_status_maps_stale_update_to_conflict() {
    let err = ObjectError::StaleUpdate { incoming: 1, current: 3 };
    assert_eq!(object_error_to_status(err), StatusCode::CONFLICT);
}

// ===== BOARD ROUTES =====

#[tokio::test]
async fn create_board_then_get_round_trips() {
    let state = test_app_state();

    let (status, Json(summary)) =
        create_board(State(state.clone()), Json(CreateBoardBody { name: "Roadmap".into() }))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(summary.name, "Roadmap");
    assert_eq!(summary.object_count, 0);

    let Json(board) = get_board(State(state), Path(summary.id)).await.unwrap();
    assert_eq!(board.id, summary.id);
    assert_eq!(board.name, "Roadmap");
    assert!(board.objects.is_empty());
}

#[tokio::test]
async fn create_board_rejects_blank_name() {
    let state = test_app_state();
    let err = create_board(State(state), Json(CreateBoardBody { name: "   ".into() }))
        .await
        .unwrap_err();
    assert_eq!(err, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_boards_sorts_by_name() {
    let state = test_app_state();
    for name in ["zebra", "alpha", "mango"] {
        create_board(State(state.clone()), Json(CreateBoardBody { name: name.into() }))
            .await
            .unwrap();
    }

    let Json(summaries) = list_boards(State(state)).await;
    let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mango", "zebra"]);
}

#[tokio::test]
async fn get_missing_board_is_404() {
    let state = test_app_state();
    let err = get_board(State(state), Path(Uuid::new_v4())).await.unwrap_err();
    assert_eq!(err, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_board_removes_it() {
    let state = test_app_state();
    let board_id = seed_board(&state).await;

    delete_board(State(state.clone()), Path(board_id)).await.unwrap();

    let err = get_board(State(state), Path(board_id)).await.unwrap_err();
    assert_eq!(err, StatusCode::NOT_FOUND);
}

// ===== OBJECT ROUTES =====

fn sticky_body(x: f64, y: f64) -> CreateObjectBody {
    CreateObjectBody {
        kind: ObjectKind::StickyNote,
        x,
        y,
        width: None,
        height: None,
        rotation: None,
        z_index: None,
        text: Some("hello".into()),
        color: None,
        font_size: None,
        connected_from: None,
        connected_to: None,
        created_by: None,
    }
}

#[tokio::test]
async fn create_object_applies_kind_defaults() {
    let state = test_app_state();
    let board_id = seed_board(&state).await;

    let (status, Json(obj)) = create_object(State(state), Path(board_id), Json(sticky_body(10.0, 20.0)))
        .await
        .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(obj.kind, ObjectKind::StickyNote);
    assert_eq!((obj.width, obj.height), (200.0, 200.0));
    assert_eq!(obj.color, "#fef08a");
    assert_eq!(obj.version, 1);
}

#[tokio::test]
async fn create_object_carries_rotation_through() {
    let state = test_app_state();
    let board_id = seed_board(&state).await;

    let mut body = sticky_body(0.0, 0.0);
    body.rotation = Some(45.0);
    let (_, Json(obj)) = create_object(State(state), Path(board_id), Json(body)).await.unwrap();
    assert_eq!(obj.rotation, 45.0);
}

#[tokio::test]
async fn create_object_keeps_requested_position() {
    let state = test_app_state();
    let existing = object_at(ObjectKind::StickyNote, 0.0, 0.0, 200.0, 200.0);
    let board_id = seed_board_with_objects(&state, vec![existing]).await;

    // Direct creates are not overlap-resolved.
    let (_, Json(obj)) = create_object(State(state), Path(board_id), Json(sticky_body(0.0, 0.0)))
        .await
        .unwrap();
    assert_eq!((obj.x, obj.y), (0.0, 0.0));
}

#[tokio::test]
async fn patch_object_respects_versions() {
    let state = test_app_state();
    let existing = object_at(ObjectKind::StickyNote, 0.0, 0.0, 200.0, 200.0);
    let object_id = existing.id;
    let board_id = seed_board_with_objects(&state, vec![existing]).await;

    let body: UpdateObjectBody = serde_json::from_value(json!({ "version": 1, "x": 50.0 })).unwrap();
    let Json(obj) = patch_object(State(state.clone()), Path((board_id, object_id)), Json(body))
        .await
        .unwrap();
    assert_eq!(obj.x, 50.0);
    assert_eq!(obj.version, 2);

    // Re-sending the old version loses the race.
    let stale: UpdateObjectBody = serde_json::from_value(json!({ "version": 1, "x": 99.0 })).unwrap();
    let err = patch_object(State(state), Path((board_id, object_id)), Json(stale))
        .await
        .unwrap_err();
    assert_eq!(err, StatusCode::CONFLICT);
}

#[tokio::test]
async fn list_objects_orders_by_z_index() {
    let state = test_app_state();
    let mut low = object_at(ObjectKind::StickyNote, 0.0, 0.0, 200.0, 200.0);
    low.z_index = 1;
    let mut high = object_at(ObjectKind::Rectangle, 500.0, 0.0, 200.0, 150.0);
    high.z_index = 5;
    let board_id = seed_board_with_objects(&state, vec![high, low]).await;

    let Json(objects) = list_objects(State(state), Path(board_id)).await.unwrap();
    assert_eq!(objects.iter().map(|o| o.z_index).collect::<Vec<_>>(), vec![1, 5]);
}

#[tokio::test]
async fn delete_object_then_get_is_404() {
    let state = test_app_state();
    let existing = object_at(ObjectKind::Circle, 0.0, 0.0, 150.0, 150.0);
    let object_id = existing.id;
    let board_id = seed_board_with_objects(&state, vec![existing]).await;

    delete_object(State(state.clone()), Path((board_id, object_id))).await.unwrap();

    let err = get_object(State(state), Path((board_id, object_id))).await.unwrap_err();
    assert_eq!(err, StatusCode::NOT_FOUND);
}

// ===== DTO PARSING =====

#[test]
fn update_body_flattens_patch_fields() {
    let body: UpdateObjectBody =
        serde_json::from_value(json!({ "version": 3, "text": "new", "color": "#ef4444" })).unwrap();
    assert_eq!(body.version, 3);
    assert_eq!(body.updates.text.as_deref(), Some("new"));
    assert_eq!(body.updates.color.as_deref(), Some("#ef4444"));
    assert!(body.updates.x.is_none());
}

#[test]
fn create_body_parses_kebab_case_kind() {
    let body: CreateObjectBody =
        serde_json::from_value(json!({ "kind": "sticky-note", "x": 1.0, "y": 2.0 })).unwrap();
    assert_eq!(body.kind, ObjectKind::StickyNote);
}
