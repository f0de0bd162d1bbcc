//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the board REST API and the AI chat endpoint under a single
//! Axum router. All state lives in [`AppState`]; handlers stay thin and
//! delegate to the service layer.

pub mod boards;
pub mod chat;

use axum::Router;
use axum::response::Json;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/boards", get(boards::list_boards).post(boards::create_board))
        .route("/api/boards/{id}", get(boards::get_board).delete(boards::delete_board))
        .route("/api/boards/{id}/objects", get(boards::list_objects).post(boards::create_object))
        .route(
            "/api/boards/{id}/objects/{object_id}",
            get(boards::get_object)
                .patch(boards::patch_object)
                .delete(boards::delete_object),
        )
        .route("/api/boards/{id}/chat", post(chat::prompt))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
