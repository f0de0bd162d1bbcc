//! Shared application state and the board object model.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the in-memory board registry and the optional LLM client.
//! Each board keeps its objects keyed by object ID. There is no
//! persistence layer; boards live for the lifetime of the process.
//!
//! Object types form a closed enum rather than free-form strings, so
//! per-kind defaults and occupancy-pool selection are lookup tables
//! instead of runtime string inspection.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::layout::Rect;
use crate::llm::LlmChat;

// =============================================================================
// OBJECT KIND
// =============================================================================

/// Closed set of board object types. Wire names match the client
/// (`"sticky-note"`, `"rectangle"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectKind {
    StickyNote,
    Rectangle,
    Circle,
    Text,
    Frame,
    Connector,
}

/// Which occupancy pool a kind collides in. Frames only collide with
/// other frames; ordinary shapes collide with each other. The pools
/// are independent because frames are visual groupings, not collision
/// bodies against the shapes placed inside them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OccupancyPool {
    Frames,
    Shapes,
}

impl ObjectKind {
    /// Default dimensions used when a create request omits them.
    #[must_use]
    pub fn default_size(self) -> (f64, f64) {
        match self {
            Self::StickyNote => (200.0, 200.0),
            Self::Rectangle => (200.0, 150.0),
            Self::Circle => (150.0, 150.0),
            Self::Text => (200.0, 40.0),
            Self::Frame => (400.0, 300.0),
            Self::Connector => (0.0, 0.0),
        }
    }

    /// Default color per kind: pastel for sticky notes, vivid for
    /// shapes, light gray for text, dark gray for frames/connectors.
    #[must_use]
    pub fn default_color(self) -> &'static str {
        match self {
            Self::StickyNote => "#fef08a",
            Self::Rectangle | Self::Circle => "#3b82f6",
            Self::Text => "#e8eaed",
            Self::Frame => "#4b5563",
            Self::Connector => "#6b7280",
        }
    }

    /// Occupancy pool for overlap resolution. Connectors are
    /// zero-extent and never occupy space.
    #[must_use]
    pub fn occupancy_pool(self) -> Option<OccupancyPool> {
        match self {
            Self::Connector => None,
            Self::Frame => Some(OccupancyPool::Frames),
            _ => Some(OccupancyPool::Shapes),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StickyNote => "sticky-note",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Text => "text",
            Self::Frame => "frame",
            Self::Connector => "connector",
        }
    }

    /// Parse a wire name back into a kind.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "sticky-note" => Some(Self::StickyNote),
            "rectangle" => Some(Self::Rectangle),
            "circle" => Some(Self::Circle),
            "text" => Some(Self::Text),
            "frame" => Some(Self::Frame),
            "connector" => Some(Self::Connector),
            _ => None,
        }
    }
}

// =============================================================================
// BOARD OBJECT
// =============================================================================

/// A single object on a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardObject {
    pub id: Uuid,
    pub board_id: Uuid,
    pub kind: ObjectKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub z_index: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Connector endpoints; `None` for spatial objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_from: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connected_to: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub version: i32,
}

impl BoardObject {
    /// Bounding box used for overlap resolution.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

// =============================================================================
// BOARD STATE
// =============================================================================

/// Per-board live state.
pub struct BoardState {
    pub name: String,
    /// Current objects keyed by object ID.
    pub objects: HashMap<Uuid, BoardObject>,
}

impl BoardState {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), objects: HashMap::new() }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; all inner
/// fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<RwLock<HashMap<Uuid, BoardState>>>,
    /// Optional LLM client. `None` if LLM env vars are not configured.
    pub llm: Option<Arc<dyn LlmChat>>,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>) -> Self {
        Self { boards: Arc::new(RwLock::new(HashMap::new())), llm }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use super::*;

    #[must_use]
    pub fn test_app_state() -> AppState {
        AppState::new(None)
    }

    #[must_use]
    pub fn test_app_state_with_llm(llm: Arc<dyn LlmChat>) -> AppState {
        AppState::new(Some(llm))
    }

    /// Seed an empty board into the app state and return its ID.
    pub async fn seed_board(state: &AppState) -> Uuid {
        let board_id = Uuid::new_v4();
        let mut boards = state.boards.write().await;
        boards.insert(board_id, BoardState::new("Test Board"));
        board_id
    }

    /// Seed a board with pre-populated objects and return the board ID.
    pub async fn seed_board_with_objects(state: &AppState, objects: Vec<BoardObject>) -> Uuid {
        let board_id = Uuid::new_v4();
        let mut board_state = BoardState::new("Test Board");
        for mut obj in objects {
            obj.board_id = board_id;
            board_state.objects.insert(obj.id, obj);
        }
        let mut boards = state.boards.write().await;
        boards.insert(board_id, board_state);
        board_id
    }

    /// An object of the given kind and bounds, other fields defaulted.
    #[must_use]
    pub fn object_at(kind: ObjectKind, x: f64, y: f64, width: f64, height: f64) -> BoardObject {
        BoardObject {
            id: Uuid::new_v4(),
            board_id: Uuid::new_v4(),
            kind,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            text: None,
            color: kind.default_color().into(),
            font_size: None,
            connected_from: None,
            connected_to: None,
            created_by: None,
            version: 1,
        }
    }

    /// A default-sized sticky note for tests that don't care about bounds.
    #[must_use]
    pub fn dummy_object() -> BoardObject {
        let mut obj = object_at(ObjectKind::StickyNote, 100.0, 200.0, 200.0, 200.0);
        obj.text = Some("test".into());
        obj
    }
}
