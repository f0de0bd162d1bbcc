//! Board tool definitions for the AI assistant.
//!
//! One entry per tool the model may call. Positions supplied by the
//! model are treated as approximate; the placement session resolves
//! overlaps server-side before anything lands on the board.

use super::types::Tool;

/// Build the set of tools available to the board AI assistant.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn board_tools() -> Vec<Tool> {
    vec![
        Tool {
            name: "getBoardState".into(),
            description: "Get objects on the board. Pass objectTypes to filter and reduce response size. \
                          Call when you need to find existing objects or reference their IDs."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "objectTypes": {
                        "type": "array",
                        "items": {
                            "type": "string",
                            "enum": ["sticky-note", "rectangle", "circle", "text", "frame", "connector"]
                        },
                        "description": "Only return these types. Omit for all objects."
                    }
                }
            }),
        },
        Tool {
            name: "createStickyNote".into(),
            description: "Create a sticky note on the board. Use for ideas, labels, tasks, or any text \
                          content. Default size is 200x200."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "The text content of the sticky note" },
                    "x": { "type": "number", "description": "X position on the canvas" },
                    "y": { "type": "number", "description": "Y position on the canvas" },
                    "color": {
                        "type": "string",
                        "description": "Hex color. Options: #fef08a (yellow), #fed7aa (orange), #bbf7d0 (green), #bfdbfe (blue), #e9d5ff (purple), #fecdd3 (pink). Default: #fef08a"
                    },
                    "width": { "type": "number", "description": "Width in pixels. Default: 200" },
                    "height": { "type": "number", "description": "Height in pixels. Default: 200" }
                },
                "required": ["text", "x", "y"]
            }),
        },
        Tool {
            name: "createShape".into(),
            description: "Create a geometric shape (rectangle or circle) on the board.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "type": { "type": "string", "enum": ["rectangle", "circle"], "description": "Shape type" },
                    "x": { "type": "number", "description": "X position" },
                    "y": { "type": "number", "description": "Y position" },
                    "width": { "type": "number", "description": "Width. Default: 200 for rectangle, 150 for circle" },
                    "height": { "type": "number", "description": "Height. Default: 150 for rectangle, 150 for circle" },
                    "color": {
                        "type": "string",
                        "description": "Hex color. Options: #3b82f6 (blue), #ef4444 (red), #22c55e (green), #f59e0b (amber), #8b5cf6 (purple), #06b6d4 (cyan), #f97316 (orange)"
                    },
                    "text": { "type": "string", "description": "Optional text label inside the shape" }
                },
                "required": ["type", "x", "y"]
            }),
        },
        Tool {
            name: "createTextElement".into(),
            description: "Create a free text label on the board. Use for headings, annotations, or labels.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string", "description": "The text content" },
                    "x": { "type": "number", "description": "X position" },
                    "y": { "type": "number", "description": "Y position" },
                    "color": { "type": "string", "description": "Text color hex. Default: #e8eaed" },
                    "fontSize": { "type": "number", "description": "Font size. Default: 20" }
                },
                "required": ["text", "x", "y"]
            }),
        },
        Tool {
            name: "createFrame".into(),
            description: "Create a frame container on the board. Use to visually group related elements, \
                          like sections in a template."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Frame title text" },
                    "x": { "type": "number", "description": "X position" },
                    "y": { "type": "number", "description": "Y position" },
                    "width": { "type": "number", "description": "Width. Default: 400" },
                    "height": { "type": "number", "description": "Height. Default: 300" }
                },
                "required": ["title", "x", "y"]
            }),
        },
        Tool {
            name: "createConnector".into(),
            description: "Create a visual connector (arrow) between two existing objects on the board.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "fromId": { "type": "string", "format": "uuid", "description": "ID of the source object" },
                    "toId": { "type": "string", "format": "uuid", "description": "ID of the target object" },
                    "color": { "type": "string", "description": "Connector color. Default: #6b7280" }
                },
                "required": ["fromId", "toId"]
            }),
        },
        Tool {
            name: "createObjects".into(),
            description: "Create multiple objects on the board in a single operation. Use this instead of \
                          calling individual create tools when making 2 or more objects. Supports sticky \
                          notes, shapes, text elements, and frames."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "objects": {
                        "type": "array",
                        "minItems": 1,
                        "maxItems": 500,
                        "description": "Array of objects to create (max 500)",
                        "items": {
                            "type": "object",
                            "properties": {
                                "type": {
                                    "type": "string",
                                    "enum": ["sticky-note", "rectangle", "circle", "text", "frame"]
                                },
                                "x": { "type": "number", "description": "X position" },
                                "y": { "type": "number", "description": "Y position" },
                                "width": { "type": "number", "description": "Width. Per-type default when omitted" },
                                "height": { "type": "number", "description": "Height. Per-type default when omitted" },
                                "text": { "type": "string", "description": "Text content (sticky notes, text, shape labels)" },
                                "title": { "type": "string", "description": "Frame title (frames only)" },
                                "color": { "type": "string", "description": "Hex color. Per-type default when omitted" },
                                "fontSize": { "type": "number", "description": "Font size (text elements only). Default: 20" }
                            },
                            "required": ["type", "x", "y"]
                        }
                    }
                },
                "required": ["objects"]
            }),
        },
        Tool {
            name: "moveObject".into(),
            description: "Move an existing object to a new position.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "objectId": { "type": "string", "format": "uuid", "description": "ID of the object to move" },
                    "x": { "type": "number", "description": "New X position" },
                    "y": { "type": "number", "description": "New Y position" }
                },
                "required": ["objectId", "x", "y"]
            }),
        },
        Tool {
            name: "updateText".into(),
            description: "Update the text content of an existing object (sticky note, shape, text, or frame).".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "objectId": { "type": "string", "format": "uuid", "description": "ID of the object" },
                    "text": { "type": "string", "description": "New text content" }
                },
                "required": ["objectId", "text"]
            }),
        },
        Tool {
            name: "changeColor".into(),
            description: "Change the color of an existing object.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "objectId": { "type": "string", "format": "uuid", "description": "ID of the object" },
                    "color": { "type": "string", "description": "New hex color value" }
                },
                "required": ["objectId", "color"]
            }),
        },
        Tool {
            name: "deleteObject".into(),
            description: "Delete an object from the board.".into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "objectId": { "type": "string", "format": "uuid", "description": "ID of the object to delete" }
                },
                "required": ["objectId"]
            }),
        },
        Tool {
            name: "batchMutate".into(),
            description: "Perform multiple mutations on existing board objects in a single operation. \
                          Supports moving, updating text, changing color, and deleting. Use this instead \
                          of individual mutation tools when modifying 2 or more objects."
                .into(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "operations": {
                        "type": "array",
                        "minItems": 1,
                        "maxItems": 500,
                        "description": "Array of mutation operations (max 500)",
                        "items": {
                            "type": "object",
                            "properties": {
                                "action": {
                                    "type": "string",
                                    "enum": ["move", "updateText", "changeColor", "delete"]
                                },
                                "objectId": { "type": "string", "format": "uuid", "description": "ID of the target object" },
                                "x": { "type": "number", "description": "New X position (move)" },
                                "y": { "type": "number", "description": "New Y position (move)" },
                                "text": { "type": "string", "description": "New text content (updateText)" },
                                "color": { "type": "string", "description": "New hex color (changeColor)" }
                            },
                            "required": ["action", "objectId"]
                        }
                    }
                },
                "required": ["operations"]
            }),
        },
    ]
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
