//! JSON command protocol for scripted editing sessions.
//!
//! Drives an [`EditorHarness`] from JSON: the CLI reads a script of these
//! commands, integration tests use them to replay user sessions.

use serde::{Deserialize, Serialize};
use shared::{FormatChange, ObjectKind, Viewport};

use crate::editor::RestoreOutcome;
use crate::harness::EditorHarness;
use crate::scene::Scene;
use crate::shortcuts::KeyChord;

/// A command a script can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Add a text object in the toolbar style, optionally with content
    AddText {
        #[serde(default)]
        text: Option<String>,
    },
    /// Replace the content of a text object
    EditText { id: String, text: String },
    /// Drag an object to a new position
    MoveObject { id: String, x: f64, y: f64 },
    /// Delete an object
    Remove { id: String },
    /// Apply a toolbar change to the active text object
    Format { change: FormatChange },
    /// Select an object by ID.
    Select { id: String },
    /// Clear selection.
    ClearSelection,
    /// Undo the last change.
    Undo,
    /// Redo the last undone change.
    Redo,
    /// Press a key combination
    Key {
        chord: KeyChord,
        #[serde(default)]
        text_focused: bool,
    },
    /// Resize the browser window
    Viewport {
        container_width: f64,
        window_height: f64,
    },
    /// Inspect the scene and the history.
    Inspect,
    /// Export the scene as JSON.
    ExportScene,
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }

    fn from_found(found: bool, id: &str) -> Self {
        if found {
            Self::ok()
        } else {
            Self::err(format!("No object with id {id}"))
        }
    }
}

fn outcome_response(key: &str, outcome: RestoreOutcome) -> CommandResponse {
    let restored = matches!(outcome, RestoreOutcome::Restored { .. });
    CommandResponse::ok_with_data(serde_json::json!({
        key: restored,
        "outcome": serde_json::to_value(outcome).unwrap_or_default(),
    }))
}

/// Execute a single command on the harness.
pub async fn execute_command(harness: &EditorHarness, cmd: EditorCommand) -> CommandResponse {
    match cmd {
        EditorCommand::AddText { text } => {
            let id = match text {
                Some(content) => harness.add_text_with(&content).await,
                None => harness.add_text().await,
            };
            match id {
                Some(id) => CommandResponse::ok_with_data(serde_json::json!({ "id": id })),
                None => CommandResponse::err("Scene is not ready"),
            }
        }

        EditorCommand::EditText { id, text } => {
            let edited = harness.edit_text(&id, &text).await;
            CommandResponse::from_found(edited, &id)
        }

        EditorCommand::MoveObject { id, x, y } => {
            let moved = harness.move_object(&id, x, y).await;
            CommandResponse::from_found(moved, &id)
        }

        EditorCommand::Remove { id } => {
            let removed = harness.remove(&id).await;
            CommandResponse::ok_with_data(serde_json::json!({ "removed": removed }))
        }

        EditorCommand::Format { change } => {
            let applied = harness.format(change).await;
            CommandResponse::ok_with_data(serde_json::json!({
                "applied": applied,
                "formatting": harness.editor.formatting(),
            }))
        }

        EditorCommand::Select { id } => {
            let selected = harness.select(&id);
            CommandResponse::from_found(selected, &id)
        }

        EditorCommand::ClearSelection => {
            harness.clear_selection();
            CommandResponse::ok()
        }

        EditorCommand::Undo => outcome_response("undone", harness.undo().await),

        EditorCommand::Redo => outcome_response("redone", harness.redo().await),

        EditorCommand::Key { chord, text_focused } => {
            let outcome = harness.editor.handle_key(&chord, text_focused).await;
            harness.settle().await;
            CommandResponse::ok_with_data(serde_json::json!({
                "handled": outcome.is_some(),
                "outcome": outcome,
            }))
        }

        EditorCommand::Viewport {
            container_width,
            window_height,
        } => {
            harness
                .viewport(Viewport::new(container_width, window_height))
                .await;
            let dims = harness.scene.dimensions();
            CommandResponse::ok_with_data(serde_json::json!({
                "width": dims.width,
                "height": dims.height,
            }))
        }

        EditorCommand::Inspect => {
            let document = harness.scene.document();
            let objects: Vec<serde_json::Value> = document
                .objects
                .iter()
                .map(|object| {
                    let (kind, text) = match &object.kind {
                        ObjectKind::Text { text, .. } => ("text", Some(text.as_str())),
                        ObjectKind::Rect { .. } => ("rect", None),
                    };
                    serde_json::json!({
                        "id": object.id,
                        "type": kind,
                        "text": text,
                        "left": object.left,
                        "top": object.top,
                    })
                })
                .collect();
            let dims = harness.scene.dimensions();
            CommandResponse::ok_with_data(serde_json::json!({
                "object_count": objects.len(),
                "objects": objects,
                "width": dims.width,
                "height": dims.height,
                "ui": harness.editor.ui_state(),
            }))
        }

        EditorCommand::ExportScene => {
            let json = harness.export_scene_json();
            CommandResponse::ok_with_data(serde_json::json!({ "scene_json": json }))
        }
    }
}

/// Parse and execute a single JSON command string.
pub async fn execute_json(harness: &EditorHarness, json: &str) -> Result<CommandResponse, String> {
    let cmd: EditorCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(harness, cmd).await)
}

/// Parse and execute multiple JSON commands (array).
pub async fn execute_json_batch(
    harness: &EditorHarness,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<EditorCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    let mut responses = Vec::with_capacity(cmds.len());
    for cmd in cmds {
        responses.push(execute_command(harness, cmd).await);
    }
    Ok(responses)
}
