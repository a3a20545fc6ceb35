//! Browser bridge: the snapshot store and toolbar rules for the JS canvas.
//!
//! The page owns the canvas library; it serializes the canvas itself and
//! hands the JSON to [`CanvasHistory`]. Guard flags and event wiring stay on
//! the JS side.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{Dimensions, Snapshot, Viewport};
use textcanvas_editor::shortcuts::{KeyChord, Shortcut};
use textcanvas_editor::state::{EditorSettings, FormattingState, SnapshotStore};

/// Initialize WASM module with panic hook and logging
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    tracing::info!("textcanvas history bridge initialized");
}

/// Undo/redo history of canvas JSON snapshots
#[wasm_bindgen]
pub struct CanvasHistory {
    store: SnapshotStore,
}

#[wasm_bindgen]
impl CanvasHistory {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            store: SnapshotStore::new(),
        }
    }

    /// Record the canvas state; drops anything that could have been redone
    pub fn push(&mut self, canvas_json: &str) {
        self.store.push(Snapshot::from(canvas_json));
    }

    /// Snapshot under the cursor
    pub fn current(&self) -> Option<String> {
        self.store.current().ok().map(|s| s.as_str().to_string())
    }

    #[wasm_bindgen(js_name = canUndo)]
    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    #[wasm_bindgen(js_name = canRedo)]
    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Snapshot an undo would load, without moving
    #[wasm_bindgen(js_name = peekBack)]
    pub fn peek_back(&self) -> Option<String> {
        self.store.previous().map(|s| s.as_str().to_string())
    }

    /// Snapshot a redo would load, without moving
    #[wasm_bindgen(js_name = peekForward)]
    pub fn peek_forward(&self) -> Option<String> {
        self.store.next().map(|s| s.as_str().to_string())
    }

    /// Call once the canvas finished loading `peekBack()`
    #[wasm_bindgen(js_name = moveBack)]
    pub fn move_back(&mut self) -> Result<u32, JsError> {
        let cursor = self.store.move_back().map_err(|e| JsError::new(&e.to_string()))?;
        Ok(cursor as u32)
    }

    /// Call once the canvas finished loading `peekForward()`
    #[wasm_bindgen(js_name = moveForward)]
    pub fn move_forward(&mut self) -> Result<u32, JsError> {
        let cursor = self
            .store
            .move_forward()
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(cursor as u32)
    }

    /// Replace the entry under the cursor after a viewport rescale
    #[wasm_bindgen(js_name = overwriteCurrent)]
    pub fn overwrite_current(&mut self, canvas_json: &str) -> Result<(), JsError> {
        self.store
            .overwrite_current(Snapshot::from(canvas_json))
            .map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> u32 {
        self.store.len() as u32
    }

    /// Cursor index, -1 while empty
    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> i32 {
        self.store.cursor().map_or(-1, |c| c as i32)
    }
}

impl Default for CanvasHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// "undo", "redo" or undefined for a key press
#[wasm_bindgen(js_name = shortcutFor)]
pub fn shortcut_for(key: &str, ctrl: bool, shift: bool) -> Option<String> {
    Shortcut::from_chord(&KeyChord::new(key, ctrl, shift)).map(|s| match s {
        Shortcut::Undo => "undo".to_string(),
        Shortcut::Redo => "redo".to_string(),
    })
}

/// Canvas size for the current container width and window height
#[wasm_bindgen(js_name = fitCanvas)]
pub fn fit_canvas(container_width: f64, window_height: f64) -> Vec<f64> {
    let dims = EditorSettings::default()
        .canvas
        .fit(Viewport::new(container_width, window_height));
    vec![dims.width, dims.height]
}

/// True when a resize from `(width, height)` to the fitted size is large
/// enough to rescale the canvas
#[wasm_bindgen(js_name = needsRescale)]
pub fn needs_rescale(width: f64, height: f64, container_width: f64, window_height: f64) -> bool {
    let settings = EditorSettings::default();
    let target = settings.canvas.fit(Viewport::new(container_width, window_height));
    !Dimensions::new(width, height).within_tolerance(&target, settings.resize.tolerance)
}

/// Font size after pressing the larger or smaller size button
#[wasm_bindgen(js_name = stepFontSize)]
pub fn step_font_size(current: u32, larger: bool) -> u32 {
    let settings = EditorSettings::default().formatting;
    let state = FormattingState {
        font_size: current,
        ..FormattingState::from_settings(&settings)
    };
    let change = if larger {
        state.larger_size(&settings)
    } else {
        state.smaller_size(&settings)
    };
    match change {
        shared::FormatChange::FontSize(size) => size,
        _ => current,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolbarDefaults {
    formatting: FormattingState,
    font_families: Vec<String>,
    min_size: u32,
    max_size: u32,
}

/// Initial toolbar values and the font picker list
#[wasm_bindgen(js_name = defaultFormatting)]
pub fn default_formatting() -> Result<JsValue, JsValue> {
    let settings = EditorSettings::default().formatting;
    let defaults = ToolbarDefaults {
        formatting: FormattingState::from_settings(&settings),
        font_families: settings.font_families.clone(),
        min_size: settings.min_size,
        max_size: settings.max_size,
    };
    serde_wasm_bindgen::to_value(&defaults)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_bridge() {
        let mut h = CanvasHistory::new();
        assert_eq!(h.cursor(), -1);
        assert_eq!(h.current(), None);

        h.push(r#"{"objects":[]}"#);
        h.push(r#"{"objects":[1]}"#);
        assert_eq!(h.length(), 2);
        assert!(h.can_undo());
        assert_eq!(h.peek_back().as_deref(), Some(r#"{"objects":[]}"#));
        assert_eq!(h.move_back().ok(), Some(0));
        assert!(h.can_redo());

        assert!(h.overwrite_current(r#"{"objects":[],"scaled":true}"#).is_ok());
        assert_eq!(h.length(), 2);
        assert_eq!(h.peek_forward().as_deref(), Some(r#"{"objects":[1]}"#));
    }

    #[test]
    fn test_shortcut_for() {
        assert_eq!(shortcut_for("z", true, false).as_deref(), Some("undo"));
        assert_eq!(shortcut_for("Z", true, true).as_deref(), Some("redo"));
        assert_eq!(shortcut_for("y", true, false).as_deref(), Some("redo"));
        assert_eq!(shortcut_for("z", false, false), None);
    }

    #[test]
    fn test_toolbar_rules() {
        assert_eq!(step_font_size(20, true), 22);
        assert_eq!(step_font_size(72, true), 72);
        assert_eq!(step_font_size(9, false), 8);
        assert_eq!(fit_canvas(1200.0, 1000.0), vec![1200.0, 450.0]);
        assert!(!needs_rescale(1200.0, 450.0, 1203.0, 1000.0));
        assert!(needs_rescale(800.0, 450.0, 1200.0, 1000.0));
    }
}
