//! Factory functions for creating test data.
//!
//! Builds `TextStyle`, `SceneObject` and `SceneDocument` values for tests and
//! for command scripts that seed a scene.

use shared::*;

use crate::state::FormattingSettings;

// ── Styles ──────────────────────────────────────────────────────

/// Default toolbar style at the given size.
pub fn text_style(font_size: u32) -> TextStyle {
    let defaults = FormattingSettings::default();
    TextStyle {
        font_size,
        font_family: defaults.default_family,
        fill: defaults.default_color,
        font_weight: FontWeight::Normal,
        font_style: FontStyle::Normal,
        underline: false,
    }
}

/// Bold red style, easy to tell apart from the default.
pub fn highlight_style() -> TextStyle {
    TextStyle {
        fill: "#ff0000".to_string(),
        font_weight: FontWeight::Bold,
        ..text_style(32)
    }
}

// ── Objects ─────────────────────────────────────────────────────

/// Text object centered at `(x, y)` in the default style.
pub fn text_object(id: &str, text: &str, x: f64, y: f64) -> SceneObject {
    SceneObject::text(id.to_string(), text, text_style(20), Point::new(x, y))
}

/// 10x10 rectangle with its top-left corner at `(x, y)`.
pub fn rect_object(id: &str, x: f64, y: f64) -> SceneObject {
    SceneObject::rect(id.to_string(), "#3366ff", Point::new(x, y), 10.0, 10.0)
}

// ── Documents ───────────────────────────────────────────────────

/// White-background document holding the given objects.
pub fn document(objects: Vec<SceneObject>) -> SceneDocument {
    SceneDocument {
        objects,
        ..SceneDocument::default()
    }
}

/// Snapshot of a document holding the given objects.
pub fn snapshot_of(objects: Vec<SceneObject>) -> Snapshot {
    document(objects).to_snapshot()
}

/// Two text lines and a rectangle.
pub fn sample_document() -> SceneDocument {
    document(vec![
        text_object("title", "Hello", 400.0, 100.0),
        SceneObject::text(
            "subtitle".to_string(),
            "World",
            highlight_style(),
            Point::new(400.0, 200.0),
        ),
        rect_object("box", 50.0, 300.0),
    ])
}
