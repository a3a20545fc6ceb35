//! Serialized scene document: the format behind every history snapshot

use serde::{Deserialize, Serialize};

use crate::{ObjectId, Point, Snapshot, TextStyle};

/// Average glyph advance relative to the font size
const GLYPH_ADVANCE: f64 = 0.6;
/// Line height relative to the font size
const LINE_HEIGHT: f64 = 1.16;

fn default_version() -> u32 {
    1
}

fn default_scale() -> f64 {
    1.0
}

fn default_background() -> String {
    "#ffffff".to_string()
}

/// Errors while reading a document back from a snapshot
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("malformed scene snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unsupported scene format version {0}")]
    UnsupportedVersion(u32),
}

/// Anchor of an object's position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    TopLeft,
    Center,
}

/// What an object draws
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectKind {
    /// Editable text
    Text { text: String, style: TextStyle },
    /// Plain filled rectangle
    Rect { fill: String },
}

/// Axis-aligned hit-test box in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Bounds {
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}

/// One object on the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
    pub left: f64,
    pub top: f64,
    /// Unscaled width
    pub width: f64,
    /// Unscaled height
    pub height: f64,
    #[serde(default = "default_scale")]
    pub scale_x: f64,
    #[serde(default = "default_scale")]
    pub scale_y: f64,
    #[serde(default)]
    pub origin: Origin,
}

impl SceneObject {
    /// Text object sized from its content and style
    pub fn text(id: ObjectId, text: &str, style: TextStyle, position: Point) -> Self {
        let (width, height) = text_extent(text, style.font_size);
        Self {
            id,
            kind: ObjectKind::Text {
                text: text.to_string(),
                style,
            },
            left: position.x,
            top: position.y,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            origin: Origin::Center,
        }
    }

    /// Rectangle anchored at its top-left corner
    pub fn rect(id: ObjectId, fill: &str, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            kind: ObjectKind::Rect {
                fill: fill.to_string(),
            },
            left: position.x,
            top: position.y,
            width,
            height,
            scale_x: 1.0,
            scale_y: 1.0,
            origin: Origin::TopLeft,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Text { .. })
    }

    pub fn text_style(&self) -> Option<&TextStyle> {
        match &self.kind {
            ObjectKind::Text { style, .. } => Some(style),
            ObjectKind::Rect { .. } => None,
        }
    }

    pub fn text_style_mut(&mut self) -> Option<&mut TextStyle> {
        match &mut self.kind {
            ObjectKind::Text { style, .. } => Some(style),
            ObjectKind::Rect { .. } => None,
        }
    }

    /// Recompute the unscaled size of a text object after a style change
    pub fn refresh_extent(&mut self) {
        if let ObjectKind::Text { text, style } = &self.kind {
            let (width, height) = text_extent(text, style.font_size);
            self.width = width;
            self.height = height;
        }
    }

    /// Multiply scale and position by the given per-axis factors
    pub fn rescale(&mut self, scale_x: f64, scale_y: f64) {
        self.scale_x *= scale_x;
        self.scale_y *= scale_y;
        self.left *= scale_x;
        self.top *= scale_y;
    }

    /// Hit-test box for the current position, size and scale
    pub fn bounds(&self) -> Bounds {
        let w = self.width * self.scale_x;
        let h = self.height * self.scale_y;
        let (left, top) = match self.origin {
            Origin::TopLeft => (self.left, self.top),
            Origin::Center => (self.left - w / 2.0, self.top - h / 2.0),
        };
        Bounds {
            left,
            top,
            right: left + w,
            bottom: top + h,
        }
    }
}

fn text_extent(text: &str, font_size: u32) -> (f64, f64) {
    let size = f64::from(font_size);
    let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let lines = text.lines().count().max(1);
    (
        longest as f64 * size * GLYPH_ADVANCE,
        lines as f64 * size * LINE_HEIGHT,
    )
}

/// Full scene content: canvas metadata plus every object, back to front
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Default for SceneDocument {
    fn default() -> Self {
        Self {
            version: default_version(),
            background: default_background(),
            objects: Vec::new(),
        }
    }
}

impl SceneDocument {
    pub fn to_snapshot(&self) -> Snapshot {
        // Plain data with string keys; serialization cannot fail.
        Snapshot::new(serde_json::to_string(self).unwrap_or_default())
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, DocumentError> {
        let document: SceneDocument = serde_json::from_str(snapshot.as_str())?;
        if document.version != default_version() {
            return Err(DocumentError::UnsupportedVersion(document.version));
        }
        Ok(document)
    }

    pub fn object(&self, id: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FontStyle, FontWeight};

    fn style(size: u32) -> TextStyle {
        TextStyle {
            font_size: size,
            font_family: "Arial".into(),
            fill: "#000000".into(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            underline: false,
        }
    }

    #[test]
    fn test_text_object_is_centered() {
        let obj = SceneObject::text("t".into(), "abcd", style(10), Point::new(100.0, 50.0));
        let b = obj.bounds();
        assert!((b.left - 88.0).abs() < 1e-9);
        assert!((b.right - 112.0).abs() < 1e-9);
        assert!(b.contains(Point::new(100.0, 50.0)));
        assert!(!b.contains(Point::new(150.0, 50.0)));
    }

    #[test]
    fn test_rescale_moves_and_scales() {
        let mut obj = SceneObject::rect("r".into(), "#00ff00", Point::new(10.0, 20.0), 5.0, 5.0);
        obj.rescale(2.0, 0.5);
        assert_eq!((obj.left, obj.top), (20.0, 10.0));
        assert_eq!((obj.scale_x, obj.scale_y), (2.0, 0.5));
        let b = obj.bounds();
        assert_eq!((b.right, b.bottom), (30.0, 12.5));
    }

    #[test]
    fn test_refresh_extent_tracks_font_size() {
        let mut obj = SceneObject::text("t".into(), "ab", style(10), Point::default());
        let before = obj.width;
        if let Some(s) = obj.text_style_mut() {
            s.font_size = 20;
        }
        obj.refresh_extent();
        assert!((obj.width - before * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_document_snapshot_roundtrip() {
        let doc = SceneDocument {
            objects: vec![SceneObject::text("a".into(), "hi", style(20), Point::new(1.0, 2.0))],
            ..SceneDocument::default()
        };
        let back = SceneDocument::from_snapshot(&doc.to_snapshot()).unwrap();
        assert_eq!(back, doc);
        assert!(back.object("a").is_some_and(SceneObject::is_text));
    }

    #[test]
    fn test_document_rejects_unknown_version() {
        let snap = Snapshot::from(r#"{"version":7,"objects":[]}"#);
        assert!(matches!(
            SceneDocument::from_snapshot(&snap),
            Err(DocumentError::UnsupportedVersion(7))
        ));
        assert!(matches!(
            SceneDocument::from_snapshot(&Snapshot::from("nope")),
            Err(DocumentError::Malformed(_))
        ));
    }
}
