use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod document;
pub mod style;

pub use document::{Bounds, DocumentError, ObjectKind, SceneDocument, SceneObject};
pub use style::{FontStyle, FontWeight, FormatChange, TextStyle};

/// Unique identifier of an object on the scene
pub type ObjectId = String;

/// Opaque serialized scene state at one instant.
///
/// Snapshots are produced by the scene and never edited afterwards; cloning
/// shares the underlying text.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Arc<str>);

impl Snapshot {
    pub fn new(json: impl Into<Arc<str>>) -> Self {
        Self(json.into())
    }

    /// Raw serialized form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Size of the serialized form in bytes
    pub fn byte_len(&self) -> usize {
        self.0.len()
    }
}

impl From<String> for Snapshot {
    fn from(json: String) -> Self {
        Self::new(json)
    }
}

impl From<&str> for Snapshot {
    fn from(json: &str) -> Self {
        Self::new(json)
    }
}

// Snapshots can be large; keep debug output to a short prefix.
impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 48;
        let text = self.as_str();
        match text.char_indices().nth(PREVIEW) {
            Some((cut, _)) => write!(f, "Snapshot({:?}.. {} bytes)", &text[..cut], text.len()),
            None => write!(f, "Snapshot({text:?})"),
        }
    }
}

/// Size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both sides differ from `other` by less than `tolerance`
    pub fn within_tolerance(&self, other: &Dimensions, tolerance: f64) -> bool {
        (self.width - other.width).abs() < tolerance && (self.height - other.height).abs() < tolerance
    }

    /// Per-axis factors that map `self` onto `target`
    pub fn scale_to(&self, target: &Dimensions) -> Option<(f64, f64)> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some((target.width / self.width, target.height / self.height))
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Size of the area hosting the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width of the element containing the surface
    pub container_width: f64,
    /// Height of the browser window
    pub window_height: f64,
}

impl Viewport {
    pub fn new(container_width: f64, window_height: f64) -> Self {
        Self {
            container_width,
            window_height,
        }
    }
}

/// Point in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_serializes_as_plain_string() {
        let snap = Snapshot::from(r#"{"objects":[]}"#);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#""{\"objects\":[]}""#);
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_snapshot_clone_shares_text() {
        let snap = Snapshot::from("abc".to_string());
        let other = snap.clone();
        assert!(std::ptr::eq(snap.as_str(), other.as_str()));
    }

    #[test]
    fn test_snapshot_debug_is_truncated() {
        let long = "x".repeat(500);
        let dbg = format!("{:?}", Snapshot::from(long.as_str()));
        assert!(dbg.len() < 100);
        assert!(dbg.contains("500 bytes"));
    }

    #[test]
    fn test_dimensions_tolerance() {
        let a = Dimensions::new(800.0, 450.0);
        assert!(a.within_tolerance(&Dimensions::new(804.9, 446.0), 5.0));
        assert!(!a.within_tolerance(&Dimensions::new(805.0, 450.0), 5.0));
        assert!(!a.within_tolerance(&Dimensions::new(800.0, 440.0), 5.0));
    }

    #[test]
    fn test_dimensions_scale_to() {
        let a = Dimensions::new(800.0, 400.0);
        assert_eq!(a.scale_to(&Dimensions::new(400.0, 600.0)), Some((0.5, 1.5)));
        assert_eq!(Dimensions::new(0.0, 400.0).scale_to(&a), None);
    }
}
