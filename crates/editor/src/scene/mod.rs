//! The drawing surface the history engine works against.
//!
//! The scene owns object geometry, styling and rendering. The engine only
//! serializes it, reloads it, rescales it and listens to its notifications.

mod memory;

pub use memory::MemoryScene;

use shared::{Dimensions, FormatChange, ObjectId, Point, Snapshot, TextStyle};

/// Notification emitted by a scene
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    ObjectAdded(ObjectId),
    ObjectRemoved(ObjectId),
    ObjectModified(ObjectId),
    /// Selection made where there was none
    SelectionCreated(Vec<ObjectId>),
    /// Selection replaced by another one
    SelectionUpdated(Vec<ObjectId>),
    SelectionCleared,
}

impl SceneEvent {
    /// Added, removed or modified: the scene content changed
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            SceneEvent::ObjectAdded(_) | SceneEvent::ObjectRemoved(_) | SceneEvent::ObjectModified(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("scene reload failed: {0}")]
    RestoreFailed(String),
}

/// Scene collaborator contract.
///
/// Scenes live on the editor's single thread and are shared by reference, so
/// every method takes `&self`. Handlers passed to [`Scene::subscribe`] are
/// invoked synchronously while the scene mutates; a scene must not hold
/// internal borrows while calling them. `resize`, `rescale_object`,
/// `set_text_property` and `render` do not emit notifications.
#[allow(async_fn_in_trait)]
pub trait Scene {
    /// Serialize every object plus canvas metadata
    fn serialize(&self) -> Snapshot;

    /// Reload the scene from a snapshot. Completion may wait on
    /// sub-resources such as fonts.
    async fn restore(&self, snapshot: &Snapshot) -> Result<(), SceneError>;

    /// Remove every object
    fn clear(&self);

    fn render(&self);

    fn dimensions(&self) -> Dimensions;

    fn resize(&self, dimensions: Dimensions);

    /// Ids of all objects, back to front
    fn objects(&self) -> Vec<ObjectId>;

    fn active_object(&self) -> Option<ObjectId>;

    /// Style of a text-capable object; `None` for other kinds or unknown ids
    fn text_style(&self, id: &str) -> Option<TextStyle>;

    /// Multiply scale and position by the factors and recompute hit-test
    /// geometry
    fn rescale_object(&self, id: &str, scale_x: f64, scale_y: f64);

    /// Add an editable text object, select it and enter editing
    fn add_text(&self, text: &str, style: &TextStyle, position: Point) -> ObjectId;

    /// Set one style property; false if the object is gone or not text
    fn set_text_property(&self, id: &str, change: &FormatChange) -> bool;

    fn subscribe(&self, handler: Box<dyn Fn(&SceneEvent)>);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_content_changes_are_mutations() {
        let id = "a".to_string();
        assert!(SceneEvent::ObjectAdded(id.clone()).is_mutation());
        assert!(SceneEvent::ObjectRemoved(id.clone()).is_mutation());
        assert!(SceneEvent::ObjectModified(id.clone()).is_mutation());
        assert!(!SceneEvent::SelectionCreated(vec![id.clone()]).is_mutation());
        assert!(!SceneEvent::SelectionUpdated(vec![id]).is_mutation());
        assert!(!SceneEvent::SelectionCleared.is_mutation());
    }
}
