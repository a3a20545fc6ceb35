//! Headless scene kept entirely in memory.
//!
//! Behaves like a browser canvas library as far as the history engine can
//! tell: notifications fire synchronously, `clear` discards the selection and
//! then removes every object, and a reload completes on a later turn of the
//! event loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use shared::{
    Bounds, Dimensions, FormatChange, ObjectId, ObjectKind, Point, SceneDocument, SceneObject,
    Snapshot, TextStyle,
};

use super::{Scene, SceneError, SceneEvent};

struct LiveObject {
    object: SceneObject,
    /// Hit-test box, refreshed whenever geometry changes
    coords: Bounds,
}

impl LiveObject {
    fn new(object: SceneObject) -> Self {
        let coords = object.bounds();
        Self { object, coords }
    }

    fn set_coords(&mut self) {
        self.coords = self.object.bounds();
    }
}

struct SceneData {
    dimensions: Dimensions,
    background: String,
    objects: Vec<LiveObject>,
    active: Option<ObjectId>,
    editing: Option<ObjectId>,
}

impl SceneData {
    fn find_mut(&mut self, id: &str) -> Option<&mut LiveObject> {
        self.objects.iter_mut().find(|o| o.object.id == id)
    }

    fn find(&self, id: &str) -> Option<&LiveObject> {
        self.objects.iter().find(|o| o.object.id == id)
    }
}

/// In-memory [`Scene`] used by the harness, the command protocol and tests
pub struct MemoryScene {
    data: RefCell<SceneData>,
    handlers: RefCell<Vec<Rc<dyn Fn(&SceneEvent)>>>,
    restore_delay: Cell<Option<Duration>>,
    fail_next_restore: Cell<bool>,
    render_count: Cell<u64>,
}

impl MemoryScene {
    pub fn new(dimensions: Dimensions, background: &str) -> Self {
        Self {
            data: RefCell::new(SceneData {
                dimensions,
                background: background.to_string(),
                objects: Vec::new(),
                active: None,
                editing: None,
            }),
            handlers: RefCell::new(Vec::new()),
            restore_delay: Cell::new(None),
            fail_next_restore: Cell::new(false),
            render_count: Cell::new(0),
        }
    }

    fn emit(&self, event: SceneEvent) {
        // Handlers may call back into the scene or subscribe more handlers.
        let handlers: Vec<_> = self.handlers.borrow().iter().cloned().collect();
        for handler in handlers {
            handler(&event);
        }
    }

    fn insert(&self, object: SceneObject) -> ObjectId {
        let id = object.id.clone();
        self.data.borrow_mut().objects.push(LiveObject::new(object));
        self.emit(SceneEvent::ObjectAdded(id.clone()));
        id
    }

    // ── User-level edits ──────────────────────────────────────

    /// Add any object, as a user drop or paste would
    pub fn add_object(&self, object: SceneObject) -> ObjectId {
        self.insert(object)
    }

    /// Add a rectangle and return its ID
    pub fn add_rect(&self, fill: &str, position: Point, width: f64, height: f64) -> ObjectId {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert(SceneObject::rect(id, fill, position, width, height))
    }

    /// Select an object, replacing any current selection
    pub fn select(&self, id: &str) -> bool {
        let previous = {
            let mut data = self.data.borrow_mut();
            if data.find(id).is_none() {
                return false;
            }
            if data.editing.as_deref() != Some(id) {
                data.editing = None;
            }
            data.active.replace(id.to_string())
        };
        let selected = vec![id.to_string()];
        match previous {
            Some(prev) if prev == id => {}
            Some(_) => self.emit(SceneEvent::SelectionUpdated(selected)),
            None => self.emit(SceneEvent::SelectionCreated(selected)),
        }
        true
    }

    /// Drop the current selection
    pub fn discard_selection(&self) {
        let had_selection = {
            let mut data = self.data.borrow_mut();
            data.editing = None;
            data.active.take().is_some()
        };
        if had_selection {
            self.emit(SceneEvent::SelectionCleared);
        }
    }

    /// Drag an object to a new position
    pub fn move_object(&self, id: &str, position: Point) -> bool {
        {
            let mut data = self.data.borrow_mut();
            let Some(live) = data.find_mut(id) else {
                return false;
            };
            live.object.left = position.x;
            live.object.top = position.y;
            live.set_coords();
        }
        self.emit(SceneEvent::ObjectModified(id.to_string()));
        true
    }

    /// Replace the content of a text object
    pub fn edit_text(&self, id: &str, content: &str) -> bool {
        {
            let mut data = self.data.borrow_mut();
            let Some(live) = data.find_mut(id) else {
                return false;
            };
            let ObjectKind::Text { text, .. } = &mut live.object.kind else {
                return false;
            };
            *text = content.to_string();
            live.object.refresh_extent();
            live.set_coords();
        }
        self.emit(SceneEvent::ObjectModified(id.to_string()));
        true
    }

    /// Delete an object
    pub fn remove(&self, id: &str) -> bool {
        let was_active = {
            let data = self.data.borrow();
            if data.find(id).is_none() {
                return false;
            }
            data.active.as_deref() == Some(id)
        };
        if was_active {
            self.discard_selection();
        }
        self.data.borrow_mut().objects.retain(|o| o.object.id != id);
        self.emit(SceneEvent::ObjectRemoved(id.to_string()));
        true
    }

    // ── Inspection ────────────────────────────────────────────

    /// Topmost object under a point
    pub fn hit_test(&self, point: Point) -> Option<ObjectId> {
        self.data
            .borrow()
            .objects
            .iter()
            .rev()
            .find(|o| o.coords.contains(point))
            .map(|o| o.object.id.clone())
    }

    pub fn object(&self, id: &str) -> Option<SceneObject> {
        self.data.borrow().find(id).map(|o| o.object.clone())
    }

    pub fn coords(&self, id: &str) -> Option<Bounds> {
        self.data.borrow().find(id).map(|o| o.coords)
    }

    pub fn object_count(&self) -> usize {
        self.data.borrow().objects.len()
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.data.borrow().editing.as_deref() == Some(id)
    }

    pub fn document(&self) -> SceneDocument {
        let data = self.data.borrow();
        SceneDocument {
            background: data.background.clone(),
            objects: data.objects.iter().map(|o| o.object.clone()).collect(),
            ..SceneDocument::default()
        }
    }

    pub fn render_count(&self) -> u64 {
        self.render_count.get()
    }

    // ── Reload behaviour ──────────────────────────────────────

    /// Make every reload take this long before completing
    pub fn set_restore_delay(&self, delay: Option<Duration>) {
        self.restore_delay.set(delay);
    }

    /// Make the next reload report failure
    pub fn fail_next_restore(&self) {
        self.fail_next_restore.set(true);
    }
}

impl Scene for MemoryScene {
    fn serialize(&self) -> Snapshot {
        self.document().to_snapshot()
    }

    async fn restore(&self, snapshot: &Snapshot) -> Result<(), SceneError> {
        let document = SceneDocument::from_snapshot(snapshot)
            .map_err(|e| SceneError::RestoreFailed(e.to_string()))?;

        // Fonts and images load asynchronously; completion is never inline.
        match self.restore_delay.get() {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        if self.fail_next_restore.replace(false) {
            return Err(SceneError::RestoreFailed("resource failed to load".to_string()));
        }

        self.clear();
        self.data.borrow_mut().background = document.background;
        for object in document.objects {
            self.insert(object);
        }
        Ok(())
    }

    fn clear(&self) {
        self.discard_selection();
        let removed: Vec<ObjectId> = self
            .data
            .borrow_mut()
            .objects
            .drain(..)
            .map(|o| o.object.id)
            .collect();
        for id in removed {
            self.emit(SceneEvent::ObjectRemoved(id));
        }
    }

    fn render(&self) {
        self.render_count.set(self.render_count.get() + 1);
    }

    fn dimensions(&self) -> Dimensions {
        self.data.borrow().dimensions
    }

    fn resize(&self, dimensions: Dimensions) {
        self.data.borrow_mut().dimensions = dimensions;
    }

    fn objects(&self) -> Vec<ObjectId> {
        self.data
            .borrow()
            .objects
            .iter()
            .map(|o| o.object.id.clone())
            .collect()
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.data.borrow().active.clone()
    }

    fn text_style(&self, id: &str) -> Option<TextStyle> {
        self.data.borrow().find(id)?.object.text_style().cloned()
    }

    fn rescale_object(&self, id: &str, scale_x: f64, scale_y: f64) {
        if let Some(live) = self.data.borrow_mut().find_mut(id) {
            live.object.rescale(scale_x, scale_y);
            live.set_coords();
        }
    }

    fn add_text(&self, text: &str, style: &TextStyle, position: Point) -> ObjectId {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert(SceneObject::text(id.clone(), text, style.clone(), position));
        self.select(&id);
        self.data.borrow_mut().editing = Some(id.clone());
        id
    }

    fn set_text_property(&self, id: &str, change: &FormatChange) -> bool {
        let mut data = self.data.borrow_mut();
        let Some(live) = data.find_mut(id) else {
            return false;
        };
        let Some(style) = live.object.text_style_mut() else {
            return false;
        };
        style.apply(change);
        live.object.refresh_extent();
        live.set_coords();
        true
    }

    fn subscribe(&self, handler: Box<dyn Fn(&SceneEvent)>) {
        self.handlers.borrow_mut().push(Rc::from(handler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{FontStyle, FontWeight};

    fn style() -> TextStyle {
        TextStyle {
            font_size: 20,
            font_family: "Arial".into(),
            fill: "#000000".into(),
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            underline: false,
        }
    }

    fn recording(scene: &MemoryScene) -> Rc<RefCell<Vec<SceneEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        scene.subscribe(Box::new(move |e: &SceneEvent| sink.borrow_mut().push(e.clone())));
        log
    }

    fn scene() -> MemoryScene {
        MemoryScene::new(Dimensions::new(800.0, 450.0), "#ffffff")
    }

    #[test]
    fn test_add_text_selects_and_edits() {
        let s = scene();
        let log = recording(&s);
        let id = s.add_text("hello", &style(), Point::new(100.0, 100.0));

        assert_eq!(s.active_object().as_deref(), Some(id.as_str()));
        assert!(s.is_editing(&id));
        assert_eq!(
            *log.borrow(),
            vec![
                SceneEvent::ObjectAdded(id.clone()),
                SceneEvent::SelectionCreated(vec![id.clone()]),
            ]
        );
    }

    #[test]
    fn test_select_updates_existing_selection() {
        let s = scene();
        let a = s.add_rect("#ff0000", Point::new(0.0, 0.0), 10.0, 10.0);
        let b = s.add_rect("#00ff00", Point::new(20.0, 0.0), 10.0, 10.0);
        let log = recording(&s);

        assert!(s.select(&a));
        assert!(s.select(&b));
        assert!(!s.select("missing"));
        assert_eq!(
            *log.borrow(),
            vec![
                SceneEvent::SelectionCreated(vec![a]),
                SceneEvent::SelectionUpdated(vec![b]),
            ]
        );
    }

    #[test]
    fn test_clear_discards_selection_then_removes() {
        let s = scene();
        let a = s.add_text("a", &style(), Point::new(50.0, 50.0));
        let log = recording(&s);

        s.clear();
        assert_eq!(s.object_count(), 0);
        assert_eq!(s.active_object(), None);
        assert_eq!(
            *log.borrow(),
            vec![SceneEvent::SelectionCleared, SceneEvent::ObjectRemoved(a)]
        );
    }

    #[test]
    fn test_text_style_only_for_text() {
        let s = scene();
        let t = s.add_text("a", &style(), Point::new(50.0, 50.0));
        let r = s.add_rect("#ff0000", Point::new(0.0, 0.0), 10.0, 10.0);
        assert!(s.text_style(&t).is_some());
        assert!(s.text_style(&r).is_none());
        assert!(!s.set_text_property(&r, &FormatChange::Underline(true)));
    }

    #[test]
    fn test_rescale_updates_hit_test() {
        let s = scene();
        let r = s.add_rect("#ff0000", Point::new(10.0, 10.0), 10.0, 10.0);
        assert_eq!(s.hit_test(Point::new(15.0, 15.0)).as_deref(), Some(r.as_str()));

        s.rescale_object(&r, 2.0, 2.0);
        assert_eq!(s.hit_test(Point::new(15.0, 15.0)), None);
        assert_eq!(s.hit_test(Point::new(35.0, 35.0)).as_deref(), Some(r.as_str()));
    }

    #[test]
    fn test_remove_active_object() {
        let s = scene();
        let t = s.add_text("a", &style(), Point::new(50.0, 50.0));
        let log = recording(&s);
        assert!(s.remove(&t));
        assert_eq!(
            *log.borrow(),
            vec![SceneEvent::SelectionCleared, SceneEvent::ObjectRemoved(t)]
        );
    }

    #[tokio::test]
    async fn test_restore_repopulates_with_events() {
        let s = scene();
        let a = s.add_text("a", &style(), Point::new(50.0, 50.0));
        let snap = s.serialize();
        s.clear();
        let log = recording(&s);

        s.restore(&snap).await.unwrap();
        assert_eq!(s.objects(), vec![a.clone()]);
        assert_eq!(s.active_object(), None);
        assert_eq!(*log.borrow(), vec![SceneEvent::ObjectAdded(a)]);
    }

    #[tokio::test]
    async fn test_restore_failures() {
        let s = scene();
        assert!(matches!(
            s.restore(&Snapshot::from("garbage")).await,
            Err(SceneError::RestoreFailed(_))
        ));

        let snap = s.serialize();
        s.fail_next_restore();
        assert!(s.restore(&snap).await.is_err());
        assert!(s.restore(&snap).await.is_ok());
    }
}
