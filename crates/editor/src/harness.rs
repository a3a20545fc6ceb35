//! Headless harness: an [`Editor`] wired to an in-memory scene.
//!
//! Every async method lets deferred work (captures, debounced resizes) run
//! before returning, so callers observe settled state. Must run inside a
//! [`tokio::task::LocalSet`].

use std::rc::Rc;
use std::time::Duration;

use shared::{FormatChange, ObjectId, Point, Viewport};

use crate::editor::{Editor, RestoreOutcome};
use crate::scene::{MemoryScene, Scene};
use crate::state::EditorSettings;

/// Turns of the event loop needed for chained deferred work to drain
const SETTLE_TURNS: usize = 4;

/// Headless editor session
pub struct EditorHarness {
    pub editor: Editor<MemoryScene>,
    pub scene: Rc<MemoryScene>,
}

impl EditorHarness {
    /// Editor over an empty scene sized for a 1000x800 window
    pub fn new() -> Self {
        Self::with_settings(EditorSettings::default())
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let dimensions = settings.canvas.fit(Viewport::new(1000.0, 800.0));
        let scene = Rc::new(MemoryScene::new(dimensions, &settings.canvas.background));
        let editor = Editor::new(settings);
        editor.attach(Rc::clone(&scene));
        Self { editor, scene }
    }

    /// Let pending deferred work run
    pub async fn settle(&self) {
        for _ in 0..SETTLE_TURNS {
            tokio::task::yield_now().await;
        }
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Add placeholder text through the editor, as the toolbar button does
    pub async fn add_text(&self) -> Option<ObjectId> {
        let id = self.editor.add_text();
        self.settle().await;
        id
    }

    /// Add text with explicit content
    pub async fn add_text_with(&self, content: &str) -> Option<ObjectId> {
        let id = self.editor.add_text()?;
        self.scene.edit_text(&id, content);
        self.settle().await;
        Some(id)
    }

    pub async fn add_rect(&self, fill: &str, x: f64, y: f64) -> ObjectId {
        let id = self.scene.add_rect(fill, Point::new(x, y), 40.0, 40.0);
        self.settle().await;
        id
    }

    pub async fn edit_text(&self, id: &str, content: &str) -> bool {
        let edited = self.scene.edit_text(id, content);
        self.settle().await;
        edited
    }

    pub async fn move_object(&self, id: &str, x: f64, y: f64) -> bool {
        let moved = self.scene.move_object(id, Point::new(x, y));
        self.settle().await;
        moved
    }

    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.scene.remove(id);
        self.settle().await;
        removed
    }

    /// Apply a toolbar change to the active object
    pub async fn format(&self, change: FormatChange) -> bool {
        let applied = self.editor.apply_format(change);
        self.settle().await;
        applied
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn select(&self, id: &str) -> bool {
        self.scene.select(id)
    }

    pub fn clear_selection(&self) {
        self.scene.discard_selection();
    }

    // ── History ───────────────────────────────────────────────

    pub async fn undo(&self) -> RestoreOutcome {
        let outcome = self.editor.undo().await;
        self.settle().await;
        outcome
    }

    pub async fn redo(&self) -> RestoreOutcome {
        let outcome = self.editor.redo().await;
        self.settle().await;
        outcome
    }

    /// Report a viewport change and wait out the debounce
    pub async fn viewport(&self, viewport: Viewport) {
        self.editor.notify_viewport(viewport);
        let wait = self.editor.settings().resize.debounce() + Duration::from_millis(1);
        tokio::time::sleep(wait).await;
        self.settle().await;
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn object_count(&self) -> usize {
        self.scene.object_count()
    }

    pub fn history_len(&self) -> usize {
        self.editor.history_len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.editor.cursor()
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        serde_json::to_string_pretty(&self.scene.document()).unwrap_or_default()
    }

    /// The scene as it would be captured now
    pub fn snapshot(&self) -> shared::Snapshot {
        self.scene.serialize()
    }
}

impl Default for EditorHarness {
    fn default() -> Self {
        Self::new()
    }
}
