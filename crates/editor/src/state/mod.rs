pub mod formatting;
pub mod history;
pub mod settings;

use serde::Serialize;
use shared::ObjectId;

pub use formatting::FormattingState;
pub use history::{Direction, SnapshotStore};
pub use settings::{CanvasSettings, EditorSettings, FormattingSettings, ResizeSettings, TextSettings};

/// Flags marking engine-internal scene mutations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Guards {
    /// An undo/redo reload is in flight
    pub restoring: bool,
    /// A viewport rescale is in flight
    pub resizing: bool,
}

impl Guards {
    /// Scene notifications observed now are side effects, not user edits
    pub fn suppresses_capture(&self) -> bool {
        self.restoring || self.resizing
    }
}

/// Non-fatal problem reported to the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    RestoreFailed { message: String },
}

/// History engine state shared by the capture, restore and resize paths
#[derive(Debug, Default)]
pub struct EditorState {
    pub history: SnapshotStore,
    pub guards: Guards,
    /// Selected text object, by id only
    pub active_object: Option<ObjectId>,
    pub formatting: FormattingState,
    /// Undo/redo requested while another one was in flight
    pub pending_restore: Option<Direction>,
    pub notice: Option<Notice>,
}

impl EditorState {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            formatting: FormattingState::from_settings(&settings.formatting),
            ..Self::default()
        }
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
            history_len: self.history.len(),
            cursor: self.history.cursor(),
            restoring: self.guards.restoring,
            active_object: self.active_object.clone(),
            formatting: self.formatting.clone(),
            notice: self.notice.clone(),
        }
    }
}

/// Everything the toolbar and header render
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UiState {
    pub can_undo: bool,
    pub can_redo: bool,
    pub history_len: usize,
    pub cursor: Option<usize>,
    pub restoring: bool,
    pub active_object: Option<ObjectId>,
    pub formatting: FormattingState,
    pub notice: Option<Notice>,
}
