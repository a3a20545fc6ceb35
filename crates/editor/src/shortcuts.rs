//! Keyboard shortcut handling

use serde::{Deserialize, Serialize};

use crate::editor::{Editor, RestoreOutcome};
use crate::scene::Scene;

/// A key press with its modifiers. `key` is the key's character as reported
/// by the browser, any case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    /// Ctrl, or Cmd on macOS
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: &str, ctrl: bool, shift: bool) -> Self {
        Self {
            key: key.to_string(),
            ctrl,
            shift,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shortcut {
    Undo,
    Redo,
}

impl Shortcut {
    pub fn from_chord(chord: &KeyChord) -> Option<Self> {
        if !chord.ctrl {
            return None;
        }
        match chord.key.to_ascii_lowercase().as_str() {
            // Shift turns undo into redo
            "z" if chord.shift => Some(Shortcut::Redo),
            "z" => Some(Shortcut::Undo),
            "y" => Some(Shortcut::Redo),
            _ => None,
        }
    }
}

impl<S: Scene + 'static> Editor<S> {
    /// Run the history shortcut bound to `chord`.
    ///
    /// Returns `None` when the chord is not a shortcut or a text field has
    /// focus, so the key goes to the field instead.
    pub async fn handle_key(&self, chord: &KeyChord, text_focused: bool) -> Option<RestoreOutcome> {
        // Don't handle shortcuts when a text field is focused
        if text_focused {
            return None;
        }
        let outcome = match Shortcut::from_chord(chord)? {
            Shortcut::Undo => self.undo().await,
            Shortcut::Redo => self.redo().await,
        };
        Some(outcome)
    }
}
