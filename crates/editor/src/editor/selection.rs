//! Active text object tracking and formatting toolbar actions

use shared::{FormatChange, ObjectId};

use super::Editor;
use crate::scene::Scene;

impl<S: Scene + 'static> Editor<S> {
    /// Selection made or changed: track the first selected object if it is
    /// text. Other selections leave the tracked object and toolbar as they are.
    pub(super) fn on_selection(&self, selected: &[ObjectId]) {
        let Some(scene) = self.scene() else {
            return;
        };
        let Some(id) = selected.first() else {
            return;
        };
        let Some(style) = scene.text_style(id) else {
            tracing::trace!(%id, "Selected object is not text");
            return;
        };
        {
            let mut state = self.inner.state.borrow_mut();
            state.formatting.update_from_style(&style);
            state.active_object = Some(id.clone());
        }
        self.publish();
    }

    pub(super) fn on_selection_cleared(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            state.active_object = None;
            state.formatting.reset(&self.inner.settings.formatting);
        }
        self.publish();
    }

    /// Re-read the selection after the scene content was replaced
    pub(super) fn sync_active_object(&self, scene: &S) {
        let text = scene
            .active_object()
            .and_then(|id| scene.text_style(&id).map(|style| (id, style)));
        let mut state = self.inner.state.borrow_mut();
        match text {
            Some((id, style)) => {
                state.formatting.update_from_style(&style);
                state.active_object = Some(id);
            }
            None => {
                state.active_object = None;
                state.formatting.reset(&self.inner.settings.formatting);
            }
        }
    }

    /// Add placeholder text near the center in the toolbar's current style
    pub fn add_text(&self) -> Option<ObjectId> {
        let Some(scene) = self.scene() else {
            tracing::warn!("Add text requested before the scene is ready");
            return None;
        };
        let style = self.inner.state.borrow().formatting.to_text_style();
        let text = &self.inner.settings.text;
        let position = text.position(scene.dimensions());
        let id = scene.add_text(&text.placeholder, &style, position);
        tracing::info!(%id, "Text added");
        Some(id)
    }

    /// Record a toolbar change and apply it to the active text object.
    ///
    /// Returns true when an object was restyled; that also records a history
    /// entry. Without an active object only the toolbar state changes.
    pub fn apply_format(&self, change: FormatChange) -> bool {
        let (applied, active) = {
            let mut state = self.inner.state.borrow_mut();
            let applied = state.formatting.apply(change, &self.inner.settings.formatting);
            (applied, state.active_object.clone())
        };

        let restyled = match (self.scene(), active) {
            (Some(scene), Some(id)) => {
                let ok = scene.set_text_property(&id, &applied);
                if ok {
                    scene.render();
                } else {
                    tracing::debug!(%id, property = applied.property(), "Active object not restyled");
                }
                ok
            }
            _ => false,
        };

        if restyled {
            self.capture();
        } else {
            self.publish();
        }
        restyled
    }

    // ── Toolbar buttons ───────────────────────────────────────

    pub fn increase_font_size(&self) -> bool {
        let change = self.formatting().larger_size(&self.inner.settings.formatting);
        self.apply_format(change)
    }

    pub fn decrease_font_size(&self) -> bool {
        let change = self.formatting().smaller_size(&self.inner.settings.formatting);
        self.apply_format(change)
    }

    pub fn toggle_bold(&self) -> bool {
        self.apply_format(self.formatting().toggled_bold())
    }

    pub fn toggle_italic(&self) -> bool {
        self.apply_format(self.formatting().toggled_italic())
    }

    pub fn toggle_underline(&self) -> bool {
        self.apply_format(self.formatting().toggled_underline())
    }

    pub fn set_font_family(&self, family: &str) -> bool {
        self.apply_format(FormatChange::FontFamily(family.to_string()))
    }

    pub fn set_text_color(&self, color: &str) -> bool {
        self.apply_format(FormatChange::Fill(color.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use shared::{Dimensions, FontWeight, Point};
    use tokio::task::LocalSet;

    use super::*;
    use crate::scene::MemoryScene;
    use crate::state::EditorSettings;
    use crate::RestoreOutcome;

    fn setup() -> (Editor<MemoryScene>, Rc<MemoryScene>) {
        let scene = Rc::new(MemoryScene::new(Dimensions::new(800.0, 450.0), "#ffffff"));
        let editor = Editor::new(EditorSettings::default());
        editor.attach(Rc::clone(&scene));
        (editor, scene)
    }

    #[tokio::test]
    async fn test_add_text_uses_toolbar_style() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup();
                editor.apply_format(FormatChange::FontSize(36));
                assert_eq!(editor.history_len(), 1, "no object, no entry");

                let id = editor.add_text().unwrap();
                let object = scene.object(&id).unwrap();
                assert_eq!(object.text_style().unwrap().font_size, 36);
                assert!((object.left - 380.0).abs() < 1e-9);
                assert!((object.top - 213.75).abs() < 1e-9);
                assert_eq!(editor.active_object(), Some(id.clone()));
                assert!(scene.is_editing(&id));

                tokio::task::yield_now().await;
                assert_eq!(editor.history_len(), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_selection_tracks_text_only() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup();
                let text = editor.add_text().unwrap();
                editor.toggle_bold();
                let rect = scene.add_rect("#ff0000", Point::new(0.0, 0.0), 10.0, 10.0);

                scene.discard_selection();
                assert_eq!(editor.active_object(), None);
                assert!(!editor.formatting().bold, "cleared selection resets the toolbar");

                scene.select(&text);
                assert_eq!(editor.active_object(), Some(text.clone()));
                assert!(editor.formatting().bold);

                scene.select(&rect);
                assert_eq!(editor.active_object(), Some(text));
                assert!(editor.formatting().bold);
            })
            .await;
    }

    #[tokio::test]
    async fn test_apply_format_records_one_entry() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup();
                let id = editor.add_text().unwrap();
                tokio::task::yield_now().await;
                assert_eq!(editor.history_len(), 2);

                assert!(editor.toggle_bold());
                assert_eq!(editor.history_len(), 3);
                assert_eq!(
                    scene.text_style(&id).unwrap().font_weight,
                    FontWeight::Bold
                );

                assert!(editor.set_text_color("#ff0000"));
                assert_eq!(editor.history_len(), 4);
                assert_eq!(scene.text_style(&id).unwrap().fill, "#ff0000");
            })
            .await;
    }

    #[tokio::test]
    async fn test_font_size_buttons_clamp() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup();
                let id = editor.add_text().unwrap();
                editor.apply_format(FormatChange::FontSize(71));
                editor.increase_font_size();
                editor.increase_font_size();
                assert_eq!(scene.text_style(&id).unwrap().font_size, 72);

                editor.apply_format(FormatChange::FontSize(9));
                editor.decrease_font_size();
                editor.decrease_font_size();
                assert_eq!(scene.text_style(&id).unwrap().font_size, 8);
                assert_eq!(editor.formatting().font_size, 8);
            })
            .await;
    }

    #[tokio::test]
    async fn test_undo_restores_toolbar_from_scene() {
        LocalSet::new()
            .run_until(async {
                let (editor, _scene) = setup();
                editor.add_text().unwrap();
                tokio::task::yield_now().await;
                editor.toggle_italic();
                assert!(editor.formatting().italic);

                editor.undo().await;
                // reload leaves nothing selected
                assert_eq!(editor.active_object(), None);
                assert!(!editor.formatting().italic);
            })
            .await;
    }

    #[tokio::test]
    async fn test_undo_without_selection_resets_toolbar() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup();
                editor.add_text().unwrap();
                tokio::task::yield_now().await;
                scene.discard_selection();
                assert_eq!(editor.active_object(), None);

                // toolbar only, nothing to restyle
                assert!(!editor.apply_format(FormatChange::FontWeight(FontWeight::Bold)));
                assert!(editor.formatting().bold);
                assert_eq!(editor.history_len(), 2);

                assert_eq!(editor.undo().await, RestoreOutcome::Restored { cursor: 0 });
                assert_eq!(editor.active_object(), None);
                assert!(!editor.formatting().bold);
                assert_eq!(editor.formatting().font_size, 20);
            })
            .await;
    }
}
