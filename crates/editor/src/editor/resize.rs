//! Viewport changes: rescale the scene without growing history

use shared::Viewport;

use super::Editor;
use crate::scene::Scene;

impl<S: Scene + 'static> Editor<S> {
    /// Viewport changed. Reconciles once the changes have been quiet for
    /// the debounce period; a newer call cancels the pending one.
    pub fn notify_viewport(&self, viewport: Viewport) {
        let editor = self.clone();
        let delay = self.inner.settings.resize.debounce();
        let task = tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            while editor.is_restoring() {
                tracing::trace!("Viewport reconcile waiting for restore");
                tokio::time::sleep(delay).await;
            }
            editor.reconcile_viewport(viewport);
        });
        let previous = self.inner.resize_task.borrow_mut().replace(task);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Fit the surface to the viewport, scale every object by the same
    /// factors and rewrite the current history entry in place.
    ///
    /// Runs to completion without yielding, so a cancelled debounce can
    /// never leave the resize guard raised.
    pub fn reconcile_viewport(&self, viewport: Viewport) -> bool {
        let Some(scene) = self.scene() else {
            tracing::debug!("Viewport change before the scene is ready");
            return false;
        };
        let settings = &self.inner.settings;
        let target = settings.canvas.fit(viewport);
        let current = scene.dimensions();
        if current.within_tolerance(&target, settings.resize.tolerance) {
            tracing::trace!(?current, ?target, "Viewport change within tolerance");
            return false;
        }

        self.inner.state.borrow_mut().guards.resizing = true;

        scene.resize(target);
        match current.scale_to(&target) {
            Some((scale_x, scale_y)) => {
                for id in scene.objects() {
                    scene.rescale_object(&id, scale_x, scale_y);
                }
            }
            None => tracing::debug!(?current, "Surface had no size; objects left unscaled"),
        }
        scene.render();

        let overwrite = {
            let state = self.inner.state.borrow();
            state.history.cursor().is_some() && !state.guards.restoring
        };
        if overwrite {
            let snapshot = scene.serialize();
            let mut state = self.inner.state.borrow_mut();
            if let Err(err) = state.history.overwrite_current(snapshot) {
                tracing::warn!(error = %err, "Could not rewrite the current entry");
            }
        }

        self.inner.state.borrow_mut().guards.resizing = false;
        tracing::info!(
            from = ?current,
            to = ?target,
            "Surface resized"
        );
        self.publish();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;
    use std::time::Duration;

    use shared::{Dimensions, Point, SceneDocument};
    use tokio::task::LocalSet;

    use crate::scene::{MemoryScene, Scene};
    use crate::state::EditorSettings;
    use crate::Editor;

    use super::*;

    fn setup(width: f64, height: f64) -> (Editor<MemoryScene>, Rc<MemoryScene>) {
        let scene = Rc::new(MemoryScene::new(Dimensions::new(width, height), "#ffffff"));
        let editor = Editor::new(EditorSettings::default());
        editor.attach(Rc::clone(&scene));
        (editor, scene)
    }

    #[tokio::test]
    async fn test_reconcile_scales_and_rewrites_current() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup(800.0, 450.0);
                let id = scene.add_rect("#ff0000", Point::new(100.0, 100.0), 10.0, 10.0);
                tokio::task::yield_now().await;
                assert_eq!(editor.history_len(), 2);
                let before = editor.snapshot_at(1);

                // 400 wide, height capped at 450
                assert!(editor.reconcile_viewport(Viewport::new(400.0, 1000.0)));
                assert_eq!(scene.dimensions(), Dimensions::new(400.0, 450.0));
                let moved = scene.object(&id).unwrap();
                assert_eq!(moved.left, 50.0);
                assert_eq!(moved.scale_x, 0.5);
                assert_eq!(moved.scale_y, 1.0);

                assert_eq!(editor.history_len(), 2);
                assert_eq!(editor.cursor(), Some(1));
                assert_ne!(editor.snapshot_at(1), before);
                assert_eq!(editor.current_snapshot(), Some(scene.serialize()));
                assert!(!editor.is_resizing());

                tokio::task::yield_now().await;
                assert_eq!(editor.history_len(), 2);
            })
            .await;
    }

    #[tokio::test]
    async fn test_reconcile_rewrites_entry_under_cursor_only() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup(800.0, 450.0);
                scene.add_rect("#ff0000", Point::new(100.0, 100.0), 10.0, 10.0);
                tokio::task::yield_now().await;
                editor.undo().await;
                let tip = editor.snapshot_at(1);

                assert!(editor.reconcile_viewport(Viewport::new(600.0, 1000.0)));
                assert_eq!(editor.cursor(), Some(0));
                assert_eq!(editor.history_len(), 2);
                assert_eq!(editor.snapshot_at(1), tip);
                let doc = SceneDocument::from_snapshot(&editor.snapshot_at(0).unwrap()).unwrap();
                assert!(doc.objects.is_empty());
                assert!(editor.can_redo());
            })
            .await;
    }

    #[test]
    fn test_small_change_ignored() {
        let (editor, scene) = setup(800.0, 450.0);
        let renders = scene.render_count();
        let baseline = editor.current_snapshot();

        assert!(!editor.reconcile_viewport(Viewport::new(804.0, 1000.0)));
        assert_eq!(scene.dimensions(), Dimensions::new(800.0, 450.0));
        assert_eq!(scene.render_count(), renders);
        assert_eq!(editor.current_snapshot(), baseline);
    }

    #[test]
    fn test_zero_sized_surface_only_resizes() {
        let (editor, scene) = setup(0.0, 0.0);
        assert!(editor.reconcile_viewport(Viewport::new(800.0, 600.0)));
        assert_eq!(scene.dimensions(), Dimensions::new(800.0, 450.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_one_reconcile() {
        LocalSet::new()
            .run_until(async {
                let (editor, scene) = setup(800.0, 450.0);
                let renders = scene.render_count();

                for width in [700.0, 650.0, 600.0, 500.0] {
                    editor.notify_viewport(Viewport::new(width, 1000.0));
                    tokio::time::sleep(Duration::from_millis(30)).await;
                }
                assert_eq!(scene.dimensions().width, 800.0, "still inside the quiet period");

                tokio::time::sleep(Duration::from_millis(150)).await;
                assert_eq!(scene.dimensions().width, 500.0);
                assert_eq!(scene.render_count(), renders + 1);
                assert_eq!(editor.history_len(), 1);
            })
            .await;
    }
}
