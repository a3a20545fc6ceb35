//! Mutation capture: turns scene changes into history entries

use super::Editor;
use crate::scene::Scene;

impl<S: Scene + 'static> Editor<S> {
    /// Capture on the next turn of the event loop, after whatever the scene
    /// does right after a mutation (select, enter editing) has settled.
    pub(crate) fn schedule_capture(&self) {
        let editor = self.clone();
        tokio::task::spawn_local(async move {
            editor.capture();
        });
    }

    /// Push the scene's current state as a new history entry.
    ///
    /// Skipped while a restore or resize is in flight: the guards are read
    /// now, not when the capture was scheduled.
    pub fn capture(&self) -> bool {
        let Some(scene) = self.scene() else {
            tracing::debug!("Capture skipped: scene not attached");
            return false;
        };
        let guards = self.inner.state.borrow().guards;
        if guards.suppresses_capture() {
            tracing::trace!(?guards, "Capture suppressed");
            return false;
        }

        let snapshot = scene.serialize();
        {
            let mut state = self.inner.state.borrow_mut();
            state.history.push(snapshot);
            tracing::debug!(
                len = state.history.len(),
                cursor = ?state.history.cursor(),
                "History entry captured"
            );
        }
        self.publish();
        true
    }
}
