//! Undo/redo: reload a neighbouring snapshot into the scene

use serde::Serialize;
use shared::Snapshot;

use super::Editor;
use crate::error::EditorError;
use crate::scene::Scene;
use crate::state::{Direction, Notice};

/// What an undo or redo request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RestoreOutcome {
    /// Scene reloaded, cursor moved
    Restored { cursor: usize },
    /// Another restore was in flight; this one runs after it
    Queued,
    /// Nothing to undo or redo
    AtBoundary,
    /// Reload failed; cursor unchanged
    Failed,
    /// No scene attached yet
    Unavailable,
}

impl<S: Scene + 'static> Editor<S> {
    pub async fn undo(&self) -> RestoreOutcome {
        self.restore(Direction::Back).await
    }

    pub async fn redo(&self) -> RestoreOutcome {
        self.restore(Direction::Forward).await
    }

    async fn restore(&self, direction: Direction) -> RestoreOutcome {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.guards.restoring {
                if let Some(dropped) = state.pending_restore.replace(direction) {
                    tracing::debug!(%dropped, "Queued restore replaced");
                }
                tracing::debug!(%direction, "Restore in flight, request queued");
                return RestoreOutcome::Queued;
            }
        }

        let mut in_flight = InFlight {
            editor: self,
            finished: false,
        };
        let outcome = self.restore_step(direction).await;
        loop {
            let queued = self.inner.state.borrow_mut().pending_restore.take();
            let Some(queued) = queued else { break };
            let later = self.restore_step(queued).await;
            tracing::debug!(direction = %queued, ?later, "Queued restore finished");
        }
        in_flight.finished = true;
        outcome
    }

    async fn restore_step(&self, direction: Direction) -> RestoreOutcome {
        let Some(scene) = self.scene() else {
            tracing::warn!(%direction, error = %EditorError::SceneUnavailable, "Restore skipped");
            return RestoreOutcome::Unavailable;
        };
        let target = self.inner.state.borrow().history.peek(direction).cloned();
        let Some(target) = target else {
            tracing::debug!(%direction, "Nothing to restore");
            return RestoreOutcome::AtBoundary;
        };

        self.inner.state.borrow_mut().guards.restoring = true;
        self.publish();

        let outcome = match self.reload(&*scene, &target, direction).await {
            Ok(cursor) => {
                tracing::info!(%direction, cursor, "Snapshot restored");
                RestoreOutcome::Restored { cursor }
            }
            Err(err) => {
                tracing::error!(%direction, error = %err, "Restore failed");
                self.recover(&*scene).await;
                self.inner.state.borrow_mut().notice = Some(Notice::RestoreFailed {
                    message: err.to_string(),
                });
                RestoreOutcome::Failed
            }
        };

        self.inner.state.borrow_mut().guards.restoring = false;
        self.sync_active_object(&*scene);
        self.publish();
        outcome
    }

    /// Replace the scene content with `target` and move the cursor
    async fn reload(&self, scene: &S, target: &Snapshot, direction: Direction) -> Result<usize, EditorError> {
        scene.clear();
        let result = scene.restore(target).await;
        // Captures scheduled by the reload run on the next tick and must
        // still see the guard.
        tokio::task::yield_now().await;
        result.map_err(EditorError::RestoreFailed)?;

        scene.render();
        let cursor = self.inner.state.borrow_mut().history.step(direction)?;
        Ok(cursor)
    }

    /// Best effort: put the entry under the cursor back on screen
    async fn recover(&self, scene: &S) {
        let Some(current) = self.current_snapshot() else {
            return;
        };
        scene.clear();
        let result = scene.restore(&current).await;
        tokio::task::yield_now().await;
        match result {
            Ok(()) => scene.render(),
            Err(err) => tracing::warn!(error = %err, "Could not reload the current entry"),
        }
    }
}

/// Releases the restore guard when an undo/redo future is dropped before it
/// finishes. The cursor stays where it was; queued requests are discarded.
struct InFlight<'a, S: Scene + 'static> {
    editor: &'a Editor<S>,
    finished: bool,
}

impl<S: Scene + 'static> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        {
            let Ok(mut state) = self.editor.inner.state.try_borrow_mut() else {
                return;
            };
            state.guards.restoring = false;
            if let Some(dropped) = state.pending_restore.take() {
                tracing::debug!(%dropped, "Queued restore discarded");
            }
        }
        tracing::warn!("Restore cancelled before it finished");
        self.editor.publish();
    }
}
