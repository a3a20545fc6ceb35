//! History engine: ties the scene, the snapshot store and the UI together.
//!
//! The editor runs on a single thread. Deferred captures and debounce timers
//! are spawned with [`tokio::task::spawn_local`], so every method that may
//! schedule work must be called from inside a [`tokio::task::LocalSet`].
//! State is shared through `RefCell`s whose borrows never cross an await or
//! a call into the scene.

mod capture;
mod resize;
mod restore;
mod selection;

pub use restore::RestoreOutcome;

use std::cell::RefCell;
use std::rc::Rc;

use shared::{ObjectId, Snapshot};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::scene::{Scene, SceneEvent};
use crate::state::{EditorSettings, EditorState, FormattingState, Notice, UiState};

struct Inner<S> {
    settings: EditorSettings,
    /// `None` until the rendering surface is ready
    scene: RefCell<Option<Rc<S>>>,
    state: RefCell<EditorState>,
    ui: watch::Sender<UiState>,
    /// Pending debounced viewport reconciliation
    resize_task: RefCell<Option<JoinHandle<()>>>,
}

/// Undo/redo history engine for one editing session
pub struct Editor<S: Scene + 'static> {
    inner: Rc<Inner<S>>,
}

impl<S: Scene + 'static> Clone for Editor<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: Scene + 'static> Editor<S> {
    pub fn new(settings: EditorSettings) -> Self {
        let state = EditorState::new(&settings);
        let (ui, _) = watch::channel(state.ui_state());
        Self {
            inner: Rc::new(Inner {
                settings,
                scene: RefCell::new(None),
                state: RefCell::new(state),
                ui,
                resize_task: RefCell::new(None),
            }),
        }
    }

    /// The scene became ready: listen to it and record the baseline entry
    pub fn attach(&self, scene: Rc<S>) {
        if self.inner.scene.borrow().is_some() {
            tracing::warn!("Scene already attached; ignoring second attach");
            return;
        }

        let weak = Rc::downgrade(&self.inner);
        scene.subscribe(Box::new(move |event: &SceneEvent| {
            if let Some(inner) = weak.upgrade() {
                Editor { inner }.handle_event(event);
            }
        }));

        let baseline = scene.serialize();
        *self.inner.scene.borrow_mut() = Some(scene);
        self.inner.state.borrow_mut().history.push(baseline);
        tracing::info!("Scene attached, baseline snapshot recorded");
        self.publish();
    }

    /// Route a scene notification
    pub fn handle_event(&self, event: &SceneEvent) {
        if event.is_mutation() {
            self.schedule_capture();
            return;
        }
        match event {
            SceneEvent::SelectionCreated(selected) | SceneEvent::SelectionUpdated(selected) => {
                self.on_selection(selected);
            }
            SceneEvent::SelectionCleared => self.on_selection_cleared(),
            _ => {}
        }
    }

    pub fn scene(&self) -> Option<Rc<S>> {
        self.inner.scene.borrow().clone()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.inner.settings
    }

    /// Push the current state to UI subscribers
    fn publish(&self) {
        let ui = self.inner.state.borrow().ui_state();
        self.inner.ui.send_replace(ui);
    }

    pub fn subscribe_ui(&self) -> watch::Receiver<UiState> {
        self.inner.ui.subscribe()
    }

    pub fn ui_state(&self) -> UiState {
        self.inner.state.borrow().ui_state()
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn can_undo(&self) -> bool {
        self.inner.state.borrow().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.state.borrow().history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.inner.state.borrow().history.len()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.inner.state.borrow().history.cursor()
    }

    pub fn snapshot_at(&self, index: usize) -> Option<Snapshot> {
        self.inner.state.borrow().history.get(index).cloned()
    }

    pub fn current_snapshot(&self) -> Option<Snapshot> {
        self.inner.state.borrow().history.current().ok().cloned()
    }

    pub fn is_restoring(&self) -> bool {
        self.inner.state.borrow().guards.restoring
    }

    pub fn is_resizing(&self) -> bool {
        self.inner.state.borrow().guards.resizing
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.inner.state.borrow().active_object.clone()
    }

    pub fn formatting(&self) -> FormattingState {
        self.inner.state.borrow().formatting.clone()
    }

    /// Take the pending UI notice, if any
    pub fn take_notice(&self) -> Option<Notice> {
        let notice = self.inner.state.borrow_mut().notice.take();
        if notice.is_some() {
            self.publish();
        }
        notice
    }

    /// Leaving the page would lose work
    pub fn should_confirm_unload(&self) -> bool {
        self.scene().is_some_and(|scene| !scene.objects().is_empty())
    }
}
