//! Error kinds of the history engine.
//!
//! None of these escape the public editor operations: they are logged and
//! turned into outcomes or UI notices.

use crate::scene::SceneError;
use crate::state::history::Direction;

/// Precondition failures of the snapshot store
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("history is empty")]
    EmptyHistory,
    #[error("cannot step {direction} from cursor {cursor:?} in a history of {len} entries")]
    OutOfRange {
        cursor: Option<usize>,
        len: usize,
        direction: Direction,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("restore failed: {0}")]
    RestoreFailed(#[source] SceneError),
    #[error("scene is not attached yet")]
    SceneUnavailable,
}
