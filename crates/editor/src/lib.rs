// Library crate: the history engine plus the headless pieces built on it
// (harness, command protocol) used by the CLI and integration tests.

pub mod command;
pub mod editor;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod scene;
pub mod shortcuts;
pub mod state;

pub use editor::{Editor, RestoreOutcome};
pub use error::{EditorError, HistoryError};
