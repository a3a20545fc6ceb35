//! Snapshot store: ordered scene snapshots plus a cursor

use std::fmt;

use serde::{Deserialize, Serialize};
use shared::Snapshot;

use crate::error::HistoryError;

/// Direction of a history step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Back,
    Forward,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Back => f.write_str("back"),
            Direction::Forward => f.write_str("forward"),
        }
    }
}

/// Linear undo history.
///
/// Entries past the cursor form the redo branch; pushing while the cursor is
/// not at the tip discards that branch. There is no size cap.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    entries: Vec<Snapshot>,
    /// Index of the current entry, `None` while empty
    cursor: Option<usize>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a snapshot after the cursor and make it current
    pub fn push(&mut self, snapshot: Snapshot) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Snapshot at the cursor
    pub fn current(&self) -> Result<&Snapshot, HistoryError> {
        self.cursor
            .and_then(|c| self.entries.get(c))
            .ok_or(HistoryError::EmptyHistory)
    }

    /// Replace the snapshot at the cursor without touching the redo branch
    pub fn overwrite_current(&mut self, snapshot: Snapshot) -> Result<(), HistoryError> {
        let slot = self
            .cursor
            .and_then(|c| self.entries.get_mut(c))
            .ok_or(HistoryError::EmptyHistory)?;
        *slot = snapshot;
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Snapshot one step behind the cursor
    pub fn previous(&self) -> Option<&Snapshot> {
        let c = self.cursor?;
        self.entries.get(c.checked_sub(1)?)
    }

    /// Snapshot one step ahead of the cursor
    pub fn next(&self) -> Option<&Snapshot> {
        self.entries.get(self.cursor? + 1)
    }

    /// Snapshot one step in `direction`
    pub fn peek(&self, direction: Direction) -> Option<&Snapshot> {
        match direction {
            Direction::Back => self.previous(),
            Direction::Forward => self.next(),
        }
    }

    /// Step the cursor back; returns the new cursor
    pub fn move_back(&mut self) -> Result<usize, HistoryError> {
        if !self.can_undo() {
            return Err(self.out_of_range(Direction::Back));
        }
        let c = self.cursor.map_or(0, |c| c - 1);
        self.cursor = Some(c);
        Ok(c)
    }

    /// Step the cursor forward; returns the new cursor
    pub fn move_forward(&mut self) -> Result<usize, HistoryError> {
        if !self.can_redo() {
            return Err(self.out_of_range(Direction::Forward));
        }
        let c = self.cursor.map_or(0, |c| c + 1);
        self.cursor = Some(c);
        Ok(c)
    }

    pub fn step(&mut self, direction: Direction) -> Result<usize, HistoryError> {
        match direction {
            Direction::Back => self.move_back(),
            Direction::Forward => self.move_forward(),
        }
    }

    fn out_of_range(&self, direction: Direction) -> HistoryError {
        HistoryError::OutOfRange {
            cursor: self.cursor,
            len: self.entries.len(),
            direction,
        }
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.entries.get(index)
    }

    /// Total bytes held by all snapshots
    pub fn byte_len(&self) -> usize {
        self.entries.iter().map(Snapshot::byte_len).sum()
    }
}
