//! Snapshot-based undo/redo.

use crate::canvas::{Canvas, Snapshot};
use std::collections::VecDeque;

/// Default number of undo states to keep.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Undo and redo stacks of full-canvas snapshots.
///
/// Any new snapshot clears the redo stack: redo is only available directly
/// after an undo.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    /// Oldest first.
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    /// Maximum undo depth; `None` keeps everything.
    limit: Option<usize>,
}

impl HistoryStore {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that evicts the oldest snapshot beyond `limit` entries.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Maximum undo depth, if bounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Record the canvas state before a change.
    pub fn snapshot<C: Canvas + ?Sized>(&mut self, canvas: &C) {
        self.undo_stack.push_back(canvas.get_pixels());
        self.redo_stack.clear();
        self.enforce_limit();
    }

    /// Restore the state before the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> bool {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return false;
        };
        self.redo_stack.push(canvas.get_pixels());
        canvas.set_pixels(snapshot);
        true
    }

    /// Reapply the last undone change.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        self.undo_stack.push_back(canvas.get_pixels());
        self.enforce_limit();
        canvas.set_pixels(snapshot);
        true
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo states held.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo states held.
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            while self.undo_stack.len() > limit {
                self.undo_stack.pop_front();
            }
        }
    }
}
