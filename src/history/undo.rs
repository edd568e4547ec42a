//! Bounded stack of full-state snapshots.

use std::collections::VecDeque;

use crate::core::MatchState;

/// Most-recent-first undo stack with a fixed capacity.
///
/// When full, pushing drops the oldest snapshot. Snapshots are cheap
/// because `MatchState` is built from persistent structures.
#[derive(Clone, Debug)]
pub struct UndoHistory {
    snapshots: VecDeque<MatchState>,
    capacity: usize,
}

impl UndoHistory {
    /// Create an empty history holding at most `capacity` snapshots.
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Save a snapshot. A zero-capacity history keeps nothing.
    pub fn push(&mut self, state: MatchState) {
        if self.capacity == 0 {
            return;
        }
        if self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(state);
    }

    /// Take the most recent snapshot.
    pub fn pop(&mut self) -> Option<MatchState> {
        self.snapshots.pop_back()
    }

    /// Take up to `steps` snapshots and return the oldest of them.
    ///
    /// Returns `None` (and removes nothing) if the history is empty.
    pub fn pop_many(&mut self, steps: usize) -> Option<MatchState> {
        let mut target = None;
        for _ in 0..steps.max(1) {
            match self.pop() {
                Some(state) => target = Some(state),
                None => break,
            }
        }
        target
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(50)
    }
}
