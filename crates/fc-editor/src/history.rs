//! Linear undo/redo over graph snapshots.
//!
//! The history owns an ordered list of deep snapshots plus an index into it.
//! Structural mutations commit a new snapshot; undo/redo just move the index
//! and hand back the snapshot to apply — restoring is the caller's job, the
//! store is replaced wholesale, never diffed. The viewport does not
//! participate: panning and zooming are not undoable.

use fc_core::Snapshot;

/// Default maximum number of retained snapshots.
pub const DEFAULT_MAX_DEPTH: usize = 100;

#[derive(Debug)]
pub struct History {
    entries: Vec<Snapshot>,
    /// Index of the entry matching the current graph state.
    index: usize,
    max_depth: usize,
}

impl History {
    /// A history always starts from a baseline snapshot, so undoing every
    /// later commit lands on the state the board began with.
    pub fn new(baseline: Snapshot) -> Self {
        Self::with_depth(baseline, DEFAULT_MAX_DEPTH)
    }

    pub fn with_depth(baseline: Snapshot, max_depth: usize) -> Self {
        Self {
            entries: vec![baseline],
            index: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// Record a snapshot after a structural mutation. Any redo branch beyond
    /// the current index is discarded; the oldest entry is evicted once the
    /// depth bound is hit.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.entries.truncate(self.index + 1);
        self.entries.push(snapshot);
        self.index += 1;
        if self.entries.len() > self.max_depth {
            self.entries.remove(0);
            self.index -= 1;
        }
    }

    /// Step back, returning the snapshot to apply. No-op at the baseline.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward, returning the snapshot to apply. No-op at the newest.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}
