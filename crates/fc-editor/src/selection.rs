//! Multi-select tracking, independent of graph mutation.
//!
//! The selection set is authoritative; the `selected` flag on nodes is a
//! mirror the board keeps in sync for the presentation layer. The set never
//! holds a dangling id — board-level deletes and restores prune it.

use fc_core::NodeId;
use smallvec::SmallVec;

/// Insertion-ordered set of selected node ids.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    ids: SmallVec<[NodeId; 8]>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-select semantics: without `multi` the selection becomes `{id}`;
    /// with `multi` the id's membership is toggled.
    pub fn select(&mut self, id: NodeId, multi: bool) {
        if multi {
            match self.ids.iter().position(|&s| s == id) {
                Some(pos) => {
                    self.ids.remove(pos);
                }
                None => self.ids.push(id),
            }
        } else {
            self.ids.clear();
            self.ids.push(id);
        }
    }

    /// Remove an id if present (cascade from node deletion).
    pub fn remove(&mut self, id: NodeId) -> bool {
        match self.ids.iter().position(|&s| s == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every id the predicate rejects. Used after undo/redo/import.
    pub fn retain(&mut self, keep: impl FnMut(&NodeId) -> bool) {
        let mut keep = keep;
        self.ids.retain(|id| keep(id));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_select_replaces() {
        let mut sel = Selection::new();
        let (a, b) = (NodeId::intern("a"), NodeId::intern("b"));
        sel.select(a, false);
        sel.select(b, false);
        assert_eq!(sel.ids(), &[b]);
    }

    #[test]
    fn multi_select_toggles() {
        let mut sel = Selection::new();
        let (a, b) = (NodeId::intern("a"), NodeId::intern("b"));
        sel.select(a, true);
        sel.select(b, true);
        assert_eq!(sel.ids(), &[a, b]);

        sel.select(a, true);
        assert_eq!(sel.ids(), &[b]);
    }

    #[test]
    fn remove_and_clear() {
        let mut sel = Selection::new();
        let a = NodeId::intern("a");
        sel.select(a, false);
        assert!(sel.remove(a));
        assert!(!sel.remove(a));
        assert!(sel.is_empty());
    }
}
