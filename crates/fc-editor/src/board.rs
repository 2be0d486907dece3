//! Boards and the board manager.
//!
//! A board bundles one graph store, one viewport, one selection set, and one
//! history stack. Board methods are the coordination layer the raw store
//! doesn't provide: structural mutations commit exactly one history entry,
//! deletes cascade into the selection, and the `selected` mirror flags stay
//! in sync with the authoritative selection set.
//!
//! The manager owns any number of boards and an "active" pointer. Switching
//! boards never touches the inactive boards' state — each keeps its own
//! viewport, selection, and history for later resumption.

use crate::history::History;
use crate::selection::Selection;
use crate::template::BoardTemplate;
use fc_core::{
    BoardId, BoardPayload, EdgeId, EdgeKind, GraphStore, NodeId, NodeKind, NodePatch, NodeProto,
    NodeStatus, PayloadError, Point, Size, Snapshot, Viewport, ZoomRange,
};

pub struct Board {
    pub id: BoardId,
    pub name: String,
    /// Read freely; route structural edits through board methods so history
    /// and selection stay consistent.
    pub store: GraphStore,
    pub viewport: Viewport,
    pub zoom_range: ZoomRange,
    selection: Selection,
    history: History,
}

impl Board {
    pub fn new(name: impl Into<String>) -> Self {
        let store = GraphStore::new();
        let baseline = store.snapshot();
        Self {
            id: BoardId::fresh("board"),
            name: name.into(),
            store,
            viewport: Viewport::default(),
            zoom_range: ZoomRange::default(),
            selection: Selection::new(),
            history: History::new(baseline),
        }
    }

    /// A board whose initial (baseline) state is the instantiated template.
    /// Undoing at creation is a no-op, same as for an empty board.
    pub fn from_template(name: impl Into<String>, template: &BoardTemplate) -> Self {
        let mut store = GraphStore::new();
        template.instantiate(&mut store, Point::ZERO);
        let baseline = store.snapshot();
        Self {
            id: BoardId::fresh("board"),
            name: name.into(),
            store,
            viewport: Viewport::default(),
            zoom_range: ZoomRange::default(),
            selection: Selection::new(),
            history: History::new(baseline),
        }
    }

    // ─── Structural mutations (each commits one history entry) ───────────

    pub fn add_node(&mut self, proto: NodeProto) -> NodeId {
        let id = self.store.add_node(proto);
        self.select(id, false);
        self.commit();
        id
    }

    pub fn add_node_at(&mut self, kind: NodeKind, canvas_pos: Point) -> NodeId {
        self.add_node(NodeProto::new(kind).at(canvas_pos))
    }

    /// Delete a node; cascades to incident edges and the selection set.
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        if !self.store.delete_node(id) {
            return false;
        }
        self.selection.remove(id);
        self.commit();
        true
    }

    /// Delete everything selected as one undoable step.
    pub fn delete_selection(&mut self) -> usize {
        let ids: Vec<NodeId> = self.selection.ids().to_vec();
        let deleted = ids
            .into_iter()
            .filter(|&id| self.store.delete_node(id))
            .count();
        if deleted > 0 {
            self.selection.clear();
            self.commit();
        }
        deleted
    }

    pub fn duplicate_node(&mut self, id: NodeId) -> Option<NodeId> {
        let copy = self.store.duplicate_node(id)?;
        self.select(copy, false);
        self.commit();
        Some(copy)
    }

    /// Duplicate the whole selection as one undoable step; the copies become
    /// the new selection.
    pub fn duplicate_selection(&mut self) -> Vec<NodeId> {
        let ids: Vec<NodeId> = self.selection.ids().to_vec();
        let copies: Vec<NodeId> = ids
            .into_iter()
            .filter_map(|id| self.store.duplicate_node(id))
            .collect();
        if !copies.is_empty() {
            self.selection.clear();
            for &copy in &copies {
                self.selection.select(copy, true);
            }
            self.sync_selected_flags();
            self.commit();
        }
        copies
    }

    /// Merge a patch into a node. Commits when the store accepts it.
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> bool {
        if self.store.update_node(id, patch) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn set_status(&mut self, id: NodeId, status: NodeStatus) -> bool {
        self.update_node(
            id,
            NodePatch {
                status: Some(status),
                ..NodePatch::default()
            },
        )
    }

    pub fn connect(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) -> Option<EdgeId> {
        let id = self.store.connect(from, to, kind)?;
        self.commit();
        Some(id)
    }

    pub fn disconnect(&mut self, id: EdgeId) -> bool {
        if self.store.disconnect(id) {
            self.commit();
            true
        } else {
            false
        }
    }

    pub fn set_edge_active(&mut self, id: EdgeId, active: bool) {
        if self.store.edge(id).is_some() {
            self.store.set_edge_active(id, active);
            self.commit();
        }
    }

    /// Remove every node and edge as one undoable step.
    pub fn clear(&mut self) {
        if self.store.node_count() == 0 && self.store.edge_count() == 0 {
            return;
        }
        self.store.restore(&Snapshot::default());
        self.selection.clear();
        self.sync_selected_flags();
        self.commit();
    }

    // ─── Gesture support (no history entries) ────────────────────────────

    /// Position update on the drag hot path. Deliberately does not commit —
    /// the controller commits the gesture's net effect once, on pointer-up.
    pub fn move_node_live(&mut self, id: NodeId, position: Point) -> bool {
        self.store.update_node(id, NodePatch::position(position))
    }

    /// Snapshot the current graph into history. Used by the controller at
    /// gesture end; board methods that mutate structure call it themselves.
    pub fn commit(&mut self) {
        self.history.commit(self.store.snapshot());
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, id: NodeId, multi: bool) {
        if !self.store.contains_node(id) {
            return;
        }
        self.selection.select(id, multi);
        if self.selection.contains(id) {
            self.store.bring_to_front(id);
        }
        self.sync_selected_flags();
    }

    pub fn select_all(&mut self) {
        let ids: Vec<NodeId> = self.store.nodes().map(|n| n.id).collect();
        self.selection.clear();
        for id in ids {
            self.selection.select(id, true);
        }
        self.sync_selected_flags();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.sync_selected_flags();
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn sync_selected_flags(&mut self) {
        let ids: Vec<NodeId> = self.store.nodes().map(|n| n.id).collect();
        for id in ids {
            self.store.set_selected(id, self.selection.contains(id));
        }
    }

    fn prune_selection(&mut self) {
        let store = &self.store;
        self.selection.retain(|id| store.contains_node(*id));
        self.sync_selected_flags();
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let Some(snap) = self.history.undo().cloned() else {
            return false;
        };
        self.store.restore(&snap);
        self.prune_selection();
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snap) = self.history.redo().cloned() else {
            return false;
        };
        self.store.restore(&snap);
        self.prune_selection();
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Pan so the content's center lands in the middle of a `view`-sized
    /// surface. Zoom is left alone; an empty board recenters on the origin.
    pub fn center_view(&mut self, view: Size) {
        let screen_center = Point::new(view.width / 2.0, view.height / 2.0);
        self.viewport.pan = match self.store.content_bounds() {
            Some(bounds) => screen_center - bounds.center() * self.viewport.zoom,
            None => screen_center,
        };
    }

    // ─── Export / import ─────────────────────────────────────────────────

    pub fn export(&self, project: impl Into<String>) -> BoardPayload {
        BoardPayload::new(
            project,
            self.store.snapshot(),
            self.viewport,
            self.store.stats(),
        )
    }

    /// Replace this board's nodes/edges wholesale with a validated payload.
    /// Atomic: a payload that fails validation leaves every part of the
    /// board untouched. A successful import is one undoable step.
    pub fn import(&mut self, payload: &BoardPayload) -> Result<(), PayloadError> {
        if let Err(err) = payload.validate() {
            log::warn!("import into '{}' rejected: {err}", self.name);
            return Err(err);
        }
        self.store.restore(&payload.to_snapshot());
        self.viewport = payload.viewport.sanitized(self.zoom_range);
        self.selection.clear();
        self.sync_selected_flags();
        self.commit();
        Ok(())
    }
}

// ─── Board manager ───────────────────────────────────────────────────────

/// Owns the open boards and tracks which one receives input.
#[derive(Default)]
pub struct BoardManager {
    boards: Vec<Board>,
    active: Option<BoardId>,
}

impl BoardManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty board and make it active.
    pub fn create(&mut self, name: impl Into<String>) -> BoardId {
        let board = Board::new(name);
        let id = board.id;
        self.boards.push(board);
        self.active = Some(id);
        id
    }

    /// Create a board from a template and make it active.
    pub fn create_from_template(
        &mut self,
        name: impl Into<String>,
        template: &BoardTemplate,
    ) -> BoardId {
        let board = Board::from_template(name, template);
        let id = board.id;
        self.boards.push(board);
        self.active = Some(id);
        id
    }

    /// Point input at another board. Inactive boards keep their full state.
    /// Unknown ids are ignored.
    pub fn switch_to(&mut self, id: BoardId) -> bool {
        if self.boards.iter().any(|b| b.id == id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn delete(&mut self, id: BoardId) -> bool {
        let Some(pos) = self.boards.iter().position(|b| b.id == id) else {
            return false;
        };
        self.boards.remove(pos);
        if self.active == Some(id) {
            self.active = self.boards.first().map(|b| b.id);
        }
        true
    }

    pub fn active(&self) -> Option<&Board> {
        let id = self.active?;
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn active_mut(&mut self) -> Option<&mut Board> {
        let id = self.active?;
        self.boards.iter_mut().find(|b| b.id == id)
    }

    pub fn board(&self, id: BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    pub fn boards(&self) -> impl Iterator<Item = &Board> {
        self.boards.iter()
    }

    pub fn export_active(&self, project: impl Into<String>) -> Option<BoardPayload> {
        self.active().map(|b| b.export(project))
    }
}
