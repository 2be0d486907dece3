//! The graph store: node and edge collections for one board.
//!
//! Backed by a `StableDiGraph` with a `HashMap` id index for O(1) lookup by
//! public id. Every operation is synchronous and total — invalid requests
//! (unknown ids, self-loops, duplicate connections, non-finite geometry) are
//! no-ops, never panics. Deleting a node cascades to its incident edges.

use crate::geometry::{Point, Rect, Size};
use crate::id::{EdgeId, NodeId};
use crate::model::{Edge, EdgeKind, Node, NodeKind, NodeStatus};
use crate::payload::BoardStats;
use petgraph::Direction;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canvas-space offset applied to duplicated nodes so the copy is visibly
/// distinct from the original.
pub const DUPLICATE_OFFSET: Point = Point::new(50.0, 50.0);

/// Creation request for [`GraphStore::add_node`]. Missing fields fall back to
/// per-kind defaults; non-finite coordinates are treated as missing.
#[derive(Debug, Clone)]
pub struct NodeProto {
    pub kind: NodeKind,
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub data: serde_json::Value,
}

impl NodeProto {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            position: None,
            size: None,
            data: serde_json::Value::Null,
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}

/// Partial update for [`GraphStore::update_node`]. `None` fields are left
/// untouched. A patch carrying non-finite geometry is rejected whole.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub position: Option<Point>,
    pub size: Option<Size>,
    pub status: Option<NodeStatus>,
    pub data: Option<serde_json::Value>,
}

impl NodePatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    fn geometry_is_finite(&self) -> bool {
        self.position.is_none_or(|p| p.is_finite()) && self.size.is_none_or(|s| s.is_finite())
    }
}

/// An immutable deep copy of one board's graph, used for undo/redo and
/// wholesale import. Nodes are ordered by z-index, edges by id, so equal
/// graphs produce equal snapshots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Owns the nodes and edges of one board and enforces their invariants.
#[derive(Debug, Default)]
pub struct GraphStore {
    graph: StableDiGraph<Node, Edge>,
    id_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
    /// Highest z-index ever handed out; monotonically increasing.
    z_top: i64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Node CRUD ───────────────────────────────────────────────────────

    /// Insert a new node and return its fresh id. Proto coordinates that are
    /// missing or non-finite fall back to the origin / the kind's default
    /// size, so the finite-geometry invariant holds unconditionally.
    pub fn add_node(&mut self, proto: NodeProto) -> NodeId {
        let id = NodeId::fresh(proto.kind.id_prefix());
        let position = proto
            .position
            .filter(Point::is_finite)
            .unwrap_or(Point::ZERO);
        let size = proto
            .size
            .filter(Size::is_finite)
            .unwrap_or_else(|| proto.kind.default_size());

        self.z_top += 1;
        let node = Node {
            id,
            kind: proto.kind,
            position,
            size,
            z_index: self.z_top,
            status: NodeStatus::Idle,
            data: proto.data,
            selected: false,
        };
        let idx = self.graph.add_node(node);
        self.id_index.insert(id, idx);
        log::debug!("add node {id} ({:?})", proto.kind);
        id
    }

    /// Merge `patch` into the node. No-op if the id is unknown or the patch
    /// would introduce non-finite geometry. Returns whether it applied.
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> bool {
        if !patch.geometry_is_finite() {
            log::debug!("reject non-finite patch for {id}");
            return false;
        }
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if let Some(position) = patch.position {
            node.position = position;
        }
        if let Some(size) = patch.size {
            node.size = size;
        }
        if let Some(status) = patch.status {
            node.status = status;
        }
        if let Some(data) = patch.data {
            node.data = data;
        }
        true
    }

    /// Remove the node and cascade: every edge touching it goes too.
    /// (Selection cleanup is the board's job — the store doesn't own it.)
    pub fn delete_node(&mut self, id: NodeId) -> bool {
        let Some(&idx) = self.id_index.get(&id) else {
            return false;
        };
        let cascaded = self.remove_connections_for(idx);
        self.graph.remove_node(idx);
        self.id_index.remove(&id);
        log::debug!("delete node {id}, cascaded {cascaded} edge(s)");
        true
    }

    /// Drop every edge incident to the node, keeping `edge_index` in sync.
    fn remove_connections_for(&mut self, idx: NodeIndex) -> usize {
        let incident: Vec<EdgeId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|e| e.weight().id)
            .collect();
        for edge_id in &incident {
            if let Some(edge_idx) = self.edge_index.remove(edge_id) {
                self.graph.remove_edge(edge_idx);
            }
        }
        incident.len()
    }

    /// Clone a node under a fresh id, offset so the copy is visibly distinct.
    /// Connections are not copied.
    pub fn duplicate_node(&mut self, id: NodeId) -> Option<NodeId> {
        let source = self.node(id)?.clone();
        let copy_id = NodeId::fresh(source.kind.id_prefix());
        self.z_top += 1;
        let copy = Node {
            id: copy_id,
            position: source.position + DUPLICATE_OFFSET,
            z_index: self.z_top,
            selected: false,
            ..source
        };
        let idx = self.graph.add_node(copy);
        self.id_index.insert(copy_id, idx);
        Some(copy_id)
    }

    /// Raise the node above everything else. Used on selection so the node
    /// the user is working with paints on top.
    pub fn bring_to_front(&mut self, id: NodeId) {
        let Some(&idx) = self.id_index.get(&id) else {
            return;
        };
        self.z_top += 1;
        self.graph[idx].z_index = self.z_top;
    }

    /// Sync the presentation-only `selected` mirror flag.
    pub fn set_selected(&mut self, id: NodeId, selected: bool) {
        if let Some(node) = self.node_mut(id) {
            node.selected = selected;
        }
    }

    // ─── Connections ─────────────────────────────────────────────────────

    /// Create an edge. Returns `None` (no-op) for self-loops, unknown
    /// endpoints, or an already-connected ordered `(from, to)` pair.
    pub fn connect(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) -> Option<EdgeId> {
        if from == to {
            return None;
        }
        let &from_idx = self.id_index.get(&from)?;
        let &to_idx = self.id_index.get(&to)?;
        if self.graph.find_edge(from_idx, to_idx).is_some() {
            return None;
        }
        let id = EdgeId::fresh("edge");
        let edge_idx = self.graph.add_edge(
            from_idx,
            to_idx,
            Edge {
                id,
                from,
                to,
                kind,
                active: false,
            },
        );
        self.edge_index.insert(id, edge_idx);
        log::debug!("connect {from} -> {to}");
        Some(id)
    }

    pub fn disconnect(&mut self, id: EdgeId) -> bool {
        match self.edge_index.remove(&id) {
            Some(idx) => self.graph.remove_edge(idx).is_some(),
            None => false,
        }
    }

    pub fn set_edge_active(&mut self, id: EdgeId, active: bool) {
        if let Some(&idx) = self.edge_index.get(&id)
            && let Some(edge) = self.graph.edge_weight_mut(idx)
        {
            edge.active = active;
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|&idx| &self.graph[idx])
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.id_index.get(&id).copied().map(|idx| &mut self.graph[idx])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_index
            .get(&id)
            .and_then(|&idx| self.graph.edge_weight(idx))
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_indices().map(|idx| &self.graph[idx])
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_indices().map(|idx| &self.graph[idx])
    }

    /// Nodes in paint order (back to front).
    pub fn nodes_by_z(&self) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.nodes().collect();
        nodes.sort_by(|a, b| {
            a.z_index
                .cmp(&b.z_index)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        nodes
    }

    /// Topmost node whose bounds contain the canvas-space point, if any.
    pub fn node_at(&self, canvas_point: Point) -> Option<NodeId> {
        self.nodes_by_z()
            .into_iter()
            .rev()
            .find(|n| n.bounds().contains(canvas_point))
            .map(|n| n.id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Union of all node bounds; `None` on an empty board.
    pub fn content_bounds(&self) -> Option<Rect> {
        self.nodes()
            .map(Node::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Derived counters for the export payload. Never stored.
    pub fn stats(&self) -> BoardStats {
        BoardStats {
            total_nodes: self.node_count(),
            completed_nodes: self
                .nodes()
                .filter(|n| n.status == NodeStatus::Done)
                .count(),
            active_connections: self.edges().filter(|e| e.active).count(),
        }
    }

    // ─── Snapshot / restore ──────────────────────────────────────────────

    /// Deep copy of the current graph, in deterministic order. The
    /// presentation-only `selected` mirror is normalized to `false`:
    /// selection membership is not structural state, so snapshots (and the
    /// history built from them) never carry it.
    pub fn snapshot(&self) -> Snapshot {
        let nodes: Vec<Node> = self
            .nodes_by_z()
            .into_iter()
            .map(|n| Node {
                selected: false,
                ..n.clone()
            })
            .collect();
        let mut edges: Vec<Edge> = self.edges().cloned().collect();
        edges.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        Snapshot { nodes, edges }
    }

    /// Replace the whole graph with `snap`. Edges whose endpoints are missing
    /// from the snapshot are dropped rather than trusted.
    pub fn restore(&mut self, snap: &Snapshot) {
        self.graph.clear();
        self.id_index.clear();
        self.edge_index.clear();
        self.z_top = 0;

        for node in &snap.nodes {
            let idx = self.graph.add_node(node.clone());
            self.id_index.insert(node.id, idx);
            self.z_top = self.z_top.max(node.z_index);
        }
        for edge in &snap.edges {
            let (Some(&from_idx), Some(&to_idx)) =
                (self.id_index.get(&edge.from), self.id_index.get(&edge.to))
            else {
                log::debug!("drop dangling edge {} on restore", edge.id);
                continue;
            };
            if edge.from == edge.to || self.graph.find_edge(from_idx, to_idx).is_some() {
                continue;
            }
            let edge_idx = self.graph.add_edge(from_idx, to_idx, edge.clone());
            self.edge_index.insert(edge.id, edge_idx);
        }
    }
}
