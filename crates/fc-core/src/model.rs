//! Node and edge data model for one board.
//!
//! A board is a flat graph: nodes carry a position/size in canvas space and a
//! capability tag (`NodeKind`) that routes to whatever renderer/behavior the
//! embedding app registered for it. The engine never looks inside `data` —
//! it is an attached, type-erased payload owned by the node's behavior.

use crate::geometry::{Point, Rect, Size};
use crate::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

// ─── Node kinds ──────────────────────────────────────────────────────────

/// The module palette. A closed set of capability tags; per-kind behavior and
/// rendering are injected by the embedding layer, not hard-coded here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// AI task module (prompt in, generated copy out).
    Task,
    /// Conversational chat box.
    Chat,
    /// Video generator module.
    VideoGen,
    /// Image generator module.
    ImageGen,
    /// Result card displaying a finished asset.
    ResultCard,
    /// Freeform sticky note.
    Note,
}

impl NodeKind {
    pub const ALL: [NodeKind; 6] = [
        NodeKind::Task,
        NodeKind::Chat,
        NodeKind::VideoGen,
        NodeKind::ImageGen,
        NodeKind::ResultCard,
        NodeKind::Note,
    ];

    /// Default bounding box for freshly created nodes of this kind.
    pub fn default_size(self) -> Size {
        match self {
            NodeKind::Task => Size::new(280.0, 180.0),
            NodeKind::Chat => Size::new(320.0, 240.0),
            NodeKind::VideoGen => Size::new(360.0, 260.0),
            NodeKind::ImageGen => Size::new(320.0, 260.0),
            NodeKind::ResultCard => Size::new(260.0, 160.0),
            NodeKind::Note => Size::new(200.0, 120.0),
        }
    }

    /// Prefix for freshly minted ids (`task_12`, `chat_3`, ...).
    pub(crate) fn id_prefix(self) -> &'static str {
        match self {
            NodeKind::Task => "task",
            NodeKind::Chat => "chat",
            NodeKind::VideoGen => "video",
            NodeKind::ImageGen => "image",
            NodeKind::ResultCard => "result",
            NodeKind::Note => "note",
        }
    }
}

/// Engine-visible lifecycle tag. `activate`/`reset` context-menu actions flip
/// it, and exports count `Done` nodes; the engine attaches no other meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    #[default]
    Idle,
    Active,
    Done,
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// One draggable module on a board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,

    /// Capability tag selecting the external renderer/behavior.
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Top-left corner, canvas space. Always finite.
    pub position: Point,

    /// Bounding box. Always finite.
    pub size: Size,

    /// Overlap ordering; bumped on creation and selection.
    pub z_index: i64,

    #[serde(default)]
    pub status: NodeStatus,

    /// Opaque payload owned by the node's type-specific behavior.
    #[serde(default)]
    pub data: serde_json::Value,

    /// Mirror of selection membership for the presentation layer; the
    /// selection set in the editor is authoritative.
    #[serde(default)]
    pub selected: bool,
}

impl Node {
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, self.size)
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// Semantic flavor of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    #[default]
    Flow,
    Condition,
    Dependency,
}

/// A directed connection between two nodes on the same board.
///
/// Invariants, enforced by the store: never a self-loop, at most one edge per
/// ordered `(from, to)` pair, endpoints always present (cascade on delete).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    #[serde(rename = "fromNodeId")]
    pub from: NodeId,
    #[serde(rename = "toNodeId")]
    pub to: NodeId,
    #[serde(default)]
    pub kind: EdgeKind,
    /// Visual/state flag only; no engine semantics.
    #[serde(default)]
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn node_wire_format_is_camel_case() {
        let node = Node {
            id: NodeId::intern("task_0"),
            kind: NodeKind::VideoGen,
            position: Point::new(10.0, 20.0),
            size: NodeKind::VideoGen.default_size(),
            z_index: 3,
            status: NodeStatus::Done,
            data: serde_json::json!({"prompt": "launch teaser"}),
            selected: false,
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "video-gen");
        assert_eq!(json["zIndex"], 3);
        assert_eq!(json["status"], "done");
        assert_eq!(json["position"]["x"], 10.0);
    }

    #[test]
    fn edge_wire_format_uses_node_id_names() {
        let edge = Edge {
            id: EdgeId::intern("edge_0"),
            from: NodeId::intern("a"),
            to: NodeId::intern("b"),
            kind: EdgeKind::Condition,
            active: true,
        };
        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["fromNodeId"], "a");
        assert_eq!(json["toNodeId"], "b");
        assert_eq!(json["kind"], "condition");
    }

    #[test]
    fn optional_fields_default_on_deserialize() {
        let node: Node = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "type": "note",
            "position": {"x": 0.0, "y": 0.0},
            "size": {"width": 200.0, "height": 120.0},
            "zIndex": 1
        }))
        .unwrap();
        assert_eq!(node.status, NodeStatus::Idle);
        assert!(node.data.is_null());
        assert!(!node.selected);
    }
}
