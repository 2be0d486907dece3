//! Board templates: prototype node/edge lists with relative positions.
//!
//! A template carries offsets, not absolute positions — instantiation applies
//! an origin so repeated stamps of the same template don't overlap exactly.

use fc_core::{EdgeKind, GraphStore, NodeId, NodeKind, NodeProto, Point, Size};
use smallvec::SmallVec;

/// One prototype node. `offset` is relative to the instantiation origin.
#[derive(Debug, Clone)]
pub struct TemplateNode {
    pub kind: NodeKind,
    pub offset: Point,
    pub size: Option<Size>,
    pub data: serde_json::Value,
}

impl TemplateNode {
    pub fn new(kind: NodeKind, offset: Point) -> Self {
        Self {
            kind,
            offset,
            size: None,
            data: serde_json::Value::Null,
        }
    }
}

/// One prototype connection, endpoints given as indices into the node list.
#[derive(Debug, Clone, Copy)]
pub struct TemplateEdge {
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
}

#[derive(Debug, Clone, Default)]
pub struct BoardTemplate {
    pub name: String,
    pub nodes: Vec<TemplateNode>,
    pub edges: Vec<TemplateEdge>,
}

impl BoardTemplate {
    /// Stamp the template into `store` with every offset shifted by `origin`.
    /// Returns the freshly minted node ids, in prototype order. Edges with
    /// out-of-range endpoint indices are skipped.
    pub fn instantiate(&self, store: &mut GraphStore, origin: Point) -> SmallVec<[NodeId; 8]> {
        let mut ids: SmallVec<[NodeId; 8]> = SmallVec::new();
        for proto in &self.nodes {
            let mut request = NodeProto::new(proto.kind)
                .at(origin + proto.offset)
                .with_data(proto.data.clone());
            request.size = proto.size;
            ids.push(store.add_node(request));
        }
        for edge in &self.edges {
            if let (Some(&from), Some(&to)) = (ids.get(edge.from), ids.get(edge.to)) {
                store.connect(from, to, edge.kind);
            }
        }
        log::debug!("instantiated template '{}' ({} nodes)", self.name, ids.len());
        ids
    }
}

/// The built-in starter board: a prompt task feeding a video generator and a
/// result card, with a chat box on the side.
pub fn campaign_starter() -> BoardTemplate {
    BoardTemplate {
        name: "campaign-starter".into(),
        nodes: vec![
            TemplateNode::new(NodeKind::Task, Point::ZERO),
            TemplateNode::new(NodeKind::VideoGen, Point::new(360.0, 0.0)),
            TemplateNode::new(NodeKind::ResultCard, Point::new(780.0, 40.0)),
            TemplateNode::new(NodeKind::Chat, Point::new(0.0, 260.0)),
        ],
        edges: vec![
            TemplateEdge {
                from: 0,
                to: 1,
                kind: EdgeKind::Flow,
            },
            TemplateEdge {
                from: 1,
                to: 2,
                kind: EdgeKind::Flow,
            },
        ],
    }
}
