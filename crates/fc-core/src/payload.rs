//! The board export/import payload and its validation.
//!
//! One JSON shape serves export, import, and the save/load contract (the
//! latter in MessagePack for compactness). Import validation is strict and
//! up-front: a payload either passes whole or is rejected whole — the caller
//! applies nothing on failure.

use crate::id::{EdgeId, NodeId};
use crate::model::{Edge, Node};
use crate::store::Snapshot;
use crate::viewport::Viewport;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Why a payload was rejected. Mirrors what validation checks, in order.
#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("duplicate node id {0}")]
    DuplicateNode(NodeId),

    #[error("node {0} has non-finite position or size")]
    NonFiniteGeometry(NodeId),

    #[error("edge {0} is a self-loop")]
    SelfLoop(EdgeId),

    #[error("edge {edge} references unknown node {node}")]
    UnknownEndpoint { edge: EdgeId, node: NodeId },

    #[error("duplicate connection {from} -> {to}")]
    DuplicateConnection { from: NodeId, to: NodeId },

    #[error("payload decode failed: {0}")]
    Decode(String),

    #[error("payload encode failed: {0}")]
    Encode(String),
}

/// Derived counters included in exports. Computed, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardStats {
    pub total_nodes: usize,
    pub completed_nodes: usize,
    pub active_connections: usize,
}

/// The full export shape:
/// `{ project, timestamp, nodes, edges, viewport, stats }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardPayload {
    pub project: String,
    /// ISO-8601, set at export time.
    pub timestamp: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub viewport: Viewport,
    pub stats: BoardStats,
}

impl BoardPayload {
    /// Assemble a payload from a graph snapshot, stamping the current time.
    pub fn new(
        project: impl Into<String>,
        snapshot: Snapshot,
        viewport: Viewport,
        stats: BoardStats,
    ) -> Self {
        Self {
            project: project.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            nodes: snapshot.nodes,
            edges: snapshot.edges,
            viewport,
            stats,
        }
    }

    /// Structural validation. Checks node id uniqueness, finite geometry,
    /// and that every edge is a non-loop, non-duplicate connection between
    /// nodes present in this payload.
    pub fn validate(&self) -> Result<(), PayloadError> {
        let mut ids: HashSet<NodeId> = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(PayloadError::DuplicateNode(node.id));
            }
            if !node.position.is_finite() || !node.size.is_finite() {
                return Err(PayloadError::NonFiniteGeometry(node.id));
            }
        }

        let mut pairs: HashSet<(NodeId, NodeId)> = HashSet::with_capacity(self.edges.len());
        for edge in &self.edges {
            if edge.from == edge.to {
                return Err(PayloadError::SelfLoop(edge.id));
            }
            for endpoint in [edge.from, edge.to] {
                if !ids.contains(&endpoint) {
                    return Err(PayloadError::UnknownEndpoint {
                        edge: edge.id,
                        node: endpoint,
                    });
                }
            }
            if !pairs.insert((edge.from, edge.to)) {
                return Err(PayloadError::DuplicateConnection {
                    from: edge.from,
                    to: edge.to,
                });
            }
        }
        Ok(())
    }

    /// The nodes/edges as a snapshot, ready for `GraphStore::restore`.
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    // ─── Wire formats ────────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, PayloadError> {
        serde_json::to_string_pretty(self).map_err(|e| PayloadError::Encode(e.to_string()))
    }

    /// Parse and validate. Decode errors and structural violations both
    /// surface as `PayloadError`.
    pub fn from_json(json: &str) -> Result<Self, PayloadError> {
        let payload: Self =
            serde_json::from_str(json).map_err(|e| PayloadError::Decode(e.to_string()))?;
        payload.validate()?;
        Ok(payload)
    }

    /// Compact binary form for the save/load contract.
    pub fn to_msgpack(&self) -> Result<Vec<u8>, PayloadError> {
        rmp_serde::to_vec_named(self).map_err(|e| PayloadError::Encode(e.to_string()))
    }

    pub fn from_msgpack(bytes: &[u8]) -> Result<Self, PayloadError> {
        let payload: Self =
            rmp_serde::from_slice(bytes).map_err(|e| PayloadError::Decode(e.to_string()))?;
        payload.validate()?;
        Ok(payload)
    }
}
