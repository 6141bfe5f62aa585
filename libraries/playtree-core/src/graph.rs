//! Validated playtree graphs
//!
//! Playtrees have cycles by design, so the graph is an arena: all nodes
//! live in one vector and edges store the target's arena index. The graph
//! is immutable after validation and safe to alias freely (`Arc`).

use crate::types::{Playitem, PlaynodeKind, Playscope, Summary};
use std::collections::HashMap;

/// Arena index of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeIx(pub(crate) usize);

impl NodeIx {
    /// Position in the node arena
    pub fn index(self) -> usize {
        self.0
    }
}

/// Stable identity of an edge: the owning node plus the edge's position in
/// its outgoing list
///
/// Repeat counters key on this, never on edge values, which are ambiguous
/// when a node carries duplicate edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeIx {
    pub node: NodeIx,
    pub edge: usize,
}

/// A resolved outgoing edge
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeIx,
    pub priority: u32,
    pub shares: u32,
    /// Traversal budget; -1 is unlimited
    pub limit: i64,
}

/// A validated node: playable content plus resolved outgoing edges
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub kind: PlaynodeKind,
    pub repeat: u32,
    pub limit: i64,
    pub scopes: Vec<i32>,
    pub playitems: Vec<Playitem>,
    pub edges: Vec<Edge>,
}

/// A designated starting node for one playhead
#[derive(Debug, Clone)]
pub struct HeadAnchor {
    /// Display name of the playhead
    pub name: String,
    pub node: NodeIx,
}

/// A validated playtree: summary, node arena, head anchors and scopes
#[derive(Debug, Clone)]
pub struct Playtree {
    pub(crate) summary: Summary,
    pub(crate) nodes: Vec<Node>,
    pub(crate) ids: HashMap<String, NodeIx>,
    pub(crate) anchors: Vec<HeadAnchor>,
    pub(crate) playscopes: Vec<Playscope>,
}

impl Playtree {
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// Node at an arena index
    pub fn node(&self, ix: NodeIx) -> &Node {
        &self.nodes[ix.0]
    }

    /// Arena index of a node id, if present
    pub fn node_ix(&self, id: &str) -> Option<NodeIx> {
        self.ids.get(id).copied()
    }

    /// Node by id, if present
    pub fn node_by_id(&self, id: &str) -> Option<&Node> {
        self.node_ix(id).map(|ix| self.node(ix))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Head anchors, ordered by playroot index
    pub fn anchors(&self) -> &[HeadAnchor] {
        &self.anchors
    }

    pub fn playscopes(&self) -> &[Playscope] {
        &self.playscopes
    }
}
