//! Playnodes: the vertices of a playtree

use super::{Playedge, Playitem};
use serde::{Deserialize, Serialize};

/// How a node drives its playitems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaynodeKind {
    /// Play the items in declared order
    Sequencer,
    /// Play one item picked at random
    Selector,
    /// Play all items in parallel
    Simulplexer,
}

/// Editor canvas position; not interpreted by the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasPosition {
    pub x: f64,
    pub y: f64,
}

/// One vertex of a playtree: playable content plus outgoing edges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Playnode {
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(rename = "type")]
    pub kind: PlaynodeKind,

    /// Repeat budget; 0 means play once
    #[serde(default = "default_repeat")]
    pub repeat: u32,

    /// Entry budget; -1 is unlimited
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Ids of the playscopes decorating this node
    #[serde(default)]
    pub playscopes: Vec<i32>,

    /// Ordered playable content; must not be empty
    pub playitems: Vec<Playitem>,

    /// Outgoing edges
    #[serde(default)]
    pub next: Vec<Playedge>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<CanvasPosition>,
}

fn default_repeat() -> u32 {
    1
}

fn default_limit() -> i64 {
    -1
}
