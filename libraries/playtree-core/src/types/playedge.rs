//! Directed transitions between playnodes

use serde::{Deserialize, Serialize};

/// A directed, weighted transition from one playnode to another
///
/// Traversal prefers the highest priority tier whose edges are still
/// eligible; within a tier, `shares` weight the random pick, and `limit`
/// bounds how often the edge may be taken in one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Playedge {
    /// Id of the node this edge leads to
    #[serde(rename = "targetID")]
    pub target_id: String,

    /// Priority tier
    #[serde(default)]
    pub priority: u32,

    /// Probability weight within a priority tier; 0 disables the edge
    #[serde(default = "default_shares")]
    pub shares: u32,

    /// Traversal budget; -1 is unlimited
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_shares() -> u32 {
    1
}

fn default_limit() -> i64 {
    -1
}
