//! Playroots: head anchors

use serde::{Deserialize, Serialize};

/// Pins a node as the starting point of one playhead
///
/// The `index` orders the playhead list; across a document the indices
/// must form a dense permutation of `[0, N)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Playroot {
    /// Position in the playhead list; unspecified defaults to 0
    #[serde(default)]
    pub index: u32,

    /// Display name of the playhead anchored here
    pub name: String,
}
