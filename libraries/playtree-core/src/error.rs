//! Error types for playtree documents and graphs

use thiserror::Error;

/// Result type alias using `PlaytreeError`
pub type Result<T> = std::result::Result<T, PlaytreeError>;

/// Errors raised while parsing or validating a playtree document
///
/// Validation stops at the first violated invariant; every variant names
/// the offending entity so the message can be surfaced verbatim.
#[derive(Debug, Error)]
pub enum PlaytreeError {
    /// Malformed bytes or an unknown field; the validator never sees these
    #[error("document parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Node map key does not match the node's own id
    #[error("playnode \"{id}\": stored under mismatched key \"{key}\"")]
    NodeKeyMismatch { key: String, id: String },

    /// A node with no playitems has nothing to play
    #[error("playnode \"{id}\": playitems must not be empty")]
    EmptyPlayitems { id: String },

    /// A limit below -1 (-1 means unlimited)
    #[error("{entity} \"{id}\": limit {limit} is below -1")]
    LimitOutOfRange {
        entity: &'static str,
        id: String,
        limit: i64,
    },

    /// Two playscopes share an id
    #[error("playscope {id}: duplicate id")]
    DuplicateScope { id: i32 },

    /// An edge points at a node that is not in the node map
    #[error("playnode \"{node}\": undefined target node \"{target}\"")]
    UnknownTarget { node: String, target: String },

    /// A node references a playscope that is not in the scope list
    #[error("playnode \"{node}\": undefined playscope {scope}")]
    UnknownScope { node: String, scope: i32 },

    /// A playroot is keyed by a node id that is not in the node map
    #[error("playroot on undefined node \"{node}\"")]
    PlayrootOnUnknownNode { node: String },

    /// Two playroots claim the same position in the head list
    #[error("duplicate playroot index {index}")]
    DuplicatePlayrootIndex { index: u32 },

    /// Playroot indices must form a dense permutation of [0, N)
    #[error("playroot indices are not dense: index {index} missing")]
    MissingPlayrootIndex { index: u32 },
}
