//! Playscopes: orthogonal node labels

use serde::{Deserialize, Serialize};

/// An orthogonal label that may decorate any node
///
/// Reserved for future scoping semantics; the traversal engine carries
/// scopes but does not interpret them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Playscope {
    pub id: i32,
    pub name: String,
    pub color: String,
}
