//! Playtree summary metadata

use serde::{Deserialize, Serialize};

/// Who may see a playtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    /// Visible to the creator only
    Private,
    /// Visible to everyone
    Public,
}

/// Identity and ownership metadata for a playtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Summary {
    /// Short identifier; doubles as the store key
    pub id: String,

    /// Display name
    pub name: String,

    /// User id of the creator
    #[serde(rename = "createdBy")]
    pub created_by: String,

    /// Access level
    pub access: Access,
}
