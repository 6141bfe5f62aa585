//! Raw playtree documents
//!
//! A `PlaytreeDoc` is parsed but not yet validated: it decodes strictly
//! (unknown fields rejected, defaults applied) but may still violate graph
//! invariants. `validate::validate` turns it into a `Playtree`.

use crate::error::Result;
use crate::types::{Playnode, Playroot, Playscope, Summary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// A parsed playtree document, prior to semantic validation
///
/// The node and playroot maps are ordered so validation reports the same
/// first violation for byte-identical input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaytreeDoc {
    pub summary: Summary,

    /// Node map; every key must equal its node's id
    pub playnodes: BTreeMap<String, Playnode>,

    /// Head anchors, keyed by the node id they pin
    pub playroots: BTreeMap<String, Playroot>,

    #[serde(default)]
    pub playscopes: Vec<Playscope>,
}

impl PlaytreeDoc {
    /// Parse a document from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from JSON bytes
    pub fn from_slice(json: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(json)?)
    }

    /// Parse a document from a reader
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }
}
