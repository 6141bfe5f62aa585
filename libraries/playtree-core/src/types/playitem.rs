//! Atomic pieces of playable content

use serde::{Deserialize, Serialize};

/// Which provider a playitem's content comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// A file on the local filesystem, relative to the audio path prefix
    Local,
    Spotify,
    Youtube,
}

/// Whether a playitem is a single track or a collection reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plurality {
    Single,
    Collection,
}

/// Source/plurality pair describing how to interpret a playitem's uri
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayitemKind {
    pub source: Source,
    pub plurality: Plurality,
}

/// One atomic piece of content inside a playnode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Playitem {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: PlayitemKind,

    /// Content locator, resolved by the audio backend
    pub uri: String,

    /// Display name
    pub name: String,

    /// Display name of the content's creator
    #[serde(default)]
    pub creator: String,

    /// Locator for the content's creator
    #[serde(rename = "creatorURI", default)]
    pub creator_uri: String,

    /// Reserved weighting exponent
    #[serde(default)]
    pub exponent: u32,

    /// Weighting multiplier
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,

    /// Play budget; -1 is unlimited
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_multiplier() -> u32 {
    1
}

fn default_limit() -> i64 {
    -1
}
