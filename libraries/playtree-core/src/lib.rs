//! Playtree core model
//!
//! The data model and semantic validator for playtrees: directed graphs of
//! playable content whose traversal is driven by weighted random choice.
//!
//! This crate provides:
//! - The strict document schema ([`PlaytreeDoc`] and [`types`])
//! - The semantic validator ([`validate`])
//! - The immutable arena graph the traversal engine runs over ([`graph`])
//!
//! Parsing and validation are separate steps on purpose: a document that
//! decodes cleanly can still violate graph invariants, and the validator
//! reports the first violation with the offending entity id. The playback
//! engine lives in `playtree-playback`.

mod error;

pub mod document;
pub mod graph;
pub mod types;
pub mod validate;

pub use document::PlaytreeDoc;
pub use error::{PlaytreeError, Result};
pub use graph::{Edge, EdgeIx, HeadAnchor, Node, NodeIx, Playtree};
pub use validate::validate;
