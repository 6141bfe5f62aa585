//! Entity types for the playtree document format
//!
//! All of these decode strictly: unknown fields are rejected, and defaults
//! follow the document format (`shares` 1, `limit` -1, `priority` 0,
//! `repeat` 1, `multiplier` 1, `exponent` 0).

mod playedge;
mod playitem;
mod playnode;
mod playroot;
mod playscope;
mod summary;

pub use playedge::Playedge;
pub use playitem::{Playitem, PlayitemKind, Plurality, Source};
pub use playnode::{CanvasPosition, Playnode, PlaynodeKind};
pub use playroot::Playroot;
pub use playscope::Playscope;
pub use summary::{Access, Summary};
