//! Player events
//!
//! The state transitions the engine publishes while traversing. Delivery
//! is best-effort over a bounded port: a slow consumer loses transitions
//! but can never stall traversal.

use serde::{Deserialize, Serialize};

/// A state transition published by the traversal engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Traversal began on this playhead
    StartedAt { playhead: String },

    /// The active playhead finished; traversal rotated to this one
    DefaultedTo { playhead: String },

    /// A sub-index of the active node began emitting
    NowPlaying { node: String, position: usize },

    /// The active node's driver finished
    NodeFinished { node: String },

    /// A skip was forwarded to the active driver
    SkippingNext,

    /// History was popped and the playhead restored
    SkippingBack,

    /// The active head rotated left
    MovedLeft { playhead: String },

    /// The active head rotated right
    MovedRight { playhead: String },

    /// Every playhead is finished; the engine is done
    AllFinished,
}
