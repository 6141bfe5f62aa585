//! Error types for playback

use thiserror::Error;

/// Result type alias using `PlaybackError`
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No engine is loaded in this session
    #[error("no active session")]
    NoActiveSession,

    /// The engine's action port is gone
    #[error("player channel closed")]
    ChannelClosed,

    /// The audio backend failed to start or terminated abnormally
    #[error("audio backend error: {0}")]
    Backend(String),

    /// Document or graph error from the core
    #[error(transparent)]
    Core(#[from] playtree_core::PlaytreeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
