//! Audio backends
//!
//! The platform seam: one playitem in, sound out. The engine and drivers
//! are backend-agnostic; anything that can emit a playitem and halt when
//! its emission future is dropped will do.

use crate::error::{PlaybackError, Result};
use async_trait::async_trait;
use playtree_core::types::{Playitem, Source};
use std::env;
use tokio::process::Command;
use tracing::debug;

/// Emits playitems
#[async_trait]
pub trait AudioBackend: Send + Sync {
    /// Play one item to completion
    ///
    /// Dropping the returned future must halt the audio immediately; stop
    /// and skip cancel through it.
    async fn emit(&self, item: &Playitem) -> Result<()>;
}

/// Plays local items through an OS audio player subprocess
///
/// The player command receives the item uri with the audio path prefix
/// prepended. The child is killed when the emission future is dropped, so
/// stop and skip take effect without a separate signalling path.
#[derive(Debug, Clone)]
pub struct ProcessBackend {
    command: String,
    audio_path: String,
}

impl ProcessBackend {
    pub fn new(command: impl Into<String>, audio_path: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            audio_path: audio_path.into(),
        }
    }

    /// Default player command, with the prefix from `AUDIO_PATH`
    pub fn from_env() -> Self {
        Self::new("afplay", env::var("AUDIO_PATH").unwrap_or_default())
    }
}

#[async_trait]
impl AudioBackend for ProcessBackend {
    async fn emit(&self, item: &Playitem) -> Result<()> {
        if item.kind.source != Source::Local {
            // only local items have audio an OS process can reach
            debug!("skipping emission of non-local playitem {}", item.uri);
            return Ok(());
        }

        let path = format!("{}{}", self.audio_path, item.uri);
        let status = Command::new(&self.command)
            .arg(&path)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|err| PlaybackError::Backend(format!("{}: {err}", self.command)))?;

        if !status.success() {
            return Err(PlaybackError::Backend(format!(
                "{} exited with {status} playing {path}",
                self.command
            )));
        }
        Ok(())
    }
}
