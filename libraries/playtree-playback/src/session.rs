//! Session facade
//!
//! Thin coordinator owning one engine per user session. All boundary
//! wiring goes through here: load a playtree, send an action, read the
//! current selection.

use crate::backend::AudioBackend;
use crate::engine::{Action, Engine, EngineConfig, EngineReport};
use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use playtree_core::Playtree;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

struct LoadedPlaytree {
    id: String,
    actions: mpsc::Sender<Action>,
    task: JoinHandle<Result<EngineReport>>,
}

/// One user's player: engine lifecycle plus the current selection
pub struct PlayerSession {
    backend: Arc<dyn AudioBackend>,
    config: EngineConfig,
    current: Option<LoadedPlaytree>,
}

impl PlayerSession {
    pub fn new(backend: Arc<dyn AudioBackend>, config: EngineConfig) -> Self {
        Self {
            backend,
            config,
            current: None,
        }
    }

    /// Load a playtree: stop any running engine, spawn a fresh one and
    /// record the selection
    ///
    /// Returns the new engine's event port. The port closes when every
    /// playhead finishes.
    pub async fn load(&mut self, playtree: Playtree) -> mpsc::Receiver<PlayerEvent> {
        self.stop().await;

        let id = playtree.summary().id.clone();
        let (engine, actions, events) = Engine::new(
            Arc::new(playtree),
            Arc::clone(&self.backend),
            self.config.clone(),
        );
        let task = tokio::spawn(engine.run());
        self.current = Some(LoadedPlaytree { id, actions, task });
        events
    }

    /// Forward an action to the running engine
    pub async fn send(&self, action: Action) -> Result<()> {
        let loaded = self.current.as_ref().ok_or(PlaybackError::NoActiveSession)?;
        loaded
            .actions
            .send(action)
            .await
            .map_err(|_| PlaybackError::ChannelClosed)
    }

    /// Id of the currently loaded playtree, if any
    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|loaded| loaded.id.as_str())
    }

    /// Tear down the running engine, if any, and collect its report
    ///
    /// Closing the action port wakes the engine, which cuts its driver
    /// task (killing the audio subprocess) and returns.
    pub async fn stop(&mut self) -> Option<EngineReport> {
        let loaded = self.current.take()?;
        drop(loaded.actions);
        match loaded.task.await {
            Ok(Ok(report)) => Some(report),
            Ok(Err(err)) => {
                warn!("engine ended with error: {err}");
                None
            }
            Err(err) => {
                warn!("engine task failed: {err}");
                None
            }
        }
    }
}
