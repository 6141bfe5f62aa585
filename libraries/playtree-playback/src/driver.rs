//! Content drivers
//!
//! Every playnode kind implements one contract: start emitting at a
//! sub-position, publish the live sub-index, accept play/stop/skip, and
//! signal done exactly once. A driver runs as its own task so the engine
//! can keep serving user actions while audio is emitted.

use crate::backend::AudioBackend;
use playtree_core::types::{Playitem, PlaynodeKind};
use playtree_core::Node;
use rand::Rng;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Control messages from the engine to the active driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverCommand {
    /// Release a stopped driver
    Play,
    /// Suspend emission; the current item rewinds, the sub-position holds
    Stop,
    /// Advance past the current sub-item
    Skip,
}

/// Signals from the active driver to the engine
///
/// One ordered port carries both kinds, so a position update can never be
/// observed after the done that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverSignal {
    /// The sub-index now emitting
    Position(usize),
    /// Emission finished; sent exactly once
    Done,
}

/// How one item's emission ended
enum ItemEnd {
    /// Finished naturally or was skipped out
    Finished,
    /// The engine went away; unwind without signalling
    Disconnected,
}

/// A playnode's runtime content: the node kind driving its playitems
pub struct Driver {
    kind: PlaynodeKind,
    items: Vec<Playitem>,
    backend: Arc<dyn AudioBackend>,
}

impl Driver {
    /// Build the driver for a node
    pub fn new(node: &Node, backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            kind: node.kind,
            items: node.playitems.clone(),
            backend,
        }
    }

    /// Run to completion; `resume` is the sub-position to start from
    pub async fn run(
        self,
        resume: usize,
        signals: mpsc::Sender<DriverSignal>,
        mut commands: mpsc::Receiver<DriverCommand>,
    ) {
        match self.kind {
            PlaynodeKind::Sequencer => self.run_sequencer(resume, &signals, &mut commands).await,
            PlaynodeKind::Selector => self.run_selector(&signals, &mut commands).await,
            PlaynodeKind::Simulplexer => self.run_simulplexer(&signals, &mut commands).await,
        }
    }

    /// Items in declared order, starting at `resume`
    async fn run_sequencer(
        &self,
        resume: usize,
        signals: &mpsc::Sender<DriverSignal>,
        commands: &mut mpsc::Receiver<DriverCommand>,
    ) {
        for index in resume..self.items.len() {
            if signals.send(DriverSignal::Position(index)).await.is_err() {
                return;
            }
            match play_item(&self.items[index], &*self.backend, commands).await {
                ItemEnd::Finished => {}
                ItemEnd::Disconnected => return,
            }
        }
        let _ = signals.send(DriverSignal::Done).await;
    }

    /// One item picked uniformly at random
    ///
    /// The resume position is not meaningful here: a selector re-picks on
    /// every entry.
    async fn run_selector(
        &self,
        signals: &mpsc::Sender<DriverSignal>,
        commands: &mut mpsc::Receiver<DriverCommand>,
    ) {
        let index = {
            let mut rng = rand::thread_rng();
            rng.gen_range(0..self.items.len())
        };
        if signals.send(DriverSignal::Position(index)).await.is_err() {
            return;
        }
        if let ItemEnd::Finished = play_item(&self.items[index], &*self.backend, commands).await {
            let _ = signals.send(DriverSignal::Done).await;
        }
    }

    /// All items in parallel; done when every child has finished
    ///
    /// Commands fan out to every child, so stop suspends them all and skip
    /// ends them all.
    async fn run_simulplexer(
        &self,
        signals: &mpsc::Sender<DriverSignal>,
        commands: &mut mpsc::Receiver<DriverCommand>,
    ) {
        if signals.send(DriverSignal::Position(0)).await.is_err() {
            return;
        }

        let mut children = Vec::with_capacity(self.items.len());
        let mut running = JoinSet::new();
        for item in &self.items {
            let (child_tx, mut child_rx) = mpsc::channel(8);
            children.push(child_tx);
            let item = item.clone();
            let backend = Arc::clone(&self.backend);
            running.spawn(async move {
                let _ = play_item(&item, &*backend, &mut child_rx).await;
            });
        }

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => {
                        for child in &children {
                            let _ = child.send(command).await;
                        }
                    }
                    None => {
                        running.abort_all();
                        return;
                    }
                },
                finished = running.join_next() => {
                    if finished.is_none() {
                        break;
                    }
                }
            }
        }
        let _ = signals.send(DriverSignal::Done).await;
    }
}

/// Emit one playitem, honoring stop, skip and play
///
/// While stopped, only play (resume from the remembered rewind point, the
/// item start) or skip (terminate) move things along. While emitting,
/// stop cancels the emission, skip ends the item, and play is a no-op.
async fn play_item(
    item: &Playitem,
    backend: &dyn AudioBackend,
    commands: &mut mpsc::Receiver<DriverCommand>,
) -> ItemEnd {
    let mut stopped = false;
    loop {
        if stopped {
            match commands.recv().await {
                Some(DriverCommand::Play) => stopped = false,
                Some(DriverCommand::Stop) => {} // idempotent
                Some(DriverCommand::Skip) => return ItemEnd::Finished,
                None => return ItemEnd::Disconnected,
            }
            continue;
        }

        info!("NOW PLAYING {}", item.name);
        let emission = backend.emit(item);
        tokio::pin!(emission);
        loop {
            tokio::select! {
                outcome = &mut emission => {
                    if let Err(err) = outcome {
                        // a failed backend is treated as a finished item
                        warn!("audio backend error on {}: {err}", item.uri);
                    }
                    return ItemEnd::Finished;
                }
                command = commands.recv() => match command {
                    Some(DriverCommand::Stop) => {
                        // dropping the emission halts the audio
                        info!("STOPPED AND REWOUND {}", item.name);
                        stopped = true;
                        break;
                    }
                    Some(DriverCommand::Skip) => return ItemEnd::Finished,
                    Some(DriverCommand::Play) => {} // already playing
                    None => return ItemEnd::Disconnected,
                }
            }
        }
    }
}
