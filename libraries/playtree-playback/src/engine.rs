//! The traversal engine
//!
//! Moves playheads through a validated playtree: spawns the active node's
//! content driver, tracks sub-positions and history, samples successor
//! edges under priority tiers and repeat budgets, and serves user actions
//! while audio is emitted.
//!
//! Concurrency shape: the engine is a coordinator task that exclusively
//! owns all mutable traversal state. It suspends in exactly one select,
//! over the inbound action port and the active driver's signal port. The
//! driver is a sibling task; cancellation is signalled (skip), never
//! timed.

use crate::backend::AudioBackend;
use crate::driver::{Driver, DriverCommand, DriverSignal};
use crate::error::Result;
use crate::events::PlayerEvent;
use crate::history::{History, HistoryEntry};
use crate::sampler::{select_next_edge, EdgeCounters};
use playtree_core::{EdgeIx, NodeIx, Playtree};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The user-action alphabet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Release a stopped driver
    Play,
    /// Suspend the active driver
    Stop,
    /// Skip past the current sub-item
    Next,
    /// Pop history and re-enter; with empty history, same as Stop
    Back,
    /// Rotate the active head left
    Left,
    /// Rotate the active head right
    Right,
}

/// Engine tuning
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Fixed RNG seed; `None` seeds from the OS. A fixed seed makes a
    /// traversal reproducible end to end.
    pub seed: Option<u64>,
}

/// A traversal cursor: current node, intra-node sub-position, history
#[derive(Debug)]
struct Playhead {
    name: String,
    node: Option<NodeIx>,
    position: usize,
    history: History,
}

/// Final state of one playhead
#[derive(Debug, Clone)]
pub struct PlayheadReport {
    pub name: String,
    /// Every (node, sub-position) the head exited, oldest first, minus
    /// whatever Back consumed
    pub history: Vec<HistoryEntry>,
}

/// What the engine leaves behind when it returns
#[derive(Debug, Clone)]
pub struct EngineReport {
    pub playheads: Vec<PlayheadReport>,
}

const PORT_CAPACITY: usize = 32;

/// The playback state machine for one playtree
pub struct Engine {
    playtree: Arc<Playtree>,
    backend: Arc<dyn AudioBackend>,
    playheads: Vec<Playhead>,
    counters: EdgeCounters,
    active: usize,
    rng: StdRng,
    actions: mpsc::Receiver<Action>,
    events: mpsc::Sender<PlayerEvent>,
}

impl Engine {
    /// Build an engine plus its action and event ports
    ///
    /// One playhead is created per playroot, ordered by playroot index.
    pub fn new(
        playtree: Arc<Playtree>,
        backend: Arc<dyn AudioBackend>,
        config: EngineConfig,
    ) -> (Self, mpsc::Sender<Action>, mpsc::Receiver<PlayerEvent>) {
        let (action_tx, action_rx) = mpsc::channel(PORT_CAPACITY);
        let (event_tx, event_rx) = mpsc::channel(PORT_CAPACITY);

        let playheads = playtree
            .anchors()
            .iter()
            .map(|anchor| Playhead {
                name: anchor.name.clone(),
                node: Some(anchor.node),
                position: 0,
                history: History::new(),
            })
            .collect();

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let engine = Self {
            playtree,
            backend,
            playheads,
            counters: EdgeCounters::new(),
            active: 0,
            rng,
            actions: action_rx,
            events: event_tx,
        };
        (engine, action_tx, event_rx)
    }

    /// Publish a transition; best-effort so a slow consumer cannot stall
    /// traversal
    fn publish(&self, event: PlayerEvent) {
        if self.events.try_send(event).is_err() {
            debug!("event port full or closed; transition dropped");
        }
    }

    /// Drive the playtree until every playhead is finished
    ///
    /// Invariant: at any quiescent point, if some playhead has a non-null
    /// node, exactly one playhead is active and has a live driver task.
    pub async fn run(mut self) -> Result<EngineReport> {
        if !self.playheads.is_empty() {
            info!("STARTING AT PLAYHEAD {}", self.playheads[self.active].name);
            self.publish(PlayerEvent::StartedAt {
                playhead: self.playheads[self.active].name.clone(),
            });
        }

        'playhead: while self.playheads.iter().any(|head| head.node.is_some()) {
            // rotate forward past finished heads
            let mut defaulted = false;
            while self.playheads[self.active].node.is_none() {
                self.active = (self.active + 1) % self.playheads.len();
                defaulted = true;
            }
            if defaulted {
                info!("DEFAULTING TO PLAYHEAD {}", self.playheads[self.active].name);
                self.publish(PlayerEvent::DefaultedTo {
                    playhead: self.playheads[self.active].name.clone(),
                });
            }

            let Some(node_ix) = self.playheads[self.active].node else {
                continue 'playhead;
            };
            let playtree = Arc::clone(&self.playtree);
            let node = playtree.node(node_ix);

            // spawn the node's driver at the head's sub-position
            let (signal_tx, mut signals) = mpsc::channel(PORT_CAPACITY);
            let (commands, command_rx) = mpsc::channel(PORT_CAPACITY);
            let driver = Driver::new(node, Arc::clone(&self.backend));
            let resume = self.playheads[self.active].position;
            let driver_task = tokio::spawn(driver.run(resume, signal_tx, command_rx));

            // the first position signal echoes the resume point; only the
            // later ones mark sub-advances worth remembering
            let mut entered = false;
            loop {
                tokio::select! {
                    action = self.actions.recv() => match action {
                        Some(Action::Play) => {
                            let _ = commands.send(DriverCommand::Play).await;
                        }
                        Some(Action::Stop) => {
                            let _ = commands.send(DriverCommand::Stop).await;
                        }
                        Some(Action::Next) => {
                            info!("SKIPPING TO NEXT");
                            self.publish(PlayerEvent::SkippingNext);
                            let _ = commands.send(DriverCommand::Skip).await;
                        }
                        Some(Action::Back) => {
                            let head = &mut self.playheads[self.active];
                            if let Some(entry) = head.history.pop() {
                                let _ = commands.send(DriverCommand::Skip).await;
                                head.node = Some(entry.node);
                                head.position = entry.position;
                                info!("SKIPPING BACK");
                                self.publish(PlayerEvent::SkippingBack);
                                continue 'playhead;
                            }
                            // nothing to return to: Back degrades to Stop
                            let _ = commands.send(DriverCommand::Stop).await;
                        }
                        Some(Action::Left) => {
                            let _ = commands.send(DriverCommand::Skip).await;
                            self.active =
                                (self.active + self.playheads.len() - 1) % self.playheads.len();
                            info!("MOVING LEFT TO PLAYHEAD {}", self.playheads[self.active].name);
                            self.publish(PlayerEvent::MovedLeft {
                                playhead: self.playheads[self.active].name.clone(),
                            });
                            continue 'playhead;
                        }
                        Some(Action::Right) => {
                            let _ = commands.send(DriverCommand::Skip).await;
                            self.active = (self.active + 1) % self.playheads.len();
                            info!("MOVING RIGHT TO PLAYHEAD {}", self.playheads[self.active].name);
                            self.publish(PlayerEvent::MovedRight {
                                playhead: self.playheads[self.active].name.clone(),
                            });
                            continue 'playhead;
                        }
                        None => {
                            // the session went away; cut the driver so the
                            // audio subprocess dies with it
                            driver_task.abort();
                            return Ok(self.into_report());
                        }
                    },
                    signal = signals.recv() => match signal {
                        Some(DriverSignal::Position(position)) => {
                            let head = &mut self.playheads[self.active];
                            if entered {
                                head.history.push(HistoryEntry {
                                    node: node_ix,
                                    position: head.position,
                                });
                            }
                            entered = true;
                            head.position = position;
                            self.publish(PlayerEvent::NowPlaying {
                                node: node.id.clone(),
                                position,
                            });
                        }
                        Some(DriverSignal::Done) => break,
                        None => {
                            // driver died without a done; traversal continues
                            warn!("driver for {} ended without signalling done", node.id);
                            break;
                        }
                    },
                }
            }

            // natural exit: remember the exiting (node, sub-position),
            // then sample the successor
            {
                let head = &mut self.playheads[self.active];
                head.history.push(HistoryEntry {
                    node: node_ix,
                    position: head.position,
                });
            }
            self.publish(PlayerEvent::NodeFinished {
                node: node.id.clone(),
            });

            match select_next_edge(node, node_ix, &self.counters, &mut self.rng) {
                Some(position) => {
                    let edge = &node.edges[position];
                    if edge.limit >= 0 {
                        self.counters.record(EdgeIx {
                            node: node_ix,
                            edge: position,
                        });
                    }
                    let head = &mut self.playheads[self.active];
                    head.node = Some(edge.target);
                    // a fresh node starts at its first sub-item; resume
                    // positions only come from Back
                    head.position = 0;
                }
                None => {
                    let head = &mut self.playheads[self.active];
                    head.node = None;
                    head.position = 0;
                }
            }
        }

        info!("PLAYHEADS ALL FINISHED");
        self.publish(PlayerEvent::AllFinished);
        Ok(self.into_report())
    }

    fn into_report(self) -> EngineReport {
        EngineReport {
            playheads: self
                .playheads
                .into_iter()
                .map(|head| PlayheadReport {
                    name: head.name,
                    history: head.history.into_entries(),
                })
                .collect(),
        }
    }
}
