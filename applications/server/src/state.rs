/// Shared application state
use crate::store::DocumentStore;
use playtree_playback::{AudioBackend, PlayerSession};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-user player sessions
///
/// The session facade is the only mutator of this table; handlers lock
/// it, drive the facade, and release.
pub type PlayerTable = Arc<Mutex<HashMap<String, PlayerSession>>>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub players: PlayerTable,
    pub backend: Arc<dyn AudioBackend>,
}

impl AppState {
    pub fn new(store: DocumentStore, backend: Arc<dyn AudioBackend>) -> Self {
        Self {
            store: Arc::new(store),
            players: Arc::new(Mutex::new(HashMap::new())),
            backend,
        }
    }
}
