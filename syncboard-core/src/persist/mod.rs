//! Persistence codec: the whole application state is serialized into one
//! versioned JSON envelope under a single storage key.
//!
//! Load semantics are all-or-nothing: a blob missing any of the four
//! top-level collections fails to decode and is treated as "no persisted
//! state", never partially hydrated. Write failures are logged and
//! swallowed; in-memory state stays authoritative for the session.

pub mod local;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::store::Stores;
use crate::types::{Activity, ActivityId, Board, BoardId, Card, CardId, Column, ColumnId};

/// The single storage slot everything lives under.
pub const STORAGE_KEY: &str = "sync-app-state";
pub const STORAGE_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Opaque single-blob key-value storage ("read one blob, write one blob").
pub trait BlobStore: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// The versioned persistence envelope. Presence is ephemeral and deliberately
/// absent. The four collections are required fields, which is what makes a
/// structurally incomplete blob fail wholesale at decode time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub version: u32,
    pub boards: HashMap<BoardId, Board>,
    #[serde(default)]
    pub active_board_id: Option<BoardId>,
    pub columns: HashMap<ColumnId, Column>,
    pub cards: HashMap<CardId, Card>,
    pub activity: HashMap<ActivityId, Activity>,
}

/// Capture the persistable stores into an envelope.
pub fn snapshot(stores: &Stores) -> PersistedState {
    PersistedState {
        version: STORAGE_VERSION,
        boards: stores.boards.snapshot(),
        active_board_id: stores.boards.active_board_id().cloned(),
        columns: stores.columns.snapshot(),
        cards: stores.cards.snapshot(),
        activity: stores.activity.snapshot(),
    }
}

/// Replace store contents with the envelope's. Presence is untouched.
pub fn hydrate(stores: &mut Stores, state: PersistedState) {
    stores
        .boards
        .hydrate(state.boards, state.active_board_id);
    stores.columns.hydrate(state.columns);
    stores.cards.hydrate(state.cards);
    stores.activity.hydrate(state.activity);
}

/// Load persisted state into the stores. Returns whether anything was
/// hydrated; absence and unreadable/incomplete blobs both mean fresh start.
pub fn load(stores: &mut Stores, blob_store: &dyn BlobStore) -> bool {
    let raw = match blob_store.read(STORAGE_KEY) {
        Some(raw) => raw,
        None => return false,
    };
    match serde_json::from_str::<PersistedState>(&raw) {
        Ok(state) => {
            hydrate(stores, state);
            true
        }
        Err(e) => {
            log::warn!(
                "[syncboard.persist.load] Discarding unreadable state blob: {}",
                e
            );
            false
        }
    }
}

/// Serialize the stores and write the blob. Failures are logged and
/// swallowed; the caller's in-memory state is never rolled back.
pub fn save(stores: &Stores, blob_store: &dyn BlobStore) {
    let state = snapshot(stores);
    let raw = match serde_json::to_string(&state) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("[syncboard.persist.save] Serialize failed: {}", e);
            return;
        }
    };
    if let Err(e) = blob_store.write(STORAGE_KEY, &raw) {
        log::warn!("[syncboard.persist.save] Write failed, state kept in memory: {}", e);
    }
}

/// In-memory blob store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: std::sync::Mutex<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Option<String> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
        self.blobs
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
