//! Application session: stores + persistence wired together.
//!
//! The session is the single writer. Every mutating call goes through the
//! ops layer and then persists the full snapshot; a failed write never
//! fails the operation (in-memory state stays authoritative). Shareable via
//! `Arc` so the presence simulation mutates the same state as the caller,
//! serialized by the inner lock.

use std::sync::RwLock;

use crate::dnd::{self, DragEnd, DropOutcome};
use crate::migrate;
use crate::ops::{self, OpError};
use crate::persist::{self, BlobStore};
use crate::store::{CardPatch, Stores};
use crate::types::{Board, BoardId, Card, CardId, Column, ColumnId, PresenceId};

pub struct Session {
    stores: RwLock<Stores>,
    blob_store: Box<dyn BlobStore>,
}

impl Session {
    /// Open a session against a blob store: hydrate persisted state if a
    /// readable blob exists (fresh start otherwise), then run the one-off
    /// title cleanup.
    pub fn open(blob_store: Box<dyn BlobStore>) -> Self {
        let mut stores = Stores::new();
        let hydrated = persist::load(&mut stores, blob_store.as_ref());
        if hydrated && migrate::migrate_simulation_titles(&mut stores) {
            persist::save(&stores, blob_store.as_ref());
        }
        log::info!(
            "[syncboard.session.open] {} ({} boards)",
            if hydrated { "hydrated persisted state" } else { "fresh state" },
            stores.boards.len()
        );
        Self {
            stores: RwLock::new(stores),
            blob_store,
        }
    }

    /// Read-only access to the stores.
    pub fn read<R>(&self, f: impl FnOnce(&Stores) -> R) -> R {
        f(&self.stores.read().unwrap())
    }

    /// Run a mutation and persist the resulting snapshot.
    fn mutate<R>(&self, f: impl FnOnce(&mut Stores) -> R) -> R {
        let mut stores = self.stores.write().unwrap();
        let out = f(&mut stores);
        persist::save(&stores, self.blob_store.as_ref());
        out
    }

    pub fn create_board(&self, name: &str) -> Board {
        self.mutate(|s| ops::create_board(s, name))
    }

    pub fn set_active_board(&self, id: Option<BoardId>) {
        self.mutate(|s| s.boards.set_active(id));
    }

    pub fn rename_board(&self, id: &str, name: &str) {
        self.mutate(|s| s.boards.rename(id, name));
    }

    pub fn delete_board(&self, id: &str) -> Result<(), OpError> {
        self.mutate(|s| ops::delete_board(s, id))
    }

    pub fn create_column(&self, board_id: &str, title: &str) -> Result<Column, OpError> {
        self.mutate(|s| ops::create_column(s, board_id, title))
    }

    pub fn rename_column(&self, column_id: &str, title: &str) -> Result<(), OpError> {
        self.mutate(|s| ops::rename_column(s, column_id, title))
    }

    pub fn toggle_column_collapsed(&self, column_id: &str) {
        self.mutate(|s| s.columns.toggle_collapsed(column_id));
    }

    pub fn delete_column(&self, column_id: &str) -> Result<(), OpError> {
        self.mutate(|s| ops::delete_column(s, column_id))
    }

    pub fn create_card(&self, column_id: &str, title: &str) -> Result<Card, OpError> {
        self.mutate(|s| ops::create_card(s, column_id, title))
    }

    /// The keyboard 'n' shortcut: untitled card in the board's first column.
    pub fn create_card_via_shortcut(&self, board_id: &str) -> Result<Option<Card>, OpError> {
        self.mutate(|s| ops::create_card_via_shortcut(s, board_id))
    }

    pub fn edit_card(&self, card_id: &str, patch: CardPatch) -> Result<(), OpError> {
        self.mutate(|s| ops::edit_card(s, card_id, patch))
    }

    pub fn delete_card(&self, card_id: &str) -> Result<(), OpError> {
        self.mutate(|s| ops::delete_card(s, card_id))
    }

    pub fn move_card(
        &self,
        card_id: &str,
        target_column_id: &str,
        index: usize,
        user_name: Option<&str>,
    ) -> Result<bool, OpError> {
        self.mutate(|s| ops::move_card(s, card_id, target_column_id, index, user_name))
    }

    pub fn apply_drag_end(&self, board_id: &BoardId, event: &DragEnd) -> DropOutcome {
        self.mutate(|s| dnd::apply_drag_end(s, board_id, event))
    }

    pub fn prune_stale_orders(&self, board_id: &str) -> bool {
        self.mutate(|s| ops::prune_stale_orders(s, board_id))
    }

    // Presence is ephemeral: mutations skip the persist step.

    pub fn add_presence_user(&self, id: &str, name: &str) {
        self.stores
            .write()
            .unwrap()
            .presence
            .add_or_update(id, name, None);
    }

    pub fn set_presence_location(
        &self,
        id: &str,
        card_id: Option<CardId>,
        column_id: Option<ColumnId>,
    ) {
        self.stores
            .write()
            .unwrap()
            .presence
            .set_location(id, card_id, column_id);
    }

    pub fn remove_presence_user(&self, id: &str) {
        self.stores.write().unwrap().presence.remove(id);
    }

    pub fn set_current_presence_user(&self, id: Option<PresenceId>) {
        self.stores.write().unwrap().presence.set_current_user(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{BlobStore, MemoryBlobStore, PersistError, STORAGE_KEY};
    use std::sync::Arc;

    #[test]
    fn test_every_mutation_persists() {
        let blob_store = Arc::new(MemoryBlobStore::new());
        let session = Session::open(Box::new(SharedStore(blob_store.clone())));
        assert!(blob_store.read(STORAGE_KEY).is_none());

        let board = session.create_board("B1");
        assert!(blob_store.read(STORAGE_KEY).unwrap().contains(&board.id));

        let col = session.create_column(&board.id, "Todo").unwrap();
        assert!(blob_store.read(STORAGE_KEY).unwrap().contains(&col.id));
    }

    #[test]
    fn test_reopen_restores_state() {
        let blob_store = Arc::new(MemoryBlobStore::new());
        let board_id;
        {
            let session = Session::open(Box::new(SharedStore(blob_store.clone())));
            let board = session.create_board("B1");
            let col = session.create_column(&board.id, "Todo").unwrap();
            session.create_card(&col.id, "task").unwrap();
            board_id = board.id;
        }
        let session = Session::open(Box::new(SharedStore(blob_store)));
        session.read(|s| {
            assert!(s.boards.contains(&board_id));
            assert_eq!(s.cards.iter().count(), 1);
            assert_eq!(s.boards.active_board_id(), Some(&board_id));
        });
    }

    #[test]
    fn test_reopen_runs_title_migration() {
        let blob_store = Arc::new(MemoryBlobStore::new());
        {
            let session = Session::open(Box::new(SharedStore(blob_store.clone())));
            let board = session.create_board("B1");
            let col = session.create_column(&board.id, "Todo").unwrap();
            session.create_card(&col.id, "Fix login WIP").unwrap();
        }
        let session = Session::open(Box::new(SharedStore(blob_store)));
        session.read(|s| {
            let card = s.cards.iter().next().unwrap();
            assert_eq!(card.title, crate::types::DEFAULT_CARD_TITLE);
        });
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        struct QuotaExceeded;
        impl BlobStore for QuotaExceeded {
            fn read(&self, _key: &str) -> Option<String> {
                None
            }
            fn write(&self, _key: &str, _value: &str) -> Result<(), PersistError> {
                Err(PersistError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "quota exceeded",
                )))
            }
        }
        let session = Session::open(Box::new(QuotaExceeded));
        let board = session.create_board("B1");
        session.read(|s| assert!(s.boards.contains(&board.id)));
    }

    #[test]
    fn test_presence_is_not_persisted() {
        let blob_store = Arc::new(MemoryBlobStore::new());
        {
            let session = Session::open(Box::new(SharedStore(blob_store.clone())));
            session.create_board("B1");
            session.add_presence_user("sim-1", "Alex");
        }
        let session = Session::open(Box::new(SharedStore(blob_store)));
        session.read(|s| assert!(s.presence.is_empty()));
    }

    /// Adapter so tests can keep a handle on the store a session owns.
    struct SharedStore(Arc<MemoryBlobStore>);
    impl BlobStore for SharedStore {
        fn read(&self, key: &str) -> Option<String> {
            self.0.read(key)
        }
        fn write(&self, key: &str, value: &str) -> Result<(), PersistError> {
            self.0.write(key, value)
        }
    }
}
