use std::collections::HashMap;

use crate::types::{new_id, now_millis, Board, BoardId, ColumnId, DEFAULT_BOARD_NAME};

/// Board map plus the active-board pointer.
#[derive(Debug, Default)]
pub struct BoardStore {
    boards: HashMap<BoardId, Board>,
    active_board_id: Option<BoardId>,
}

impl BoardStore {
    /// Create a board with an empty column order and make it active.
    pub fn create(&mut self, name: &str) -> Board {
        let now = now_millis();
        let name = name.trim();
        let board = Board {
            id: new_id(),
            name: if name.is_empty() {
                DEFAULT_BOARD_NAME.to_string()
            } else {
                name.to_string()
            },
            column_order: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.active_board_id = Some(board.id.clone());
        self.boards.insert(board.id.clone(), board.clone());
        board
    }

    pub fn get(&self, id: &str) -> Option<&Board> {
        self.boards.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.boards.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Board> {
        self.boards.values()
    }

    pub fn len(&self) -> usize {
        self.boards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }

    pub fn active_board_id(&self) -> Option<&BoardId> {
        self.active_board_id.as_ref()
    }

    pub fn set_active(&mut self, id: Option<BoardId>) {
        self.active_board_id = id;
    }

    /// Rename a board. No-op if the id is unknown.
    pub fn rename(&mut self, id: &str, name: &str) {
        if let Some(board) = self.boards.get_mut(id) {
            board.name = name.trim().to_string();
            if board.name.is_empty() {
                board.name = DEFAULT_BOARD_NAME.to_string();
            }
            board.updated_at = now_millis();
        }
    }

    /// Replace a board's column order wholesale.
    pub fn set_column_order(&mut self, id: &str, column_order: Vec<ColumnId>) {
        if let Some(board) = self.boards.get_mut(id) {
            board.column_order = column_order;
            board.updated_at = now_millis();
        }
    }

    /// Remove a board. The active pointer falls back to any remaining board.
    pub fn delete(&mut self, id: &str) {
        self.boards.remove(id);
        if self.active_board_id.as_deref() == Some(id) {
            self.active_board_id = self.boards.keys().next().cloned();
        }
    }

    /// Replace the whole map (persistence hydration).
    pub fn hydrate(&mut self, boards: HashMap<BoardId, Board>, active: Option<BoardId>) {
        self.boards = boards;
        // Never hydrate a dangling active pointer.
        self.active_board_id = active.filter(|id| self.boards.contains_key(id));
    }

    pub fn snapshot(&self) -> HashMap<BoardId, Board> {
        self.boards.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sets_active_and_defaults_name() {
        let mut store = BoardStore::default();
        let board = store.create("   ");
        assert_eq!(board.name, DEFAULT_BOARD_NAME);
        assert_eq!(store.active_board_id(), Some(&board.id));
    }

    #[test]
    fn test_delete_moves_active_pointer() {
        let mut store = BoardStore::default();
        let a = store.create("A");
        let b = store.create("B");
        assert_eq!(store.active_board_id(), Some(&b.id));
        store.delete(&b.id);
        assert_eq!(store.active_board_id(), Some(&a.id));
        store.delete(&a.id);
        assert_eq!(store.active_board_id(), None);
    }

    #[test]
    fn test_hydrate_drops_dangling_active_pointer() {
        let mut store = BoardStore::default();
        let board = store.create("A");
        let map = store.snapshot();
        let mut fresh = BoardStore::default();
        fresh.hydrate(map.clone(), Some("missing".to_string()));
        assert_eq!(fresh.active_board_id(), None);
        fresh.hydrate(map, Some(board.id.clone()));
        assert_eq!(fresh.active_board_id(), Some(&board.id));
    }
}
