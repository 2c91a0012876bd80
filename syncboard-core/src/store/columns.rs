use std::collections::HashMap;

use crate::types::{new_id, now_millis, BoardId, CardId, Column, ColumnId, DEFAULT_COLUMN_TITLE};

#[derive(Debug, Default)]
pub struct ColumnStore {
    columns: HashMap<ColumnId, Column>,
}

impl ColumnStore {
    /// Create a column with an empty card order. The caller is responsible
    /// for appending the id to the owning board's column order.
    pub fn create(&mut self, board_id: &str, title: &str) -> Column {
        let now = now_millis();
        let title = title.trim();
        let column = Column {
            id: new_id(),
            board_id: board_id.to_string(),
            title: if title.is_empty() {
                DEFAULT_COLUMN_TITLE.to_string()
            } else {
                title.to_string()
            },
            card_order: Vec::new(),
            collapsed: false,
            created_at: now,
            updated_at: now,
        };
        self.columns.insert(column.id.clone(), column.clone());
        column
    }

    pub fn get(&self, id: &str) -> Option<&Column> {
        self.columns.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.columns.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    pub fn columns_for_board<'a>(&'a self, board_id: &'a str) -> impl Iterator<Item = &'a Column> {
        self.columns.values().filter(move |c| c.board_id == board_id)
    }

    pub fn rename(&mut self, id: &str, title: &str) {
        if let Some(col) = self.columns.get_mut(id) {
            col.title = title.trim().to_string();
            if col.title.is_empty() {
                col.title = DEFAULT_COLUMN_TITLE.to_string();
            }
            col.updated_at = now_millis();
        }
    }

    /// Replace a column's card order wholesale.
    pub fn set_card_order(&mut self, id: &str, card_order: Vec<CardId>) {
        if let Some(col) = self.columns.get_mut(id) {
            col.card_order = card_order;
            col.updated_at = now_millis();
        }
    }

    pub fn toggle_collapsed(&mut self, id: &str) {
        if let Some(col) = self.columns.get_mut(id) {
            col.collapsed = !col.collapsed;
            col.updated_at = now_millis();
        }
    }

    /// Remove a column from the map only. Cascading (cards, board order)
    /// is the ops layer's job.
    pub fn delete(&mut self, id: &str) {
        self.columns.remove(id);
    }

    pub fn hydrate(&mut self, columns: HashMap<ColumnId, Column>) {
        self.columns = columns;
    }

    pub fn snapshot(&self) -> HashMap<ColumnId, Column> {
        self.columns.clone()
    }

    pub fn board_of(&self, id: &str) -> Option<&BoardId> {
        self.columns.get(id).map(|c| &c.board_id)
    }
}
