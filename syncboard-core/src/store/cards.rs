use std::collections::HashMap;

use crate::types::{
    new_id, now_millis, BoardId, Card, CardId, CardLabel, ColumnId, MemberId, DEFAULT_CARD_TITLE,
};

/// Partial update for a card's editable fields. `None` leaves a field alone.
#[derive(Debug, Default, Clone)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Option<Vec<CardLabel>>,
    pub assigned_member_ids: Option<Vec<MemberId>>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<String>>,
}

#[derive(Debug, Default)]
pub struct CardStore {
    cards: HashMap<CardId, Card>,
}

impl CardStore {
    /// Create a card owned by `column_id`. The caller appends the id to the
    /// owning column's card order.
    pub fn create(&mut self, column_id: &str, board_id: &str, title: &str) -> Card {
        let now = now_millis();
        let title = title.trim();
        let card = Card {
            id: new_id(),
            column_id: column_id.to_string(),
            board_id: board_id.to_string(),
            title: if title.is_empty() {
                DEFAULT_CARD_TITLE.to_string()
            } else {
                title.to_string()
            },
            description: String::new(),
            labels: Vec::new(),
            assigned_member_ids: Vec::new(),
            due_date: None,
            created_at: now,
            updated_at: now,
        };
        self.cards.insert(card.id.clone(), card.clone());
        card
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn cards_for_board<'a>(&'a self, board_id: &'a str) -> impl Iterator<Item = &'a Card> {
        self.cards.values().filter(move |c| c.board_id == board_id)
    }

    /// Apply a field patch and stamp `updated_at`. No-op for unknown ids.
    pub fn update(&mut self, id: &str, patch: CardPatch) {
        if let Some(card) = self.cards.get_mut(id) {
            if let Some(title) = patch.title {
                let title = title.trim().to_string();
                card.title = if title.is_empty() {
                    DEFAULT_CARD_TITLE.to_string()
                } else {
                    title
                };
            }
            if let Some(description) = patch.description {
                card.description = description;
            }
            if let Some(labels) = patch.labels {
                card.labels = labels;
            }
            if let Some(members) = patch.assigned_member_ids {
                card.assigned_member_ids = members;
            }
            if let Some(due) = patch.due_date {
                card.due_date = due;
            }
            card.updated_at = now_millis();
        }
    }

    /// Repoint a card at another column. Order lists are the ops layer's job;
    /// this only keeps the denormalized `column_id` field.
    pub fn set_column(&mut self, id: &str, column_id: &str) {
        if let Some(card) = self.cards.get_mut(id) {
            card.column_id = column_id.to_string();
            card.updated_at = now_millis();
        }
    }

    pub fn delete(&mut self, id: &str) {
        self.cards.remove(id);
    }

    pub fn hydrate(&mut self, cards: HashMap<CardId, Card>) {
        self.cards = cards;
    }

    pub fn snapshot(&self) -> HashMap<CardId, Card> {
        self.cards.clone()
    }

    pub fn column_of(&self, id: &str) -> Option<&ColumnId> {
        self.cards.get(id).map(|c| &c.column_id)
    }

    pub fn board_of(&self, id: &str) -> Option<&BoardId> {
        self.cards.get(id).map(|c| &c.board_id)
    }

    /// Attach a label to a card, generating the label id.
    pub fn add_label(&mut self, id: &str, text: &str, color: crate::types::LabelColor) {
        if let Some(card) = self.cards.get_mut(id) {
            card.labels.push(CardLabel {
                id: new_id(),
                text: text.to_string(),
                color,
            });
            card.updated_at = now_millis();
        }
    }

    pub fn remove_label(&mut self, id: &str, label_id: &str) {
        if let Some(card) = self.cards.get_mut(id) {
            card.labels.retain(|l| l.id != label_id);
            card.updated_at = now_millis();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LabelColor;

    #[test]
    fn test_create_defaults_title() {
        let mut store = CardStore::default();
        let card = store.create("c1", "b1", "  ");
        assert_eq!(card.title, DEFAULT_CARD_TITLE);
        assert_eq!(card.column_id, "c1");
        assert_eq!(card.board_id, "b1");
    }

    #[test]
    fn test_patch_only_touches_given_fields() {
        let mut store = CardStore::default();
        let card = store.create("c1", "b1", "Write docs");
        store.update(
            &card.id,
            CardPatch {
                description: Some("draft outline".to_string()),
                ..Default::default()
            },
        );
        let stored = store.get(&card.id).unwrap();
        assert_eq!(stored.title, "Write docs");
        assert_eq!(stored.description, "draft outline");
    }

    #[test]
    fn test_due_date_can_be_cleared() {
        let mut store = CardStore::default();
        let card = store.create("c1", "b1", "x");
        store.update(
            &card.id,
            CardPatch {
                due_date: Some(Some("2026-09-01".to_string())),
                ..Default::default()
            },
        );
        assert_eq!(
            store.get(&card.id).unwrap().due_date.as_deref(),
            Some("2026-09-01")
        );
        store.update(
            &card.id,
            CardPatch {
                due_date: Some(None),
                ..Default::default()
            },
        );
        assert_eq!(store.get(&card.id).unwrap().due_date, None);
    }

    #[test]
    fn test_add_and_remove_label() {
        let mut store = CardStore::default();
        let card = store.create("c1", "b1", "x");
        store.add_label(&card.id, "bug", LabelColor::Red);
        let label_id = store.get(&card.id).unwrap().labels[0].id.clone();
        store.remove_label(&card.id, &label_id);
        assert!(store.get(&card.id).unwrap().labels.is_empty());
    }
}
