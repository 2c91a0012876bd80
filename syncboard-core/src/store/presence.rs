use std::collections::HashMap;

use crate::types::{now_millis, CardId, ColumnId, PresenceId, PresenceUser, AVATAR_COLORS};

/// Ephemeral presence state. Reset on reload; never persisted as live data.
#[derive(Debug, Default)]
pub struct PresenceStore {
    users: HashMap<PresenceId, PresenceUser>,
    current_user_id: Option<PresenceId>,
    color_index: usize,
}

impl PresenceStore {
    fn next_color(&mut self) -> String {
        let color = AVATAR_COLORS
            .get(self.color_index % AVATAR_COLORS.len())
            .copied()
            .unwrap_or("#737373");
        self.color_index += 1;
        color.to_string()
    }

    /// Insert a user, or refresh name/last-seen for an existing one.
    pub fn add_or_update(&mut self, id: &str, name: &str, avatar_color: Option<String>) {
        if let Some(user) = self.users.get_mut(id) {
            user.name = name.to_string();
            user.last_seen = now_millis();
            if let Some(color) = avatar_color {
                user.avatar_color = color;
            }
            return;
        }
        let color = avatar_color.unwrap_or_else(|| self.next_color());
        self.users.insert(
            id.to_string(),
            PresenceUser {
                id: id.to_string(),
                name: name.to_string(),
                avatar_color: color,
                current_card_id: None,
                current_column_id: None,
                last_seen: now_millis(),
            },
        );
    }

    pub fn set_location(&mut self, id: &str, card_id: Option<CardId>, column_id: Option<ColumnId>) {
        if let Some(user) = self.users.get_mut(id) {
            user.current_card_id = card_id;
            user.current_column_id = column_id;
            user.last_seen = now_millis();
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.users.remove(id);
        if self.current_user_id.as_deref() == Some(id) {
            self.current_user_id = None;
        }
    }

    pub fn get(&self, id: &str) -> Option<&PresenceUser> {
        self.users.get(id)
    }

    pub fn set_current_user(&mut self, id: Option<PresenceId>) {
        self.current_user_id = id;
    }

    pub fn current_user_id(&self) -> Option<&PresenceId> {
        self.current_user_id.as_ref()
    }

    /// All users, most recently seen first.
    pub fn users_by_last_seen(&self) -> Vec<&PresenceUser> {
        let mut users: Vec<&PresenceUser> = self.users.values().collect();
        users.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_rotation_assigns_distinct_colors() {
        let mut store = PresenceStore::default();
        store.add_or_update("u1", "Alex", None);
        store.add_or_update("u2", "Sam", None);
        let a = store.get("u1").unwrap().avatar_color.clone();
        let b = store.get("u2").unwrap().avatar_color.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_or_update_keeps_existing_color() {
        let mut store = PresenceStore::default();
        store.add_or_update("u1", "Alex", None);
        let color = store.get("u1").unwrap().avatar_color.clone();
        store.add_or_update("u1", "Alexandra", None);
        let user = store.get("u1").unwrap();
        assert_eq!(user.name, "Alexandra");
        assert_eq!(user.avatar_color, color);
    }

    #[test]
    fn test_remove_clears_current_user_pointer() {
        let mut store = PresenceStore::default();
        store.add_or_update("u1", "Alex", None);
        store.set_current_user(Some("u1".to_string()));
        store.remove("u1");
        assert_eq!(store.current_user_id(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_location_updates_last_seen() {
        let mut store = PresenceStore::default();
        store.add_or_update("u1", "Alex", None);
        store.set_location("u1", None, Some("c1".to_string()));
        let user = store.get("u1").unwrap();
        assert_eq!(user.current_column_id.as_deref(), Some("c1"));
        assert_eq!(user.current_card_id, None);
    }
}
