use std::collections::HashMap;

use crate::types::{new_id, now_millis, Activity, ActivityId, ActivityKind, ActivityPayload};

/// Append-only activity log. Records are never mutated or compacted;
/// board filtering and ordering happen at read time.
#[derive(Debug, Default)]
pub struct ActivityStore {
    activities: HashMap<ActivityId, Activity>,
}

impl ActivityStore {
    pub fn record(&mut self, board_id: &str, kind: ActivityKind, payload: ActivityPayload) -> Activity {
        let activity = Activity {
            id: new_id(),
            board_id: board_id.to_string(),
            kind,
            payload,
            timestamp: now_millis(),
        };
        self.activities.insert(activity.id.clone(), activity.clone());
        activity
    }

    pub fn get(&self, id: &str) -> Option<&Activity> {
        self.activities.get(id)
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// Activity for one board, newest first.
    pub fn for_board(&self, board_id: &str) -> Vec<&Activity> {
        let mut entries: Vec<&Activity> = self
            .activities
            .values()
            .filter(|a| a.board_id == board_id)
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    pub fn hydrate(&mut self, activities: HashMap<ActivityId, Activity>) {
        self.activities = activities;
    }

    pub fn snapshot(&self) -> HashMap<ActivityId, Activity> {
        self.activities.clone()
    }
}
