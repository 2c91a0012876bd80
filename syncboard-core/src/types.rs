use serde::{Deserialize, Serialize};

pub type BoardId = String;
pub type ColumnId = String;
pub type CardId = String;
pub type ActivityId = String;
pub type PresenceId = String;
pub type MemberId = String;

/// Fallback titles applied when a caller passes an empty or whitespace name.
pub const DEFAULT_BOARD_NAME: &str = "Untitled Board";
pub const DEFAULT_COLUMN_TITLE: &str = "Untitled";
pub const DEFAULT_CARD_TITLE: &str = "Untitled card";

/// Avatar color rotation for presence users and the member roster.
pub const AVATAR_COLORS: &[&str] = &[
    "#6366f1", "#8b5cf6", "#ec4899", "#ef4444", "#f97316", "#eab308", "#22c55e", "#14b8a6",
    "#3b82f6",
];

/// Display names used for the member roster and simulated collaborators.
pub const MEMBER_NAMES: &[&str] = &[
    "Alex", "Sam", "Jordan", "Taylor", "Casey", "Riley", "Morgan", "Quinn",
];

/// Current time as epoch milliseconds. All entity timestamps use this unit.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh entity id (UUID v4, string form).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    /// Display order of this board's columns. Exclusively owned by the board;
    /// must only reference columns that exist and belong to it.
    pub column_order: Vec<ColumnId>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    /// Display order of this column's cards. Must agree with each card's
    /// `column_id`; every mutating operation keeps the two in sync.
    pub card_order: Vec<CardId>,
    pub collapsed: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Fixed label palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl LabelColor {
    pub const ALL: &'static [LabelColor] = &[
        LabelColor::Gray,
        LabelColor::Red,
        LabelColor::Orange,
        LabelColor::Yellow,
        LabelColor::Green,
        LabelColor::Blue,
        LabelColor::Purple,
        LabelColor::Pink,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLabel {
    pub id: String,
    pub text: String,
    pub color: LabelColor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub column_id: ColumnId,
    pub board_id: BoardId,
    pub title: String,
    pub description: String,
    pub labels: Vec<CardLabel>,
    pub assigned_member_ids: Vec<MemberId>,
    pub due_date: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    CardCreated,
    CardMoved,
    CardEdited,
    CardDeleted,
    ColumnCreated,
    ColumnRenamed,
    ColumnDeleted,
}

/// Free-form activity payload. Every field is optional so records that
/// reference since-deleted entities still render without error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<CardId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_id: Option<ColumnId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_column_id: Option<ColumnId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_column_id: Option<ColumnId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// Immutable log entry describing one past mutation. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub board_id: BoardId,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub payload: ActivityPayload,
    pub timestamp: i64,
}

/// Ephemeral synthetic/simulated collaborator. Reset on reload; never
/// written into the persistence envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceUser {
    pub id: PresenceId,
    pub name: String,
    pub avatar_color: String,
    pub current_card_id: Option<CardId>,
    pub current_column_id: Option<ColumnId>,
    pub last_seen: i64,
}

/// A member that can be assigned to cards (fixed roster, no accounts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub avatar_color: String,
}

/// The fixed assignable-member roster.
pub fn member_roster() -> Vec<Member> {
    MEMBER_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| Member {
            id: format!("member-{}", i + 1),
            name: (*name).to_string(),
            avatar_color: AVATAR_COLORS[i % AVATAR_COLORS.len()].to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_color_serializes_lowercase() {
        let json = serde_json::to_string(&LabelColor::Purple).unwrap();
        assert_eq!(json, "\"purple\"");
    }

    #[test]
    fn test_activity_kind_wire_values() {
        let json = serde_json::to_string(&ActivityKind::CardMoved).unwrap();
        assert_eq!(json, "\"card_moved\"");
        let json = serde_json::to_string(&ActivityKind::ColumnRenamed).unwrap();
        assert_eq!(json, "\"column_renamed\"");
    }

    #[test]
    fn test_board_wire_keys_are_camel_case() {
        let board = Board {
            id: "b1".to_string(),
            name: "Test".to_string(),
            column_order: vec!["c1".to_string()],
            created_at: 1,
            updated_at: 2,
        };
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.contains("\"columnOrder\""));
        assert!(json.contains("\"createdAt\""));
    }

    #[test]
    fn test_activity_kind_round_trips_under_type_key() {
        let activity = Activity {
            id: "a1".to_string(),
            board_id: "b1".to_string(),
            kind: ActivityKind::CardDeleted,
            payload: ActivityPayload::default(),
            timestamp: 5,
        };
        let json = serde_json::to_string(&activity).unwrap();
        assert!(json.contains("\"type\":\"card_deleted\""));
        let back: Activity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, activity);
    }

    #[test]
    fn test_member_roster_colors_rotate() {
        let roster = member_roster();
        assert_eq!(roster.len(), MEMBER_NAMES.len());
        assert_eq!(roster[0].avatar_color, AVATAR_COLORS[0]);
        assert_ne!(roster[0].avatar_color, roster[1].avatar_color);
    }
}
