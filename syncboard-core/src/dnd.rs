//! Drag-and-drop reconciliation.
//!
//! The drag surface reports string ids: a column drag handle is
//! `col-<columnId>`, a column drop container is `column-<columnId>`, and a
//! card is its bare id. A drop resolves those strings against the stores and
//! funnels into the centralized move operations in [`crate::ops`]. Stale or
//! unknown ids make the drop a no-op, never an error.

use crate::ops;
use crate::store::Stores;
use crate::types::BoardId;

const COLUMN_HANDLE_PREFIX: &str = "col-";
const COLUMN_CONTAINER_PREFIX: &str = "column-";

/// A finished drag: what was being dragged and what it was dropped over.
#[derive(Debug, Clone)]
pub struct DragEnd {
    pub active: String,
    pub over: Option<String>,
}

impl DragEnd {
    pub fn new(active: impl Into<String>, over: impl Into<String>) -> Self {
        Self {
            active: active.into(),
            over: Some(over.into()),
        }
    }
}

/// What a drop actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing changed: self-drop, no target, or stale/unknown ids.
    Ignored,
    ColumnsReordered,
    /// Card changed columns (records a card_moved activity).
    CardMoved,
    /// Card reordered within its column (no activity).
    CardReordered,
}

impl DropOutcome {
    pub fn changed(self) -> bool {
        self != DropOutcome::Ignored
    }
}

/// Strip the container/handle prefixes off an `over` id so it can be
/// matched against a column id.
fn resolve_column_id(raw: &str) -> &str {
    raw.strip_prefix(COLUMN_CONTAINER_PREFIX)
        .or_else(|| raw.strip_prefix(COLUMN_HANDLE_PREFIX))
        .unwrap_or(raw)
}

/// Apply a finished drag on `board_id` to the stores.
pub fn apply_drag_end(stores: &mut Stores, board_id: &BoardId, event: &DragEnd) -> DropOutcome {
    let over = match &event.over {
        Some(over) if *over != event.active => over,
        _ => return DropOutcome::Ignored,
    };

    if let Some(active_column) = event.active.strip_prefix(COLUMN_HANDLE_PREFIX) {
        return apply_column_drop(stores, board_id, active_column, resolve_column_id(over));
    }
    apply_card_drop(stores, board_id, &event.active, over)
}

fn apply_column_drop(
    stores: &mut Stores,
    board_id: &str,
    active_column: &str,
    over_column: &str,
) -> DropOutcome {
    let board = match stores.boards.get(board_id) {
        Some(b) => b,
        None => return DropOutcome::Ignored,
    };
    if !stores.columns.contains(active_column) || !stores.columns.contains(over_column) {
        return DropOutcome::Ignored;
    }
    // Target index is the over column's position before removal, matching
    // the drag surface's array-move semantics.
    let target = match board.column_order.iter().position(|id| id == over_column) {
        Some(i) => i,
        None => return DropOutcome::Ignored,
    };
    match ops::reorder_columns(stores, board_id, active_column, target) {
        Ok(true) => DropOutcome::ColumnsReordered,
        Ok(false) | Err(_) => DropOutcome::Ignored,
    }
}

fn apply_card_drop(
    stores: &mut Stores,
    board_id: &str,
    card_id: &str,
    over: &str,
) -> DropOutcome {
    let card = match stores.cards.get(card_id) {
        Some(c) => c.clone(),
        None => return DropOutcome::Ignored,
    };
    if card.board_id != *board_id {
        return DropOutcome::Ignored;
    }

    // Dropped on a column container: cross-column move to the top.
    if let Some(target_column) = over.strip_prefix(COLUMN_CONTAINER_PREFIX) {
        if card.column_id == target_column {
            return DropOutcome::Ignored;
        }
        return match ops::move_card(stores, card_id, target_column, 0, None) {
            Ok(true) => DropOutcome::CardMoved,
            Ok(false) | Err(_) => DropOutcome::Ignored,
        };
    }

    // Dropped on another card: land at that card's index.
    let over_card = match stores.cards.get(over) {
        Some(c) => c.clone(),
        None => return DropOutcome::Ignored,
    };
    let target_order = match stores.columns.get(&over_card.column_id) {
        Some(col) => &col.card_order,
        None => return DropOutcome::Ignored,
    };
    let index = match target_order.iter().position(|id| id == &over_card.id) {
        Some(i) => i,
        None => return DropOutcome::Ignored,
    };
    let cross_column = over_card.column_id != card.column_id;
    match ops::move_card(stores, card_id, &over_card.column_id, index, None) {
        Ok(true) if cross_column => DropOutcome::CardMoved,
        Ok(true) => DropOutcome::CardReordered,
        Ok(false) | Err(_) => DropOutcome::Ignored,
    }
}
