//! Order maintenance and orchestration.
//!
//! Every mutation that touches more than one store goes through here: moves,
//! cascading deletes, and the creation paths that append to an order list.
//! Drag-and-drop, keyboard shortcuts, and the presence simulation all call
//! the same functions, so the `column_id` field and the order lists cannot
//! drift apart across call sites.

use crate::store::{CardPatch, Stores};
use crate::types::{ActivityKind, ActivityPayload, Board, Card, CardId, Column, ColumnId};

#[derive(Debug, thiserror::Error)]
pub enum OpError {
    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Card {card_id} cannot move to column {column_id} on another board")]
    CrossBoardMove { card_id: CardId, column_id: ColumnId },
}

/// Create a board and make it active.
pub fn create_board(stores: &mut Stores, name: &str) -> Board {
    stores.boards.create(name)
}

/// Create a column at the end of the board's column order.
pub fn create_column(stores: &mut Stores, board_id: &str, title: &str) -> Result<Column, OpError> {
    if !stores.boards.contains(board_id) {
        return Err(OpError::BoardNotFound(board_id.to_string()));
    }
    let column = stores.columns.create(board_id, title);
    let mut order = stores
        .boards
        .get(board_id)
        .map(|b| b.column_order.clone())
        .unwrap_or_default();
    order.push(column.id.clone());
    stores.boards.set_column_order(board_id, order);
    stores.activity.record(
        board_id,
        ActivityKind::ColumnCreated,
        ActivityPayload {
            column_id: Some(column.id.clone()),
            column_title: Some(column.title.clone()),
            ..Default::default()
        },
    );
    Ok(column)
}

pub fn rename_column(stores: &mut Stores, column_id: &str, title: &str) -> Result<(), OpError> {
    let board_id = stores
        .columns
        .board_of(column_id)
        .cloned()
        .ok_or_else(|| OpError::ColumnNotFound(column_id.to_string()))?;
    stores.columns.rename(column_id, title);
    let column_title = stores.columns.get(column_id).map(|c| c.title.clone());
    stores.activity.record(
        &board_id,
        ActivityKind::ColumnRenamed,
        ActivityPayload {
            column_id: Some(column_id.to_string()),
            column_title,
            ..Default::default()
        },
    );
    Ok(())
}

/// Create a card at the end of the column's card order.
pub fn create_card(stores: &mut Stores, column_id: &str, title: &str) -> Result<Card, OpError> {
    let column = stores
        .columns
        .get(column_id)
        .cloned()
        .ok_or_else(|| OpError::ColumnNotFound(column_id.to_string()))?;
    let card = stores.cards.create(column_id, &column.board_id, title);
    let mut order = column.card_order;
    order.push(card.id.clone());
    stores.columns.set_card_order(column_id, order);
    stores.activity.record(
        &card.board_id,
        ActivityKind::CardCreated,
        ActivityPayload {
            card_id: Some(card.id.clone()),
            card_title: Some(card.title.clone()),
            ..Default::default()
        },
    );
    Ok(card)
}

/// Shortcut path: new untitled card in the board's first surviving column.
/// Returns `Ok(None)` when the board has no usable column.
pub fn create_card_via_shortcut(
    stores: &mut Stores,
    board_id: &str,
) -> Result<Option<Card>, OpError> {
    let board = stores
        .boards
        .get(board_id)
        .ok_or_else(|| OpError::BoardNotFound(board_id.to_string()))?;
    let first = board
        .column_order
        .iter()
        .find(|id| stores.columns.contains(id))
        .cloned();
    match first {
        Some(column_id) => create_card(stores, &column_id, "").map(Some),
        None => Ok(None),
    }
}

/// Edit a card's fields and log a card_edited record.
pub fn edit_card(stores: &mut Stores, card_id: &str, patch: CardPatch) -> Result<(), OpError> {
    let board_id = stores
        .cards
        .board_of(card_id)
        .cloned()
        .ok_or_else(|| OpError::CardNotFound(card_id.to_string()))?;
    stores.cards.update(card_id, patch);
    let card_title = stores.cards.get(card_id).map(|c| c.title.clone());
    stores.activity.record(
        &board_id,
        ActivityKind::CardEdited,
        ActivityPayload {
            card_id: Some(card_id.to_string()),
            card_title,
            ..Default::default()
        },
    );
    Ok(())
}

/// Move a card to `target_column_id` at `index` (clamped to the list length).
///
/// This is the one atomic move: it rewrites the source and target card
/// orders and the card's `column_id` together, and records a card_moved
/// activity when the columns differ. A same-column call is an in-list
/// reorder with no activity. Returns whether anything changed.
pub fn move_card(
    stores: &mut Stores,
    card_id: &str,
    target_column_id: &str,
    index: usize,
    user_name: Option<&str>,
) -> Result<bool, OpError> {
    let card = stores
        .cards
        .get(card_id)
        .cloned()
        .ok_or_else(|| OpError::CardNotFound(card_id.to_string()))?;
    let target = stores
        .columns
        .get(target_column_id)
        .cloned()
        .ok_or_else(|| OpError::ColumnNotFound(target_column_id.to_string()))?;
    if target.board_id != card.board_id {
        return Err(OpError::CrossBoardMove {
            card_id: card_id.to_string(),
            column_id: target_column_id.to_string(),
        });
    }

    let from_column_id = card.column_id.clone();

    if from_column_id == target_column_id {
        let mut order = target.card_order;
        let old_index = match order.iter().position(|id| id == card_id) {
            Some(i) => i,
            // Stale state: the card is missing from its own column's order.
            // Treat as an insert so the lists re-converge.
            None => {
                let index = index.min(order.len());
                order.insert(index, card_id.to_string());
                stores.columns.set_card_order(target_column_id, order);
                return Ok(true);
            }
        };
        order.remove(old_index);
        let index = index.min(order.len());
        if index == old_index {
            return Ok(false);
        }
        order.insert(index, card_id.to_string());
        stores.columns.set_card_order(target_column_id, order);
        return Ok(true);
    }

    // Cross-column: drop from the source order, insert into the target,
    // repoint the card. All three or nothing.
    if let Some(source) = stores.columns.get(&from_column_id).cloned() {
        let order: Vec<CardId> = source
            .card_order
            .into_iter()
            .filter(|id| id != card_id)
            .collect();
        stores.columns.set_card_order(&from_column_id, order);
    }
    let mut order: Vec<CardId> = target
        .card_order
        .into_iter()
        .filter(|id| id != card_id)
        .collect();
    let index = index.min(order.len());
    order.insert(index, card_id.to_string());
    stores.columns.set_card_order(target_column_id, order);
    stores.cards.set_column(card_id, target_column_id);

    stores.activity.record(
        &card.board_id,
        ActivityKind::CardMoved,
        ActivityPayload {
            card_id: Some(card_id.to_string()),
            card_title: Some(card.title),
            from_column_id: Some(from_column_id),
            to_column_id: Some(target_column_id.to_string()),
            user_name: user_name.map(str::to_string),
            ..Default::default()
        },
    );
    Ok(true)
}

/// Reorder a column within its board to the given index (clamped).
pub fn reorder_columns(
    stores: &mut Stores,
    board_id: &str,
    column_id: &str,
    index: usize,
) -> Result<bool, OpError> {
    let board = stores
        .boards
        .get(board_id)
        .ok_or_else(|| OpError::BoardNotFound(board_id.to_string()))?;
    let mut order = board.column_order.clone();
    let old_index = order
        .iter()
        .position(|id| id == column_id)
        .ok_or_else(|| OpError::ColumnNotFound(column_id.to_string()))?;
    order.remove(old_index);
    let index = index.min(order.len());
    if index == old_index {
        return Ok(false);
    }
    order.insert(index, column_id.to_string());
    stores.boards.set_column_order(board_id, order);
    Ok(true)
}

/// Delete a card and remove it from its owning column's order.
pub fn delete_card(stores: &mut Stores, card_id: &str) -> Result<(), OpError> {
    let card = stores
        .cards
        .get(card_id)
        .cloned()
        .ok_or_else(|| OpError::CardNotFound(card_id.to_string()))?;
    if let Some(column) = stores.columns.get(&card.column_id).cloned() {
        let order: Vec<CardId> = column
            .card_order
            .into_iter()
            .filter(|id| id != card_id)
            .collect();
        stores.columns.set_card_order(&card.column_id, order);
    }
    stores.cards.delete(card_id);
    stores.activity.record(
        &card.board_id,
        ActivityKind::CardDeleted,
        ActivityPayload {
            card_id: Some(card_id.to_string()),
            card_title: Some(card.title),
            column_id: Some(card.column_id),
            ..Default::default()
        },
    );
    Ok(())
}

/// Delete a column, its cards, and its entry in the board's column order.
pub fn delete_column(stores: &mut Stores, column_id: &str) -> Result<(), OpError> {
    let column = stores
        .columns
        .get(column_id)
        .cloned()
        .ok_or_else(|| OpError::ColumnNotFound(column_id.to_string()))?;
    for card_id in &column.card_order {
        stores.cards.delete(card_id);
    }
    // Order lists can be stale; also sweep any card still pointing here.
    let stray: Vec<CardId> = stores
        .cards
        .iter()
        .filter(|c| c.column_id == *column_id)
        .map(|c| c.id.clone())
        .collect();
    for card_id in stray {
        stores.cards.delete(&card_id);
    }
    stores.columns.delete(column_id);
    if let Some(board) = stores.boards.get(&column.board_id) {
        let order: Vec<ColumnId> = board
            .column_order
            .iter()
            .filter(|id| *id != column_id)
            .cloned()
            .collect();
        stores.boards.set_column_order(&column.board_id, order);
    }
    stores.activity.record(
        &column.board_id,
        ActivityKind::ColumnDeleted,
        ActivityPayload {
            column_id: Some(column_id.to_string()),
            column_title: Some(column.title),
            ..Default::default()
        },
    );
    Ok(())
}

/// Delete a board and everything it owns (columns, cards).
pub fn delete_board(stores: &mut Stores, board_id: &str) -> Result<(), OpError> {
    if !stores.boards.contains(board_id) {
        return Err(OpError::BoardNotFound(board_id.to_string()));
    }
    let column_ids: Vec<ColumnId> = stores
        .columns
        .columns_for_board(board_id)
        .map(|c| c.id.clone())
        .collect();
    for column_id in &column_ids {
        if let Some(column) = stores.columns.get(column_id).cloned() {
            for card_id in &column.card_order {
                stores.cards.delete(card_id);
            }
        }
        stores.columns.delete(column_id);
    }
    let stray: Vec<CardId> = stores
        .cards
        .cards_for_board(board_id)
        .map(|c| c.id.clone())
        .collect();
    for card_id in stray {
        stores.cards.delete(&card_id);
    }
    stores.boards.delete(board_id);
    Ok(())
}

/// A board's column order with stale ids (deleted columns) filtered out.
/// Read-time defense; does not mutate.
pub fn valid_column_order(stores: &Stores, board_id: &str) -> Vec<ColumnId> {
    stores
        .boards
        .get(board_id)
        .map(|b| {
            b.column_order
                .iter()
                .filter(|id| stores.columns.contains(id))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// A column's card order with stale or disowned ids filtered out.
pub fn valid_card_order(stores: &Stores, column_id: &str) -> Vec<CardId> {
    stores
        .columns
        .get(column_id)
        .map(|col| {
            col.card_order
                .iter()
                .filter(|id| {
                    stores
                        .cards
                        .get(id)
                        .map(|c| c.column_id == col.id)
                        .unwrap_or(false)
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Rewrite any order list on the board that references deleted entities.
/// Returns whether anything was repaired.
pub fn prune_stale_orders(stores: &mut Stores, board_id: &str) -> bool {
    let mut changed = false;
    let valid = valid_column_order(stores, board_id);
    if let Some(board) = stores.boards.get(board_id) {
        if valid.len() != board.column_order.len() {
            stores.boards.set_column_order(board_id, valid.clone());
            changed = true;
        }
    }
    for column_id in valid {
        let order = valid_card_order(stores, &column_id);
        if let Some(column) = stores.columns.get(&column_id) {
            if order.len() != column.card_order.len() {
                stores.columns.set_card_order(&column_id, order);
                changed = true;
            }
        }
    }
    if changed {
        log::info!("[syncboard.ops.prune] Repaired stale order entries on board {}", board_id);
    }
    changed
}
