//! Entity stores: one dumb id→entity map per entity kind.
//!
//! Stores only mutate their own map and stamp `updated_at`. They never
//! cascade deletes or touch another store's order lists; that invariant
//! enforcement lives one layer up, in [`crate::ops`].

pub mod activity;
pub mod boards;
pub mod cards;
pub mod columns;
pub mod presence;

pub use activity::ActivityStore;
pub use boards::BoardStore;
pub use cards::{CardPatch, CardStore};
pub use columns::ColumnStore;
pub use presence::PresenceStore;

/// The full set of application stores, passed explicitly to operations
/// instead of living as ambient singletons.
#[derive(Debug, Default)]
pub struct Stores {
    pub boards: BoardStore,
    pub columns: ColumnStore,
    pub cards: CardStore,
    pub activity: ActivityStore,
    pub presence: PresenceStore,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}
