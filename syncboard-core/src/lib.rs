//! syncboard-core: the data/ops/persistence core of a single-page kanban
//! board — boards of ordered columns, columns of ordered cards, an
//! append-only activity log, local single-blob persistence, and a
//! client-local presence simulation.
//!
//! Rendering is a separate concern; this crate owns every invariant worth
//! owning, chiefly that a card's `column_id` and the column card orders
//! never disagree.

pub mod dnd;
pub mod migrate;
pub mod ops;
pub mod persist;
pub mod session;
pub mod simulation;
pub mod store;
pub mod types;

pub use dnd::{apply_drag_end, DragEnd, DropOutcome};
pub use ops::OpError;
pub use persist::{BlobStore, PersistError, PersistedState, STORAGE_KEY, STORAGE_VERSION};
pub use session::Session;
pub use simulation::{start_simulation, SimulationHandle};
pub use store::{CardPatch, Stores};
