//! Game history persistence.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only
mod store;

pub use error::DbError;
pub use models::{GameRecord, MoveRecord, NewGameRecord, NewMoveRecord, PlayerStats};
pub use repository::{HistoryRepository, MIGRATIONS};
pub use store::HistoryStore;
