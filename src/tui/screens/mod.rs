//! Individual screens of the terminal UI.

mod game;
mod history;
mod settings;

pub use game::GameScreen;
pub use history::{HISTORY_LIMIT, HistoryScreen};
pub use settings::SettingsScreen;
