//! Screen trait and transition type for the terminal UI state machine.

use crossterm::event::KeyEvent;
use ratatui::Frame;

use crate::DiceSession;
use crate::db::HistoryStore;
use crate::games::lucky_dice::{Clock, GameSettings, RandomSource};

/// The result of handling an input event on a screen.
///
/// Screens return this from [`Screen::handle_key`] to drive the
/// [`App`](super::App) state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenTransition {
    /// Stay on the current screen.
    Stay,
    /// Back to the game board.
    GoToGame,
    /// Recent games and per-player statistics.
    GoToHistory,
    /// Edit the game settings.
    GoToSettings,
    /// Start a fresh game with these settings.
    ApplySettings {
        /// Settings after normalization.
        settings: GameSettings,
        /// Corrections made while normalizing, for display.
        corrections: Vec<String>,
    },
    /// Exit the application.
    Quit,
}

/// Implemented by each screen of the terminal UI.
///
/// Screens own their view state; the game itself lives in the session the
/// controller passes in.
pub trait Screen {
    /// Renders the screen into the provided [`Frame`].
    fn render<R, S, C>(&self, frame: &mut Frame, session: &DiceSession<R, S, C>)
    where
        R: RandomSource,
        S: HistoryStore,
        C: Clock;

    /// Handles a key event and returns the resulting [`ScreenTransition`].
    fn handle_key<R, S, C>(
        &mut self,
        key: KeyEvent,
        session: &mut DiceSession<R, S, C>,
    ) -> ScreenTransition
    where
        R: RandomSource,
        S: HistoryStore,
        C: Clock;
}
