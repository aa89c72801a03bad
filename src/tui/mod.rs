//! Terminal UI for lucky dice.

mod app;
mod screen;
mod screens;

use std::io;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, instrument};

use crate::db::HistoryRepository;
use crate::games::lucky_dice::{MonotonicClock, RngSource};
use crate::{AppConfig, DiceSession};

pub use app::App;
pub use screen::{Screen, ScreenTransition};
pub use screens::{GameScreen, HISTORY_LIMIT, HistoryScreen, SettingsScreen};

/// Runs the interactive game until the user quits.
///
/// `seed` makes the dice reproducible; without it they are seeded from the
/// operating system.
///
/// # Errors
///
/// Returns an error if the history database cannot be opened or the
/// terminal cannot be driven.
#[instrument(skip(config), fields(db_path = %config.db_path()))]
pub fn run_tui(config: &AppConfig, seed: Option<u64>) -> Result<()> {
    info!("Starting Lucky Dice TUI");

    let repo = HistoryRepository::open(config.db_path().clone())
        .context("Failed to open history database")?;
    let normalized = config.game_settings();
    let greeting = if normalized.was_corrected() {
        let corrections: Vec<String> = normalized.issues().iter().map(ToString::to_string).collect();
        GameScreen::with_message(format!("Settings corrected: {}.", corrections.join("; ")))
    } else {
        GameScreen::new()
    };
    let source = match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let session = DiceSession::new(normalized.into_value(), source, repo, MonotonicClock::new());
    let mut app = App::new(session, greeting);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }

    res
}
