//! Application controller: the state machine driving the terminal UI.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::Backend};
use tracing::{debug, info, instrument};

use crate::DiceSession;
use crate::db::HistoryStore;
use crate::games::lucky_dice::{Clock, RandomSource};
use crate::tui::screen::{Screen, ScreenTransition};
use crate::tui::screens::{GameScreen, HistoryScreen, SettingsScreen};

/// Active screen in the state machine.
///
/// The game screen is kept in [`App`] so its status line survives a visit
/// to the other screens.
#[derive(Debug)]
enum ActiveScreen {
    Game,
    History(HistoryScreen),
    Settings(SettingsScreen),
}

/// Controller owning the session and the current screen.
///
/// Call [`App::run`] to start the event loop.
#[derive(Debug)]
pub struct App<R, S, C> {
    session: DiceSession<R, S, C>,
    game: GameScreen,
    screen: ActiveScreen,
}

impl<R, S, C> App<R, S, C>
where
    R: RandomSource,
    S: HistoryStore,
    C: Clock,
{
    /// Creates a controller showing the game screen.
    #[instrument(skip(session, game))]
    pub fn new(session: DiceSession<R, S, C>, game: GameScreen) -> Self {
        info!("Creating App");
        Self {
            session,
            game,
            screen: ActiveScreen::Game,
        }
    }

    /// The session being played.
    pub fn session(&self) -> &DiceSession<R, S, C> {
        &self.session
    }

    /// The game screen's view state.
    pub fn game_screen(&self) -> &GameScreen {
        &self.game
    }

    /// Runs the event loop until the user quits.
    #[instrument(skip(self, terminal))]
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting event loop");

        loop {
            terminal.draw(|f| match &self.screen {
                ActiveScreen::Game => self.game.render(f, &self.session),
                ActiveScreen::History(s) => s.render(f, &self.session),
                ActiveScreen::Settings(s) => s.render(f, &self.session),
            })?;

            // Poll with a short timeout so the metrics panel keeps ticking.
            if event::poll(Duration::from_millis(250))?
                && let Event::Key(key) = event::read()?
            {
                // Skip key release events (crossterm fires both press and release).
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if !self.handle_key(key) {
                    info!("Quitting");
                    return Ok(());
                }
            }
        }
    }

    /// Routes a key to the active screen. Returns false when the user quits.
    #[instrument(skip(self, key))]
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let transition = match &mut self.screen {
            ActiveScreen::Game => self.game.handle_key(key, &mut self.session),
            ActiveScreen::History(s) => s.handle_key(key, &mut self.session),
            ActiveScreen::Settings(s) => s.handle_key(key, &mut self.session),
        };
        self.apply_transition(transition)
    }

    /// Applies a screen transition. Returns false on quit.
    #[instrument(skip(self))]
    fn apply_transition(&mut self, transition: ScreenTransition) -> bool {
        debug!(transition = ?transition, "Applying screen transition");
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::GoToGame => {
                info!("Navigating to Game");
                self.screen = ActiveScreen::Game;
            }
            ScreenTransition::GoToHistory => {
                info!("Navigating to History");
                self.screen = ActiveScreen::History(HistoryScreen::load(self.session.store()));
            }
            ScreenTransition::GoToSettings => {
                info!("Navigating to Settings");
                self.screen =
                    ActiveScreen::Settings(SettingsScreen::new(self.session.engine().settings()));
            }
            ScreenTransition::ApplySettings {
                settings,
                corrections,
            } => {
                info!(target_score = settings.target_score(), "Starting game with new settings");
                self.session.change_settings(settings);
                self.game = if corrections.is_empty() {
                    GameScreen::new()
                } else {
                    GameScreen::with_message(format!(
                        "Settings corrected: {}. New game started.",
                        corrections.join("; ")
                    ))
                };
                self.screen = ActiveScreen::Game;
            }
            ScreenTransition::Quit => return false,
        }
        true
    }
}
