//! Game screen: scores, last roll, live metrics.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::db::HistoryStore;
use crate::games::lucky_dice::{
    Action, Clock, GameSnapshot, Phase, PlayerId, RandomSource, RollOutcome,
};
use crate::tui::screen::{Screen, ScreenTransition};
use crate::{DiceSession, PersistenceStatus};

/// State for the game screen.
#[derive(Debug, Clone, Default)]
pub struct GameScreen {
    message: String,
    last_roll: Option<RollOutcome>,
    save_note: Option<String>,
}

impl GameScreen {
    /// Creates a game screen with a welcome message.
    pub fn new() -> Self {
        Self {
            message: "Player 1 to start. Press r to roll or p to pass.".to_string(),
            ..Self::default()
        }
    }

    /// Creates a game screen showing `message`.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Current status line.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Dice from the most recent roll, if any.
    pub fn last_roll(&self) -> Option<&RollOutcome> {
        self.last_roll.as_ref()
    }

    /// Outcome of saving the last finished game.
    pub fn save_note(&self) -> Option<&str> {
        self.save_note.as_deref()
    }

    #[instrument(skip(self, session))]
    fn play<R, S, C>(&mut self, action: Action, session: &mut DiceSession<R, S, C>)
    where
        R: RandomSource,
        S: HistoryStore,
        C: Clock,
    {
        match session.act(action) {
            Ok(update) => {
                let turn = update.turn();
                self.message = turn.message();
                if turn.roll().is_some() {
                    self.last_roll = turn.roll().clone();
                }
                self.save_note = match update.persistence() {
                    PersistenceStatus::Buffered => None,
                    PersistenceStatus::Saved(id) => Some(format!("Saved as game #{}", id)),
                    PersistenceStatus::Failed(e) => Some(format!("Could not save game: {}", e.message)),
                };
                if turn.is_terminal() {
                    self.message.push_str(" Press n for a new game.");
                }
            }
            Err(e) => {
                warn!(error = %e, "Action rejected");
                self.message = format!("{}. Press n for a new game.", e);
            }
        }
    }
}

impl Screen for GameScreen {
    #[instrument(skip(self, frame, session))]
    fn render<R, S, C>(&self, frame: &mut Frame, session: &DiceSession<R, S, C>)
    where
        R: RandomSource,
        S: HistoryStore,
        C: Clock,
    {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(6), // Scores
                Constraint::Length(5), // Dice and message
                Constraint::Min(6),    // Metrics
                Constraint::Length(3), // Help
            ])
            .split(area);

        let snapshot = session.snapshot();
        let title = Paragraph::new(format!(
            "Lucky Dice - first to exactly {} ({}d{})",
            snapshot.target_score(),
            snapshot.dice().dice_count(),
            snapshot.dice().face_count()
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        draw_scores(frame, chunks[1], &snapshot);

        let mut lines = vec![Line::from(Span::styled(
            self.message.as_str(),
            Style::default().fg(Color::Yellow),
        ))];
        if let Some(roll) = &self.last_roll {
            lines.push(Line::from(format!("Last roll: {}", roll)));
        }
        if let Some(note) = &self.save_note {
            lines.push(Line::from(Span::styled(
                note.as_str(),
                Style::default().fg(Color::DarkGray),
            )));
        }
        let status = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Table"));
        frame.render_widget(status, chunks[2]);

        let metrics = session.metrics();
        let metrics_text = vec![
            Line::from(format!(
                "Session time: {:.1}s",
                metrics.session_duration().as_secs_f64()
            )),
            Line::from(format!(
                "Average decision: {:.2}s over {} decisions",
                metrics.average_decision_time().as_secs_f64(),
                metrics.total_decisions()
            )),
            Line::from(format!(
                "Rolls: {}   Success rate: {:.1}%   Risk ratio: {:.1}%",
                metrics.total_rolls(),
                metrics.success_rate(),
                metrics.risk_ratio()
            )),
        ];
        let metrics_panel = Paragraph::new(metrics_text)
            .style(Style::default().fg(Color::Green))
            .block(Block::default().borders(Borders::ALL).title("Performance"));
        frame.render_widget(metrics_panel, chunks[3]);

        let help = Paragraph::new("r: Roll | p: Pass | n: New game | h: History | s: Settings | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, session))]
    fn handle_key<R, S, C>(
        &mut self,
        key: KeyEvent,
        session: &mut DiceSession<R, S, C>,
    ) -> ScreenTransition
    where
        R: RandomSource,
        S: HistoryStore,
        C: Clock,
    {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.play(Action::Roll, session);
                ScreenTransition::Stay
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.play(Action::Pass, session);
                ScreenTransition::Stay
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                info!("New game requested");
                session.new_game();
                *self = Self::new();
                ScreenTransition::Stay
            }
            KeyCode::Char('h') | KeyCode::Char('H') => ScreenTransition::GoToHistory,
            KeyCode::Char('s') | KeyCode::Char('S') => ScreenTransition::GoToSettings,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ScreenTransition::Quit,
            other => {
                debug!(?other, "Unmapped key");
                ScreenTransition::Stay
            }
        }
    }
}

fn draw_scores(frame: &mut Frame, area: Rect, snapshot: &GameSnapshot) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    for (player, col) in PlayerId::ALL.into_iter().zip(cols.iter()) {
        let to_act = *snapshot.phase() == Phase::Active && *snapshot.current_player() == player;
        let won = snapshot.phase().outcome().and_then(|o| o.winner()) == Some(player);

        let style = if won {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if to_act {
            Style::default().fg(Color::Black).bg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let label = if won {
            "winner"
        } else if to_act {
            "to act"
        } else {
            ""
        };

        let text = vec![
            Line::from(Span::styled(format!(" {} ", snapshot.score(player)), style)),
            Line::from(label),
        ];
        let panel = Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(player.to_string()));
        frame.render_widget(panel, *col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::HistoryRepository;
    use crate::games::lucky_dice::{GameSettings, ManualClock, ScriptedRolls};
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};
    use tempfile::NamedTempFile;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn test_roll_key_updates_message() {
        let db = NamedTempFile::new().unwrap();
        let repo = HistoryRepository::open(db.path().to_str().unwrap().to_string()).unwrap();
        let clock = ManualClock::new();
        let mut session =
            DiceSession::new(GameSettings::default(), ScriptedRolls::new([4]), repo, &clock);
        let mut screen = GameScreen::new();

        assert_eq!(screen.handle_key(key('r'), &mut session), ScreenTransition::Stay);
        assert_eq!(screen.message(), "Player 1 rolled 4 and now has 4 points.");
        assert_eq!(screen.last_roll().map(|r| r.total()), Some(4));
        assert_eq!(screen.handle_key(key('h'), &mut session), ScreenTransition::GoToHistory);
    }

    #[test]
    fn test_finished_game_reports_save() {
        let db = NamedTempFile::new().unwrap();
        let repo = HistoryRepository::open(db.path().to_str().unwrap().to_string()).unwrap();
        let clock = ManualClock::new();
        let mut session =
            DiceSession::new(GameSettings::default(), ScriptedRolls::new([1]), repo, &clock);
        let mut screen = GameScreen::new();

        screen.handle_key(key('r'), &mut session);
        assert_eq!(screen.save_note(), Some("Saved as game #1"));
        screen.handle_key(key('p'), &mut session);
        assert!(screen.message().starts_with("Game is already over"));

        screen.handle_key(key('n'), &mut session);
        assert_eq!(*session.snapshot().phase(), Phase::Active);
    }

    #[test]
    fn test_render_shows_scores() {
        let db = NamedTempFile::new().unwrap();
        let repo = HistoryRepository::open(db.path().to_str().unwrap().to_string()).unwrap();
        let clock = ManualClock::new();
        let mut session =
            DiceSession::new(GameSettings::default(), ScriptedRolls::new([5]), repo, &clock);
        let mut screen = GameScreen::new();
        screen.handle_key(key('r'), &mut session);

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| screen.render(f, &session)).unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("Lucky Dice"));
        assert!(rendered.contains("Player 1 rolled 5"));
    }
}
