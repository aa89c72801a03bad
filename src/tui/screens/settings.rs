//! Settings screen: target score and dice, applied as a fresh game.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument};

use crate::DiceSession;
use crate::db::HistoryStore;
use crate::games::lucky_dice::{Clock, GameSettings, RandomSource, RiskThreshold};
use crate::tui::screen::{Screen, ScreenTransition};

/// Editable fields, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    TargetScore,
    FaceCount,
    DiceCount,
}

impl Field {
    const ALL: [Field; 3] = [Field::TargetScore, Field::FaceCount, Field::DiceCount];

    fn label(self) -> &'static str {
        match self {
            Field::TargetScore => "Target score",
            Field::FaceCount => "Faces per die",
            Field::DiceCount => "Dice per roll",
        }
    }

    fn step(self) -> i64 {
        match self {
            Field::TargetScore => 5,
            Field::FaceCount | Field::DiceCount => 1,
        }
    }
}

/// State for the settings screen.
///
/// Values are raw until applied, so anything out of range is corrected by
/// [`GameSettings::normalize`] at that point.
#[derive(Debug, Clone)]
pub struct SettingsScreen {
    target_score: i64,
    face_count: i64,
    dice_count: i64,
    risk_threshold: RiskThreshold,
    selected: usize,
}

impl SettingsScreen {
    /// Creates a settings screen pre-filled with `current`.
    #[instrument]
    pub fn new(current: &GameSettings) -> Self {
        debug!("Initializing SettingsScreen");
        Self {
            target_score: i64::from(current.target_score()),
            face_count: i64::from(current.dice().face_count()),
            dice_count: i64::from(current.dice().dice_count()),
            risk_threshold: current.risk_threshold(),
            selected: 0,
        }
    }

    fn field(&self) -> Field {
        Field::ALL[self.selected]
    }

    fn value_mut(&mut self, field: Field) -> &mut i64 {
        match field {
            Field::TargetScore => &mut self.target_score,
            Field::FaceCount => &mut self.face_count,
            Field::DiceCount => &mut self.dice_count,
        }
    }

    fn value(&self, field: Field) -> i64 {
        match field {
            Field::TargetScore => self.target_score,
            Field::FaceCount => self.face_count,
            Field::DiceCount => self.dice_count,
        }
    }

    #[instrument(skip(self))]
    fn adjust(&mut self, delta: i64) {
        let field = self.field();
        let value = self.value_mut(field);
        *value = value.saturating_add(delta * field.step());
        debug!(field = field.label(), value = *value, "Setting adjusted");
    }

    /// Normalizes the edited values into a transition that starts a new game.
    #[instrument(skip(self))]
    pub fn apply(&self) -> ScreenTransition {
        let normalized = GameSettings::normalize(
            self.target_score,
            self.face_count,
            self.dice_count,
            self.risk_threshold,
        );
        let corrections = normalized.issues().iter().map(ToString::to_string).collect();
        info!(corrected = normalized.was_corrected(), "Applying settings");
        ScreenTransition::ApplySettings {
            settings: normalized.into_value(),
            corrections,
        }
    }
}

impl Screen for SettingsScreen {
    #[instrument(skip(self, frame, _session))]
    fn render<R, S, C>(&self, frame: &mut Frame, _session: &DiceSession<R, S, C>)
    where
        R: RandomSource,
        S: HistoryStore,
        C: Clock,
    {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Settings")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = Field::ALL
            .iter()
            .map(|field| ListItem::new(format!("{:<16}[ {} ]", field.label(), self.value(*field))))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("New game"))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let help = Paragraph::new("↑↓: Select | ←→: Change | Enter: Start new game | Esc: Cancel")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);
    }

    #[instrument(skip(self, key, _session))]
    fn handle_key<R, S, C>(
        &mut self,
        key: KeyEvent,
        _session: &mut DiceSession<R, S, C>,
    ) -> ScreenTransition
    where
        R: RandomSource,
        S: HistoryStore,
        C: Clock,
    {
        match key.code {
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1).min(Field::ALL.len() - 1);
                ScreenTransition::Stay
            }
            KeyCode::Right | KeyCode::Char('+') => {
                self.adjust(1);
                ScreenTransition::Stay
            }
            KeyCode::Left | KeyCode::Char('-') => {
                self.adjust(-1);
                ScreenTransition::Stay
            }
            KeyCode::Enter => self.apply(),
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => {
                info!("Leaving settings screen");
                ScreenTransition::GoToGame
            }
            _ => ScreenTransition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_unchanged_settings() {
        let screen = SettingsScreen::new(&GameSettings::default());
        assert_eq!(
            screen.apply(),
            ScreenTransition::ApplySettings {
                settings: GameSettings::default(),
                corrections: Vec::new(),
            }
        );
    }

    #[test]
    fn test_adjust_selected_field() {
        let mut screen = SettingsScreen::new(&GameSettings::default());
        screen.adjust(1);
        screen.selected = 2;
        screen.adjust(1);
        let ScreenTransition::ApplySettings { settings, .. } = screen.apply() else {
            panic!("Expected settings");
        };
        assert_eq!(settings.target_score(), 26);
        assert_eq!(settings.dice().dice_count(), 2);
    }

    #[test]
    fn test_out_of_range_values_are_reported() {
        let mut screen = SettingsScreen::new(&GameSettings::default());
        screen.selected = 1;
        for _ in 0..5 {
            screen.adjust(-1);
        }
        let ScreenTransition::ApplySettings {
            settings,
            corrections,
        } = screen.apply()
        else {
            panic!("Expected settings");
        };
        assert_eq!(settings.dice().face_count(), 6);
        assert_eq!(corrections.len(), 1);
    }
}
