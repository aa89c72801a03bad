//! History screen: recent games and per-player statistics.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tracing::{info, instrument, warn};

use crate::DiceSession;
use crate::db::{GameRecord, HistoryStore, PlayerStats};
use crate::games::lucky_dice::{Clock, Outcome, PlayerId, RandomSource};
use crate::tui::screen::{Screen, ScreenTransition};

/// Games listed on the history screen.
pub const HISTORY_LIMIT: i64 = 20;

/// State for the history screen.
#[derive(Debug, Clone)]
pub struct HistoryScreen {
    recent_games: Vec<GameRecord>,
    stats: Vec<PlayerStats>,
    error: Option<String>,
}

impl HistoryScreen {
    /// Loads the history from `store` immediately.
    #[instrument(skip(store))]
    pub fn load<S: HistoryStore>(store: &S) -> Self {
        let mut error = None;

        let recent_games = store.recent_games(HISTORY_LIMIT).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load recent games");
            error = Some(e.message.clone());
            Vec::new()
        });

        let mut stats = Vec::new();
        for player in PlayerId::ALL {
            match store.player_stats(player) {
                Ok(s) => stats.push(s),
                Err(e) => {
                    warn!(error = %e, %player, "Failed to load player stats");
                    error = Some(e.message);
                }
            }
        }

        info!(games = recent_games.len(), "History loaded");
        Self {
            recent_games,
            stats,
            error,
        }
    }

    /// Games shown, most recent first.
    pub fn recent_games(&self) -> &[GameRecord] {
        &self.recent_games
    }

    /// Statistics per player.
    pub fn stats(&self) -> &[PlayerStats] {
        &self.stats
    }
}

impl Screen for HistoryScreen {
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
                Constraint::Length(4),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Game History")
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let summary_text = match &self.error {
            Some(message) => format!("History unavailable: {}", message),
            None => self
                .stats
                .iter()
                .map(|s| {
                    format!(
                        "{}: {} games, {} W / {} L / {} T ({:.1}%), avg score {:.1}, avg decision {:.2}s",
                        s.player(),
                        s.total_games(),
                        s.wins(),
                        s.losses(),
                        s.ties(),
                        s.win_rate(),
                        s.avg_score(),
                        s.avg_decision_seconds()
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
        };
        let summary = Paragraph::new(summary_text)
            .style(Style::default().fg(Color::Green))
            .block(Block::default().borders(Borders::ALL).title("Players"));
        frame.render_widget(summary, chunks[1]);

        let header = Row::new(vec![
            Cell::from("#").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Played").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("P1").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("P2").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Result").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Rounds").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Time").style(Style::default().add_modifier(Modifier::BOLD)),
        ])
        .style(Style::default().fg(Color::Yellow));

        let rows: Vec<Row> = self
            .recent_games
            .iter()
            .map(|game| {
                let (result, color) = match game.outcome() {
                    Ok(Outcome::Winner(PlayerId::One)) => ("P1 won".to_string(), Color::Blue),
                    Ok(Outcome::Winner(PlayerId::Two)) => ("P2 won".to_string(), Color::Red),
                    Ok(Outcome::Tie) => ("Tie".to_string(), Color::Yellow),
                    Err(_) => (format!("? ({})", game.winner()), Color::White),
                };
                Row::new(vec![
                    Cell::from(game.id().to_string()),
                    Cell::from(game.played_at().format("%Y-%m-%d %H:%M").to_string()),
                    Cell::from(game.player1_score().to_string()),
                    Cell::from(game.player2_score().to_string()),
                    Cell::from(result).style(Style::default().fg(color)),
                    Cell::from(game.total_rounds().to_string()),
                    Cell::from(format!("{:.0}s", game.duration_seconds())),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(5),
            Constraint::Length(17),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Min(6),
        ];

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Recent Games ({} most recent)", HISTORY_LIMIT)),
        );
        frame.render_widget(table, chunks[2]);

        let help = Paragraph::new("Esc / b: Back to game | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
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
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                info!("Returning to game from history");
                ScreenTransition::GoToGame
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
