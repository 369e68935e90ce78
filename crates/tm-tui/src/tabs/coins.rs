//! Coin flipper tab.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use tm_core::CoinFace;

use super::{InputMode, Tab};
use crate::app::AppContext;

/// Coin flipper tab state. All real state lives in the coin tool.
#[derive(Debug, Default)]
pub struct CoinsTab;

impl Tab for CoinsTab {
    fn input_mode(&self) -> InputMode {
        InputMode::VimNav
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> bool {
        let coins = &mut ctx.tools.coins;
        match key.code {
            KeyCode::Enter | KeyCode::Char('f') | KeyCode::Char(' ') => {
                coins.flip(&mut ctx.rng);
            }
            KeyCode::Char('+') | KeyCode::Char('l') => coins.adjust_flip_count(1),
            KeyCode::Char('-') | KeyCode::Char('h') => coins.adjust_flip_count(-1),
            KeyCode::Char('c') => coins.clear_history(),
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let block = Block::default()
            .title(" Coins ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let coins = &ctx.tools.coins;
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("Coins per flip: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                coins.flip_count.to_string(),
                Style::default().fg(Color::White).bold(),
            ),
        ]));
        lines.push(Line::from(""));

        if coins.results.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press Enter to flip.",
                Style::default().fg(Color::Green),
            )));
        } else {
            let spans: Vec<Span<'static>> = coins
                .results
                .iter()
                .map(|face| {
                    let (label, color) = match face {
                        CoinFace::Heads => (" HEADS ", Color::Yellow),
                        CoinFace::Tails => (" TAILS ", Color::Cyan),
                    };
                    Span::styled(format!("{label} "), Style::default().fg(color).bold())
                })
                .collect();
            lines.push(Line::from(spans));
        }

        let stats = coins.stats();
        if stats.total > 0 {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "Last {}: {} heads ({}%), {} tails",
                    stats.total, stats.heads, stats.heads_percent, stats.tails
                ),
                Style::default().fg(Color::DarkGray),
            )));
            if let Some((face, length)) = stats.longest_streak {
                lines.push(Line::from(Span::styled(
                    format!("Longest streak: {length} x {face}"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn status_hint(&self) -> &str {
        "Enter/Space:flip  +/-:count  c:clear history  Tab:view  ?:help  q:quit"
    }
}
