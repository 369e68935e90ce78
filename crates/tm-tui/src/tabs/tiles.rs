//! Tile bag tab.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::{InputMode, Tab};
use crate::app::AppContext;

/// Tile picker tab state. All real state lives in the tile tool.
#[derive(Debug, Default)]
pub struct TilesTab;

impl Tab for TilesTab {
    fn input_mode(&self) -> InputMode {
        InputMode::VimNav
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> bool {
        let tiles = &mut ctx.tools.tiles;
        match key.code {
            KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char(' ') => {
                tiles.pile.draw(&mut ctx.rng);
            }
            KeyCode::Char('+') | KeyCode::Char('l') => tiles.pile.adjust_draw_count(1),
            KeyCode::Char('-') | KeyCode::Char('h') => tiles.pile.adjust_draw_count(-1),
            KeyCode::Char('m') => tiles.pile.toggle_reshuffle(),
            KeyCode::Char('s') => tiles.pile.reshuffle_all(&mut ctx.rng),
            KeyCode::Char('n') => tiles.new_bag(&mut ctx.rng),
            KeyCode::Char('c') => tiles.pile.clear_hand(&mut ctx.rng),
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let block = Block::default()
            .title(" Tiles ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let tiles = &ctx.tools.tiles;
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("Draw: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                tiles.pile.draw_count.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::styled("   Mode: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                if tiles.pile.reshuffle_mode {
                    "reshuffle"
                } else {
                    "discard"
                },
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("   Bag {}", tiles.pile.draw_pile.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(""));

        if tiles.pile.hand.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press Enter to draw from the bag.",
                Style::default().fg(Color::Green),
            )));
        } else {
            let hand: Vec<String> = tiles.pile.hand.iter().map(ToString::to_string).collect();
            lines.push(Line::from(Span::styled(
                hand.join("  "),
                Style::default().fg(Color::Yellow).bold(),
            )));
        }

        let stats = tiles.stats();
        if stats.draws > 0 {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} draws, {} tiles drawn", stats.draws, stats.tiles_drawn),
                Style::default().fg(Color::DarkGray),
            )));
            if let Some((color, n)) = stats.top_color {
                lines.push(Line::from(Span::styled(
                    format!("Most drawn color: {color} ({n})"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            if let Some((number, n)) = stats.top_number {
                lines.push(Line::from(Span::styled(
                    format!("Most drawn number: {number} ({n})"),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn status_hint(&self) -> &str {
        "Enter:draw  +/-:count  m:mode  s:reshuffle  n:new bag  c:clear hand  q:quit"
    }
}
