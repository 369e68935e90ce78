//! Standard card deck tab.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::{InputMode, Tab};
use crate::app::AppContext;

/// Card picker tab state. All real state lives in the card tool.
#[derive(Debug, Default)]
pub struct CardsTab;

impl Tab for CardsTab {
    fn input_mode(&self) -> InputMode {
        InputMode::VimNav
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> bool {
        let cards = &mut ctx.tools.cards;
        match key.code {
            KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char(' ') => {
                cards.pile.draw(&mut ctx.rng);
            }
            KeyCode::Char('+') | KeyCode::Char('l') => cards.pile.adjust_draw_count(1),
            KeyCode::Char('-') | KeyCode::Char('h') => cards.pile.adjust_draw_count(-1),
            KeyCode::Char(']') => cards.adjust_deck_count(1, &mut ctx.rng),
            KeyCode::Char('[') => cards.adjust_deck_count(-1, &mut ctx.rng),
            KeyCode::Char('m') => cards.pile.toggle_reshuffle(),
            KeyCode::Char('s') => cards.pile.reshuffle_all(&mut ctx.rng),
            KeyCode::Char('n') => cards.new_deck(&mut ctx.rng),
            KeyCode::Char('c') => cards.pile.clear_hand(&mut ctx.rng),
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let block = Block::default()
            .title(" Cards ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let cards = &ctx.tools.cards;
        let mut lines: Vec<Line<'static>> = Vec::new();

        lines.push(Line::from(vec![
            Span::styled("Decks: ", Style::default().fg(Color::DarkGray)),
            Span::styled(cards.deck_count.to_string(), Style::default().fg(Color::White)),
            Span::styled("   Draw: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                cards.pile.draw_count.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::styled("   Mode: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                if cards.pile.reshuffle_mode {
                    "reshuffle"
                } else {
                    "discard"
                },
                Style::default().fg(Color::Cyan),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!(
                "Pile {}  Discard {}  Hand {}",
                cards.pile.draw_pile.len(),
                cards.pile.discard.len(),
                cards.pile.hand.len()
            ),
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));

        if cards.pile.hand.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press Enter to draw.",
                Style::default().fg(Color::Green),
            )));
        } else {
            let hand: Vec<String> = cards.pile.hand.iter().map(ToString::to_string).collect();
            lines.push(Line::from(Span::styled(
                hand.join("  "),
                Style::default().fg(Color::Yellow).bold(),
            )));
        }

        if !cards.pile.history.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Recent draws:",
                Style::default().fg(Color::DarkGray),
            )));
            for draw in cards.pile.history.iter().take(5) {
                let text: Vec<String> = draw.iter().map(ToString::to_string).collect();
                lines.push(Line::from(Span::styled(
                    format!("  {}", text.join("  ")),
                    Style::default().fg(Color::White),
                )));
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn status_hint(&self) -> &str {
        "Enter:draw  +/-:count  [/]:decks  m:mode  s:reshuffle  n:new deck  c:clear hand  q:quit"
    }
}
