//! Dice tray tab.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use tm_core::Die;

use super::{InputMode, Tab};
use crate::app::AppContext;

/// Dice tray tab state.
#[derive(Debug, Default)]
pub struct DiceTab {
    /// Selection index into the visible dice list.
    selected: usize,
}

/// Die types the settings currently show.
fn visible_dice(ctx: &AppContext) -> Vec<Die> {
    Die::ALL
        .into_iter()
        .filter(|d| ctx.settings.is_die_visible(*d))
        .collect()
}

impl Tab for DiceTab {
    fn input_mode(&self) -> InputMode {
        InputMode::VimNav
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> bool {
        let dice = visible_dice(ctx);
        if dice.is_empty() {
            return false;
        }
        self.selected = self.selected.min(dice.len() - 1);
        let die = dice[self.selected];

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(dice.len() - 1);
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => {
                ctx.tools.dice.adjust(die, 1);
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => {
                ctx.tools.dice.adjust(die, -1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                ctx.tools.dice.roll_all(&mut ctx.rng);
            }
            KeyCode::Char('c') => {
                ctx.tools.dice.clear();
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let block = Block::default()
            .title(" Dice Tray ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let dice = visible_dice(ctx);
        let selected = self.selected.min(dice.len().saturating_sub(1));
        let mut lines: Vec<Line<'static>> = Vec::new();

        for (i, die) in dice.iter().enumerate() {
            let count = ctx.tools.dice.count(*die);
            let marker = if i == selected { "> " } else { "  " };
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else if count > 0 {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{die:>5}  x {count}"),
                style,
            )));
        }
        lines.push(Line::from(""));

        if ctx.tools.dice.results.is_empty() {
            lines.push(Line::from(Span::styled(
                "Pick some dice, then Enter or Space to roll.",
                Style::default().fg(Color::Green),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                format!("Roll #{}:", ctx.tools.dice.roll_id),
                Style::default().fg(Color::DarkGray),
            )));
            for result in &ctx.tools.dice.results {
                lines.push(Line::from(Span::styled(
                    format!("  {result}"),
                    Style::default().fg(Color::Yellow),
                )));
            }
            lines.push(Line::from(vec![
                Span::styled("Grand total: ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    ctx.tools.dice.grand_total().to_string(),
                    Style::default().fg(Color::Green).bold(),
                ),
            ]));
        }

        if !ctx.tools.dice.history.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{} past rolls remembered", ctx.tools.dice.history.len()),
                Style::default().fg(Color::DarkGray),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn status_hint(&self) -> &str {
        "j/k:die  h/l:count  Enter/Space:roll  c:clear  Tab:view  ?:help  q:quit"
    }
}
