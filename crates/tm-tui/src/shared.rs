//! Shared utilities for TUI views: text input, layout helpers, and popups.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// What a key press did to a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// The field consumed the key (or ignored it).
    Edited,
    /// Enter was pressed; the value is ready.
    Submitted,
    /// Esc was pressed; the input is abandoned.
    Cancelled,
}

/// A one-line text input with a label.
#[derive(Debug, Clone)]
pub struct TextField {
    /// Prompt shown before the input.
    pub label: String,
    /// Current input text.
    pub value: String,
}

impl TextField {
    /// An empty field with a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
        }
    }

    /// A field pre-filled with a value (for edits).
    pub fn with_value(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    /// Feed a key press into the field.
    pub fn handle_key(&mut self, key: KeyEvent) -> FieldEvent {
        match key.code {
            KeyCode::Enter => FieldEvent::Submitted,
            KeyCode::Esc => FieldEvent::Cancelled,
            KeyCode::Backspace => {
                self.value.pop();
                FieldEvent::Edited
            }
            KeyCode::Char(c) => {
                self.value.push(c);
                FieldEvent::Edited
            }
            _ => FieldEvent::Edited,
        }
    }

    /// Render as a single line with a visible cursor block.
    pub fn line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{}: ", self.label),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(self.value.clone(), Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::Yellow).bold()),
        ])
    }
}

/// Create a centered rectangle as a percentage of the given area.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Draw a global help popup overlay.
pub fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    let help_text = vec![
        Line::from("Keyboard Shortcuts").style(Style::default().bold()),
        Line::from(""),
        Line::from("Tabs:"),
        Line::from("  1-7 / Tab   Switch tab"),
        Line::from("  Ctrl+1..7   Switch tab (while typing)"),
        Line::from(""),
        Line::from("Randomizers:"),
        Line::from("  Enter/Space Roll / draw / flip"),
        Line::from("  + / -       Adjust count"),
        Line::from("  m           Toggle reshuffle mode"),
        Line::from("  s           Reshuffle everything back in"),
        Line::from("  n           New deck / bag"),
        Line::from(""),
        Line::from("Decks & Templates:"),
        Line::from("  j / k       Move selection"),
        Line::from("  Enter       Open / play"),
        Line::from("  n           Create new"),
        Line::from("  x           Delete"),
        Line::from("  Esc         Back"),
        Line::from(""),
        Line::from("  ?           Toggle this help"),
        Line::from("  q           Quit    Ctrl+C always quits"),
    ];

    let popup = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}
