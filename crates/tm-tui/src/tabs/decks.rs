//! Custom deck library tab: list, play, create, edit, delete.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use uuid::Uuid;

use tm_core::deck::{CardType, CustomDeck};

use super::{InputMode, Tab};
use crate::app::AppContext;
use crate::shared::{FieldEvent, TextField};

/// Which screen the decks tab is showing.
#[derive(Debug)]
enum View {
    /// Deck list with a selection.
    List,
    /// Playing one deck.
    Play {
        /// The open deck.
        deck_id: Uuid,
    },
    /// New-deck form: name first.
    NewName {
        /// Name input.
        field: TextField,
    },
    /// New-deck form: card types as "text x count; text x count".
    NewCards {
        /// The chosen name.
        name: String,
        /// Card types input.
        field: TextField,
    },
    /// Renaming a drawn card (single instance or all matching).
    Rename {
        /// The open deck.
        deck_id: Uuid,
        /// Index into the deck's hand.
        card_index: usize,
        /// Rename every card with the same text, not just this one.
        all: bool,
        /// New text input.
        field: TextField,
    },
}

/// Custom deck library tab state.
#[derive(Debug)]
pub struct DecksTab {
    view: View,
    selected: usize,
    /// Last form error, shown until the next key.
    error: Option<String>,
}

impl Default for DecksTab {
    fn default() -> Self {
        Self {
            view: View::List,
            selected: 0,
            error: None,
        }
    }
}

impl DecksTab {
    /// Jump straight to the new-deck form (route `#/new-deck`).
    pub fn start_new_deck(&mut self) {
        self.view = View::NewName {
            field: TextField::new("Deck name"),
        };
    }

    /// Open a deck's play view if it still exists (routes `#/deck-<id>`,
    /// `#/edit-deck-<id>`). Stale ids fall back to the list.
    pub fn open_deck(&mut self, deck_id: Uuid, ctx: &AppContext) {
        self.view = if ctx.tools.custom_decks.get(deck_id).is_some() {
            View::Play { deck_id }
        } else {
            View::List
        };
    }

    fn handle_list_key(&mut self, key: KeyEvent, ctx: &mut AppContext) {
        let count = ctx.tools.custom_decks.decks.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(count.saturating_sub(1));
            }
            KeyCode::Enter => {
                if let Some(deck) = ctx.tools.custom_decks.decks.get(self.selected) {
                    self.view = View::Play { deck_id: deck.id };
                }
            }
            KeyCode::Char('n') => self.start_new_deck(),
            KeyCode::Char('x') => {
                if let Some(deck) = ctx.tools.custom_decks.decks.get(self.selected) {
                    let id = deck.id;
                    if ctx.tools.custom_decks.delete(id).is_ok() {
                        ctx.persist_decks();
                    }
                    self.selected = self.selected.min(
                        ctx.tools.custom_decks.decks.len().saturating_sub(1),
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_play_key(&mut self, key: KeyEvent, deck_id: Uuid, ctx: &mut AppContext) {
        let Some(deck) = ctx.tools.custom_decks.get(deck_id) else {
            self.view = View::List;
            return;
        };
        let hand_len = deck.pile.hand.len();

        match key.code {
            KeyCode::Esc => {
                self.view = View::List;
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(hand_len.saturating_sub(1));
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let card_index = self.selected.min(hand_len.saturating_sub(1));
                if let Some(card) = deck.pile.hand.get(card_index) {
                    self.view = View::Rename {
                        deck_id,
                        card_index,
                        all: key.code == KeyCode::Char('E'),
                        field: TextField::with_value("New text", card.text.clone()),
                    };
                }
                return;
            }
            _ => {}
        }

        // Mutating keys need the deck mutably; persist afterwards.
        let Some(deck) = ctx.tools.custom_decks.get_mut(deck_id) else {
            return;
        };
        let mutated = match key.code {
            KeyCode::Enter | KeyCode::Char('d') | KeyCode::Char(' ') => {
                deck.pile.draw(&mut ctx.rng);
                true
            }
            KeyCode::Char('+') | KeyCode::Char('l') => {
                deck.pile.adjust_draw_count(1);
                true
            }
            KeyCode::Char('-') | KeyCode::Char('h') => {
                deck.pile.adjust_draw_count(-1);
                true
            }
            KeyCode::Char('m') => {
                deck.pile.toggle_reshuffle();
                true
            }
            KeyCode::Char('s') => {
                deck.pile.reshuffle_all(&mut ctx.rng);
                true
            }
            KeyCode::Char('n') => {
                deck.rebuild_pile(&mut ctx.rng);
                true
            }
            _ => false,
        };
        if mutated {
            ctx.persist_decks();
        }
    }

    fn submit_new_deck(&mut self, name: &str, cards_input: &str, ctx: &mut AppContext) {
        let card_types = parse_card_types(cards_input);
        match CustomDeck::build(name, card_types, &mut ctx.rng) {
            Ok(deck) => {
                let id = ctx.tools.custom_decks.add(deck);
                ctx.persist_decks();
                self.error = None;
                self.view = View::Play { deck_id: id };
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.view = View::List;
            }
        }
    }
}

/// Parse "Zombie x3; Skeleton x2" into card types. Segments without an
/// explicit count get one copy; blank segments are dropped.
fn parse_card_types(input: &str) -> Vec<CardType> {
    input.split(';')
        .filter_map(|segment| {
            let segment = segment.trim();
            if segment.is_empty() {
                return None;
            }
            if let Some((text, count)) = segment.rsplit_once('x')
                && let Ok(count) = count.trim().parse::<u32>()
            {
                return Some(CardType::new(text.trim(), count));
            }
            Some(CardType::new(segment, 1))
        })
        .collect()
}

impl Tab for DecksTab {
    fn input_mode(&self) -> InputMode {
        match self.view {
            View::List | View::Play { .. } => InputMode::VimNav,
            _ => InputMode::TextInput,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> bool {
        self.error = None;
        match &mut self.view {
            View::List => self.handle_list_key(key, ctx),
            View::Play { deck_id } => {
                let deck_id = *deck_id;
                self.handle_play_key(key, deck_id, ctx);
            }
            View::NewName { field } => match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let name = field.value.clone();
                    self.view = View::NewCards {
                        name,
                        field: TextField::new("Cards (text x count; ...)"),
                    };
                }
                FieldEvent::Cancelled => self.view = View::List,
                FieldEvent::Edited => {}
            },
            View::NewCards { name, field } => match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let (name, cards) = (name.clone(), field.value.clone());
                    self.submit_new_deck(&name, &cards, ctx);
                }
                FieldEvent::Cancelled => self.view = View::List,
                FieldEvent::Edited => {}
            },
            View::Rename {
                deck_id,
                card_index,
                all,
                field,
            } => match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let (deck_id, card_index, all) = (*deck_id, *card_index, *all);
                    let text = field.value.clone();
                    if let Some(deck) = ctx.tools.custom_decks.get_mut(deck_id)
                        && let Some(card) = deck.pile.hand.get(card_index)
                    {
                        let card_id = card.id;
                        let result = if all {
                            deck.rename_card_type(card_id, &text)
                        } else {
                            deck.rename_card(card_id, &text)
                        };
                        if result.is_ok() {
                            ctx.persist_decks();
                        }
                    }
                    self.view = View::Play { deck_id };
                }
                FieldEvent::Cancelled => {
                    self.view = View::Play { deck_id: *deck_id };
                }
                FieldEvent::Edited => {}
            },
        }
        false
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let block = Block::default()
            .title(" Custom Decks ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = Vec::new();
        match &self.view {
            View::List => {
                if ctx.tools.custom_decks.decks.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "No decks yet. Press n to create one.",
                        Style::default().fg(Color::Green),
                    )));
                }
                for (i, deck) in ctx.tools.custom_decks.decks.iter().enumerate() {
                    let marker = if i == self.selected { "> " } else { "  " };
                    let style = if i == self.selected {
                        Style::default().fg(Color::Yellow).bold()
                    } else {
                        Style::default().fg(Color::White)
                    };
                    lines.push(Line::from(Span::styled(
                        format!("{marker}{} ({} cards)", deck.name, deck.total_cards()),
                        style,
                    )));
                }
            }
            View::Play { deck_id } => {
                if let Some(deck) = ctx.tools.custom_decks.get(*deck_id) {
                    draw_play_lines(&mut lines, deck, self.selected);
                }
            }
            View::NewName { field } | View::NewCards { field, .. } => {
                lines.push(field.line());
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Enter to continue, Esc to cancel.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            View::Rename { field, all, .. } => {
                lines.push(field.line());
                lines.push(Line::from(Span::styled(
                    if *all {
                        "Renames every card with the same text."
                    } else {
                        "Renames just this card."
                    },
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }

        if let Some(error) = &self.error {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn status_hint(&self) -> &str {
        match self.view {
            View::List => "j/k:select  Enter:play  n:new deck  x:delete  q:quit",
            View::Play { .. } => {
                "Enter:draw  +/-:count  m:mode  s:reshuffle  n:rebuild  e/E:rename one/all  Esc:back"
            }
            _ => "Enter:submit  Esc:cancel",
        }
    }
}

fn draw_play_lines(lines: &mut Vec<Line<'static>>, deck: &CustomDeck, selected: usize) {
    lines.push(Line::from(vec![
        Span::styled(deck.name.clone(), Style::default().fg(Color::White).bold()),
        Span::styled(
            format!(
                "   Pile {}  Discard {}  Draw {}  Mode: {}",
                deck.pile.draw_pile.len(),
                deck.pile.discard.len(),
                deck.pile.draw_count,
                if deck.pile.reshuffle_mode {
                    "reshuffle"
                } else {
                    "discard"
                }
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));

    if deck.pile.hand.is_empty() {
        lines.push(Line::from(Span::styled(
            "Press Enter to draw.",
            Style::default().fg(Color::Green),
        )));
    } else {
        let selected = selected.min(deck.pile.hand.len() - 1);
        for (i, card) in deck.pile.hand.iter().enumerate() {
            let marker = if i == selected { "> " } else { "  " };
            let style = if i == selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(
                format!("{marker}{}", card.text),
                style,
            )));
        }
    }

    let drawn = deck.drawn_counts();
    if !drawn.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Drawn so far:",
            Style::default().fg(Color::DarkGray),
        )));
        for (text, count) in drawn {
            lines.push(Line::from(Span::styled(
                format!("  {text}: {count}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
}
