//! Settings and saved-games tab.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use tm_core::Die;

use super::{InputMode, Tab};
use crate::app::AppContext;
use crate::shared::{FieldEvent, TextField};

/// Which row group the selection sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    /// Theme / shake / sound / vibrate, by index.
    Preference(usize),
    /// Die visibility toggle, by index into `Die::ALL`.
    Die(usize),
    /// Saved game, by index into the library.
    Save(usize),
}

const PREFERENCE_COUNT: usize = 4;

/// Settings tab state.
#[derive(Debug, Default)]
pub struct SettingsTab {
    selected: usize,
    name_input: Option<TextField>,
}

impl SettingsTab {
    fn row_count(&self, ctx: &AppContext) -> usize {
        PREFERENCE_COUNT + Die::ALL.len() + ctx.saves.saves.len()
    }

    fn row(&self, index: usize, ctx: &AppContext) -> Option<Row> {
        if index < PREFERENCE_COUNT {
            return Some(Row::Preference(index));
        }
        let index = index - PREFERENCE_COUNT;
        if index < Die::ALL.len() {
            return Some(Row::Die(index));
        }
        let index = index - Die::ALL.len();
        if index < ctx.saves.saves.len() {
            return Some(Row::Save(index));
        }
        None
    }

    fn activate(&mut self, ctx: &mut AppContext) {
        match self.row(self.selected, ctx) {
            Some(Row::Preference(0)) => ctx.settings.cycle_theme(),
            Some(Row::Preference(1)) => ctx.settings.shake_enabled = !ctx.settings.shake_enabled,
            Some(Row::Preference(2)) => ctx.settings.sound_enabled = !ctx.settings.sound_enabled,
            Some(Row::Preference(3)) => {
                ctx.settings.vibrate_enabled = !ctx.settings.vibrate_enabled;
            }
            Some(Row::Preference(_)) => return,
            Some(Row::Die(i)) => ctx.settings.toggle_die(Die::ALL[i]),
            Some(Row::Save(i)) => {
                let id = ctx.saves.saves[i].id;
                if ctx.saves.load(id, &mut ctx.tools).is_ok() {
                    ctx.persist_decks();
                }
                return;
            }
            None => return,
        }
        ctx.persist_settings();
    }

    fn delete_selected_save(&mut self, ctx: &mut AppContext) {
        if let Some(Row::Save(i)) = self.row(self.selected, ctx) {
            let id = ctx.saves.saves[i].id;
            if ctx.saves.delete(id).is_ok() {
                ctx.persist_saves();
            }
            self.selected = self.selected.min(self.row_count(ctx).saturating_sub(1));
        }
    }

    fn overwrite_selected_save(&mut self, ctx: &mut AppContext) {
        if let Some(Row::Save(i)) = self.row(self.selected, ctx) {
            let id = ctx.saves.saves[i].id;
            if ctx.saves.overwrite(id, &ctx.tools).is_ok() {
                ctx.persist_saves();
            }
        }
    }
}

impl Tab for SettingsTab {
    fn input_mode(&self) -> InputMode {
        if self.name_input.is_some() {
            InputMode::TextInput
        } else {
            InputMode::VimNav
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> bool {
        if let Some(field) = &mut self.name_input {
            match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let name = field.value.trim().to_string();
                    if !name.is_empty() {
                        ctx.saves.save_new(name, &ctx.tools);
                        ctx.persist_saves();
                    }
                    self.name_input = None;
                }
                FieldEvent::Cancelled => self.name_input = None,
                FieldEvent::Edited => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(self.row_count(ctx).saturating_sub(1));
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(ctx),
            KeyCode::Char('S') => self.name_input = Some(TextField::new("Save name")),
            KeyCode::Char('o') => self.overwrite_selected_save(ctx),
            KeyCode::Char('x') => self.delete_selected_save(ctx),
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(field) = &self.name_input {
            let lines = vec![
                field.line(),
                Line::from(""),
                Line::from(Span::styled(
                    "Enter to save, Esc to cancel.",
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        }

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut push_row = |index: usize, text: String, lines: &mut Vec<Line<'static>>| {
            let marker = if index == self.selected { "> " } else { "  " };
            let style = if index == self.selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(format!("{marker}{text}"), style)));
        };

        let on_off = |v: bool| if v { "on" } else { "off" };
        push_row(0, format!("Theme: {}", ctx.settings.theme_mode), &mut lines);
        push_row(
            1,
            format!("Shake to roll: {}", on_off(ctx.settings.shake_enabled)),
            &mut lines,
        );
        push_row(
            2,
            format!("Roll sound: {}", on_off(ctx.settings.sound_enabled)),
            &mut lines,
        );
        push_row(
            3,
            format!("Vibration: {}", on_off(ctx.settings.vibrate_enabled)),
            &mut lines,
        );

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Visible dice:",
            Style::default().fg(Color::DarkGray),
        )));
        for (i, die) in Die::ALL.iter().enumerate() {
            let mark = if ctx.settings.is_die_visible(*die) {
                "[x]"
            } else {
                "[ ]"
            };
            push_row(PREFERENCE_COUNT + i, format!("{mark} {die}"), &mut lines);
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Saved games (Enter loads, o overwrites, x deletes, S saves new):",
            Style::default().fg(Color::DarkGray),
        )));
        if ctx.saves.saves.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No saved games.",
                Style::default().fg(Color::Green),
            )));
        }
        let base = PREFERENCE_COUNT + Die::ALL.len();
        for (i, save) in ctx.saves.saves.iter().enumerate() {
            push_row(
                base + i,
                format!("{} ({})", save.name, save.timestamp.format("%Y-%m-%d %H:%M")),
                &mut lines,
            );
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn status_hint(&self) -> &str {
        if self.name_input.is_some() {
            "Enter:save  Esc:cancel"
        } else {
            "j/k:select  Enter:toggle/load  S:new save  o:overwrite  x:delete  q:quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AppStore;
    use tm_core::storage::MemoryStorage;

    fn context() -> AppContext {
        AppContext::load(AppStore::new(MemoryStorage::default()), Some(7))
    }

    #[test]
    fn rows_cover_preferences_dice_and_saves() {
        let mut ctx = context();
        let tab = SettingsTab::default();
        assert_eq!(tab.row(0, &ctx), Some(Row::Preference(0)));
        assert_eq!(tab.row(PREFERENCE_COUNT, &ctx), Some(Row::Die(0)));
        assert_eq!(tab.row(tab.row_count(&ctx), &ctx), None);

        let snapshot = ctx.tools.clone();
        ctx.saves.save_new("midgame", &snapshot);
        let last = tab.row_count(&ctx) - 1;
        assert_eq!(tab.row(last, &ctx), Some(Row::Save(0)));
    }

    #[test]
    fn activate_toggles_and_persists_settings() {
        let mut ctx = context();
        let mut tab = SettingsTab::default();
        tab.selected = 1;
        assert!(!ctx.settings.shake_enabled);
        tab.activate(&mut ctx);
        assert!(ctx.settings.shake_enabled);
        assert!(ctx.store.load_settings().shake_enabled);
    }

    #[test]
    fn die_row_toggles_visibility() {
        let mut ctx = context();
        let mut tab = SettingsTab::default();
        tab.selected = PREFERENCE_COUNT;
        tab.activate(&mut ctx);
        assert!(!ctx.settings.is_die_visible(Die::ALL[0]));
    }
}
