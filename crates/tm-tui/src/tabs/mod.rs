//! Tab definitions, trait, and tab bar rendering.

pub mod cards;
pub mod coins;
pub mod decks;
pub mod dice;
pub mod settings;
pub mod templates;
pub mod tiles;

use ratatui::prelude::*;

use crate::app::AppContext;

/// Identifies which tab is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabId {
    /// Dice tray.
    Dice,
    /// Standard card deck.
    Cards,
    /// Coin flipper.
    Coins,
    /// Tile bag.
    Tiles,
    /// Custom deck library.
    Decks,
    /// Game templates and the runner.
    Templates,
    /// Settings and saved games.
    Settings,
}

impl TabId {
    /// All tab IDs in display order.
    pub const ALL: [TabId; 7] = [
        TabId::Dice,
        TabId::Cards,
        TabId::Coins,
        TabId::Tiles,
        TabId::Decks,
        TabId::Templates,
        TabId::Settings,
    ];

    /// Parse a tab name from a string.
    pub fn from_name(name: &str) -> Option<TabId> {
        match name.to_lowercase().as_str() {
            "dice" => Some(TabId::Dice),
            "cards" => Some(TabId::Cards),
            "coins" => Some(TabId::Coins),
            "tiles" => Some(TabId::Tiles),
            "decks" => Some(TabId::Decks),
            "templates" => Some(TabId::Templates),
            "settings" => Some(TabId::Settings),
            _ => None,
        }
    }

    /// Index of this tab in the tab bar.
    pub fn index(self) -> usize {
        TabId::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    /// Get the next tab (wrapping).
    pub fn next(self) -> TabId {
        let idx = (self.index() + 1) % TabId::ALL.len();
        TabId::ALL[idx]
    }

    /// Get the previous tab (wrapping).
    pub fn prev(self) -> TabId {
        let idx = if self.index() == 0 {
            TabId::ALL.len() - 1
        } else {
            self.index() - 1
        };
        TabId::ALL[idx]
    }
}

/// Whether a tab consumes keyboard input or uses vim-like navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Vim-like navigation: hjkl, Tab, number keys. Top-level handles tab
    /// switching.
    VimNav,
    /// Text input: the tab has its own input field. Most keys go to the tab.
    TextInput,
}

/// Trait that each tab screen implements.
///
/// Tabs hold only view state (selections, open forms); the tool states and
/// libraries live in the shared [`AppContext`] passed to every call.
pub trait Tab {
    /// Return the input mode for event routing.
    fn input_mode(&self) -> InputMode;

    /// Handle a key event. Return `true` if the app should quit.
    fn handle_key(&mut self, key: crossterm::event::KeyEvent, ctx: &mut AppContext) -> bool;

    /// Draw the tab content into the given area.
    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext);

    /// Return context-sensitive status bar text.
    fn status_hint(&self) -> &str;
}

/// Tab bar labels in display order.
const TITLES: [&str; 7] = [
    "[1]Dice",
    "[2]Cards",
    "[3]Coins",
    "[4]Tiles",
    "[5]Decks",
    "[6]Templates",
    "[7]Settings",
];

/// Draw the tab bar.
pub fn draw_tab_bar(frame: &mut Frame, active: TabId, area: Rect) {
    let active_idx = active.index();
    let mut spans = Vec::new();

    for (i, title) in TITLES.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        let style = if i == active_idx {
            Style::default().fg(Color::White).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(*title, style));
    }

    let line = Line::from(spans);
    let paragraph = ratatui::widgets::Paragraph::new(line);
    frame.render_widget(paragraph, area);
}

/// Hit-test the tab bar for mouse clicks.
pub fn tab_bar_hit_test(col: u16) -> Option<TabId> {
    let mut x = 0u16;
    for (i, title) in TITLES.iter().enumerate() {
        let end_x = x + title.len() as u16;
        if col >= x && col < end_x {
            return Some(TabId::ALL[i]);
        }
        x = end_x + 3; // " | " divider
    }
    None
}
