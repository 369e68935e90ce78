//! Terminal setup, teardown, and main event loop.

use std::io;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::TuiApp;
use crate::tabs::{self, InputMode, TabId};

/// Launch the TUI application.
pub fn run(mut app: TuiApp) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

/// Main event loop.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut TuiApp,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|frame| draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        let event = event::read().map_err(|e| format!("event error: {e}"))?;
        handle_event(app, event);
    }
}

/// Handle a crossterm event.
fn handle_event(app: &mut TuiApp, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        _ => {}
    }
}

/// Handle keyboard input with mode-aware tab switching.
fn handle_key(app: &mut TuiApp, key: crossterm::event::KeyEvent) {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Ctrl+number switches tabs from any mode
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && let Some(tab) = ctrl_number_to_tab(key.code)
    {
        app.switch_tab(tab);
        return;
    }

    match app.active_input_mode() {
        InputMode::VimNav => {
            // Global keys for VimNav tabs
            match key.code {
                KeyCode::Char('q') => {
                    app.should_quit = true;
                    return;
                }
                KeyCode::Char('?') => {
                    app.show_help = !app.show_help;
                    return;
                }
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.switch_tab(app.active_tab.prev());
                    } else {
                        app.switch_tab(app.active_tab.next());
                    }
                    return;
                }
                KeyCode::BackTab => {
                    app.switch_tab(app.active_tab.prev());
                    return;
                }
                _ => {}
            }
            // Number keys 1-7 switch tabs
            if let KeyCode::Char(c) = key.code
                && let Some(idx) = c.to_digit(10)
                && (1..=7).contains(&idx)
            {
                app.switch_tab(TabId::ALL[idx as usize - 1]);
                return;
            }
            if app.forward_key(key) {
                app.should_quit = true;
            }
        }
        InputMode::TextInput => {
            if app.forward_key(key) {
                app.should_quit = true;
            }
        }
    }
}

/// Map Ctrl+digit to a tab.
fn ctrl_number_to_tab(code: KeyCode) -> Option<TabId> {
    if let KeyCode::Char(c) = code
        && let Some(idx) = c.to_digit(10)
        && (1..=7).contains(&idx)
    {
        return Some(TabId::ALL[idx as usize - 1]);
    }
    None
}

/// Handle mouse events: tab bar clicks only.
fn handle_mouse(app: &mut TuiApp, mouse: crossterm::event::MouseEvent) {
    if mouse.kind == MouseEventKind::Down(MouseButton::Left)
        && mouse.row == 0
        && let Some(tab) = tabs::tab_bar_hit_test(mouse.column)
    {
        app.switch_tab(tab);
    }
}

/// Main draw function.
fn draw(frame: &mut Frame, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tab_bar(frame, app.active_tab, chunks[0]);

    app.active_tab_ref().draw(frame, chunks[1], &app.ctx);

    let hint = app.active_tab_ref().status_hint();
    let status = Paragraph::new(hint).style(Style::default().fg(Color::Black).bg(Color::White));
    frame.render_widget(status, chunks[2]);

    if app.show_help {
        crate::shared::draw_help_popup(frame);
    }
}
