//! Game template tab: library, builder, run setup, and the step runner.

use std::collections::BTreeMap;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};
use uuid::Uuid;

use tm_core::template::{ActionConfig, DeckSource, GameTemplate, SetupVariable, Step};
use tm_core::{CoreError, Die};
use tm_runner::{LogItem, RunnerSession, StepStatus, grouped};

use super::{InputMode, Tab};
use crate::app::AppContext;
use crate::shared::{FieldEvent, TextField};

/// What kind of step a builder input form is collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StepKind {
    /// Text step; the field is the body.
    Text,
    /// Auto cards draw; the field is the count expression.
    CardsAuto,
    /// Input-action cards draw; the field is the prompt.
    CardsInput,
    /// Auto coin flip; the field is the count expression.
    CoinsAuto,
    /// Auto tile draw; the field is the count expression.
    TilesAuto,
    /// Auto d6 roll; the field is the count expression.
    DiceAuto,
}

impl StepKind {
    fn label(self) -> &'static str {
        match self {
            StepKind::Text => "Step text",
            StepKind::CardsAuto => "Cards to draw (expression)",
            StepKind::CardsInput => "Prompt for the player",
            StepKind::CoinsAuto => "Coins to flip (expression)",
            StepKind::TilesAuto => "Tiles to draw (expression)",
            StepKind::DiceAuto => "d6 dice to roll (expression)",
        }
    }

    fn step(self, value: String) -> Step {
        match self {
            StepKind::Text => Step::text("", value),
            StepKind::CardsAuto => Step::auto(ActionConfig::Cards {
                draw_count: value,
                source: DeckSource::Standard,
            }),
            StepKind::CardsInput => Step::input(
                ActionConfig::Cards {
                    draw_count: String::new(),
                    source: DeckSource::Standard,
                },
                value,
            ),
            StepKind::CoinsAuto => Step::auto(ActionConfig::Coins { flip_count: value }),
            StepKind::TilesAuto => Step::auto(ActionConfig::Tiles { draw_count: value }),
            StepKind::DiceAuto => Step::auto(ActionConfig::Dice {
                counts: BTreeMap::from([(Die::D6, value)]),
            }),
        }
    }
}

/// One editable setup value in the run-setup form.
#[derive(Debug, Clone)]
struct SetupEntry {
    name: String,
    label: String,
    value: String,
}

/// Which screen the templates tab is showing.
#[derive(Debug)]
enum View {
    /// Template list with a selection.
    List,
    /// New-template name form.
    NewName {
        /// Name input.
        field: TextField,
    },
    /// Phase/step overview and list-level editing.
    Detail {
        /// The open template.
        template_id: Uuid,
        /// Selected phase index.
        phase: usize,
    },
    /// Add-phase name form.
    PhaseName {
        /// The open template.
        template_id: Uuid,
        /// Name input.
        field: TextField,
    },
    /// Add-variable form ("name = default").
    Variable {
        /// The open template.
        template_id: Uuid,
        /// Input.
        field: TextField,
    },
    /// Add-step form for one step kind.
    StepInput {
        /// The open template.
        template_id: Uuid,
        /// Target phase index.
        phase: usize,
        /// What the field means.
        kind: StepKind,
        /// Input.
        field: TextField,
    },
    /// Pre-run variable overrides.
    Setup {
        /// The template to run.
        template_id: Uuid,
        /// Editable values, in declaration order.
        entries: Vec<SetupEntry>,
        /// Selected entry.
        selected: usize,
    },
    /// A live run.
    Run {
        /// The session.
        session: Box<RunnerSession>,
        /// Count typed for an input-action step.
        count_input: String,
        /// Last execution error, shown until the next key.
        error: Option<String>,
    },
}

/// Game templates tab state.
#[derive(Debug)]
pub struct TemplatesTab {
    view: View,
    selected: usize,
}

impl Default for TemplatesTab {
    fn default() -> Self {
        Self {
            view: View::List,
            selected: 0,
        }
    }
}

impl TemplatesTab {
    /// Jump straight to the new-template form (route `#/new-template`).
    pub fn start_new_template(&mut self) {
        self.view = View::NewName {
            field: TextField::new("Template name"),
        };
    }

    /// Open a template's detail view if it still exists (routes
    /// `#/template-<id>`, `#/edit-template-<id>`).
    pub fn open_template(&mut self, template_id: Uuid, ctx: &AppContext) {
        self.view = if ctx.templates.get(template_id).is_some() {
            View::Detail { template_id, phase: 0 }
        } else {
            View::List
        };
    }

    /// Open the run-setup form for a template (route `#/run-template-<id>`).
    pub fn start_setup(&mut self, template_id: Uuid, ctx: &AppContext) {
        let Some(template) = ctx.templates.get(template_id) else {
            self.view = View::List;
            return;
        };
        let entries = template
            .setup_variables
            .iter()
            .map(|v| SetupEntry {
                name: v.name.clone(),
                label: v.label.clone(),
                value: v.default.to_string(),
            })
            .collect();
        self.view = View::Setup {
            template_id,
            entries,
            selected: 0,
        };
    }

    fn start_run(&mut self, template_id: Uuid, entries: &[SetupEntry], ctx: &AppContext) {
        let Some(template) = ctx.templates.get(template_id) else {
            self.view = View::List;
            return;
        };
        let overrides: BTreeMap<String, i64> = entries
            .iter()
            .filter_map(|e| e.value.trim().parse().ok().map(|v| (e.name.clone(), v)))
            .collect();
        match RunnerSession::new(template.clone(), &overrides) {
            Ok(session) => {
                self.view = View::Run {
                    session: Box::new(session),
                    count_input: String::new(),
                    error: None,
                };
            }
            Err(_) => self.view = View::List,
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent, ctx: &mut AppContext) {
        let count = ctx.templates.templates.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(count.saturating_sub(1));
            }
            KeyCode::Enter => {
                if let Some(template) = ctx.templates.templates.get(self.selected) {
                    self.view = View::Detail {
                        template_id: template.id,
                        phase: 0,
                    };
                }
            }
            KeyCode::Char('n') => self.start_new_template(),
            KeyCode::Char('r') => {
                if let Some(template) = ctx.templates.templates.get(self.selected) {
                    self.start_setup(template.id, ctx);
                }
            }
            KeyCode::Char('x') => {
                if let Some(template) = ctx.templates.templates.get(self.selected) {
                    let id = template.id;
                    if ctx.templates.delete(id).is_ok() {
                        ctx.persist_templates();
                    }
                    self.selected = self
                        .selected
                        .min(ctx.templates.templates.len().saturating_sub(1));
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent, template_id: Uuid, ctx: &mut AppContext) {
        let Some(template) = ctx.templates.get_mut(template_id) else {
            self.view = View::List;
            return;
        };
        let View::Detail { phase, .. } = &mut self.view else {
            return;
        };
        *phase = (*phase).min(template.phases.len().saturating_sub(1));
        let phase_index = *phase;
        let Some(phase_id) = template.phases.get(phase_index).map(|p| p.id) else {
            self.view = View::List;
            return;
        };

        let mut mutated = true;
        match key.code {
            KeyCode::Esc => {
                self.view = View::List;
                return;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                *phase = phase_index.saturating_sub(1);
                mutated = false;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                *phase = (phase_index + 1).min(template.phases.len() - 1);
                mutated = false;
            }
            KeyCode::Char('K') => {
                template.move_phase(phase_id, -1);
                *phase = phase_index.saturating_sub(1);
            }
            KeyCode::Char('J') => {
                template.move_phase(phase_id, 1);
                *phase = (phase_index + 1).min(template.phases.len() - 1);
            }
            KeyCode::Char('a') => {
                self.view = View::PhaseName {
                    template_id,
                    field: TextField::new("Phase name"),
                };
                return;
            }
            KeyCode::Char('v') => {
                self.view = View::Variable {
                    template_id,
                    field: TextField::new("Variable (name = default)"),
                };
                return;
            }
            KeyCode::Char('x') => {
                template.remove_phase(phase_id);
                *phase = phase_index.min(template.phases.len() - 1);
            }
            KeyCode::Char('z') => {
                if let Some(last) = template.phases[phase_index].steps.last() {
                    let step_id = last.id();
                    template.remove_step(phase_id, step_id);
                }
            }
            KeyCode::Char('r') => {
                self.start_setup(template_id, ctx);
                return;
            }
            code => {
                let kind = match code {
                    KeyCode::Char('t') => Some(StepKind::Text),
                    KeyCode::Char('c') => Some(StepKind::CardsAuto),
                    KeyCode::Char('C') => Some(StepKind::CardsInput),
                    KeyCode::Char('o') => Some(StepKind::CoinsAuto),
                    KeyCode::Char('i') => Some(StepKind::TilesAuto),
                    KeyCode::Char('d') => Some(StepKind::DiceAuto),
                    _ => None,
                };
                let Some(kind) = kind else { return };
                self.view = View::StepInput {
                    template_id,
                    phase: phase_index,
                    kind,
                    field: TextField::new(kind.label()),
                };
                return;
            }
        }
        if mutated {
            ctx.persist_templates();
        }
    }

    fn handle_run_key(&mut self, key: KeyEvent, ctx: &mut AppContext) {
        let View::Run {
            session,
            count_input,
            error,
        } = &mut self.view
        else {
            return;
        };
        *error = None;

        match key.code {
            KeyCode::Esc => self.view = View::List,
            KeyCode::Char('n') | KeyCode::Char(' ') => {
                session.advance();
                count_input.clear();
            }
            KeyCode::Char('p') => {
                session.previous();
                count_input.clear();
            }
            KeyCode::Char('e') => {
                if let Err(e) = session.execute_auto(&mut ctx.tools, &mut ctx.rng) {
                    *error = Some(e.to_string());
                }
                ctx.persist_decks();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => count_input.push(c),
            KeyCode::Backspace => {
                count_input.pop();
            }
            KeyCode::Enter => {
                let count: i64 = count_input.trim().parse().unwrap_or(0);
                if let Err(e) = session.execute_input(count, &mut ctx.tools, &mut ctx.rng) {
                    *error = Some(e.to_string());
                }
                count_input.clear();
                ctx.persist_decks();
            }
            _ => {}
        }
    }
}

/// Parse "playersCount = 4" (or "playersCount 4") into a setup variable.
/// The default follows the first `=`; without one, the first whitespace.
/// A missing or unparseable default is 0.
fn parse_variable(input: &str) -> Result<SetupVariable, CoreError> {
    let (name, value) = match input.split_once('=') {
        Some(pair) => pair,
        None => input
            .trim()
            .split_once(char::is_whitespace)
            .unwrap_or((input, "")),
    };
    let name = name.trim();
    let default: i64 = value.trim().parse().unwrap_or(0);
    if name.is_empty() {
        return Err(CoreError::InvalidTemplate(
            "variable name must not be empty".into(),
        ));
    }
    Ok(SetupVariable::new(name, name, default))
}

impl Tab for TemplatesTab {
    fn input_mode(&self) -> InputMode {
        match self.view {
            View::List | View::Detail { .. } => InputMode::VimNav,
            _ => InputMode::TextInput,
        }
    }

    fn handle_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> bool {
        match &mut self.view {
            View::List => self.handle_list_key(key, ctx),
            View::Detail { template_id, .. } => {
                let template_id = *template_id;
                self.handle_detail_key(key, template_id, ctx);
            }
            View::NewName { field } => match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let template = GameTemplate::new(field.value.clone());
                    match ctx.templates.add(template) {
                        Ok(id) => {
                            ctx.persist_templates();
                            self.view = View::Detail {
                                template_id: id,
                                phase: 0,
                            };
                        }
                        Err(_) => self.view = View::List,
                    }
                }
                FieldEvent::Cancelled => self.view = View::List,
                FieldEvent::Edited => {}
            },
            View::PhaseName { template_id, field } => match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let template_id = *template_id;
                    if let Some(template) = ctx.templates.get_mut(template_id) {
                        template.add_phase(field.value.clone());
                        ctx.persist_templates();
                    }
                    self.view = View::Detail { template_id, phase: 0 };
                }
                FieldEvent::Cancelled => {
                    self.view = View::Detail {
                        template_id: *template_id,
                        phase: 0,
                    };
                }
                FieldEvent::Edited => {}
            },
            View::Variable { template_id, field } => match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let template_id = *template_id;
                    if let Ok(variable) = parse_variable(&field.value)
                        && let Some(template) = ctx.templates.get_mut(template_id)
                    {
                        template.add_variable(variable);
                        ctx.persist_templates();
                    }
                    self.view = View::Detail { template_id, phase: 0 };
                }
                FieldEvent::Cancelled => {
                    self.view = View::Detail {
                        template_id: *template_id,
                        phase: 0,
                    };
                }
                FieldEvent::Edited => {}
            },
            View::StepInput {
                template_id,
                phase,
                kind,
                field,
            } => match field.handle_key(key) {
                FieldEvent::Submitted => {
                    let (template_id, phase, kind) = (*template_id, *phase, *kind);
                    if let Some(template) = ctx.templates.get_mut(template_id)
                        && let Some(p) = template.phases.get(phase)
                    {
                        let phase_id = p.id;
                        template.add_step(phase_id, kind.step(field.value.clone()));
                        ctx.persist_templates();
                    }
                    self.view = View::Detail { template_id, phase };
                }
                FieldEvent::Cancelled => {
                    self.view = View::Detail {
                        template_id: *template_id,
                        phase: *phase,
                    };
                }
                FieldEvent::Edited => {}
            },
            View::Setup {
                template_id,
                entries,
                selected,
            } => match key.code {
                KeyCode::Esc => self.view = View::List,
                KeyCode::Up => *selected = selected.saturating_sub(1),
                KeyCode::Down => {
                    *selected = (*selected + 1).min(entries.len().saturating_sub(1));
                }
                KeyCode::Backspace => {
                    if let Some(entry) = entries.get_mut(*selected) {
                        entry.value.pop();
                    }
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    if let Some(entry) = entries.get_mut(*selected) {
                        entry.value.push(c);
                    }
                }
                KeyCode::Enter => {
                    let (template_id, entries) = (*template_id, entries.clone());
                    self.start_run(template_id, &entries, ctx);
                }
                _ => {}
            },
            View::Run { .. } => self.handle_run_key(key, ctx),
        }
        false
    }

    fn draw(&self, frame: &mut Frame, area: Rect, ctx: &AppContext) {
        let block = Block::default()
            .title(" Templates ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line<'static>> = Vec::new();
        match &self.view {
            View::List => {
                if ctx.templates.templates.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "No templates yet. Press n to create one.",
                        Style::default().fg(Color::Green),
                    )));
                }
                for (i, template) in ctx.templates.templates.iter().enumerate() {
                    let marker = if i == self.selected { "> " } else { "  " };
                    let style = if i == self.selected {
                        Style::default().fg(Color::Yellow).bold()
                    } else {
                        Style::default().fg(Color::White)
                    };
                    lines.push(Line::from(Span::styled(
                        format!("{marker}{} ({} phases)", template.name, template.phases.len()),
                        style,
                    )));
                }
            }
            View::NewName { field }
            | View::PhaseName { field, .. }
            | View::Variable { field, .. }
            | View::StepInput { field, .. } => {
                lines.push(field.line());
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Enter to submit, Esc to cancel.",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            View::Detail { template_id, phase } => {
                if let Some(template) = ctx.templates.get(*template_id) {
                    draw_detail_lines(&mut lines, template, *phase);
                }
            }
            View::Setup { entries, selected, .. } => {
                lines.push(Line::from(Span::styled(
                    "Setup values:",
                    Style::default().fg(Color::White).bold(),
                )));
                if entries.is_empty() {
                    lines.push(Line::from(Span::styled(
                        "No variables. Enter to start.",
                        Style::default().fg(Color::Green),
                    )));
                }
                for (i, entry) in entries.iter().enumerate() {
                    let marker = if i == *selected { "> " } else { "  " };
                    lines.push(Line::from(Span::styled(
                        format!("{marker}{} = {}", entry.label, entry.value),
                        if i == *selected {
                            Style::default().fg(Color::Yellow).bold()
                        } else {
                            Style::default().fg(Color::White)
                        },
                    )));
                }
            }
            View::Run {
                session,
                count_input,
                error,
            } => {
                draw_run_lines(&mut lines, session, count_input, error.as_deref());
            }
        }

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn status_hint(&self) -> &str {
        match self.view {
            View::List => "j/k:select  Enter:open  n:new  r:run  x:delete  q:quit",
            View::Detail { .. } => {
                "a:phase  t/c/C/o/i/d:step  v:variable  J/K:move  x/z:remove  r:run  Esc:back"
            }
            View::Setup { .. } => "Up/Down:select  digits:edit  Enter:start  Esc:cancel",
            View::Run { .. } => "e:execute  digits+Enter:input count  n/Space:next  p:prev  Esc:exit",
            _ => "Enter:submit  Esc:cancel",
        }
    }
}

fn draw_detail_lines(lines: &mut Vec<Line<'static>>, template: &GameTemplate, selected: usize) {
    lines.push(Line::from(Span::styled(
        template.name.clone(),
        Style::default().fg(Color::White).bold(),
    )));
    if !template.setup_variables.is_empty() {
        let vars: Vec<String> = template
            .setup_variables
            .iter()
            .map(|v| format!("{} = {}", v.name, v.default))
            .collect();
        lines.push(Line::from(Span::styled(
            format!("Variables: {}", vars.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));

    for (i, phase) in template.phases.iter().enumerate() {
        let marker = if i == selected { "> " } else { "  " };
        let style = if i == selected {
            Style::default().fg(Color::Yellow).bold()
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", phase.name),
            style,
        )));
        for step in &phase.steps {
            let text = match step {
                Step::Text { body, .. } => format!("text: {body}"),
                Step::AutoAction { config, .. } => format!("auto: {}", config.action()),
                Step::InputAction { config, prompt, .. } => {
                    format!("input: {} ({prompt})", config.action())
                }
            };
            lines.push(Line::from(Span::styled(
                format!("    - {text}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
}

fn draw_run_lines(
    lines: &mut Vec<Line<'static>>,
    session: &RunnerSession,
    count_input: &str,
    error: Option<&str>,
) {
    lines.push(Line::from(vec![
        Span::styled(
            format!("Cycle {}  ", session.cycle),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            session.current_phase().name.clone(),
            Style::default().fg(Color::White).bold(),
        ),
        Span::styled(
            format!(
                "  (step {}/{})",
                session.step_index + 1,
                session.current_phase().steps.len().max(1)
            ),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));

    match session.current_step() {
        None => {
            lines.push(Line::from(Span::styled(
                "This phase has no steps. Press n to continue.",
                Style::default().fg(Color::Green),
            )));
        }
        Some(Step::Text { title, body, .. }) => {
            if !title.is_empty() {
                lines.push(Line::from(Span::styled(
                    title.clone(),
                    Style::default().fg(Color::White).bold(),
                )));
            }
            lines.push(Line::from(Span::styled(
                body.clone(),
                Style::default().fg(Color::White),
            )));
        }
        Some(Step::AutoAction { config, .. }) => {
            lines.push(Line::from(Span::styled(
                session.action_description(config),
                Style::default().fg(Color::White),
            )));
            if session.status == StepStatus::AwaitingAction {
                lines.push(Line::from(Span::styled(
                    "Press e to execute.",
                    Style::default().fg(Color::Green),
                )));
            }
        }
        Some(Step::InputAction { prompt, .. }) => {
            lines.push(Line::from(Span::styled(
                prompt.clone(),
                Style::default().fg(Color::White),
            )));
            lines.push(Line::from(vec![
                Span::styled("Count: ", Style::default().fg(Color::DarkGray)),
                Span::styled(count_input.to_string(), Style::default().fg(Color::Yellow)),
                Span::styled("_", Style::default().fg(Color::Yellow).bold()),
            ]));
        }
    }

    if let Some(outcome) = &session.outcome {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Result: ", Style::default().fg(Color::DarkGray)),
            Span::styled(outcome.to_string(), Style::default().fg(Color::Yellow).bold()),
        ]));
    }
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    if !session.log.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Log:",
            Style::default().fg(Color::DarkGray),
        )));
        let items = grouped(&session.log);
        let tail = items.len().saturating_sub(12);
        for item in &items[tail..] {
            let line = match item {
                LogItem::CycleHeader(cycle) => Line::from(Span::styled(
                    format!("Cycle {cycle}"),
                    Style::default().fg(Color::Cyan).bold(),
                )),
                LogItem::PhaseHeader(name) => Line::from(Span::styled(
                    format!(" {name}"),
                    Style::default().fg(Color::White).bold(),
                )),
                LogItem::Entry(entry) => {
                    let text = match (&entry.step, &entry.outcome) {
                        (_, Some(outcome)) => outcome.to_string(),
                        (Step::Text { body, .. }, None) => body.clone(),
                        (_, None) => "(skipped)".to_string(),
                    };
                    Line::from(Span::styled(
                        format!("  {text}"),
                        Style::default().fg(Color::DarkGray),
                    ))
                }
            };
            lines.push(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_input_parses_name_and_default() {
        let v = parse_variable("playersCount = 4").unwrap();
        assert_eq!(v.name, "playersCount");
        assert_eq!(v.default, 4);
        let v = parse_variable("rounds 3").unwrap();
        assert_eq!((v.name.as_str(), v.default), ("rounds", 3));
        let v = parse_variable("handSize=5").unwrap();
        assert_eq!((v.name.as_str(), v.default), ("handSize", 5));
        assert!(parse_variable("  = 3").is_err());
        assert_eq!(parse_variable("solo").unwrap().default, 0);
        assert_eq!(parse_variable("rounds = lots").unwrap().default, 0);
    }

    #[test]
    fn step_kinds_build_matching_steps() {
        assert!(matches!(
            StepKind::CoinsAuto.step("2".into()),
            Step::AutoAction {
                config: ActionConfig::Coins { .. },
                ..
            }
        ));
        assert!(matches!(
            StepKind::CardsInput.step("How many?".into()),
            Step::InputAction { .. }
        ));
    }
}
