//! Game template data model and authoring helpers.
//!
//! A template is an ordered list of phases, each an ordered list of steps.
//! Steps either display text or perform one of the four randomizer actions,
//! with counts given as arithmetic expressions over the template's setup
//! variables (evaluated by `tm-expr` at run time).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::dice::Die;
use crate::error::{CoreError, CoreResult};

/// A number the player supplies at setup time ("playersCount", etc.).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupVariable {
    /// Stable id.
    pub id: Uuid,
    /// Identifier used inside expressions. Whitespace is stripped.
    pub name: String,
    /// Human-facing label shown at setup.
    pub label: String,
    /// Default value offered at setup.
    pub default: i64,
}

impl SetupVariable {
    /// A new variable with a fresh id; whitespace in the name is removed.
    pub fn new(name: &str, label: impl Into<String>, default: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.split_whitespace().collect(),
            label: label.into(),
            default,
        }
    }
}

/// Which randomizer a step drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    /// Draw playing cards (standard deck or a custom deck).
    Cards,
    /// Draw tiles from the bag.
    Tiles,
    /// Flip coins.
    Coins,
    /// Roll dice.
    Dice,
}

impl std::fmt::Display for StepAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepAction::Cards => write!(f, "cards"),
            StepAction::Tiles => write!(f, "tiles"),
            StepAction::Coins => write!(f, "coins"),
            StepAction::Dice => write!(f, "dice"),
        }
    }
}

/// Which deck a cards action draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeckSource {
    /// The standard/global card tool.
    #[default]
    Standard,
    /// A custom deck, by id.
    Custom(Uuid),
}

/// Per-action configuration. Counts are expression strings evaluated
/// against the session's setup variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionConfig {
    /// Draw cards: a count expression and the source deck.
    Cards {
        /// Expression for how many cards to draw.
        draw_count: String,
        /// Which deck to draw from.
        source: DeckSource,
    },
    /// Draw tiles: a count expression.
    Tiles {
        /// Expression for how many tiles to draw.
        draw_count: String,
    },
    /// Flip coins: a count expression.
    Coins {
        /// Expression for how many coins to flip.
        flip_count: String,
    },
    /// Roll dice: an expression per die type. Absent dice roll zero.
    Dice {
        /// Per-die count expressions.
        counts: BTreeMap<Die, String>,
    },
}

impl ActionConfig {
    /// The randomizer this configuration belongs to.
    pub fn action(&self) -> StepAction {
        match self {
            ActionConfig::Cards { .. } => StepAction::Cards,
            ActionConfig::Tiles { .. } => StepAction::Tiles,
            ActionConfig::Coins { .. } => StepAction::Coins,
            ActionConfig::Dice { .. } => StepAction::Dice,
        }
    }
}

/// One step of a phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Step {
    /// A text instruction; advancing is the only transition.
    Text {
        /// Unique step id.
        id: Uuid,
        /// Optional short title.
        title: String,
        /// Body text shown to the player.
        body: String,
    },
    /// A pre-configured action executed on demand.
    AutoAction {
        /// Unique step id.
        id: Uuid,
        /// The action and its count expressions.
        config: ActionConfig,
    },
    /// An action whose count the player types at run time.
    InputAction {
        /// Unique step id.
        id: Uuid,
        /// The action (counts in the config are ignored; the typed count
        /// is used instead).
        config: ActionConfig,
        /// Prompt shown next to the input field.
        prompt: String,
    },
}

impl Step {
    /// The step's id.
    pub fn id(&self) -> Uuid {
        match self {
            Step::Text { id, .. } | Step::AutoAction { id, .. } | Step::InputAction { id, .. } => {
                *id
            }
        }
    }

    /// A new text step.
    pub fn text(title: impl Into<String>, body: impl Into<String>) -> Self {
        Step::Text {
            id: Uuid::new_v4(),
            title: title.into(),
            body: body.into(),
        }
    }

    /// A new auto-action step.
    pub fn auto(config: ActionConfig) -> Self {
        Step::AutoAction {
            id: Uuid::new_v4(),
            config,
        }
    }

    /// A new input-action step.
    pub fn input(config: ActionConfig, prompt: impl Into<String>) -> Self {
        Step::InputAction {
            id: Uuid::new_v4(),
            config,
            prompt: prompt.into(),
        }
    }
}

/// An ordered group of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Unique phase id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Steps in play order. A phase with no steps advances immediately.
    pub steps: Vec<Step>,
}

impl Phase {
    /// A new empty phase.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            steps: Vec::new(),
        }
    }
}

/// A repeatable, phased game procedure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameTemplate {
    /// Unique template id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Setup variables in declaration order.
    pub setup_variables: Vec<SetupVariable>,
    /// Phases in play order.
    pub phases: Vec<Phase>,
    /// Creation time, for stable ordering in lists.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl GameTemplate {
    /// A new template with a single empty phase.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            setup_variables: Vec::new(),
            phases: vec![Phase::new("Phase 1")],
            created_at: chrono::Utc::now(),
        }
    }

    /// A template is savable with a non-empty name and at least one phase.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidTemplate("name must not be empty".into()));
        }
        if self.phases.is_empty() {
            return Err(CoreError::InvalidTemplate(
                "at least one phase is required".into(),
            ));
        }
        Ok(())
    }

    /// Default variable bindings for a new run.
    pub fn default_variables(&self) -> BTreeMap<String, i64> {
        self.setup_variables
            .iter()
            .map(|v| (v.name.clone(), v.default))
            .collect()
    }

    /// Append a setup variable and return its id.
    pub fn add_variable(&mut self, variable: SetupVariable) -> Uuid {
        let id = variable.id;
        self.setup_variables.push(variable);
        id
    }

    /// Remove a setup variable.
    pub fn remove_variable(&mut self, id: Uuid) {
        self.setup_variables.retain(|v| v.id != id);
    }

    /// Swap a variable with its neighbor; a no-op at the ends.
    pub fn move_variable(&mut self, id: Uuid, delta: i32) {
        move_by_id(&mut self.setup_variables, |v| v.id == id, delta);
    }

    /// Append a phase and return its id.
    pub fn add_phase(&mut self, name: impl Into<String>) -> Uuid {
        let phase = Phase::new(name);
        let id = phase.id;
        self.phases.push(phase);
        id
    }

    /// Remove a phase. The last remaining phase cannot be removed.
    pub fn remove_phase(&mut self, id: Uuid) {
        if self.phases.len() > 1 {
            self.phases.retain(|p| p.id != id);
        }
    }

    /// Swap a phase with its neighbor; a no-op at the ends.
    pub fn move_phase(&mut self, id: Uuid, delta: i32) {
        move_by_id(&mut self.phases, |p| p.id == id, delta);
    }

    /// Append a step to a phase.
    pub fn add_step(&mut self, phase_id: Uuid, step: Step) {
        if let Some(phase) = self.phases.iter_mut().find(|p| p.id == phase_id) {
            phase.steps.push(step);
        }
    }

    /// Remove a step from a phase.
    pub fn remove_step(&mut self, phase_id: Uuid, step_id: Uuid) {
        if let Some(phase) = self.phases.iter_mut().find(|p| p.id == phase_id) {
            phase.steps.retain(|s| s.id() != step_id);
        }
    }

    /// Swap a step with its neighbor within a phase; a no-op at the ends.
    pub fn move_step(&mut self, phase_id: Uuid, step_id: Uuid, delta: i32) {
        if let Some(phase) = self.phases.iter_mut().find(|p| p.id == phase_id) {
            move_by_id(&mut phase.steps, |s| s.id() == step_id, delta);
        }
    }
}

fn move_by_id<T>(items: &mut [T], matches: impl Fn(&T) -> bool, delta: i32) {
    let Some(index) = items.iter().position(matches) else {
        return;
    };
    let target = index as i64 + i64::from(delta.signum());
    if target < 0 || target as usize >= items.len() {
        return;
    }
    items.swap(index, target as usize);
}

/// An ordered collection of game templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateLibrary {
    /// Templates in creation order.
    pub templates: Vec<GameTemplate>,
}

impl TemplateLibrary {
    /// Add a template (after validation) and return its id.
    pub fn add(&mut self, template: GameTemplate) -> CoreResult<Uuid> {
        template.validate()?;
        let id = template.id;
        self.templates.push(template);
        Ok(id)
    }

    /// Look up a template by id.
    pub fn get(&self, id: Uuid) -> Option<&GameTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Look up a template mutably by id.
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut GameTemplate> {
        self.templates.iter_mut().find(|t| t.id == id)
    }

    /// Delete a template by id.
    pub fn delete(&mut self, id: Uuid) -> CoreResult<()> {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        if self.templates.len() == before {
            return Err(CoreError::not_found("template", id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_template_starts_with_one_phase() {
        let t = GameTemplate::new("Castle Defense");
        assert_eq!(t.phases.len(), 1);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn validation_rejects_blank_name_and_no_phases() {
        let mut t = GameTemplate::new("  ");
        assert!(t.validate().is_err());
        t.name = "Game".into();
        t.phases.clear();
        assert!(t.validate().is_err());
    }

    #[test]
    fn setup_variable_names_strip_whitespace() {
        let v = SetupVariable::new("players Count", "Players", 4);
        assert_eq!(v.name, "playersCount");
    }

    #[test]
    fn default_variables_use_declared_defaults() {
        let mut t = GameTemplate::new("Game");
        t.add_variable(SetupVariable::new("playersCount", "Players", 4));
        t.add_variable(SetupVariable::new("rounds", "Rounds", 3));
        let vars = t.default_variables();
        assert_eq!(vars.get("playersCount"), Some(&4));
        assert_eq!(vars.get("rounds"), Some(&3));
    }

    #[test]
    fn variables_move_and_remove_by_id() {
        let mut t = GameTemplate::new("Game");
        let players = t.add_variable(SetupVariable::new("playersCount", "Players", 4));
        let rounds = t.add_variable(SetupVariable::new("rounds", "Rounds", 3));
        t.move_variable(rounds, -1);
        assert_eq!(t.setup_variables[0].id, rounds);
        t.remove_variable(players);
        assert_eq!(t.setup_variables.len(), 1);
    }

    #[test]
    fn last_phase_cannot_be_removed() {
        let mut t = GameTemplate::new("Game");
        let only = t.phases[0].id;
        t.remove_phase(only);
        assert_eq!(t.phases.len(), 1);
    }

    #[test]
    fn phases_and_steps_move_by_swapping() {
        let mut t = GameTemplate::new("Game");
        let p2 = t.add_phase("Phase 2");
        t.move_phase(p2, -1);
        assert_eq!(t.phases[0].id, p2);
        // Moving past the start is a no-op.
        t.move_phase(p2, -1);
        assert_eq!(t.phases[0].id, p2);

        let s1 = Step::text("Setup", "Shuffle everything");
        let s2 = Step::auto(ActionConfig::Coins {
            flip_count: "2".into(),
        });
        let (s1_id, s2_id) = (s1.id(), s2.id());
        t.add_step(p2, s1);
        t.add_step(p2, s2);
        t.move_step(p2, s2_id, -1);
        assert_eq!(t.phases[0].steps[0].id(), s2_id);
        t.remove_step(p2, s1_id);
        assert_eq!(t.phases[0].steps.len(), 1);
    }

    #[test]
    fn library_rejects_invalid_templates() {
        let mut lib = TemplateLibrary::default();
        let mut bad = GameTemplate::new("Game");
        bad.phases.clear();
        assert!(lib.add(bad).is_err());
        let id = lib.add(GameTemplate::new("Game")).unwrap();
        assert!(lib.get(id).is_some());
        lib.delete(id).unwrap();
        assert!(lib.delete(id).is_err());
    }

    #[test]
    fn step_serde_round_trip() {
        let step = Step::input(
            ActionConfig::Cards {
                draw_count: String::new(),
                source: DeckSource::Standard,
            },
            "How many cards?",
        );
        let json = serde_json::to_string(&step).unwrap();
        let back: Step = serde_json::from_str(&json).unwrap();
        assert_eq!(step, back);
    }
}
