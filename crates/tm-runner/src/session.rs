//! The running session: position, variables, execution, and navigation.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tm_core::dice::{Die, RollResult, roll_die};
use tm_core::template::{ActionConfig, DeckSource, GameTemplate, Phase, Step};
use tm_core::{Card, CoinFace, CustomCard, Tile, ToolStates};

use crate::error::{RunnerError, RunnerResult};
use crate::log::LogEntry;

/// Where the current step is in its tiny lifecycle.
///
/// Action steps move `AwaitingAction` → `Executed` exactly once; a second
/// execute is rejected here rather than left to the UI to prevent. Any
/// navigation resets the status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// No result yet; execute (or advance, for text steps) is available.
    #[default]
    AwaitingAction,
    /// The step has produced its result; only navigation remains.
    Executed,
}

/// What executing a step produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// Cards drawn from the standard deck.
    Cards(Vec<Card>),
    /// Cards drawn from a custom deck.
    CustomCards {
        /// The deck's display name.
        deck: String,
        /// The drawn cards.
        cards: Vec<CustomCard>,
    },
    /// Tiles drawn from the bag.
    Tiles(Vec<Tile>),
    /// Coin flip results.
    Coins(Vec<CoinFace>),
    /// Dice roll results.
    Dice(Vec<RollResult>),
    /// A dice step under manual input: the player rolls at the dice tool
    /// instead, so the session records only that it was handed off.
    DiceDeferred,
}

impl std::fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StepOutcome::Cards(cards) => write!(f, "{}", join(cards)),
            StepOutcome::CustomCards { deck, cards } => {
                let texts: Vec<&str> = cards.iter().map(|c| c.text.as_str()).collect();
                write!(f, "{deck}: {}", texts.join(", "))
            }
            StepOutcome::Tiles(tiles) => write!(f, "{}", join(tiles)),
            StepOutcome::Coins(faces) => write!(f, "{}", join(faces)),
            StepOutcome::Dice(results) => write!(f, "{}", join(results)),
            StepOutcome::DiceDeferred => write!(f, "rolled at the dice tray"),
        }
    }
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    let parts: Vec<String> = items.iter().map(T::to_string).collect();
    parts.join(", ")
}

/// A play-through of one game template.
///
/// The session owns its position (phase, step, cycle), the variable
/// bindings fixed at setup, the current step's status and outcome, and the
/// append-only log. It mutates tool states only through [`execute_auto`]
/// and [`execute_input`]; navigation never touches them.
///
/// [`execute_auto`]: RunnerSession::execute_auto
/// [`execute_input`]: RunnerSession::execute_input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerSession {
    /// The template being played (snapshotted at session start).
    pub template: GameTemplate,
    /// Variable bindings fixed at setup.
    pub variables: BTreeMap<String, i64>,
    /// Index of the current phase.
    pub phase_index: usize,
    /// Index of the current step within the phase.
    pub step_index: usize,
    /// How many times play has wrapped past the last phase, starting at 1.
    pub cycle: u32,
    /// The current step's lifecycle position.
    pub status: StepStatus,
    /// The current step's result, if executed.
    pub outcome: Option<StepOutcome>,
    /// Session log, oldest first.
    pub log: Vec<LogEntry>,
}

impl RunnerSession {
    /// Start a session at phase 0, step 0, cycle 1.
    ///
    /// Variables take their declared defaults unless `overrides` rebinds
    /// them. Override names not declared by the template are ignored.
    pub fn new(
        template: GameTemplate,
        overrides: &BTreeMap<String, i64>,
    ) -> RunnerResult<Self> {
        if template.phases.is_empty() {
            return Err(RunnerError::NoPhases);
        }
        let mut variables = template.default_variables();
        for (name, value) in overrides {
            if variables.contains_key(name) {
                variables.insert(name.clone(), *value);
            }
        }
        Ok(Self {
            template,
            variables,
            phase_index: 0,
            step_index: 0,
            cycle: 1,
            status: StepStatus::AwaitingAction,
            outcome: None,
            log: Vec::new(),
        })
    }

    /// The current phase.
    pub fn current_phase(&self) -> &Phase {
        &self.template.phases[self.phase_index]
    }

    /// The current step, if the phase has any.
    pub fn current_step(&self) -> Option<&Step> {
        self.current_phase().steps.get(self.step_index)
    }

    /// Evaluate a count expression against the session's variables.
    pub fn count(&self, expr: &str) -> i64 {
        tm_expr::evaluate(expr, &self.variables)
    }

    /// A short human description of an action, with counts evaluated:
    /// "Draw 3 cards", "Flip 2 coins", "Roll dice".
    pub fn action_description(&self, config: &ActionConfig) -> String {
        match config {
            ActionConfig::Cards { draw_count, .. } => {
                format!("Draw {} cards", self.count(draw_count))
            }
            ActionConfig::Tiles { draw_count } => {
                format!("Draw {} tiles", self.count(draw_count))
            }
            ActionConfig::Coins { flip_count } => {
                format!("Flip {} coins", self.count(flip_count))
            }
            ActionConfig::Dice { .. } => "Roll dice".to_string(),
        }
    }

    /// Execute the current auto-action step against the tool states.
    pub fn execute_auto(
        &mut self,
        tools: &mut ToolStates,
        rng: &mut StdRng,
    ) -> RunnerResult<()> {
        if self.status == StepStatus::Executed {
            return Err(RunnerError::AlreadyExecuted);
        }
        let Some(Step::AutoAction { config, .. }) = self.current_step().cloned() else {
            return Err(RunnerError::NotAnAction);
        };
        let outcome = match &config {
            ActionConfig::Dice { counts } => roll_configured(counts, &self.variables, tools, rng),
            other => {
                let count = self.count(count_expr(other));
                perform(other, count, tools, rng)?
            }
        };
        self.outcome = Some(outcome);
        self.status = StepStatus::Executed;
        Ok(())
    }

    /// Execute the current input-action step with a player-typed count.
    ///
    /// Dice steps defer to the dice tool rather than guessing which dice
    /// the typed number refers to.
    pub fn execute_input(
        &mut self,
        count: i64,
        tools: &mut ToolStates,
        rng: &mut StdRng,
    ) -> RunnerResult<()> {
        if self.status == StepStatus::Executed {
            return Err(RunnerError::AlreadyExecuted);
        }
        let Some(Step::InputAction { config, .. }) = self.current_step().cloned() else {
            return Err(RunnerError::NotAnAction);
        };
        if count <= 0 {
            return Err(RunnerError::InvalidCount(count));
        }
        let outcome = match &config {
            ActionConfig::Dice { .. } => StepOutcome::DiceDeferred,
            other => perform(other, count, tools, rng)?,
        };
        self.outcome = Some(outcome);
        self.status = StepStatus::Executed;
        Ok(())
    }

    /// Move to the next step, logging the one being left.
    ///
    /// The log entry snapshots the step and its outcome before the outcome
    /// is cleared. Past the last step of the last phase, play wraps to
    /// phase 0 and the cycle count increments; there is no terminal state.
    pub fn advance(&mut self) {
        if let Some(step) = self.current_step().cloned() {
            self.log.push(LogEntry {
                cycle: self.cycle,
                phase_index: self.phase_index,
                phase_name: self.current_phase().name.clone(),
                step,
                outcome: self.outcome.clone(),
            });
        }
        self.reset_step();
        if self.step_index + 1 < self.current_phase().steps.len() {
            self.step_index += 1;
        } else {
            self.step_index = 0;
            if self.phase_index + 1 < self.template.phases.len() {
                self.phase_index += 1;
            } else {
                self.phase_index = 0;
                self.cycle += 1;
            }
        }
    }

    /// Move to the previous step.
    ///
    /// Navigation only: the log, cycle count, and tool states are never
    /// touched, so revisited steps can be executed again. A no-op at the
    /// very first step.
    pub fn previous(&mut self) {
        self.reset_step();
        if self.step_index > 0 {
            self.step_index -= 1;
        } else if self.phase_index > 0 {
            self.phase_index -= 1;
            self.step_index = self.current_phase().steps.len().saturating_sub(1);
        }
    }

    fn reset_step(&mut self) {
        self.outcome = None;
        self.status = StepStatus::AwaitingAction;
    }
}

fn count_expr(config: &ActionConfig) -> &str {
    match config {
        ActionConfig::Cards { draw_count, .. } | ActionConfig::Tiles { draw_count } => draw_count,
        ActionConfig::Coins { flip_count } => flip_count,
        ActionConfig::Dice { .. } => "",
    }
}

/// Run a non-dice action with a resolved count.
///
/// The count temporarily replaces the store's own draw/flip setting so the
/// draw goes through the store's normal rotation (hand, discard, history,
/// reshuffle mode); the player's setting is restored afterwards. A count of
/// zero records an empty outcome without touching the store.
fn perform(
    config: &ActionConfig,
    count: i64,
    tools: &mut ToolStates,
    rng: &mut StdRng,
) -> RunnerResult<StepOutcome> {
    let count = u32::try_from(count).unwrap_or(0);
    match config {
        ActionConfig::Cards { source, .. } => match source {
            DeckSource::Standard => {
                if count == 0 {
                    return Ok(StepOutcome::Cards(Vec::new()));
                }
                let pile = &mut tools.cards.pile;
                let kept = pile.draw_count;
                pile.draw_count = count;
                pile.draw(rng);
                pile.draw_count = kept;
                Ok(StepOutcome::Cards(pile.hand.clone()))
            }
            DeckSource::Custom(id) => {
                let deck = tools
                    .custom_decks
                    .get_mut(*id)
                    .ok_or(RunnerError::DeckNotFound(*id))?;
                if count == 0 {
                    return Ok(StepOutcome::CustomCards {
                        deck: deck.name.clone(),
                        cards: Vec::new(),
                    });
                }
                let kept = deck.pile.draw_count;
                deck.pile.draw_count = count;
                deck.pile.draw(rng);
                deck.pile.draw_count = kept;
                Ok(StepOutcome::CustomCards {
                    deck: deck.name.clone(),
                    cards: deck.pile.hand.clone(),
                })
            }
        },
        ActionConfig::Tiles { .. } => {
            if count == 0 {
                return Ok(StepOutcome::Tiles(Vec::new()));
            }
            let pile = &mut tools.tiles.pile;
            let kept = pile.draw_count;
            pile.draw_count = count;
            pile.draw(rng);
            pile.draw_count = kept;
            Ok(StepOutcome::Tiles(pile.hand.clone()))
        }
        ActionConfig::Coins { .. } => {
            if count == 0 {
                return Ok(StepOutcome::Coins(Vec::new()));
            }
            let kept = tools.coins.flip_count;
            tools.coins.flip_count = count;
            tools.coins.flip(rng);
            tools.coins.flip_count = kept;
            Ok(StepOutcome::Coins(tools.coins.results.clone()))
        }
        ActionConfig::Dice { .. } => Ok(StepOutcome::DiceDeferred),
    }
}

/// Roll a configured set of dice and record the results at the dice tray.
fn roll_configured(
    counts: &BTreeMap<Die, String>,
    vars: &BTreeMap<String, i64>,
    tools: &mut ToolStates,
    rng: &mut StdRng,
) -> StepOutcome {
    let mut results = Vec::new();
    for die in Die::ALL {
        let count = counts
            .get(&die)
            .map_or(0, |expr| tm_expr::evaluate(expr, vars));
        let count = u32::try_from(count).unwrap_or(0);
        if count == 0 {
            continue;
        }
        let rolls: Vec<u32> = (0..count).map(|_| roll_die(die.sides(), rng)).collect();
        let total = rolls.iter().sum();
        results.push(RollResult { die, rolls, total });
    }
    tools.dice.set_results(results.clone());
    StepOutcome::Dice(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use tm_core::deck::{CardType, CustomDeck};
    use tm_core::template::SetupVariable;
    use uuid::Uuid;

    fn two_phase_template() -> GameTemplate {
        let mut t = GameTemplate::new("Loop");
        t.phases[0].name = "Setup".into();
        t.phases[0].steps.push(Step::text("A", "first"));
        let p2 = t.add_phase("Play");
        t.add_step(p2, Step::text("B", "second"));
        t.add_step(p2, Step::text("C", "third"));
        t
    }

    #[test]
    fn templates_without_phases_are_rejected() {
        let mut t = GameTemplate::new("Empty");
        t.phases.clear();
        assert_eq!(
            RunnerSession::new(t, &BTreeMap::new()).unwrap_err(),
            RunnerError::NoPhases
        );
    }

    #[test]
    fn overrides_rebind_declared_variables_only() {
        let mut t = two_phase_template();
        t.setup_variables
            .push(SetupVariable::new("playersCount", "Players", 4));
        let overrides = BTreeMap::from([
            ("playersCount".to_string(), 2),
            ("bogus".to_string(), 99),
        ]);
        let session = RunnerSession::new(t, &overrides).unwrap();
        assert_eq!(session.variables.get("playersCount"), Some(&2));
        assert!(!session.variables.contains_key("bogus"));
    }

    #[test]
    fn advance_sequences_steps_phases_and_cycles() {
        // Phase layout [1, 2]: three advances reach the last step, the
        // fourth wraps to phase 0 with the cycle bumped.
        let mut session = RunnerSession::new(two_phase_template(), &BTreeMap::new()).unwrap();
        assert_eq!((session.phase_index, session.step_index, session.cycle), (0, 0, 1));
        session.advance();
        assert_eq!((session.phase_index, session.step_index), (1, 0));
        session.advance();
        assert_eq!((session.phase_index, session.step_index), (1, 1));
        session.advance();
        assert_eq!((session.phase_index, session.step_index, session.cycle), (0, 0, 2));
        assert_eq!(session.log.len(), 3);
    }

    #[test]
    fn advance_logs_the_outcome_before_clearing_it() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let mut t = GameTemplate::new("Flips");
        t.phases[0].steps.push(Step::auto(ActionConfig::Coins {
            flip_count: "3".into(),
        }));
        let mut session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        session.execute_auto(&mut tools, &mut rng).unwrap();
        assert!(session.outcome.is_some());
        session.advance();
        assert!(session.outcome.is_none());
        assert!(matches!(
            session.log[0].outcome,
            Some(StepOutcome::Coins(ref faces)) if faces.len() == 3
        ));
    }

    #[test]
    fn previous_navigates_without_mutating_anything() {
        let mut session = RunnerSession::new(two_phase_template(), &BTreeMap::new()).unwrap();
        session.advance();
        session.advance();
        let log_len = session.log.len();

        // Back across the phase boundary, to the end of phase 0.
        session.previous();
        assert_eq!((session.phase_index, session.step_index), (1, 0));
        session.previous();
        assert_eq!((session.phase_index, session.step_index), (0, 0));
        // No-op at the very first step.
        session.previous();
        assert_eq!((session.phase_index, session.step_index), (0, 0));
        assert_eq!(session.log.len(), log_len);
        assert_eq!(session.cycle, 1);
    }

    #[test]
    fn executed_steps_cannot_execute_again() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let mut t = GameTemplate::new("Once");
        t.phases[0].steps.push(Step::auto(ActionConfig::Coins {
            flip_count: "1".into(),
        }));
        let mut session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        session.execute_auto(&mut tools, &mut rng).unwrap();
        assert_eq!(
            session.execute_auto(&mut tools, &mut rng).unwrap_err(),
            RunnerError::AlreadyExecuted
        );
    }

    #[test]
    fn auto_card_draws_use_evaluated_counts_and_the_store() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let mut t = GameTemplate::new("Deal");
        t.setup_variables
            .push(SetupVariable::new("playersCount", "Players", 3));
        t.phases[0].steps.push(Step::auto(ActionConfig::Cards {
            draw_count: "playersCount * 2".into(),
            source: DeckSource::Standard,
        }));
        let mut session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        let kept = tools.cards.pile.draw_count;
        session.execute_auto(&mut tools, &mut rng).unwrap();
        assert!(matches!(
            session.outcome,
            Some(StepOutcome::Cards(ref cards)) if cards.len() == 6
        ));
        assert_eq!(tools.cards.pile.draw_pile.len(), 46);
        assert_eq!(tools.cards.pile.hand.len(), 6);
        // The player's own draw-count setting survives the run.
        assert_eq!(tools.cards.pile.draw_count, kept);
    }

    #[test]
    fn custom_deck_draws_resolve_by_id() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let deck = CustomDeck::build(
            "Events",
            vec![CardType::new("Storm", 3), CardType::new("Calm", 3)],
            &mut rng,
        )
        .unwrap();
        let deck_id = tools.custom_decks.add(deck);

        let mut t = GameTemplate::new("Events");
        t.phases[0].steps.push(Step::auto(ActionConfig::Cards {
            draw_count: "2".into(),
            source: DeckSource::Custom(deck_id),
        }));
        let mut session = RunnerSession::new(t.clone(), &BTreeMap::new()).unwrap();
        session.execute_auto(&mut tools, &mut rng).unwrap();
        assert!(matches!(
            session.outcome,
            Some(StepOutcome::CustomCards { ref deck, ref cards })
                if deck == "Events" && cards.len() == 2
        ));

        // A dangling deck id is an error, not a crash.
        let missing = Uuid::new_v4();
        let mut t2 = GameTemplate::new("Gone");
        t2.phases[0].steps.push(Step::auto(ActionConfig::Cards {
            draw_count: "1".into(),
            source: DeckSource::Custom(missing),
        }));
        let mut session = RunnerSession::new(t2, &BTreeMap::new()).unwrap();
        assert_eq!(
            session.execute_auto(&mut tools, &mut rng).unwrap_err(),
            RunnerError::DeckNotFound(missing)
        );
    }

    #[test]
    fn auto_dice_rolls_record_at_the_tray() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let mut t = GameTemplate::new("Roll");
        t.phases[0].steps.push(Step::auto(ActionConfig::Dice {
            counts: BTreeMap::from([(Die::D6, "2".to_string()), (Die::D20, "1".to_string())]),
        }));
        let mut session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        session.execute_auto(&mut tools, &mut rng).unwrap();
        let Some(StepOutcome::Dice(results)) = &session.outcome else {
            panic!("expected dice outcome");
        };
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].die, Die::D6);
        assert_eq!(results[0].rolls.len(), 2);
        assert_eq!(results[1].die, Die::D20);
        assert_eq!(tools.dice.results, *results);
        assert_eq!(tools.dice.roll_id, 1);
    }

    #[test]
    fn input_steps_validate_the_typed_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let mut t = GameTemplate::new("Ask");
        t.phases[0].steps.push(Step::input(
            ActionConfig::Tiles {
                draw_count: String::new(),
            },
            "How many tiles?",
        ));
        let mut session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        assert_eq!(
            session.execute_input(0, &mut tools, &mut rng).unwrap_err(),
            RunnerError::InvalidCount(0)
        );
        session.execute_input(4, &mut tools, &mut rng).unwrap();
        assert!(matches!(
            session.outcome,
            Some(StepOutcome::Tiles(ref tiles)) if tiles.len() == 4
        ));
    }

    #[test]
    fn input_dice_steps_defer_to_the_tray() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let mut t = GameTemplate::new("Ask");
        t.phases[0].steps.push(Step::input(
            ActionConfig::Dice {
                counts: BTreeMap::new(),
            },
            "Roll",
        ));
        let mut session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        session.execute_input(1, &mut tools, &mut rng).unwrap();
        assert_eq!(session.outcome, Some(StepOutcome::DiceDeferred));
        // The dice tray itself is untouched.
        assert_eq!(tools.dice.roll_id, 0);
    }

    #[test]
    fn text_steps_reject_execution() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut tools = ToolStates::new(&mut rng);
        let mut session = RunnerSession::new(two_phase_template(), &BTreeMap::new()).unwrap();
        assert_eq!(
            session.execute_auto(&mut tools, &mut rng).unwrap_err(),
            RunnerError::NotAnAction
        );
    }

    #[test]
    fn action_descriptions_evaluate_counts() {
        let mut t = two_phase_template();
        t.setup_variables
            .push(SetupVariable::new("playersCount", "Players", 3));
        let session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        assert_eq!(
            session.action_description(&ActionConfig::Cards {
                draw_count: "playersCount + 1".into(),
                source: DeckSource::Standard,
            }),
            "Draw 4 cards"
        );
        assert_eq!(
            session.action_description(&ActionConfig::Coins {
                flip_count: "2".into(),
            }),
            "Flip 2 coins"
        );
        assert_eq!(
            session.action_description(&ActionConfig::Dice {
                counts: BTreeMap::new(),
            }),
            "Roll dice"
        );
    }

    #[test]
    fn empty_phases_advance_straight_through() {
        let mut t = GameTemplate::new("Sparse");
        t.phases[0].steps.push(Step::text("A", "only step"));
        t.add_phase("Empty");
        let mut session = RunnerSession::new(t, &BTreeMap::new()).unwrap();
        session.advance();
        assert_eq!(session.phase_index, 1);
        assert!(session.current_step().is_none());
        // Advancing out of an empty phase logs nothing and wraps.
        session.advance();
        assert_eq!((session.phase_index, session.cycle), (0, 2));
        assert_eq!(session.log.len(), 1);
    }
}
