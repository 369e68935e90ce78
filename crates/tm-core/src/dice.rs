//! Polyhedral dice and the dice tray store.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many past rolls the tray remembers.
const HISTORY_CAP: usize = 20;

/// A polyhedral die type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
}

impl Die {
    /// All die types in display and roll order.
    pub const ALL: [Die; 7] = [
        Die::D4,
        Die::D6,
        Die::D8,
        Die::D10,
        Die::D12,
        Die::D20,
        Die::D100,
    ];

    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
        }
    }

    /// Parse a die from a tag like "d20" or "D6".
    pub fn from_tag(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "d4" => Some(Self::D4),
            "d6" => Some(Self::D6),
            "d8" => Some(Self::D8),
            "d10" => Some(Self::D10),
            "d12" => Some(Self::D12),
            "d20" => Some(Self::D20),
            "d100" => Some(Self::D100),
            _ => None,
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Roll a single die with the given number of sides.
pub fn roll_die(sides: u32, rng: &mut StdRng) -> u32 {
    rng.random_range(1..=sides)
}

/// The outcome of rolling every die of one type in the tray.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// The die type that was rolled.
    pub die: Die,
    /// Individual roll outcomes, in roll order.
    pub rolls: Vec<u32>,
    /// Sum of the outcomes.
    pub total: u32,
}

impl std::fmt::Display for RollResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rolls: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        write!(f, "{}: {} ({})", self.die, rolls.join(", "), self.total)
    }
}

/// The dice tray: selected counts per die type plus recent results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiceState {
    /// How many of each die to roll. Absent entries count as zero.
    pub counts: BTreeMap<Die, u32>,
    /// Results of the most recent roll, in `Die::ALL` order.
    pub results: Vec<RollResult>,
    /// Past rolls, most recent first, capped.
    pub history: Vec<Vec<RollResult>>,
    /// Monotonic counter bumped on every roll.
    pub roll_id: u64,
}

impl Default for DiceState {
    fn default() -> Self {
        Self {
            counts: Die::ALL.iter().map(|d| (*d, 0)).collect(),
            results: Vec::new(),
            history: Vec::new(),
            roll_id: 0,
        }
    }
}

impl DiceState {
    /// Number of dice of one type currently selected.
    pub fn count(&self, die: Die) -> u32 {
        self.counts.get(&die).copied().unwrap_or(0)
    }

    /// Adjust the count for one die type, clamped at zero.
    pub fn adjust(&mut self, die: Die, delta: i32) {
        let current = self.count(die) as i64;
        let next = (current + i64::from(delta)).max(0) as u32;
        self.counts.insert(die, next);
    }

    /// Whether any die has a non-zero count.
    pub fn has_any(&self) -> bool {
        self.counts.values().any(|c| *c > 0)
    }

    /// Roll every selected die.
    ///
    /// Iterates `Die::ALL` in its fixed order, skipping zero counts, and
    /// replaces the current results. The roll is also recorded in history.
    pub fn roll_all(&mut self, rng: &mut StdRng) {
        let mut results = Vec::new();
        for die in Die::ALL {
            let count = self.count(die);
            if count == 0 {
                continue;
            }
            let rolls: Vec<u32> = (0..count).map(|_| roll_die(die.sides(), rng)).collect();
            let total = rolls.iter().sum();
            results.push(RollResult { die, rolls, total });
        }
        if results.is_empty() {
            return;
        }
        self.history.insert(0, results.clone());
        self.history.truncate(HISTORY_CAP);
        self.results = results;
        self.roll_id += 1;
    }

    /// Replace the current results directly (used by the template runner).
    pub fn set_results(&mut self, results: Vec<RollResult>) {
        if results.is_empty() {
            return;
        }
        self.history.insert(0, results.clone());
        self.history.truncate(HISTORY_CAP);
        self.results = results;
        self.roll_id += 1;
    }

    /// Sum of every die total in the current results.
    pub fn grand_total(&self) -> u32 {
        self.results.iter().map(|r| r.total).sum()
    }

    /// Zero all counts and clear the current results.
    pub fn clear(&mut self) {
        for count in self.counts.values_mut() {
            *count = 0;
        }
        self.results.clear();
    }

    /// Restore the freshly constructed default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
