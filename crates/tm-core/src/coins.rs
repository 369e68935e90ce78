//! Coin flipping store and statistics.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// How many individual flips the history retains.
pub const HISTORY_CAP: usize = 50;

/// Smallest allowed flip count.
pub const MIN_FLIPS: u32 = 1;
/// Largest allowed flip count.
pub const MAX_FLIPS: u32 = 10;

/// One face of a coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinFace {
    /// Heads.
    Heads,
    /// Tails.
    Tails,
}

impl std::fmt::Display for CoinFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoinFace::Heads => write!(f, "heads"),
            CoinFace::Tails => write!(f, "tails"),
        }
    }
}

/// Cumulative statistics over the flip history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinStats {
    /// Total flips retained in history.
    pub total: usize,
    /// How many came up heads.
    pub heads: usize,
    /// How many came up tails.
    pub tails: usize,
    /// Heads percentage, rounded.
    pub heads_percent: u32,
    /// Longest run of the same face, with that face.
    pub longest_streak: Option<(CoinFace, u32)>,
}

/// The coin flipper tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinState {
    /// Outcomes of the most recent flip batch.
    pub results: Vec<CoinFace>,
    /// How many coins each invocation flips (1-10).
    pub flip_count: u32,
    /// Individual past flips, flattened, most recent first, capped at 50.
    pub history: Vec<CoinFace>,
}

impl Default for CoinState {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            flip_count: MIN_FLIPS,
            history: Vec::new(),
        }
    }
}

impl CoinState {
    /// Flip `flip_count` fair coins. Results replace the previous batch and
    /// are prepended individually to the capped history.
    pub fn flip(&mut self, rng: &mut StdRng) {
        let flips: Vec<CoinFace> = (0..self.flip_count)
            .map(|_| {
                if rng.random_bool(0.5) {
                    CoinFace::Heads
                } else {
                    CoinFace::Tails
                }
            })
            .collect();
        let mut history = flips.clone();
        history.extend(self.history.drain(..));
        history.truncate(HISTORY_CAP);
        self.history = history;
        self.results = flips;
    }

    /// Adjust the flip count, clamped to [1, 10].
    pub fn adjust_flip_count(&mut self, delta: i32) {
        let next = i64::from(self.flip_count) + i64::from(delta);
        self.flip_count = next.clamp(i64::from(MIN_FLIPS), i64::from(MAX_FLIPS)) as u32;
    }

    /// Forget past flips and the current results.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.results.clear();
    }

    /// Restore the freshly constructed default state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Statistics over the retained history.
    pub fn stats(&self) -> CoinStats {
        let heads = self
            .history
            .iter()
            .filter(|f| **f == CoinFace::Heads)
            .count();
        let total = self.history.len();
        let tails = total - heads;
        let heads_percent = if total == 0 {
            0
        } else {
            ((heads as f64 / total as f64) * 100.0).round() as u32
        };

        let mut longest: Option<(CoinFace, u32)> = None;
        let mut run: Option<(CoinFace, u32)> = None;
        for face in &self.history {
            run = match run {
                Some((current, n)) if current == *face => Some((current, n + 1)),
                _ => Some((*face, 1)),
            };
            if let Some((face, n)) = run
                && longest.is_none_or(|(_, best)| n > best)
            {
                longest = Some((face, n));
            }
        }

        CoinStats {
            total,
            heads,
            tails,
            heads_percent,
            longest_streak: longest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn flip_produces_exactly_flip_count_results() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut state = CoinState {
            flip_count: 5,
            ..CoinState::default()
        };
        state.flip(&mut rng);
        assert_eq!(state.results.len(), 5);
        assert_eq!(state.history.len(), 5);
    }

    #[test]
    fn history_flattens_and_caps_at_50() {
        let mut rng = StdRng::seed_from_u64(21);
        let mut state = CoinState {
            flip_count: 10,
            ..CoinState::default()
        };
        for _ in 0..7 {
            state.flip(&mut rng);
        }
        assert_eq!(state.history.len(), HISTORY_CAP);
        // Most recent batch sits at the front.
        assert_eq!(&state.history[..10], &state.results[..]);
    }

    #[test]
    fn flips_are_roughly_fair() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut heads = 0u32;
        let trials = 10_000;
        let mut state = CoinState::default();
        for _ in 0..trials {
            state.flip(&mut rng);
            if state.results[0] == CoinFace::Heads {
                heads += 1;
            }
        }
        assert!((4_600..=5_400).contains(&heads), "heads: {heads}");
    }

    #[test]
    fn flip_count_clamps() {
        let mut state = CoinState::default();
        state.adjust_flip_count(-4);
        assert_eq!(state.flip_count, MIN_FLIPS);
        state.adjust_flip_count(99);
        assert_eq!(state.flip_count, MAX_FLIPS);
    }

    #[test]
    fn stats_count_faces_and_streaks() {
        let state = CoinState {
            results: Vec::new(),
            flip_count: 1,
            history: vec![
                CoinFace::Heads,
                CoinFace::Heads,
                CoinFace::Tails,
                CoinFace::Heads,
                CoinFace::Heads,
                CoinFace::Heads,
            ],
        };
        let stats = state.stats();
        assert_eq!(stats.total, 6);
        assert_eq!(stats.heads, 5);
        assert_eq!(stats.tails, 1);
        assert_eq!(stats.heads_percent, 83);
        assert_eq!(stats.longest_streak, Some((CoinFace::Heads, 3)));
    }

    #[test]
    fn clear_history_also_clears_results() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = CoinState::default();
        state.flip(&mut rng);
        state.clear_history();
        assert!(state.results.is_empty());
        assert!(state.history.is_empty());
        assert_eq!(state.stats(), CoinStats::default());
    }
}
