//! Generalized draw-pile state shared by cards, tiles, and custom decks.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::shuffle::shuffle;

/// How many past draws a pile remembers.
pub const HISTORY_CAP: usize = 20;

/// Smallest allowed draw count.
pub const MIN_DRAW: u32 = 1;
/// Largest allowed draw count.
pub const MAX_DRAW: u32 = 10;

/// A face-down draw pile with a discard pile, a hand, and a capped history.
///
/// The same rotation rules apply to standard cards, tiles, and custom decks:
/// drawing takes items from the front of the draw pile; the previous hand
/// either returns to the pile (reshuffle mode) or moves to the discard pile.
/// The multiset union of draw pile, discard, and hand is always the full
/// configured population; history entries are snapshots, not removals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pile<T> {
    /// Face-down items; index 0 is drawn first.
    pub draw_pile: Vec<T>,
    /// Items out of play until an explicit reshuffle or rebuild.
    pub discard: Vec<T>,
    /// The most recently drawn batch.
    pub hand: Vec<T>,
    /// How many items each draw takes (1-10).
    pub draw_count: u32,
    /// When on, drawn items return to the pile instead of the discard.
    pub reshuffle_mode: bool,
    /// Past drawn batches, most recent first, capped at [`HISTORY_CAP`].
    pub history: Vec<Vec<T>>,
}

impl<T> Default for Pile<T> {
    fn default() -> Self {
        Self {
            draw_pile: Vec::new(),
            discard: Vec::new(),
            hand: Vec::new(),
            draw_count: MIN_DRAW,
            reshuffle_mode: false,
            history: Vec::new(),
        }
    }
}

impl<T: Clone> Pile<T> {
    /// Create a pile from a pre-shuffled population.
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            draw_pile: items,
            ..Self::default()
        }
    }

    /// Total items still in the logical population (pile + discard + hand).
    pub fn population(&self) -> usize {
        self.draw_pile.len() + self.discard.len() + self.hand.len()
    }

    /// Draw up to `draw_count` items from the front of the pile.
    ///
    /// A draw from an empty pile is a no-op. Otherwise the previous hand is
    /// rotated out first: in reshuffle mode it folds back into the pile,
    /// which is then reshuffled; otherwise it moves to the discard pile.
    /// The drawn batch becomes the new hand and is recorded in history.
    pub fn draw(&mut self, rng: &mut StdRng) {
        if self.draw_pile.is_empty() {
            return;
        }

        if !self.hand.is_empty() {
            if self.reshuffle_mode {
                let hand = std::mem::take(&mut self.hand);
                self.draw_pile.extend(hand);
                shuffle(&mut self.draw_pile, rng);
            } else {
                let mut hand = std::mem::take(&mut self.hand);
                hand.extend(self.discard.drain(..));
                self.discard = hand;
            }
        }

        let n = (self.draw_count as usize).min(self.draw_pile.len());
        let drawn: Vec<T> = self.draw_pile.drain(..n).collect();
        self.history.insert(0, drawn.clone());
        self.history.truncate(HISTORY_CAP);
        self.hand = drawn;
    }

    /// Return the hand to the pile (reshuffle mode) or the discard pile.
    pub fn clear_hand(&mut self, rng: &mut StdRng) {
        if self.hand.is_empty() {
            return;
        }
        let mut hand = std::mem::take(&mut self.hand);
        if self.reshuffle_mode {
            self.draw_pile.append(&mut hand);
            shuffle(&mut self.draw_pile, rng);
        } else {
            hand.extend(self.discard.drain(..));
            self.discard = hand;
        }
    }

    /// Shuffle the discard pile and hand back into the draw pile.
    ///
    /// History is untouched; it records past draws, not the population.
    pub fn reshuffle_all(&mut self, rng: &mut StdRng) {
        self.draw_pile.extend(self.discard.drain(..));
        self.draw_pile.extend(self.hand.drain(..));
        shuffle(&mut self.draw_pile, rng);
    }

    /// Replace the population with a freshly shuffled one, clearing
    /// the discard pile, hand, and history.
    pub fn rebuild(&mut self, mut items: Vec<T>, rng: &mut StdRng) {
        shuffle(&mut items, rng);
        self.draw_pile = items;
        self.discard.clear();
        self.hand.clear();
        self.history.clear();
    }

    /// Adjust the per-draw count, clamped to [1, 10].
    pub fn adjust_draw_count(&mut self, delta: i32) {
        let next = i64::from(self.draw_count) + i64::from(delta);
        self.draw_count = next.clamp(i64::from(MIN_DRAW), i64::from(MAX_DRAW)) as u32;
    }

    /// Toggle reshuffle mode.
    pub fn toggle_reshuffle(&mut self) {
        self.reshuffle_mode = !self.reshuffle_mode;
    }

    /// Forget past draws.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[derive(Debug, Clone)]
    enum Op {
        Draw,
        ClearHand,
        ReshuffleAll,
        AdjustDraw(i32),
        ToggleReshuffle,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Draw),
            Just(Op::ClearHand),
            Just(Op::ReshuffleAll),
            (-3i32..=3).prop_map(Op::AdjustDraw),
            Just(Op::ToggleReshuffle),
        ]
    }

    proptest! {
        #[test]
        fn any_operation_sequence_preserves_the_population(
            size in 1u32..40,
            seed in 0u64..1_000,
            ops in proptest::collection::vec(op(), 1..40),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pile = Pile::from_items((0..size).collect::<Vec<_>>());
            for op in ops {
                match op {
                    Op::Draw => pile.draw(&mut rng),
                    Op::ClearHand => pile.clear_hand(&mut rng),
                    Op::ReshuffleAll => pile.reshuffle_all(&mut rng),
                    Op::AdjustDraw(d) => pile.adjust_draw_count(d),
                    Op::ToggleReshuffle => pile.toggle_reshuffle(),
                }
                let mut all: Vec<u32> = pile
                    .draw_pile
                    .iter()
                    .chain(&pile.discard)
                    .chain(&pile.hand)
                    .copied()
                    .collect();
                all.sort_unstable();
                prop_assert_eq!(all, (0..size).collect::<Vec<_>>());
                prop_assert!((MIN_DRAW..=MAX_DRAW).contains(&pile.draw_count));
            }
        }
    }
}
