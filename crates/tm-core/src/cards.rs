//! Playing cards and the standard deck store.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::pile::Pile;
use crate::shuffle::shuffled;

/// Smallest allowed number of combined decks.
pub const MIN_DECKS: u32 = 1;
/// Largest allowed number of combined decks.
pub const MAX_DECKS: u32 = 8;

/// A French playing-card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    /// Spades (black).
    Spades,
    /// Hearts (red).
    Hearts,
    /// Diamonds (red).
    Diamonds,
    /// Clubs (black).
    Clubs,
}

impl Suit {
    /// All suits in deck-construction order.
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    /// Whether the suit prints red.
    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    /// The suit symbol.
    pub fn symbol(self) -> char {
        match self {
            Suit::Spades => '\u{2660}',
            Suit::Hearts => '\u{2665}',
            Suit::Diamonds => '\u{2666}',
            Suit::Clubs => '\u{2663}',
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
        }
    }
}

/// Card ranks, ace high representation "A" through "K".
pub const RANKS: [&str; 13] = [
    "A", "2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K",
];

/// A single playing card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// The card's suit.
    pub suit: Suit,
    /// The card's rank ("A", "2", ..., "K").
    pub rank: String,
    /// Unique id encoding rank, suit, and copy index ("A-spades-0").
    pub id: String,
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit.symbol())
    }
}

/// Restricts which suit/rank combinations a deck includes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFilter {
    /// Suits to include; empty means all.
    pub suits: Vec<Suit>,
    /// Ranks to include; empty means all.
    pub ranks: Vec<String>,
}

impl CardFilter {
    fn allows(&self, suit: Suit, rank: &str) -> bool {
        (self.suits.is_empty() || self.suits.contains(&suit))
            && (self.ranks.is_empty() || self.ranks.iter().any(|r| r == rank))
    }
}

/// Build `deck_count` concatenated copies of the standard 52-card deck.
pub fn full_deck(deck_count: u32) -> Vec<Card> {
    filtered_deck(deck_count, None)
}

/// Build a deck, optionally restricted to a suit/rank filter.
pub fn filtered_deck(deck_count: u32, filter: Option<&CardFilter>) -> Vec<Card> {
    let mut deck = Vec::new();
    for copy in 0..deck_count {
        for suit in Suit::ALL {
            for rank in RANKS {
                if let Some(f) = filter
                    && !f.allows(suit, rank)
                {
                    continue;
                }
                deck.push(Card {
                    suit,
                    rank: rank.to_string(),
                    id: format!("{rank}-{}-{copy}", suit.tag()),
                });
            }
        }
    }
    deck
}

/// The standard card tool: one or more shuffled 52-card decks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardState {
    /// How many 52-card decks are combined (1-8).
    pub deck_count: u32,
    /// The draw pile, discard, hand, and history.
    pub pile: Pile<Card>,
}

impl CardState {
    /// A freshly shuffled single deck.
    pub fn new(rng: &mut StdRng) -> Self {
        Self {
            deck_count: 1,
            pile: Pile::from_items(shuffled(full_deck(1), rng)),
        }
    }

    /// Rebuild from fresh decks, clearing discard, hand, and history.
    pub fn new_deck(&mut self, rng: &mut StdRng) {
        self.pile.rebuild(full_deck(self.deck_count), rng);
    }

    /// Change how many decks are combined (clamped to [1, 8]) and rebuild.
    pub fn adjust_deck_count(&mut self, delta: i32, rng: &mut StdRng) {
        let next = i64::from(self.deck_count) + i64::from(delta);
        let next = next.clamp(i64::from(MIN_DECKS), i64::from(MAX_DECKS)) as u32;
        if next != self.deck_count {
            self.deck_count = next;
            self.new_deck(rng);
        }
    }

    /// Restore a freshly constructed single-deck state.
    pub fn reset(&mut self, rng: &mut StdRng) {
        *self = Self::new(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn multiset(cards: &[Card]) -> BTreeMap<String, u32> {
        let mut m = BTreeMap::new();
        for c in cards {
            *m.entry(format!("{}-{}", c.rank, c.suit.tag())).or_insert(0) += 1;
        }
        m
    }

    #[test]
    fn full_deck_has_52_unique_cards_per_copy() {
        let deck = full_deck(1);
        assert_eq!(deck.len(), 52);
        let ids: std::collections::BTreeSet<_> = deck.iter().map(|c| &c.id).collect();
        assert_eq!(ids.len(), 52);

        let triple = full_deck(3);
        assert_eq!(triple.len(), 156);
        let ids: std::collections::BTreeSet<_> = triple.iter().map(|c| &c.id).collect();
        assert_eq!(ids.len(), 156, "copy index keeps ids unique across decks");
    }

    #[test]
    fn filtered_deck_restricts_combinations() {
        let filter = CardFilter {
            suits: vec![Suit::Hearts],
            ranks: vec!["A".to_string(), "K".to_string()],
        };
        let deck = filtered_deck(2, Some(&filter));
        assert_eq!(deck.len(), 4);
        assert!(deck.iter().all(|c| c.suit == Suit::Hearts));
    }

    #[test]
    fn deck_multiset_is_preserved_across_operations() {
        let mut rng = StdRng::seed_from_u64(77);
        let mut state = CardState::new(&mut rng);
        state.adjust_deck_count(1, &mut rng);
        let original = multiset(&full_deck(2));

        state.pile.draw_count = 5;
        for _ in 0..7 {
            state.pile.draw(&mut rng);
        }
        state.pile.clear_hand(&mut rng);
        state.pile.toggle_reshuffle();
        for _ in 0..4 {
            state.pile.draw(&mut rng);
        }

        let mut all = state.pile.draw_pile.clone();
        all.extend(state.pile.discard.clone());
        all.extend(state.pile.hand.clone());
        assert_eq!(multiset(&all), original);
    }

    #[test]
    fn new_deck_after_draws_restores_full_deck() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = CardState::new(&mut rng);
        state.pile.draw_count = 10;
        state.pile.draw(&mut rng);
        state.new_deck(&mut rng);
        assert_eq!(state.pile.draw_pile.len(), 52);
        assert!(state.pile.discard.is_empty());
        assert!(state.pile.hand.is_empty());

        // Reshuffling an already-fresh deck keeps exactly 52 cards.
        state.pile.reshuffle_all(&mut rng);
        assert_eq!(state.pile.draw_pile.len(), 52);
    }

    #[test]
    fn deck_count_clamps_and_rebuilds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = CardState::new(&mut rng);
        state.adjust_deck_count(-1, &mut rng);
        assert_eq!(state.deck_count, 1);
        state.adjust_deck_count(100, &mut rng);
        assert_eq!(state.deck_count, 8);
        assert_eq!(state.pile.draw_pile.len(), 52 * 8);
    }
}
