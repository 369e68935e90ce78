//! Custom deck authoring and play state.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::pile::Pile;
use crate::shuffle::shuffle;

/// A card design within a custom deck: its text and how many copies exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardType {
    /// Stable id, referenced by each expanded card instance.
    pub id: Uuid,
    /// The text printed on every copy.
    pub text: String,
    /// How many copies the deck contains (at least 1).
    pub count: u32,
}

impl CardType {
    /// A new card type with a fresh id.
    pub fn new(text: impl Into<String>, count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            count,
        }
    }

    /// Whether this type contributes cards to a deck.
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.count > 0
    }
}

/// A concrete card instance expanded from a card type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomCard {
    /// Unique instance id.
    pub id: Uuid,
    /// Current card text.
    pub text: String,
    /// The card type this instance was expanded from.
    pub type_id: Uuid,
}

/// A user-authored deck with its embedded play state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomDeck {
    /// Unique deck id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// The card designs this deck expands from.
    pub card_types: Vec<CardType>,
    /// The deck's own draw pile, discard, hand, and history.
    pub pile: Pile<CustomCard>,
    /// Creation time, for stable ordering in lists.
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn expand(card_types: &[CardType]) -> Vec<CustomCard> {
    let mut cards = Vec::new();
    for ct in card_types {
        for _ in 0..ct.count {
            cards.push(CustomCard {
                id: Uuid::new_v4(),
                text: ct.text.clone(),
                type_id: ct.id,
            });
        }
    }
    cards
}

impl CustomDeck {
    /// Build a deck from a name and card types.
    ///
    /// The name must be non-empty after trimming and at least one card type
    /// must be valid. Invalid card types are dropped; the rest expand into
    /// shuffled card instances.
    pub fn build(
        name: impl Into<String>,
        card_types: Vec<CardType>,
        rng: &mut StdRng,
    ) -> CoreResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidDeck("name must not be empty".into()));
        }
        let card_types: Vec<CardType> =
            card_types.into_iter().filter(CardType::is_valid).collect();
        if card_types.is_empty() {
            return Err(CoreError::InvalidDeck(
                "at least one card type with text and a positive count is required".into(),
            ));
        }
        let mut cards = expand(&card_types);
        shuffle(&mut cards, rng);
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            card_types,
            pile: Pile::from_items(cards),
            created_at: chrono::Utc::now(),
        })
    }

    /// Total cards the card types expand into.
    pub fn total_cards(&self) -> u32 {
        self.card_types.iter().map(|ct| ct.count).sum()
    }

    /// Rebuild the play state from the card types ("New Deck").
    pub fn rebuild_pile(&mut self, rng: &mut StdRng) {
        let cards = expand(&self.card_types);
        self.pile.rebuild(cards, rng);
    }

    fn card_text(&self, card_id: Uuid) -> Option<(String, Uuid)> {
        self.pile
            .draw_pile
            .iter()
            .chain(&self.pile.discard)
            .chain(&self.pile.hand)
            .find(|c| c.id == card_id)
            .map(|c| (c.text.clone(), c.type_id))
    }

    /// Rename a single card instance, everywhere it appears (piles and
    /// history snapshots).
    pub fn rename_card(&mut self, card_id: Uuid, text: impl Into<String>) -> CoreResult<()> {
        if self.card_text(card_id).is_none() {
            return Err(CoreError::not_found("card", card_id.to_string()));
        }
        let text = text.into();
        let rename = |c: &mut CustomCard| {
            if c.id == card_id {
                c.text = text.clone();
            }
        };
        self.for_each_card(rename);
        Ok(())
    }

    /// Rename every card that currently shares the edited card's text
    /// ("change all"), across the draw pile, discard, hand, and every
    /// history snapshot, and update the card's type to match.
    pub fn rename_card_type(
        &mut self,
        card_id: Uuid,
        text: impl Into<String>,
    ) -> CoreResult<()> {
        let Some((old_text, type_id)) = self.card_text(card_id) else {
            return Err(CoreError::not_found("card", card_id.to_string()));
        };
        let text = text.into();
        let rename = |c: &mut CustomCard| {
            if c.text == old_text {
                c.text = text.clone();
            }
        };
        self.for_each_card(rename);
        if let Some(ct) = self.card_types.iter_mut().find(|ct| ct.id == type_id) {
            ct.text = text;
        }
        Ok(())
    }

    fn for_each_card(&mut self, mut f: impl FnMut(&mut CustomCard)) {
        for c in &mut self.pile.draw_pile {
            f(c);
        }
        for c in &mut self.pile.discard {
            f(c);
        }
        for c in &mut self.pile.hand {
            f(c);
        }
        for draw in &mut self.pile.history {
            for c in draw {
                f(c);
            }
        }
    }

    /// Per-type drawn counts: cumulative history frequency in reshuffle
    /// mode, cards out of the draw pile otherwise.
    pub fn drawn_counts(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        if self.pile.reshuffle_mode {
            for c in self.pile.history.iter().flatten() {
                *counts.entry(c.text.clone()).or_insert(0) += 1;
            }
        } else {
            for c in self.pile.hand.iter().chain(&self.pile.discard) {
                *counts.entry(c.text.clone()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// An ordered collection of custom decks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckLibrary {
    /// Decks in creation order.
    pub decks: Vec<CustomDeck>,
}

impl DeckLibrary {
    /// Add a deck and return its id.
    pub fn add(&mut self, deck: CustomDeck) -> Uuid {
        let id = deck.id;
        self.decks.push(deck);
        id
    }

    /// Look up a deck by id.
    pub fn get(&self, id: Uuid) -> Option<&CustomDeck> {
        self.decks.iter().find(|d| d.id == id)
    }

    /// Look up a deck mutably by id.
    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut CustomDeck> {
        self.decks.iter_mut().find(|d| d.id == id)
    }

    /// Delete a deck by id.
    pub fn delete(&mut self, id: Uuid) -> CoreResult<()> {
        let before = self.decks.len();
        self.decks.retain(|d| d.id != id);
        if self.decks.len() == before {
            return Err(CoreError::not_found("deck", id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sample_deck(rng: &mut StdRng) -> CustomDeck {
        CustomDeck::build(
            "Events",
            vec![
                CardType::new("Attack", 3),
                CardType::new("Defend", 2),
                CardType::new("Rest", 1),
            ],
            rng,
        )
        .unwrap()
    }

    #[test]
    fn build_expands_and_shuffles_card_types() {
        let mut rng = StdRng::seed_from_u64(31);
        let deck = sample_deck(&mut rng);
        assert_eq!(deck.total_cards(), 6);
        assert_eq!(deck.pile.draw_pile.len(), 6);
        let attacks = deck
            .pile
            .draw_pile
            .iter()
            .filter(|c| c.text == "Attack")
            .count();
        assert_eq!(attacks, 3);
    }

    #[test]
    fn build_rejects_empty_name_and_no_valid_types() {
        let mut rng = StdRng::seed_from_u64(31);
        assert!(CustomDeck::build("   ", vec![CardType::new("x", 1)], &mut rng).is_err());
        assert!(
            CustomDeck::build("Deck", vec![CardType::new("  ", 1), CardType::new("y", 0)], &mut rng)
                .is_err()
        );
    }

    #[test]
    fn build_drops_invalid_types_but_keeps_valid_ones() {
        let mut rng = StdRng::seed_from_u64(31);
        let deck = CustomDeck::build(
            "Deck",
            vec![CardType::new("", 4), CardType::new("Keep", 2)],
            &mut rng,
        )
        .unwrap();
        assert_eq!(deck.card_types.len(), 1);
        assert_eq!(deck.pile.draw_pile.len(), 2);
    }

    #[test]
    fn rename_single_card_touches_only_that_instance() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut deck = sample_deck(&mut rng);
        let target = deck
            .pile
            .draw_pile
            .iter()
            .find(|c| c.text == "Attack")
            .unwrap()
            .id;
        deck.rename_card(target, "Heavy Attack").unwrap();
        let heavy = deck
            .pile
            .draw_pile
            .iter()
            .filter(|c| c.text == "Heavy Attack")
            .count();
        assert_eq!(heavy, 1);
        // The card type is unchanged.
        assert!(deck.card_types.iter().any(|ct| ct.text == "Attack"));
    }

    #[test]
    fn rename_card_type_is_a_global_textual_rename() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut deck = sample_deck(&mut rng);
        deck.pile.draw_count = 2;
        deck.pile.draw(&mut rng);
        deck.pile.draw(&mut rng);

        let target = deck
            .pile
            .draw_pile
            .iter()
            .chain(&deck.pile.discard)
            .chain(&deck.pile.hand)
            .find(|c| c.text == "Attack")
            .unwrap()
            .id;
        deck.rename_card_type(target, "Strike").unwrap();

        let all_renamed = deck
            .pile
            .draw_pile
            .iter()
            .chain(&deck.pile.discard)
            .chain(&deck.pile.hand)
            .chain(deck.pile.history.iter().flatten())
            .all(|c| c.text != "Attack");
        assert!(all_renamed);
        assert!(deck.card_types.iter().any(|ct| ct.text == "Strike"));
    }

    #[test]
    fn rename_unknown_card_is_not_found() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut deck = sample_deck(&mut rng);
        assert!(deck.rename_card(Uuid::new_v4(), "x").is_err());
    }

    #[test]
    fn rebuild_pile_restores_the_population() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut deck = sample_deck(&mut rng);
        deck.pile.draw_count = 4;
        deck.pile.draw(&mut rng);
        deck.rebuild_pile(&mut rng);
        assert_eq!(deck.pile.draw_pile.len(), 6);
        assert!(deck.pile.hand.is_empty());
        assert!(deck.pile.history.is_empty());
    }

    #[test]
    fn drawn_counts_depend_on_mode() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut deck = sample_deck(&mut rng);
        deck.pile.draw_count = 2;
        deck.pile.draw(&mut rng);
        let out_of_play: u32 = deck.drawn_counts().values().sum();
        assert_eq!(out_of_play, 2);

        deck.pile.toggle_reshuffle();
        deck.pile.draw(&mut rng);
        // Cumulative over history in reshuffle mode: two draws of two.
        let cumulative: u32 = deck.drawn_counts().values().sum();
        assert_eq!(cumulative, 4);
    }

    #[test]
    fn library_add_get_delete() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut lib = DeckLibrary::default();
        let id = lib.add(sample_deck(&mut rng));
        assert!(lib.get(id).is_some());
        lib.delete(id).unwrap();
        assert!(lib.get(id).is_none());
        assert!(lib.delete(id).is_err());
    }
}
