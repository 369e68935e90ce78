//! Aggregate of all tool states.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::cards::CardState;
use crate::coins::CoinState;
use crate::deck::DeckLibrary;
use crate::dice::DiceState;
use crate::tiles::TileState;

/// Every tool's live state plus the custom deck library.
///
/// The template runner executes against this aggregate, and saved games
/// snapshot it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolStates {
    /// The dice tray.
    pub dice: DiceState,
    /// The standard card deck.
    pub cards: CardState,
    /// The coin flipper.
    pub coins: CoinState,
    /// The tile bag.
    pub tiles: TileState,
    /// User-authored custom decks.
    pub custom_decks: DeckLibrary,
}

impl ToolStates {
    /// Freshly constructed states with shuffled deck and bag.
    pub fn new(rng: &mut StdRng) -> Self {
        Self {
            dice: DiceState::default(),
            cards: CardState::new(rng),
            coins: CoinState::default(),
            tiles: TileState::new(rng),
            custom_decks: DeckLibrary::default(),
        }
    }
}
