//! Core types for Tablemate: a terminal tabletop companion.
//!
//! This crate defines the randomizer primitives (dice, coins, shuffling),
//! the per-tool state stores (dice tray, card deck, coin flipper, tile bag),
//! custom deck and game template authoring, saved-game snapshots, settings,
//! route parsing, and the key-value persistence collaborator. It is
//! independent of any UI: every operation is a plain state transition that
//! a presentation layer drives.

/// Playing cards and the standard deck store.
pub mod cards;
/// Coin flipping store and statistics.
pub mod coins;
/// Custom deck authoring and play state.
pub mod deck;
/// Polyhedral dice and the dice tray store.
pub mod dice;
/// Error types used throughout the crate.
pub mod error;
/// Generalized draw-pile state shared by cards, tiles, and custom decks.
pub mod pile;
/// Page routes and their URL-fragment encoding.
pub mod route;
/// Saved-game snapshots.
pub mod saves;
/// Application settings.
pub mod settings;
/// Unbiased in-place shuffling.
pub mod shuffle;
/// Key-value JSON persistence collaborator.
pub mod storage;
/// Game template data model and authoring helpers.
pub mod template;
/// Tile bag store and statistics.
pub mod tiles;
/// Aggregate of all tool states.
pub mod tools;

pub use cards::{Card, CardFilter, CardState, Suit};
pub use coins::{CoinFace, CoinState};
pub use deck::{CardType, CustomCard, CustomDeck, DeckLibrary};
pub use dice::{DiceState, Die, RollResult};
pub use error::{CoreError, CoreResult};
pub use pile::Pile;
pub use route::Route;
pub use saves::{SaveLibrary, SavedGame};
pub use settings::{AppSettings, ThemeMode};
pub use shuffle::{shuffle, shuffled};
pub use storage::{DirStorage, MemoryStorage, Storage};
pub use template::{
    ActionConfig, DeckSource, GameTemplate, Phase, SetupVariable, Step, StepAction,
    TemplateLibrary,
};
pub use tiles::{Tile, TileColor, TileState};
pub use tools::ToolStates;
