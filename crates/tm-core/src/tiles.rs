//! Tile bag store and statistics.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::pile::Pile;
use crate::shuffle::shuffled;

/// A tile color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TileColor {
    /// Red tiles.
    Red,
    /// Blue tiles.
    Blue,
    /// Yellow tiles.
    Yellow,
    /// Black tiles.
    Black,
}

impl TileColor {
    /// All colors in bag-construction order.
    pub const ALL: [TileColor; 4] = [
        TileColor::Red,
        TileColor::Blue,
        TileColor::Yellow,
        TileColor::Black,
    ];

    fn tag(self) -> &'static str {
        match self {
            TileColor::Red => "red",
            TileColor::Blue => "blue",
            TileColor::Yellow => "yellow",
            TileColor::Black => "black",
        }
    }
}

impl std::fmt::Display for TileColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A numbered tile or a joker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// The tile color; `None` for jokers.
    pub color: Option<TileColor>,
    /// The tile number (1-13); `None` for jokers.
    pub number: Option<u8>,
    /// Whether the tile is a joker.
    pub is_joker: bool,
    /// Unique id ("red-7-0", "joker-1").
    pub id: String,
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.color, self.number) {
            (Some(color), Some(number)) => write!(f, "{color} {number}"),
            _ => write!(f, "joker"),
        }
    }
}

/// Build the standard 106-tile set: two copies of each color/number pair
/// plus exactly two jokers.
pub fn full_tile_set() -> Vec<Tile> {
    let mut tiles = Vec::with_capacity(106);
    for copy in 0..2 {
        for color in TileColor::ALL {
            for number in 1..=13u8 {
                tiles.push(Tile {
                    color: Some(color),
                    number: Some(number),
                    is_joker: false,
                    id: format!("{}-{number}-{copy}", color.tag()),
                });
            }
        }
    }
    for joker in 0..2 {
        tiles.push(Tile {
            color: None,
            number: None,
            is_joker: true,
            id: format!("joker-{joker}"),
        });
    }
    tiles
}

/// Cumulative draw statistics over the tile history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileStats {
    /// Number of recorded draws.
    pub draws: usize,
    /// Total tiles drawn across history.
    pub tiles_drawn: usize,
    /// Most frequently drawn color, with its count.
    pub top_color: Option<(TileColor, u32)>,
    /// Most frequently drawn number, with its count.
    pub top_number: Option<(u8, u32)>,
}

/// The tile bag tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileState {
    /// The bag, drawn pile, hand, and history.
    pub pile: Pile<Tile>,
}

impl TileState {
    /// A freshly shuffled full bag.
    pub fn new(rng: &mut StdRng) -> Self {
        Self {
            pile: Pile::from_items(shuffled(full_tile_set(), rng)),
        }
    }

    /// Rebuild a full bag, clearing drawn tiles, hand, and history.
    pub fn new_bag(&mut self, rng: &mut StdRng) {
        self.pile.rebuild(full_tile_set(), rng);
    }

    /// Restore a freshly constructed state.
    pub fn reset(&mut self, rng: &mut StdRng) {
        *self = Self::new(rng);
    }

    /// Draw statistics across the recorded history. Jokers are counted in
    /// the totals but excluded from the color/number frequencies.
    pub fn stats(&self) -> TileStats {
        let mut colors: BTreeMap<TileColor, u32> = BTreeMap::new();
        let mut numbers: BTreeMap<u8, u32> = BTreeMap::new();
        let mut tiles_drawn = 0;
        for draw in &self.pile.history {
            tiles_drawn += draw.len();
            for tile in draw {
                if let (Some(color), Some(number)) = (tile.color, tile.number) {
                    *colors.entry(color).or_insert(0) += 1;
                    *numbers.entry(number).or_insert(0) += 1;
                }
            }
        }
        TileStats {
            draws: self.pile.history.len(),
            tiles_drawn,
            top_color: colors.into_iter().max_by_key(|(_, n)| *n),
            top_number: numbers.into_iter().max_by_key(|(_, n)| *n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn full_set_is_106_tiles() {
        let tiles = full_tile_set();
        assert_eq!(tiles.len(), 106);
        let jokers = tiles.iter().filter(|t| t.is_joker).count();
        assert_eq!(jokers, 2);
        let numbered = tiles.iter().filter(|t| !t.is_joker).count();
        assert_eq!(numbered, 104);

        // Two copies of each color/number pair.
        for color in TileColor::ALL {
            for number in 1..=13u8 {
                let copies = tiles
                    .iter()
                    .filter(|t| t.color == Some(color) && t.number == Some(number))
                    .count();
                assert_eq!(copies, 2, "{color} {number}");
            }
        }
    }

    #[test]
    fn tile_ids_are_unique() {
        let tiles = full_tile_set();
        let ids: std::collections::BTreeSet<_> = tiles.iter().map(|t| &t.id).collect();
        assert_eq!(ids.len(), 106);
    }

    #[test]
    fn bag_partition_preserves_the_set() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut state = TileState::new(&mut rng);
        state.pile.draw_count = 6;
        for _ in 0..5 {
            state.pile.draw(&mut rng);
        }
        assert_eq!(state.pile.population(), 106);
        state.new_bag(&mut rng);
        assert_eq!(state.pile.draw_pile.len(), 106);
        assert!(state.pile.history.is_empty());
    }

    #[test]
    fn stats_track_draws_and_frequencies() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut state = TileState::new(&mut rng);
        assert_eq!(state.stats(), TileStats::default());

        state.pile.draw_count = 10;
        state.pile.draw(&mut rng);
        state.pile.draw(&mut rng);
        let stats = state.stats();
        assert_eq!(stats.draws, 2);
        assert_eq!(stats.tiles_drawn, 20);
        let jokers: usize = state
            .pile
            .history
            .iter()
            .flatten()
            .filter(|t| t.is_joker)
            .count();
        if jokers < 20 {
            assert!(stats.top_color.is_some());
            assert!(stats.top_number.is_some());
        }
    }
}
