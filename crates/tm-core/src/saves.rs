//! Saved-game snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::tools::ToolStates;

/// A named snapshot of every tool state and the custom decks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    /// Unique save id.
    pub id: Uuid,
    /// User-chosen name.
    pub name: String,
    /// When the snapshot was taken or last overwritten.
    pub timestamp: DateTime<Utc>,
    /// The captured tool states.
    pub state: ToolStates,
}

/// An ordered collection of saved games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveLibrary {
    /// Saves in creation order.
    pub saves: Vec<SavedGame>,
}

impl SaveLibrary {
    /// Snapshot the given states under a new save and return its id.
    pub fn save_new(&mut self, name: impl Into<String>, state: &ToolStates) -> Uuid {
        let save = SavedGame {
            id: Uuid::new_v4(),
            name: name.into(),
            timestamp: Utc::now(),
            state: state.clone(),
        };
        let id = save.id;
        self.saves.push(save);
        id
    }

    /// Overwrite an existing save with a fresh snapshot and timestamp.
    pub fn overwrite(&mut self, id: Uuid, state: &ToolStates) -> CoreResult<()> {
        let save = self
            .saves
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("save", id.to_string()))?;
        save.state = state.clone();
        save.timestamp = Utc::now();
        Ok(())
    }

    /// Replace the live states with a save's snapshot.
    pub fn load(&self, id: Uuid, into: &mut ToolStates) -> CoreResult<()> {
        let save = self
            .saves
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::not_found("save", id.to_string()))?;
        *into = save.state.clone();
        Ok(())
    }

    /// Delete a save by id.
    pub fn delete(&mut self, id: Uuid) -> CoreResult<()> {
        let before = self.saves.len();
        self.saves.retain(|s| s.id != id);
        if self.saves.len() == before {
            return Err(CoreError::not_found("save", id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn save_then_load_restores_states_exactly() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut tools = ToolStates::new(&mut rng);
        tools.cards.pile.draw_count = 3;
        tools.cards.pile.draw(&mut rng);
        tools.coins.flip_count = 4;
        tools.coins.flip(&mut rng);

        let mut lib = SaveLibrary::default();
        let id = lib.save_new("midgame", &tools);

        // Mutate the live state, then load the snapshot back.
        tools.cards.new_deck(&mut rng);
        tools.coins.clear_history();
        lib.load(id, &mut tools).unwrap();

        assert_eq!(tools, lib.saves[0].state);
        assert_eq!(tools.cards.pile.hand.len(), 3);
        assert_eq!(tools.coins.results.len(), 4);
    }

    #[test]
    fn overwrite_updates_snapshot_and_timestamp() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut tools = ToolStates::new(&mut rng);
        let mut lib = SaveLibrary::default();
        let id = lib.save_new("run", &tools);
        let first_stamp = lib.saves[0].timestamp;

        tools.coins.flip(&mut rng);
        lib.overwrite(id, &tools).unwrap();
        assert_eq!(lib.saves[0].state, tools);
        assert!(lib.saves[0].timestamp >= first_stamp);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut tools = ToolStates::new(&mut rng);
        let mut lib = SaveLibrary::default();
        let missing = Uuid::new_v4();
        assert!(lib.load(missing, &mut tools).is_err());
        assert!(lib.overwrite(missing, &tools).is_err());
        assert!(lib.delete(missing).is_err());
    }
}
