//! Persistence wiring: typed load/save over the key-value store.
//!
//! Every library and the settings blob has a fixed key; loads fall back to
//! defaults and writes are fire-and-forget, so persistence failures never
//! interrupt play. First load migrates the legacy per-preference keys
//! (`theme`, `shake-enabled`, `visible-dice`) into the settings blob.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;

use tm_core::storage::{DirStorage, Storage, keys};
use tm_core::{AppSettings, DeckLibrary, Die, SaveLibrary, TemplateLibrary, ThemeMode};

/// Typed facade over a [`Storage`] backend.
pub struct AppStore {
    storage: Box<dyn Storage>,
}

impl AppStore {
    /// Wrap any storage backend.
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    /// Open a directory-backed store.
    pub fn open_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(DirStorage::open(dir))
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.storage
            .get(key)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Ok(v) = serde_json::to_value(value) {
            self.storage.put(key, &v);
        }
    }

    /// Load settings, migrating legacy keys when no settings blob exists.
    pub fn load_settings(&self) -> AppSettings {
        if let Some(value) = self.storage.get(keys::APP_SETTINGS) {
            return serde_json::from_value(value).unwrap_or_default();
        }
        let mut settings = AppSettings::default();
        if let Some(Value::String(tag)) = self.storage.get(keys::THEME)
            && let Some(mode) = ThemeMode::from_tag(&tag)
        {
            settings.theme_mode = mode;
        }
        if let Some(Value::Bool(enabled)) = self.storage.get(keys::SHAKE_ENABLED) {
            settings.shake_enabled = enabled;
        }
        if let Some(value) = self.storage.get(keys::VISIBLE_DICE)
            && let Ok(map) = serde_json::from_value::<BTreeMap<String, bool>>(value)
        {
            for (tag, visible) in map {
                if let Some(die) = Die::from_tag(&tag) {
                    settings.visible_dice.insert(die, visible);
                }
            }
        }
        settings
    }

    /// Persist settings.
    pub fn save_settings(&mut self, settings: &AppSettings) {
        self.write(keys::APP_SETTINGS, settings);
    }

    /// Load the custom deck library.
    pub fn load_decks(&self) -> DeckLibrary {
        self.read(keys::CUSTOM_DECKS)
    }

    /// Persist the custom deck library.
    pub fn save_decks(&mut self, decks: &DeckLibrary) {
        self.write(keys::CUSTOM_DECKS, decks);
    }

    /// Load the saved game library.
    pub fn load_saves(&self) -> SaveLibrary {
        self.read(keys::SAVED_GAMES)
    }

    /// Persist the saved game library.
    pub fn save_saves(&mut self, saves: &SaveLibrary) {
        self.write(keys::SAVED_GAMES, saves);
    }

    /// Load the game template library.
    pub fn load_templates(&self) -> TemplateLibrary {
        self.read(keys::GAME_TEMPLATES)
    }

    /// Persist the game template library.
    pub fn save_templates(&mut self, templates: &TemplateLibrary) {
        self.write(keys::GAME_TEMPLATES, templates);
    }
}
