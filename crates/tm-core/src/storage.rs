//! Key-value JSON persistence collaborator.
//!
//! A flat key → JSON value store, read at startup with a default fallback
//! and written on every change. Malformed or missing values never surface
//! as errors; write failures degrade to a non-fatal warning.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Storage keys used by the app.
pub mod keys {
    /// The [`crate::AppSettings`] blob.
    pub const APP_SETTINGS: &str = "app-settings";
    /// The custom deck library.
    pub const CUSTOM_DECKS: &str = "custom-decks";
    /// The saved game library.
    pub const SAVED_GAMES: &str = "saved-games";
    /// The game template library.
    pub const GAME_TEMPLATES: &str = "game-templates";
    /// Legacy theme key ("light"/"dark"/"system"), read-only.
    pub const THEME: &str = "theme";
    /// Legacy shake preference key, read-only.
    pub const SHAKE_ENABLED: &str = "shake-enabled";
    /// Legacy visible-dice map key, read-only.
    pub const VISIBLE_DICE: &str = "visible-dice";
}

/// A flat key → JSON value store.
pub trait Storage {
    /// Read a raw value, if present.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a raw value. Failures are swallowed (best-effort persistence).
    fn put(&mut self, key: &str, value: &Value);

    /// Remove a key.
    fn remove(&mut self, key: &str);

    /// Read and deserialize, falling back to the default on a missing key
    /// or malformed data.
    fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T
    where
        Self: Sized,
    {
        self.get(key)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Serialize and write. Values that fail to serialize are dropped.
    fn put_json<T: Serialize>(&mut self, key: &str, value: &T)
    where
        Self: Sized,
    {
        if let Ok(v) = serde_json::to_value(value) {
            self.put(key, &v);
        }
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: BTreeMap<String, Value>,
}

impl MemoryStorage {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: &Value) {
        self.values.insert(key.to_string(), value.clone());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Directory-backed storage: one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct DirStorage {
    dir: PathBuf,
}

impl DirStorage {
    /// Open (creating if needed) a storage directory.
    ///
    /// Creation failures are reported but not fatal; reads will return
    /// nothing and writes will warn, matching the best-effort contract.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("warning: cannot create data dir {}: {e}", dir.display());
        }
        Self { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for DirStorage {
    fn get(&self, key: &str) -> Option<Value> {
        let text = std::fs::read_to_string(self.path(key)).ok()?;
        serde_json::from_str(&text).ok()
    }

    fn put(&mut self, key: &str, value: &Value) {
        let path = self.path(key);
        let text = match serde_json::to_string_pretty(value) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("warning: cannot serialize {key}: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&path, text) {
            eprintln!("warning: cannot write {}: {e}", path.display());
        }
    }

    fn remove(&mut self, key: &str) {
        let _ = std::fs::remove_file(self.path(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AppSettings, ThemeMode};
    use serde_json::json;

    #[test]
    fn memory_storage_round_trips() {
        let mut store = MemoryStorage::new();
        store.put_json(keys::APP_SETTINGS, &AppSettings::default());
        let settings: AppSettings = store.get_or_default(keys::APP_SETTINGS);
        assert_eq!(settings, AppSettings::default());
        store.remove(keys::APP_SETTINGS);
        assert!(store.get(keys::APP_SETTINGS).is_none());
    }

    #[test]
    fn malformed_data_falls_back_to_default() {
        let mut store = MemoryStorage::new();
        store.put(keys::APP_SETTINGS, &json!("not an object"));
        let settings: AppSettings = store.get_or_default(keys::APP_SETTINGS);
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn dir_storage_round_trips_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = DirStorage::open(dir.path());
            let mut settings = AppSettings::default();
            settings.theme_mode = ThemeMode::Dark;
            store.put_json(keys::APP_SETTINGS, &settings);
        }
        let store = DirStorage::open(dir.path());
        let settings: AppSettings = store.get_or_default(keys::APP_SETTINGS);
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn dir_storage_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStorage::open(dir.path());
        assert!(store.get("nothing-here").is_none());
        let settings: AppSettings = store.get_or_default(keys::APP_SETTINGS);
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn dir_storage_malformed_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app-settings.json"), "{ nope").unwrap();
        let store = DirStorage::open(dir.path());
        let settings: AppSettings = store.get_or_default(keys::APP_SETTINGS);
        assert_eq!(settings, AppSettings::default());
    }
}
