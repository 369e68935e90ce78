//! Application settings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dice::Die;

/// The color theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always light.
    Light,
    /// Always dark.
    Dark,
    /// Follow the platform preference.
    System,
}

impl ThemeMode {
    /// The next mode in the cycle light → dark → system.
    pub fn next(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::System,
            ThemeMode::System => ThemeMode::Light,
        }
    }

    /// Parse the persisted form ("light", "dark", "system").
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "system" => Some(ThemeMode::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
            ThemeMode::System => write!(f, "system"),
        }
    }
}

/// User preferences, persisted as one blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Theme preference.
    pub theme_mode: ThemeMode,
    /// Whether shake-to-roll is enabled.
    pub shake_enabled: bool,
    /// Whether the roll confirmation sound plays.
    pub sound_enabled: bool,
    /// Whether rolls trigger a vibration.
    pub vibrate_enabled: bool,
    /// Which die types the dice tray shows.
    pub visible_dice: BTreeMap<Die, bool>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::System,
            shake_enabled: false,
            sound_enabled: true,
            vibrate_enabled: true,
            visible_dice: Die::ALL.iter().map(|d| (*d, true)).collect(),
        }
    }
}

impl AppSettings {
    /// Whether a die type is visible in the tray. Unknown dice default to
    /// visible.
    pub fn is_die_visible(&self, die: Die) -> bool {
        self.visible_dice.get(&die).copied().unwrap_or(true)
    }

    /// Toggle a die's visibility.
    pub fn toggle_die(&mut self, die: Die) {
        let visible = self.is_die_visible(die);
        self.visible_dice.insert(die, !visible);
    }

    /// Cycle the theme preference.
    pub fn cycle_theme(&mut self) {
        self.theme_mode = self.theme_mode.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_cycles_in_order() {
        assert_eq!(ThemeMode::Light.next(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.next(), ThemeMode::System);
        assert_eq!(ThemeMode::System.next(), ThemeMode::Light);
    }

    #[test]
    fn all_dice_visible_by_default() {
        let settings = AppSettings::default();
        for die in Die::ALL {
            assert!(settings.is_die_visible(die));
        }
    }

    #[test]
    fn toggle_die_flips_visibility() {
        let mut settings = AppSettings::default();
        settings.toggle_die(Die::D100);
        assert!(!settings.is_die_visible(Die::D100));
        settings.toggle_die(Die::D100);
        assert!(settings.is_die_visible(Die::D100));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: AppSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, AppSettings::default());
        let settings: AppSettings =
            serde_json::from_str(r#"{"theme_mode":"dark"}"#).unwrap();
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
        assert!(settings.sound_enabled);
    }
}
