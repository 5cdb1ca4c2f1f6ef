//! Menu selections: mode, difficulty, grid skin, plus the store catalogs
//!
//! Persisted separately from the profile in LocalStorage. Which cosmetics are
//! owned lives in the profile; settings only remember the selected skin.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;
use crate::persistence::{self, SETTINGS_KEY};
use crate::progress::Profile;
use crate::sim::{Difficulty, Mode};

/// Grid skin catalog: id and price in coins
pub const SKINS: &[(&str, u32)] = &[
    ("default", 0),
    ("white", 100),
    ("red", 100),
    ("purple", 100),
    ("pink", 100),
    ("indigo", 100),
    ("teal", 100),
    ("cyan", 100),
    ("blue", 100),
    ("green", 100),
    ("lime", 100),
    ("yellow", 100),
    ("orange", 100),
    ("rainbow", 500),
    ("galaxy", 1000),
    ("fire", 750),
    ("ice", 750),
];

/// Tile effects catalog. Effects are bought but have no selection yet.
pub const EFFECTS: &[(&str, u32)] = &[
    ("sparkle", 200),
    ("explosion", 300),
    ("wave", 400),
    ("rainbow", 500),
];

/// Price of a skin, if it exists
pub fn skin_price(id: &str) -> Option<u32> {
    Cosmetic::Skin.price(id)
}

/// Store section an item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cosmetic {
    Skin,
    Effect,
}

impl Cosmetic {
    pub fn catalog(self) -> &'static [(&'static str, u32)] {
        match self {
            Cosmetic::Skin => SKINS,
            Cosmetic::Effect => EFFECTS,
        }
    }

    pub fn price(self, id: &str) -> Option<u32> {
        self.catalog()
            .iter()
            .find(|(s, _)| *s == id)
            .map(|&(_, price)| price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: Mode,
    /// Drives both the Contrarreloj limit and the AI speed
    pub difficulty: Difficulty,
    /// Rendering only
    pub skin: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            difficulty: Difficulty::Amateur,
            skin: "default".to_string(),
        }
    }
}

impl Settings {
    /// Build from raw menu keys, rejecting anything unknown or not owned
    pub fn from_keys(
        mode: &str,
        difficulty: &str,
        skin: &str,
        profile: &Profile,
    ) -> Result<Self, ConfigError> {
        let mut settings = Self {
            mode: Mode::from_str(mode)?,
            difficulty: Difficulty::from_str(difficulty)?,
            ..Self::default()
        };
        settings.select_skin(skin, profile)?;
        Ok(settings)
    }

    /// Select a skin the profile has unlocked
    pub fn select_skin(&mut self, id: &str, profile: &Profile) -> Result<(), ConfigError> {
        if skin_price(id).is_none() {
            return Err(ConfigError::UnknownSkin(id.to_string()));
        }
        if !profile.owns(Cosmetic::Skin, id) {
            return Err(ConfigError::LockedSkin(id.to_string()));
        }
        self.skin = id.to_string();
        Ok(())
    }

    /// Swap a skin the profile can't use back to the default
    pub fn owned_by(self, profile: &Profile) -> Self {
        if profile.owns(Cosmetic::Skin, &self.skin) {
            return self;
        }
        log::warn!("Skin {:?} is not unlocked, using default", self.skin);
        Self {
            skin: Self::default().skin,
            ..self
        }
    }

    /// Load settings, falling back to defaults for missing or stale snapshots
    pub fn load(profile: &Profile) -> Self {
        match persistence::load::<Settings>(SETTINGS_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings.owned_by(profile)
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        persistence::save(SETTINGS_KEY, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich_profile() -> Profile {
        let mut profile = Profile {
            coins: 1000,
            ..Profile::new()
        };
        profile.unlock(Cosmetic::Skin, "galaxy").unwrap();
        profile
    }

    #[test]
    fn test_from_keys() {
        let profile = rich_profile();
        let s = Settings::from_keys("extremo", "top", "galaxy", &profile).unwrap();
        assert_eq!(s.mode, Mode::Extreme);
        assert_eq!(s.difficulty, Difficulty::Top);
        assert_eq!(s.skin, "galaxy");

        assert_eq!(
            Settings::from_keys("normal", "amateur", "plaid", &profile),
            Err(ConfigError::UnknownSkin("plaid".to_string()))
        );
        assert!(matches!(
            Settings::from_keys("normal", "facil", "default", &profile),
            Err(ConfigError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_locked_skin_is_rejected() {
        let profile = Profile::new();
        let mut s = Settings::default();
        assert_eq!(
            s.select_skin("galaxy", &profile),
            Err(ConfigError::LockedSkin("galaxy".to_string()))
        );
        assert_eq!(s.skin, "default");

        assert_eq!(s.select_skin("galaxy", &rich_profile()), Ok(()));
        assert_eq!(s.skin, "galaxy");
    }

    #[test]
    fn test_stored_skin_needs_ownership() {
        let stored: Settings = serde_json::from_str(r#"{"mode":"mirror","skin":"fire"}"#).unwrap();

        let s = stored.clone().owned_by(&Profile::new());
        assert_eq!(s.skin, "default");
        assert_eq!(s.mode, Mode::Mirror);

        let mut owner = Profile {
            coins: 750,
            ..Profile::new()
        };
        owner.unlock(Cosmetic::Skin, "fire").unwrap();
        assert_eq!(stored.owned_by(&owner).skin, "fire");

        let unknown: Settings = serde_json::from_str(r#"{"skin":"plaid"}"#).unwrap();
        assert_eq!(unknown.owned_by(&owner).skin, "default");
    }

    #[test]
    fn test_catalogs() {
        assert_eq!(skin_price("default"), Some(0));
        assert_eq!(skin_price("galaxy"), Some(1000));
        assert_eq!(skin_price("nope"), None);
        assert_eq!(Cosmetic::Effect.price("wave"), Some(400));
        // Same id, different section
        assert_eq!(Cosmetic::Skin.price("rainbow"), Some(500));
        assert_eq!(Cosmetic::Effect.price("galaxy"), None);
    }

    #[test]
    fn test_partial_snapshot_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"mode":"sumamos"}"#).unwrap();
        assert_eq!(s.mode, Mode::Sumamos);
        assert_eq!(s.difficulty, Difficulty::Amateur);
        assert_eq!(s.skin, "default");
    }

    #[test]
    fn test_unknown_mode_in_snapshot_is_rejected() {
        let s: Result<Settings, _> = serde_json::from_str(r#"{"mode":"arcade"}"#);
        assert!(s.is_err());
    }
}
