//! Player progress: coins, per-mode best times, leaderboard, owned cosmetics
//!
//! The round engine only computes candidate values. Whatever implements
//! `ProgressSink` owns the authoritative store.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::StoreError;
use crate::leaderboard::Leaderboard;
use crate::persistence::{self, PROFILE_KEY};
use crate::settings::Cosmetic;
use crate::sim::{Mode, RoundResult};

/// Receives finished rounds from the engine
pub trait ProgressSink {
    /// Stored best completion time for a mode, in seconds
    fn personal_best(&self, mode: Mode) -> Option<f64>;

    /// Called exactly once per round that ends won or lost
    fn on_round_end(&mut self, result: &RoundResult);
}

/// Persisted player profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub coins: u64,
    /// Missing mode means no completion yet
    pub personal_bests: BTreeMap<Mode, f64>,
    pub leaderboard: Leaderboard,
    pub rounds_played: u32,
    pub rounds_won: u32,
    pub unlocked_skins: BTreeSet<String>,
    pub unlocked_effects: BTreeSet<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            coins: 0,
            personal_bests: BTreeMap::new(),
            leaderboard: Leaderboard::new(),
            rounds_played: 0,
            rounds_won: 0,
            unlocked_skins: BTreeSet::from(["default".to_string()]),
            unlocked_effects: BTreeSet::new(),
        }
    }
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    fn unlocked(&self, kind: Cosmetic) -> &BTreeSet<String> {
        match kind {
            Cosmetic::Skin => &self.unlocked_skins,
            Cosmetic::Effect => &self.unlocked_effects,
        }
    }

    /// Free items are always owned
    pub fn owns(&self, kind: Cosmetic, id: &str) -> bool {
        match kind.price(id) {
            Some(0) => true,
            Some(_) => self.unlocked(kind).contains(id),
            None => false,
        }
    }

    /// Deduct coins if the balance allows it
    pub fn spend(&mut self, amount: u64) -> bool {
        if self.coins < amount {
            return false;
        }
        self.coins -= amount;
        true
    }

    /// Buy a store item. Buying something already owned costs nothing.
    pub fn unlock(&mut self, kind: Cosmetic, id: &str) -> Result<(), StoreError> {
        let price = kind
            .price(id)
            .ok_or_else(|| StoreError::UnknownItem(id.to_string()))?;
        if self.owns(kind, id) {
            return Ok(());
        }
        if !self.spend(u64::from(price)) {
            return Err(StoreError::NotEnoughCoins {
                item: id.to_string(),
                price,
                coins: self.coins,
            });
        }

        let owned = match kind {
            Cosmetic::Skin => &mut self.unlocked_skins,
            Cosmetic::Effect => &mut self.unlocked_effects,
        };
        owned.insert(id.to_string());
        log::info!("Unlocked {:?} {} for {} coins", kind, id, price);
        Ok(())
    }

    /// Wipe progress and its stored snapshot
    pub fn reset(&mut self) {
        *self = Self::new();
        persistence::remove(PROFILE_KEY);
        log::info!("Profile reset");
    }

    /// Load the profile snapshot, or start fresh
    pub fn load() -> Self {
        match persistence::load::<Profile>(PROFILE_KEY) {
            Some(profile) => {
                log::info!(
                    "Loaded profile: {} coins, {} bests",
                    profile.coins,
                    profile.personal_bests.len()
                );
                profile
            }
            None => {
                log::info!("No profile found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        persistence::save(PROFILE_KEY, self);
        log::info!("Profile saved ({} coins)", self.coins);
    }
}

impl ProgressSink for Profile {
    fn personal_best(&self, mode: Mode) -> Option<f64> {
        self.personal_bests.get(&mode).copied()
    }

    fn on_round_end(&mut self, result: &RoundResult) {
        self.rounds_played += 1;
        if !result.won {
            return;
        }
        self.rounds_won += 1;

        let improved = self
            .personal_best(result.mode)
            .is_none_or(|best| result.final_elapsed < best);
        if improved {
            self.personal_bests.insert(result.mode, result.final_elapsed);
            log::info!(
                "New {} best: {} s",
                result.mode,
                crate::format_secs(result.final_elapsed)
            );
        }

        self.coins += u64::from(result.currency_awarded);
        self.leaderboard.add_run(
            result.mode,
            result.final_elapsed,
            result.currency_awarded,
            now_timestamp_ms(),
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn now_timestamp_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn now_timestamp_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
