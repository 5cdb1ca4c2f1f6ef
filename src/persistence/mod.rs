//! Key-value snapshot persistence
//!
//! Each persisted object is one JSON string under its own LocalStorage key.
//! On native builds there is no storage: loads return `None` and saves are
//! dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Settings snapshot key
pub const SETTINGS_KEY: &str = "stunt_show_settings";
/// Coins, personal bests and leaderboard
pub const PROFILE_KEY: &str = "stunt_show_profile";

/// Parse a stored value, logging and discarding anything malformed
pub fn decode<T: DeserializeOwned>(key: &str, json: &str) -> Option<T> {
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding corrupt {}: {}", key, e);
            None
        }
    }
}

pub fn encode<T: Serialize>(key: &str, value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not serialize {}: {}", key, e);
            None
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

/// Load a value from LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
    let storage = local_storage()?;
    let json = storage.get_item(key).ok()??;
    decode(key, &json)
}

/// Save a value to LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn save<T: Serialize>(key: &str, value: &T) {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage unavailable, {} not saved", key);
        return;
    };
    if let Some(json) = encode(key, value) {
        if storage.set_item(key, &json).is_err() {
            log::warn!("LocalStorage rejected {}", key);
        }
    }
}

/// Delete a stored value (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn remove(key: &str) {
    let Some(storage) = local_storage() else {
        log::warn!("LocalStorage unavailable, {} not removed", key);
        return;
    };
    if storage.remove_item(key).is_err() {
        log::warn!("LocalStorage refused to remove {}", key);
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load<T: DeserializeOwned>(_key: &str) -> Option<T> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save<T: Serialize>(_key: &str, _value: &T) {
    // No-op for native
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove(_key: &str) {}
