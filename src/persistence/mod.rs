//! Key-value persistence
//!
//! Everything the game remembers between visits goes through the [`Storage`]
//! trait as JSON strings:
//! - the in-flight round ([`SessionSnapshot`]), expiring after a day
//! - last chosen difficulty and the custom difficulty sliders
//! - the best-score table
//! - audio preferences
//!
//! Broken or stale data is never fatal. Loaders return [`LoadError`] and the
//! caller falls back to defaults.

pub mod snapshot;
pub mod storage;

pub use snapshot::SessionSnapshot;
pub use storage::{MemoryStorage, Storage};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys
pub mod keys {
    pub const SAVED_STATE: &str = "ecoSort_savedState";
    pub const DIFFICULTY: &str = "ecoSort_difficulty";
    pub const CUSTOM_SETTINGS: &str = "ecoSort_customSettings";
    pub const HIGH_SCORES: &str = "ecoSort_highScores";
    pub const SETTINGS: &str = "ecoSort_settings";
}

/// Why a stored value could not be used
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("nothing stored")]
    Missing,

    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("expired: saved {age_ms:.0} ms ago")]
    Expired { age_ms: f64 },

    #[error("invalid value: {0}")]
    Invalid(&'static str),
}

/// Read and decode a JSON value
pub fn load_json<T, S>(storage: &S, key: &str) -> Result<T, LoadError>
where
    T: DeserializeOwned,
    S: Storage + ?Sized,
{
    let raw = storage.get_item(key).ok_or(LoadError::Missing)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Encode and store a JSON value. Encoding failures are logged and skipped.
pub fn save_json<T, S>(storage: &mut S, key: &str, value: &T)
where
    T: Serialize,
    S: Storage + ?Sized,
{
    match serde_json::to_string(value) {
        Ok(json) => storage.set_item(key, &json),
        Err(e) => log::warn!("Failed to encode {key}: {e}"),
    }
}

/// Load a value or fall back to its default, logging what happened
pub fn load_or_default<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Storage + ?Sized,
{
    match load_json(storage, key) {
        Ok(value) => {
            log::info!("Loaded {key}");
            value
        }
        Err(LoadError::Missing) => {
            log::info!("No {key} stored, using defaults");
            T::default()
        }
        Err(e) => {
            log::warn!("Ignoring stored {key}: {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        volume: f32,
    }

    #[test]
    fn missing_and_malformed_fall_back_to_default() {
        let mut storage = MemoryStorage::new();
        assert!(matches!(
            load_json::<Prefs, _>(&storage, "k"),
            Err(LoadError::Missing)
        ));

        storage.set_item("k", "{not json");
        assert!(matches!(
            load_json::<Prefs, _>(&storage, "k"),
            Err(LoadError::Malformed(_))
        ));
        assert_eq!(load_or_default::<Prefs, _>(&storage, "k"), Prefs::default());
    }

    #[test]
    fn save_then_load() {
        let mut storage = MemoryStorage::new();
        save_json(&mut storage, "k", &Prefs { volume: 0.5 });
        assert_eq!(load_json::<Prefs, _>(&storage, "k").unwrap(), Prefs { volume: 0.5 });
    }
}
