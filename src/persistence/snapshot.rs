//! Resumable session snapshot

use serde::{Deserialize, Serialize};

use super::{LoadError, Storage, keys, load_json, save_json};
use crate::consts::SNAPSHOT_MAX_AGE_MS;
use crate::sim::{Difficulty, Screen};

/// A paused round, written when the player pauses or leaves the page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub score: u32,
    pub time_left: f32,
    #[serde(rename = "gameState")]
    pub screen: Screen,
    /// Wall clock at save (ms since epoch)
    pub timestamp: f64,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(rename = "gameDuration", default)]
    pub duration_secs: Option<f32>,
    #[serde(rename = "actualGameDuration", default)]
    pub actual_duration_secs: Option<f32>,
}

impl SessionSnapshot {
    /// Read the stored snapshot. Broken or expired data is removed.
    pub fn load<S: Storage + ?Sized>(storage: &mut S, now_ms: f64) -> Result<Self, LoadError> {
        let result = load_json::<Self, _>(&*storage, keys::SAVED_STATE).and_then(|snap| {
            if !snap.time_left.is_finite() || !snap.timestamp.is_finite() {
                return Err(LoadError::Invalid("non-finite time"));
            }
            let age_ms = now_ms - snap.timestamp;
            if age_ms > SNAPSHOT_MAX_AGE_MS {
                return Err(LoadError::Expired { age_ms });
            }
            Ok(snap)
        });

        match &result {
            Ok(snap) => log::info!(
                "Found saved {} round: score {}, {:.1}s left",
                snap.difficulty.as_str(),
                snap.score,
                snap.time_left
            ),
            Err(LoadError::Missing) => {}
            Err(LoadError::Expired { .. }) => Self::clear(storage),
            Err(e) => {
                log::warn!("Discarding saved round: {e}");
                Self::clear(storage);
            }
        }
        result
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        save_json(storage, keys::SAVED_STATE, self);
        log::info!("Round saved ({:.1}s left)", self.time_left);
    }

    pub fn clear<S: Storage + ?Sized>(storage: &mut S) {
        storage.remove_item(keys::SAVED_STATE);
    }

    /// Round duration for the clock, falling back through older fields
    pub fn effective_duration(&self, fallback_secs: f32) -> f32 {
        self.actual_duration_secs
            .or(self.duration_secs)
            .filter(|d| *d > 0.0)
            .unwrap_or(fallback_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    fn snapshot(timestamp: f64) -> SessionSnapshot {
        SessionSnapshot {
            score: 7,
            time_left: 12.5,
            screen: Screen::Playing,
            timestamp,
            difficulty: Difficulty::Easy,
            duration_secs: Some(60.0),
            actual_duration_secs: Some(60.0),
        }
    }

    #[test]
    fn loads_within_a_day() {
        let mut storage = MemoryStorage::new();
        let snap = snapshot(1_000.0);
        snap.save(&mut storage);
        let loaded = SessionSnapshot::load(&mut storage, 1_000.0 + SNAPSHOT_MAX_AGE_MS).unwrap();
        assert_eq!(loaded, snap);
    }

    #[test]
    fn expires_after_a_day_and_is_removed() {
        let mut storage = MemoryStorage::new();
        snapshot(0.0).save(&mut storage);
        let err = SessionSnapshot::load(&mut storage, SNAPSHOT_MAX_AGE_MS + 1.0).unwrap_err();
        assert!(matches!(err, LoadError::Expired { .. }));
        assert!(!storage.contains(keys::SAVED_STATE));
    }

    #[test]
    fn malformed_snapshot_is_removed() {
        let mut storage = MemoryStorage::new();
        storage.set_item(keys::SAVED_STATE, "{\"score\": \"lots\"}");
        let err = SessionSnapshot::load(&mut storage, 0.0).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
        assert!(storage.is_empty());
    }

    #[test]
    fn wire_format_uses_game_state_names() {
        let json = serde_json::to_value(snapshot(5.0)).unwrap();
        assert_eq!(json["gameState"], "playing");
        assert_eq!(json["timeLeft"], 12.5);
        assert_eq!(json["actualGameDuration"], 60.0);
        assert_eq!(json["difficulty"], "easy");
    }

    #[test]
    fn duration_falls_back_through_fields() {
        let mut snap = snapshot(0.0);
        snap.actual_duration_secs = None;
        snap.duration_secs = Some(36.0);
        assert_eq!(snap.effective_duration(60.0), 36.0);
        snap.duration_secs = None;
        assert_eq!(snap.effective_duration(60.0), 60.0);
    }
}
