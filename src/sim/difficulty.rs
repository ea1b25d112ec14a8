//! Difficulty presets and the player-tuned custom difficulty

use serde::{Deserialize, Serialize};

use crate::persistence::{self, LoadError, Storage, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Custom,
}

impl Difficulty {
    /// Difficulties that earn stars and appear in the best-score carousel
    pub const RANKED: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            "custom" => Some(Difficulty::Custom),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Custom => "Custom",
        }
    }

    /// Built-in settings. `Custom` returns the untouched defaults.
    pub fn preset(&self) -> DifficultySettings {
        match self {
            Difficulty::Easy => DifficultySettings::new(4000, 10, 60, "Easy"),
            Difficulty::Medium => DifficultySettings::new(2000, 15, 36, "Medium"),
            Difficulty::Hard => DifficultySettings::new(1000, 20, 24, "Hard"),
            Difficulty::Custom => CustomDifficulty::default().settings(),
        }
    }

    /// Last chosen difficulty, stored as a bare string
    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        storage
            .get_item(keys::DIFFICULTY)
            .and_then(|s| Self::from_str(&s))
            .unwrap_or_default()
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        storage.set_item(keys::DIFFICULTY, self.as_str());
    }
}

/// Round parameters derived from a difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultySettings {
    pub spawn_interval_ms: u32,
    pub max_items: usize,
    pub duration_secs: u32,
    pub name: &'static str,
}

impl DifficultySettings {
    pub const fn new(spawn_interval_ms: u32, max_items: usize, duration_secs: u32, name: &'static str) -> Self {
        Self {
            spawn_interval_ms,
            max_items,
            duration_secs,
            name,
        }
    }
}

/// Slider-edited custom difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomDifficulty {
    #[serde(rename = "spawnInterval")]
    spawn_interval_ms: u32,
    #[serde(rename = "maxItems")]
    max_items: u32,
    #[serde(rename = "durationSec")]
    duration_secs: u32,
}

impl Default for CustomDifficulty {
    fn default() -> Self {
        Self {
            spawn_interval_ms: 2000,
            max_items: 15,
            duration_secs: 60,
        }
    }
}

impl CustomDifficulty {
    pub const DURATION_RANGE: (u32, u32) = (5, 150);
    pub const SPAWN_INTERVAL_RANGE: (u32, u32) = (500, 5000);
    pub const MAX_ITEMS_RANGE: (u32, u32) = (5, 30);

    pub fn new(spawn_interval_ms: u32, max_items: u32, duration_secs: u32) -> Self {
        let mut custom = Self::default();
        custom.set_spawn_interval(spawn_interval_ms);
        custom.set_max_items(max_items);
        custom.set_duration(duration_secs);
        custom
    }

    pub fn spawn_interval_ms(&self) -> u32 {
        self.spawn_interval_ms
    }

    pub fn max_items(&self) -> u32 {
        self.max_items
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Clamped and snapped to whole 100 ms steps
    pub fn set_spawn_interval(&mut self, ms: u32) {
        let (lo, hi) = Self::SPAWN_INTERVAL_RANGE;
        let snapped = ms.saturating_add(50) / 100 * 100;
        self.spawn_interval_ms = snapped.clamp(lo, hi);
    }

    pub fn set_max_items(&mut self, count: u32) {
        let (lo, hi) = Self::MAX_ITEMS_RANGE;
        self.max_items = count.clamp(lo, hi);
    }

    pub fn set_duration(&mut self, secs: u32) {
        let (lo, hi) = Self::DURATION_RANGE;
        self.duration_secs = secs.clamp(lo, hi);
    }

    pub fn settings(&self) -> DifficultySettings {
        DifficultySettings::new(
            self.spawn_interval_ms,
            self.max_items as usize,
            self.duration_secs,
            "Custom",
        )
    }

    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        match persistence::load_json::<Self, _>(storage, keys::CUSTOM_SETTINGS) {
            Ok(stored) => Self::new(stored.spawn_interval_ms, stored.max_items, stored.duration_secs),
            Err(LoadError::Missing) => Self::default(),
            Err(e) => {
                log::warn!("Ignoring custom difficulty: {e}");
                Self::default()
            }
        }
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        persistence::save_json(storage, keys::CUSTOM_SETTINGS, self);
        log::info!(
            "Custom difficulty saved: {} ms, {} items, {} s",
            self.spawn_interval_ms,
            self.max_items,
            self.duration_secs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn presets_match_table() {
        assert_eq!(Difficulty::Easy.preset(), DifficultySettings::new(4000, 10, 60, "Easy"));
        assert_eq!(Difficulty::Medium.preset(), DifficultySettings::new(2000, 15, 36, "Medium"));
        assert_eq!(Difficulty::Hard.preset(), DifficultySettings::new(1000, 20, 24, "Hard"));
        assert_eq!(Difficulty::Custom.preset(), DifficultySettings::new(2000, 15, 60, "Custom"));
    }

    #[test]
    fn custom_values_are_clamped_and_snapped() {
        let mut custom = CustomDifficulty::default();
        custom.set_spawn_interval(1249);
        assert_eq!(custom.spawn_interval_ms(), 1200);
        custom.set_spawn_interval(1250);
        assert_eq!(custom.spawn_interval_ms(), 1300);
        custom.set_spawn_interval(10);
        assert_eq!(custom.spawn_interval_ms(), 500);
        custom.set_max_items(99);
        assert_eq!(custom.max_items(), 30);
        custom.set_duration(1);
        assert_eq!(custom.duration_secs(), 5);
    }

    #[test]
    fn custom_is_clamped_when_loaded() {
        let mut storage = MemoryStorage::new();
        storage.set_item(
            keys::CUSTOM_SETTINGS,
            r#"{"spawnInterval":3000,"maxItems":40,"durationSec":90}"#,
        );
        let custom = CustomDifficulty::load(&storage);
        assert_eq!(custom, CustomDifficulty::new(3000, 30, 90));

        custom.save(&mut storage);
        assert_eq!(CustomDifficulty::load(&storage), custom);
    }

    #[test]
    fn difficulty_persists_as_plain_string() {
        let mut storage = MemoryStorage::new();
        assert_eq!(Difficulty::load(&storage), Difficulty::Medium);
        Difficulty::Hard.save(&mut storage);
        assert_eq!(storage.get_item(keys::DIFFICULTY).as_deref(), Some("hard"));
        assert_eq!(Difficulty::load(&storage), Difficulty::Hard);
        storage.set_item(keys::DIFFICULTY, "nightmare");
        assert_eq!(Difficulty::load(&storage), Difficulty::Medium);
    }
}
