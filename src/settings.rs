//! Player preferences
//!
//! Persisted separately from game saves.

use serde::{Deserialize, Serialize};

use crate::audio::Channel;
use crate::persistence::{self, Storage, keys};

/// Audio preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Ambient nature loop volume (0.0 - 1.0)
    pub ambient_volume: f32,
    pub muted: bool,
    /// Silence audio while the page is hidden
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            ambient_volume: 0.6,
            muted: false,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    pub fn volume(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Master => self.master_volume,
            Channel::Sfx => self.sfx_volume,
            Channel::Music => self.music_volume,
            Channel::Ambient => self.ambient_volume,
        }
    }

    pub fn set_volume(&mut self, channel: Channel, volume: f32) {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            0.0
        };
        match channel {
            Channel::Master => self.master_volume = volume,
            Channel::Sfx => self.sfx_volume = volume,
            Channel::Music => self.music_volume = volume,
            Channel::Ambient => self.ambient_volume = volume,
        }
    }

    /// Clamp anything out of range (hand-edited storage)
    fn sanitized(mut self) -> Self {
        for channel in Channel::ALL {
            self.set_volume(channel, self.volume(channel));
        }
        self
    }

    pub fn load<S: Storage + ?Sized>(storage: &S) -> Self {
        persistence::load_or_default::<Self, _>(storage, keys::SETTINGS).sanitized()
    }

    pub fn save<S: Storage + ?Sized>(&self, storage: &mut S) {
        persistence::save_json(storage, keys::SETTINGS, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn partial_json_fills_defaults_and_clamps() {
        let mut storage = MemoryStorage::new();
        storage.set_item(keys::SETTINGS, r#"{"muted":true,"music_volume":7.0}"#);
        let settings = Settings::load(&storage);
        assert!(settings.muted);
        assert_eq!(settings.music_volume, 1.0);
        assert_eq!(settings.sfx_volume, Settings::default().sfx_volume);
    }

    #[test]
    fn save_load_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut settings = Settings::default();
        settings.set_volume(Channel::Sfx, 0.25);
        settings.save(&mut storage);
        assert_eq!(Settings::load(&storage), settings);
    }
}
