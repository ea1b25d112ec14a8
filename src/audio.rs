//! Audio
//!
//! The game talks to sound through [`AudioService`], a fire-and-forget
//! interface. Playback failures are logged and otherwise ignored.
//!
//! Backends:
//! - [`SilentAudio`]: tracks state but makes no sound (native runs, tests)
//! - `WebAudio` (wasm32): procedurally generated sounds via the Web Audio API

/// Logical sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Item hits the grass for the first time
    ItemDrop,
    /// A new item enters the field
    ItemLand,
    /// Item grabbed (two variants, picked at random)
    ItemPickup1,
    ItemPickup2,
    /// Grass rustle on landing, and its softer tail
    GrassRustle1,
    GrassRustle2,
    UiClick,
    GameStart,
    GameOver,
    CorrectSort,
    WrongSort,
    /// Bin lid swings open
    OpenBin,
    /// Consequence panel appears
    ShowDialog,
}

impl SoundEffect {
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::ItemDrop => "item-drop",
            SoundEffect::ItemLand => "item-land",
            SoundEffect::ItemPickup1 => "item-pickup-1",
            SoundEffect::ItemPickup2 => "item-pickup-2",
            SoundEffect::GrassRustle1 => "grass-rustling-1",
            SoundEffect::GrassRustle2 => "grass-rustling-2",
            SoundEffect::UiClick => "ui-click",
            SoundEffect::GameStart => "game-start",
            SoundEffect::GameOver => "game-over",
            SoundEffect::CorrectSort => "correct-sort",
            SoundEffect::WrongSort => "wrong-sort",
            SoundEffect::OpenBin => "open-bin",
            SoundEffect::ShowDialog => "show-dialog",
        }
    }

    /// Mix level before channel volumes are applied
    pub fn base_volume(&self) -> f32 {
        match self {
            SoundEffect::ItemDrop => 0.7,
            SoundEffect::ItemLand => 0.6,
            SoundEffect::ItemPickup1 | SoundEffect::ItemPickup2 => 0.8,
            SoundEffect::GrassRustle1 | SoundEffect::GrassRustle2 => 0.6,
            SoundEffect::UiClick => 0.5,
            SoundEffect::GameStart | SoundEffect::GameOver => 0.8,
            SoundEffect::CorrectSort => 0.7,
            SoundEffect::WrongSort => 1.0,
            SoundEffect::OpenBin => 0.9,
            SoundEffect::ShowDialog => 0.6,
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicTrack {
    Background,
}

impl MusicTrack {
    pub fn name(&self) -> &'static str {
        match self {
            MusicTrack::Background => "background-music",
        }
    }
}

/// Volume channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Master,
    Sfx,
    Music,
    Ambient,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Master, Channel::Sfx, Channel::Music, Channel::Ambient];
}

/// Per-call playback tweaks
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayOptions {
    /// Replaces the effect's base volume
    pub volume: Option<f32>,
    /// Playback rate multiplier; pitch and length scale together
    pub rate: Option<f32>,
}

impl PlayOptions {
    pub fn with_volume(volume: f32) -> Self {
        Self {
            volume: Some(volume),
            ..Self::default()
        }
    }

    pub fn with_rate(rate: f32) -> Self {
        Self {
            rate: Some(rate),
            ..Self::default()
        }
    }

    /// Effective rate, clamped to [0.25, 4]
    pub fn playback_rate(&self) -> f32 {
        self.rate.filter(|r| r.is_finite()).map_or(1.0, |r| r.clamp(0.25, 4.0))
    }
}

/// Sound output used by the game
pub trait AudioService {
    fn play(&mut self, effect: SoundEffect, options: PlayOptions);
    fn play_music(&mut self, track: MusicTrack);
    fn stop_music(&mut self);
    /// (Re)start the ambient nature loop from the top
    fn play_ambient(&mut self);
    fn stop_ambient(&mut self);
    fn pause_ambient(&mut self);
    fn resume_ambient(&mut self);
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
    fn set_volume(&mut self, channel: Channel, volume: f32);

    /// Silence every loop while the game is hidden
    fn suspend(&mut self) {
        self.pause_ambient();
    }

    /// Undo [`AudioService::suspend`]
    fn resume(&mut self) {
        if !self.is_muted() {
            self.resume_ambient();
        }
    }
}

/// Audio backend that only keeps track of state
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
    muted: bool,
    music: Option<MusicTrack>,
    ambient_playing: bool,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn music(&self) -> Option<MusicTrack> {
        self.music
    }

    pub fn ambient_playing(&self) -> bool {
        self.ambient_playing
    }
}

impl AudioService for SilentAudio {
    fn play(&mut self, effect: SoundEffect, _options: PlayOptions) {
        log::trace!("sfx {}", effect.name());
    }

    fn play_music(&mut self, track: MusicTrack) {
        self.music = Some(track);
    }

    fn stop_music(&mut self) {
        self.music = None;
    }

    fn play_ambient(&mut self) {
        self.ambient_playing = true;
    }

    fn stop_ambient(&mut self) {
        self.ambient_playing = false;
    }

    fn pause_ambient(&mut self) {
        self.ambient_playing = false;
    }

    fn resume_ambient(&mut self) {
        self.ambient_playing = true;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_volume(&mut self, _channel: Channel, _volume: f32) {}
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioService, Channel, MusicTrack, PlayOptions, SoundEffect};
    use crate::settings::Settings;

    /// A sustained oscillator bank used for looping beds
    struct Loop {
        oscillators: Vec<OscillatorNode>,
        gain: GainNode,
    }

    impl Loop {
        fn stop(self) {
            for osc in self.oscillators {
                osc.stop().ok();
            }
        }
    }

    /// Procedural Web Audio backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        settings: Settings,
        music: Option<Loop>,
        ambient: Option<Loop>,
        ambient_paused: bool,
        /// Rate of the effect being voiced
        rate: f32,
    }

    impl WebAudio {
        pub fn new(settings: Settings) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                settings,
                music: None,
                ambient: None,
                ambient_paused: false,
                rate: 1.0,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn unlock(&self) {
            let Some(ctx) = &self.ctx else { return };
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
        }

        pub fn settings(&self) -> &Settings {
            &self.settings
        }

        fn channel_volume(&self, channel: Channel) -> f32 {
            if self.settings.muted {
                0.0
            } else {
                self.settings.master_volume * self.settings.volume(channel)
            }
        }

        fn music_level(&self) -> f32 {
            self.channel_volume(Channel::Music) * 0.12
        }

        fn ambient_level(&self) -> f32 {
            if self.ambient_paused {
                0.0
            } else {
                self.channel_volume(Channel::Ambient) * 0.08
            }
        }

        fn refresh_loop_levels(&self) {
            let Some(ctx) = &self.ctx else { return };
            let t = ctx.current_time();
            if let Some(music) = &self.music {
                music.gain.gain().set_target_at_time(self.music_level(), t, 0.1).ok();
            }
            if let Some(ambient) = &self.ambient {
                ambient.gain.gain().set_target_at_time(self.ambient_level(), t, 0.1).ok();
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn start_loop(&self, freqs: &[(f32, OscillatorType)], level: f32) -> Option<Loop> {
            let ctx = self.ctx.as_ref()?;
            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(level);
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            let mut oscillators = Vec::with_capacity(freqs.len());
            for (freq, kind) in freqs {
                let osc = ctx.create_oscillator().ok()?;
                osc.set_type(*kind);
                osc.frequency().set_value(*freq);
                osc.connect_with_audio_node(&gain).ok()?;
                osc.start().ok();
                oscillators.push(osc);
            }
            Some(Loop { oscillators, gain })
        }

        /// Single enveloped tone
        fn blip(&self, ctx: &AudioContext, freq: f32, to_freq: Option<f32>, kind: OscillatorType, vol: f32, delay: f64, length: f64) {
            let freq = freq * self.rate;
            let to_freq = to_freq.map(|f| f * self.rate);
            let (delay, length) = (delay / self.rate as f64, length / self.rate as f64);
            let Some((osc, gain)) = self.create_osc(ctx, freq, kind) else {
                return;
            };
            let t = ctx.current_time() + delay;
            gain.gain().set_value_at_time(0.0001, ctx.current_time()).ok();
            gain.gain().set_value_at_time(vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + length).ok();
            if let Some(to) = to_freq {
                osc.frequency().set_value_at_time(freq, t).ok();
                osc.frequency().exponential_ramp_to_value_at_time(to, t + length).ok();
            }
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }

        /// Noisy rustle approximated with fast frequency jumps
        fn rustle(&self, ctx: &AudioContext, vol: f32, length: f64) {
            let length = length / self.rate as f64;
            let Some((osc, gain)) = self.create_osc(ctx, 2500.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, t + length).ok();
            let steps = (length / 0.015) as usize;
            for i in 0..steps {
                let freq = if i % 2 == 0 { 1800.0 + (i * 370 % 1400) as f32 } else { 3200.0 - (i * 530 % 1600) as f32 };
                let freq = freq * self.rate;
                osc.frequency().set_value_at_time(freq, t + i as f64 * 0.015).ok();
            }
            osc.start().ok();
            osc.stop_with_when(t + length + 0.05).ok();
        }
    }

    impl AudioService for WebAudio {
        fn play(&mut self, effect: SoundEffect, options: PlayOptions) {
            let vol = self.channel_volume(Channel::Sfx) * options.volume.unwrap_or(effect.base_volume());
            if vol <= 0.0 {
                return;
            }
            self.rate = options.playback_rate();
            self.unlock();
            let Some(ctx) = &self.ctx else { return };

            use OscillatorType::{Sawtooth, Sine, Square, Triangle};
            match effect {
                SoundEffect::ItemDrop => self.blip(ctx, 140.0, Some(60.0), Sine, vol * 0.6, 0.0, 0.12),
                SoundEffect::ItemLand => self.blip(ctx, 500.0, Some(250.0), Triangle, vol * 0.25, 0.0, 0.15),
                SoundEffect::ItemPickup1 => self.blip(ctx, 600.0, Some(900.0), Sine, vol * 0.3, 0.0, 0.08),
                SoundEffect::ItemPickup2 => self.blip(ctx, 700.0, Some(1100.0), Sine, vol * 0.3, 0.0, 0.08),
                SoundEffect::GrassRustle1 => self.rustle(ctx, vol, 0.25),
                SoundEffect::GrassRustle2 => self.rustle(ctx, vol * 0.6, 0.18),
                SoundEffect::UiClick => self.blip(ctx, 1000.0, None, Square, vol * 0.12, 0.0, 0.04),
                SoundEffect::GameStart => {
                    for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                        self.blip(ctx, *freq, None, Triangle, vol * 0.3, i as f64 * 0.1, 0.4);
                    }
                }
                SoundEffect::GameOver => {
                    for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
                        self.blip(ctx, *freq, None, Sine, vol * 0.3, i as f64 * 0.2, 0.3);
                    }
                }
                SoundEffect::CorrectSort => {
                    for (i, freq) in [600.0, 800.0, 1000.0].iter().enumerate() {
                        self.blip(ctx, *freq, None, Sine, vol * 0.25, i as f64 * 0.08, 0.15);
                    }
                }
                SoundEffect::WrongSort => {
                    self.blip(ctx, 220.0, Some(110.0), Sawtooth, vol * 0.3, 0.0, 0.3);
                    self.blip(ctx, 233.0, Some(116.0), Square, vol * 0.15, 0.0, 0.3);
                }
                SoundEffect::OpenBin => self.blip(ctx, 180.0, Some(320.0), Triangle, vol * 0.35, 0.0, 0.2),
                SoundEffect::ShowDialog => self.blip(ctx, 300.0, Some(600.0), Sine, vol * 0.3, 0.0, 0.25),
            }
        }

        fn play_music(&mut self, track: MusicTrack) {
            if self.music.is_some() {
                return;
            }
            log::info!("Starting {}", track.name());
            // Soft A-minor pad
            self.music = self.start_loop(
                &[
                    (220.0, OscillatorType::Sine),
                    (261.63, OscillatorType::Sine),
                    (329.63, OscillatorType::Triangle),
                ],
                self.music_level(),
            );
        }

        fn stop_music(&mut self) {
            if let Some(music) = self.music.take() {
                music.stop();
            }
        }

        fn play_ambient(&mut self) {
            self.stop_ambient();
            self.ambient_paused = false;
            self.ambient = self.start_loop(
                &[(55.0, OscillatorType::Sine), (57.5, OscillatorType::Sine)],
                self.ambient_level(),
            );
        }

        fn stop_ambient(&mut self) {
            if let Some(ambient) = self.ambient.take() {
                ambient.stop();
            }
        }

        fn pause_ambient(&mut self) {
            self.ambient_paused = true;
            self.refresh_loop_levels();
        }

        fn resume_ambient(&mut self) {
            self.ambient_paused = false;
            self.refresh_loop_levels();
        }

        fn set_muted(&mut self, muted: bool) {
            self.settings.muted = muted;
            self.refresh_loop_levels();
        }

        fn is_muted(&self) -> bool {
            self.settings.muted
        }

        fn set_volume(&mut self, channel: Channel, volume: f32) {
            self.settings.set_volume(channel, volume);
            self.refresh_loop_levels();
        }

        fn suspend(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.suspend();
            }
        }

        fn resume(&mut self) {
            if !self.settings.muted {
                self.unlock();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sound_names_are_stable() {
        assert_eq!(SoundEffect::GrassRustle2.name(), "grass-rustling-2");
        assert_eq!(SoundEffect::OpenBin.name(), "open-bin");
        assert_eq!(MusicTrack::Background.name(), "background-music");
    }

    #[test]
    fn playback_rate_defaults_and_clamps() {
        assert_eq!(PlayOptions::default().playback_rate(), 1.0);
        assert_eq!(PlayOptions::with_rate(1.5).playback_rate(), 1.5);
        assert_eq!(PlayOptions::with_rate(0.0).playback_rate(), 0.25);
        assert_eq!(PlayOptions::with_rate(f32::NAN).playback_rate(), 1.0);
        assert_eq!(PlayOptions::with_volume(0.4).rate, None);
    }

    #[test]
    fn silent_audio_tracks_loops() {
        let mut audio = SilentAudio::new();
        audio.play_ambient();
        audio.suspend();
        assert!(!audio.ambient_playing());
        audio.resume();
        assert!(audio.ambient_playing());

        audio.set_muted(true);
        audio.suspend();
        audio.resume();
        assert!(!audio.ambient_playing());
    }
}
