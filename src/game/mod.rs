//! Screen state machine
//!
//! [`Game`] owns the session, the item field, the bin rack, every UI tween
//! and the injected storage and audio backends. The host calls
//! [`Game::update`] once per animation frame and forwards pointer and key
//! events; drawing reads the resulting state through the accessors here.
//!
//! All timestamps are wall-clock milliseconds supplied by the host.

mod flow;
pub mod guide;
mod input;
pub mod menu;
pub mod scheduler;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

pub use guide::GuideOverlay;
pub use menu::{MenuAction, MenuItem, Slider, SliderKind};
pub use scheduler::{SpawnTicker, TimeoutRegistry};

use crate::anim::{Carousel, Easing, SunArc, TitleBounce, Tween};
use crate::audio::{AudioService, Channel, PlayOptions, SoundEffect};
use crate::consts::SECOND_RUSTLE_DELAY_MS;
use crate::highscores::ScoreTable;
use crate::persistence::Storage;
use crate::settings::Settings;
use crate::sim::{
    BinKind, BinRack, Catalog, CustomDifficulty, Difficulty, DifficultySettings, GameSession, ItemField, ItemId,
    ItemSound, STANDARD_ITEMS, Screen, StarThresholds, TimerTick,
};
use crate::Viewport;

/// Construction-time options
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    pub viewport: Viewport,
    pub seed: u64,
    pub stars: StarThresholds,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            seed: 0x5eed,
            stars: StarThresholds::default(),
        }
    }
}

/// The last incorrect sort, shown in the dialog and consequence panel
#[derive(Debug, Clone, PartialEq)]
pub struct WrongSort {
    pub message: String,
    /// Catalog index of the misplaced item
    pub archetype: usize,
    pub correct: BinKind,
}

/// Summary shown on the game-over panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundResult {
    pub difficulty: Difficulty,
    pub score: u32,
    pub stars: u8,
    pub elapsed_secs: f32,
    pub new_best: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    id: ItemId,
    /// Pointer minus item center at pickup
    offset: Vec2,
}

/// A delayed sound cue
type Cue = (SoundEffect, PlayOptions);

const PAUSE_MODAL_MS: f64 = 500.0;

pub struct Game<S: Storage, A: AudioService> {
    config: GameConfig,
    storage: S,
    audio: A,
    settings: Settings,
    rng: Pcg32,

    catalog: Catalog,
    session: GameSession,
    items: ItemField,
    bins: BinRack,
    scores: ScoreTable,
    custom: CustomDifficulty,
    sliders: [Slider; 3],

    spawner: Option<SpawnTicker>,
    timeouts: TimeoutRegistry<Cue>,
    drag: Option<Drag>,
    pointer: Vec2,
    wrong_sort: Option<WrongSort>,
    last_result: Option<RoundResult>,
    saved_round: bool,
    audio_started: bool,

    // Main menu
    title: TitleBounce,
    grass: Tween,
    menu_buttons: Tween,
    sun: SunArc,
    carousel: Carousel,
    carousel_pages: Vec<Difficulty>,
    guide: GuideOverlay,

    // Menus and modals
    difficulty_panel: Tween,
    pause_modal: Tween<MenuAction>,
    game_over_modal: Tween<MenuAction>,

    // In round
    dialog_slide: Tween,
    round_intro: Tween,
}

impl<S: Storage, A: AudioService> Game<S, A> {
    /// Load persisted preferences and open on the main menu
    pub fn new(config: GameConfig, storage: S, mut audio: A, now_ms: f64) -> Self {
        let viewport = config.viewport;
        let bins = BinRack::standard(viewport);
        let catalog = Catalog::new(&STANDARD_ITEMS, &bins.kinds());

        let settings = Settings::load(&storage);
        audio.set_muted(settings.muted);
        for channel in Channel::ALL {
            audio.set_volume(channel, settings.volume(channel));
        }

        let session = GameSession {
            difficulty: Difficulty::load(&storage),
            ..Default::default()
        };
        let scores = ScoreTable::load(&storage);
        let custom = CustomDifficulty::load(&storage);

        log::info!(
            "Game created: {}x{}, seed {}, {} item kinds",
            viewport.width,
            viewport.height,
            config.seed,
            catalog.len()
        );

        let mut game = Self {
            config,
            storage,
            audio,
            settings,
            rng: Pcg32::seed_from_u64(config.seed),
            catalog,
            session,
            items: ItemField::new(viewport, 0),
            bins,
            scores,
            custom,
            sliders: Slider::custom_sliders(viewport),
            spawner: None,
            timeouts: TimeoutRegistry::new(),
            drag: None,
            pointer: Vec2::ZERO,
            wrong_sort: None,
            last_result: None,
            saved_round: false,
            audio_started: false,
            title: TitleBounce::new(),
            grass: Tween::shown(800.0, Easing::CubicOut),
            menu_buttons: Tween::shown(700.0, Easing::CubicOut),
            sun: SunArc::new(viewport.height),
            carousel: Carousel::new(1),
            carousel_pages: Vec::new(),
            guide: GuideOverlay::new(),
            difficulty_panel: Tween::shown(600.0, Easing::CubicOut),
            pause_modal: Tween::new(PAUSE_MODAL_MS, Easing::CubicOut),
            game_over_modal: Tween::new(600.0, Easing::CubicOut),
            dialog_slide: Tween::new(600.0, Easing::CubicOut),
            round_intro: Tween::shown(700.0, Easing::CubicOut),
        };
        game.show_main_menu(now_ms);
        game
    }

    /// Size items and bins from their sprites once images have loaded
    pub fn resolve_image_sizes(&mut self, natural_size: impl Fn(&str) -> Option<Vec2>) {
        self.catalog.resolve_sizes(&natural_size);
        self.bins.resolve_dimensions(&natural_size);
    }

    /// Advance one frame
    pub fn update(&mut self, now_ms: f64) {
        self.sun.update(now_ms);

        match self.session.screen {
            Screen::MainMenu => {
                self.title.update(now_ms);
                self.grass.update(now_ms);
                self.menu_buttons.update(now_ms);
                self.carousel.update(now_ms);
                self.guide.update(now_ms);
            }
            Screen::DifficultyMenu | Screen::CustomSettings => {
                self.difficulty_panel.update(now_ms);
            }
            Screen::Playing | Screen::Dialog | Screen::Consequence => self.update_round(now_ms),
            Screen::PauseMenu => {
                if let Some(action) = self.pause_modal.update(now_ms) {
                    self.run_deferred(action, now_ms);
                }
            }
            Screen::GameOver => {
                if let Some(action) = self.game_over_modal.update(now_ms) {
                    self.run_deferred(action, now_ms);
                }
            }
        }
    }

    /// Physics keeps running under the dialogs; spawning and the clock
    /// only advance while playing.
    fn update_round(&mut self, now_ms: f64) {
        if self.drag.is_some() {
            // Lets the hover debounce complete while the pointer rests
            self.bins.set_hover(self.pointer, true, now_ms);
        }

        self.items.update(&mut self.rng);
        for (_, sound) in self.items.drain_sounds() {
            self.play_item_sound(sound, now_ms);
        }
        for kind in self.bins.update(now_ms) {
            log::trace!("{} bin opened", kind.label());
            self.audio.play(SoundEffect::OpenBin, PlayOptions::default());
        }
        self.dialog_slide.update(now_ms);
        self.round_intro.update(now_ms);
        // Cues that come due under a dialog are dropped
        let due_cues = self.timeouts.take_due(now_ms);
        if self.session.screen != Screen::Playing {
            return;
        }
        for (effect, options) in due_cues {
            self.audio.play(effect, options);
        }

        let due = self.spawner.as_mut().map_or(0, |t| t.poll(now_ms));
        for _ in 0..due {
            self.spawn_attempt();
        }

        if self.session.timer.tick(now_ms) == TimerTick::Ended {
            self.end_round(now_ms);
        }
    }

    /// One firing of the spawn clock. A full field counts as a miss.
    fn spawn_attempt(&mut self) {
        self.session.stats.attempts += 1;
        if self.items.is_full() {
            self.session.stats.missed += 1;
            return;
        }
        self.audio.play(SoundEffect::ItemLand, PlayOptions::default());
        self.items.spawn(&self.catalog, &mut self.rng);
    }

    fn play_item_sound(&mut self, sound: ItemSound, now_ms: f64) {
        match sound {
            ItemSound::Drop => self.audio.play(SoundEffect::ItemDrop, PlayOptions::default()),
            ItemSound::Bounce => {
                self.audio.play(SoundEffect::GrassRustle1, PlayOptions::default());
                self.timeouts.schedule(
                    now_ms + SECOND_RUSTLE_DELAY_MS,
                    (SoundEffect::GrassRustle2, PlayOptions::default()),
                );
            }
            ItemSound::BounceDrop => self
                .audio
                .play(SoundEffect::ItemDrop, PlayOptions::with_volume(0.4)),
        }
    }

    /// Settings of the difficulty currently selected
    pub fn difficulty_settings(&self) -> DifficultySettings {
        match self.session.difficulty {
            Difficulty::Custom => self.custom.settings(),
            d => d.preset(),
        }
    }

    /// Clickable elements of the current screen
    pub fn menu_items(&self) -> Vec<MenuItem> {
        let vp = self.config.viewport;
        match self.session.screen {
            Screen::MainMenu => menu::main_menu(vp, self.saved_round, self.carousel_pages.len()),
            Screen::DifficultyMenu => menu::difficulty_menu(vp),
            Screen::CustomSettings => menu::custom_menu(vp),
            Screen::PauseMenu => menu::pause_menu(vp),
            Screen::GameOver => menu::game_over_menu(vp),
            Screen::Playing | Screen::Consequence => vec![menu::pause_button(vp)],
            Screen::Dialog => vec![menu::pause_button(vp), menu::info_button(vp)],
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        self.audio.set_muted(muted);
        self.settings.save(&mut self.storage);
    }

    pub fn set_volume(&mut self, channel: Channel, volume: f32) {
        self.settings.set_volume(channel, volume);
        self.audio.set_volume(channel, self.settings.volume(channel));
        self.settings.save(&mut self.storage);
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn items(&self) -> &ItemField {
        &self.items
    }

    pub fn bins(&self) -> &BinRack {
        &self.bins
    }

    pub fn scores(&self) -> &ScoreTable {
        &self.scores
    }

    pub fn custom(&self) -> &CustomDifficulty {
        &self.custom
    }

    pub fn sliders(&self) -> &[Slider; 3] {
        &self.sliders
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn wrong_sort(&self) -> Option<&WrongSort> {
        self.wrong_sort.as_ref()
    }

    pub fn last_result(&self) -> Option<&RoundResult> {
        self.last_result.as_ref()
    }

    pub fn has_saved_round(&self) -> bool {
        self.saved_round
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn dragged_item(&self) -> Option<ItemId> {
        self.drag.map(|d| d.id)
    }

    pub fn spawn_interval_ms(&self) -> Option<f64> {
        self.spawner.as_ref().map(SpawnTicker::interval_ms)
    }

    pub fn title(&self) -> &TitleBounce {
        &self.title
    }

    pub fn sun(&self) -> &SunArc {
        &self.sun
    }

    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Ranked difficulties with a best score, in carousel order
    pub fn carousel_pages(&self) -> &[Difficulty] {
        &self.carousel_pages
    }

    pub fn guide(&self) -> &GuideOverlay {
        &self.guide
    }

    pub fn grass_progress(&self) -> f32 {
        self.grass.progress()
    }

    pub fn menu_buttons_progress(&self) -> f32 {
        self.menu_buttons.progress()
    }

    pub fn difficulty_panel_progress(&self) -> f32 {
        self.difficulty_panel.progress()
    }

    pub fn pause_progress(&self) -> f32 {
        self.pause_modal.progress()
    }

    pub fn game_over_progress(&self) -> f32 {
        self.game_over_modal.progress()
    }

    pub fn dialog_progress(&self) -> f32 {
        self.dialog_slide.progress()
    }

    pub fn round_intro_progress(&self) -> f32 {
        self.round_intro.progress()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::persistence::MemoryStorage;

    fn game() -> Game<MemoryStorage, SilentAudio> {
        Game::new(GameConfig::default(), MemoryStorage::new(), SilentAudio::new(), 0.0)
    }

    #[test]
    fn starts_on_main_menu_with_validated_catalog() {
        let game = game();
        assert_eq!(game.screen(), Screen::MainMenu);
        assert_eq!(game.catalog().len(), STANDARD_ITEMS.len());
        assert!(!game.has_saved_round());
    }

    #[test]
    fn spawn_clock_fills_field_then_counts_misses() {
        let mut game = game();
        game.activate(MenuAction::Start, 0.0);
        game.activate(MenuAction::PickDifficulty(Difficulty::Hard), 0.0);
        assert_eq!(game.spawn_interval_ms(), Some(1000.0));

        // 1000 ms interval, 20 item cap, 24 s round
        let mut now = 0.0;
        while now < 23_000.0 {
            now += 100.0;
            game.update(now);
        }
        let stats = game.session().stats;
        assert_eq!(game.items().len(), 20);
        assert_eq!(stats.attempts, 22);
        assert_eq!(stats.missed, 2);
    }

    #[test]
    fn muting_is_persisted() {
        let mut game = game();
        game.set_muted(true);
        assert!(game.audio().is_muted());
        assert!(Settings::load(game.storage()).muted);
    }
}
