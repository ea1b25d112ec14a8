//! Screen transitions
//!
//! Every transition is idempotent with respect to the round clocks: they are
//! all stopped before anything new is started.

use super::{Game, MenuAction, PAUSE_MODAL_MS, RoundResult, SpawnTicker, WrongSort};
use crate::anim::{Carousel, Easing, Tween};
use crate::audio::{AudioService, PlayOptions, SoundEffect};
use crate::consts::START_RUSTLE_DELAY_MS;
use crate::persistence::{SessionSnapshot, Storage};
use crate::sim::{Difficulty, Screen};

impl<S: Storage, A: AudioService> Game<S, A> {
    pub(super) fn show_main_menu(&mut self, now_ms: f64) {
        self.leave_round();
        self.session.screen = Screen::MainMenu;
        self.title.restart(now_ms);
        self.grass.open(now_ms);
        self.menu_buttons.open(now_ms);
        self.sun.restart(now_ms);

        self.saved_round = match SessionSnapshot::load(&mut self.storage, now_ms) {
            Ok(snap) => snap.time_left > 0.0,
            Err(_) => false,
        };
        self.refresh_carousel();
        log::info!("Main menu");
    }

    pub(super) fn show_difficulty_menu(&mut self, now_ms: f64) {
        self.leave_round();
        self.session.screen = Screen::DifficultyMenu;
        self.difficulty_panel.open(now_ms);
    }

    pub(super) fn show_custom_settings(&mut self, now_ms: f64) {
        self.session.screen = Screen::CustomSettings;
        for slider in &mut self.sliders {
            slider.dragging = false;
        }
        self.difficulty_panel.open(now_ms);
    }

    /// Rebuild carousel pages after the score table changed
    pub(super) fn refresh_carousel(&mut self) {
        let pages: Vec<Difficulty> = Difficulty::RANKED
            .into_iter()
            .filter(|d| self.scores.best_for(*d).is_some())
            .collect();
        if pages != self.carousel_pages {
            self.carousel = Carousel::new(pages.len());
            self.carousel_pages = pages;
        }
    }

    pub(super) fn reset_scores(&mut self) {
        self.scores.clear();
        self.scores.save(&mut self.storage);
        self.refresh_carousel();
    }

    /// Begin a fresh round at `difficulty`
    pub fn start_round(&mut self, difficulty: Difficulty, now_ms: f64) {
        self.leave_round();
        SessionSnapshot::clear(&mut self.storage);
        self.saved_round = false;

        difficulty.save(&mut self.storage);
        if difficulty == Difficulty::Custom {
            self.custom.save(&mut self.storage);
        }
        self.session.difficulty = difficulty;
        let settings = self.difficulty_settings();

        self.session.begin_round(difficulty, settings.duration_secs as f32);
        self.session.screen = Screen::Playing;
        self.items.clear();
        self.items.set_max_items(settings.max_items);
        self.last_result = None;

        self.round_intro.open(now_ms);
        self.timeouts.schedule(
            now_ms + START_RUSTLE_DELAY_MS,
            (SoundEffect::GrassRustle1, PlayOptions::default()),
        );
        self.audio.play(SoundEffect::GameStart, PlayOptions::default());
        self.resume_round_clocks();

        log::info!(
            "Round started: {} ({} s, every {} ms, max {})",
            settings.name,
            settings.duration_secs,
            settings.spawn_interval_ms,
            settings.max_items
        );
    }

    /// Pick up the saved round, or fall back to the difficulty menu
    pub fn continue_round(&mut self, now_ms: f64) {
        let snap = match SessionSnapshot::load(&mut self.storage, now_ms) {
            Ok(snap) if snap.time_left > 0.0 => snap,
            Ok(_) => {
                log::info!("Saved round had no time left");
                SessionSnapshot::clear(&mut self.storage);
                self.saved_round = false;
                self.show_difficulty_menu(now_ms);
                return;
            }
            Err(e) => {
                log::debug!("Nothing to continue: {e}");
                self.saved_round = false;
                self.show_difficulty_menu(now_ms);
                return;
            }
        };

        self.leave_round();
        self.session.difficulty = snap.difficulty;
        let settings = self.difficulty_settings();
        let duration = snap.effective_duration(settings.duration_secs as f32);

        self.session.score = snap.score;
        self.session.duration_secs = snap.duration_secs.unwrap_or(duration);
        self.session.actual_duration_secs = duration;
        self.session.timer.restore(duration, snap.time_left);
        self.session.pre_pause = None;
        self.session.screen = Screen::Playing;
        self.items.set_max_items(settings.max_items);

        self.round_intro.open(now_ms);
        self.audio.play_ambient();
        self.audio.play(SoundEffect::GameStart, PlayOptions::default());
        self.resume_round_clocks();

        log::info!(
            "Continuing {} round: score {}, {:.1}s left",
            snap.difficulty.as_str(),
            snap.score,
            snap.time_left
        );
    }

    /// Time ran out. Runs once per round.
    pub(super) fn end_round(&mut self, now_ms: f64) {
        if self.session.screen == Screen::GameOver {
            log::debug!("Round already over");
            return;
        }

        self.leave_round();
        self.session.screen = Screen::GameOver;
        self.session.pre_pause = None;
        SessionSnapshot::clear(&mut self.storage);
        self.saved_round = false;

        let session = &self.session;
        let stars = match session.difficulty {
            Difficulty::Custom => 0,
            _ => session.stats.stars(&self.config.stars),
        };
        let new_best = self.scores.update(
            session.difficulty,
            session.score,
            session.time_left(),
            session.actual_duration_secs,
            stars,
            now_ms,
        );
        self.scores.save(&mut self.storage);

        let result = RoundResult {
            difficulty: session.difficulty,
            score: session.score,
            stars,
            elapsed_secs: (session.actual_duration_secs - session.time_left()).max(0.0),
            new_best,
        };
        log::info!(
            "Round over: score {}, {} stars, {}/{} sorted, {} missed",
            result.score,
            result.stars,
            session.stats.successes,
            session.stats.attempts,
            session.stats.missed
        );
        self.last_result = Some(result);

        self.game_over_modal.open(now_ms);
        self.audio.play_ambient();
        self.audio.play(SoundEffect::GameOver, PlayOptions::default());
    }

    /// Open the pause menu over a live round
    pub fn pause(&mut self, now_ms: f64) {
        if !self.session.screen.is_in_round() {
            log::debug!("Pause ignored on {:?}", self.session.screen);
            return;
        }
        self.enter_pause(now_ms);
        self.audio.pause_ambient();
        self.audio.play(SoundEffect::UiClick, PlayOptions::default());
        self.pause_modal.open(now_ms);
    }

    /// Pause with the menu already in place (host page hid the game)
    pub(super) fn pause_silently(&mut self, now_ms: f64) {
        if !self.session.screen.is_in_round() {
            return;
        }
        self.enter_pause(now_ms);
        self.pause_modal = Tween::shown(PAUSE_MODAL_MS, Easing::CubicOut);
    }

    fn enter_pause(&mut self, now_ms: f64) {
        self.save_snapshot(now_ms);
        self.session.pre_pause = Some(self.session.screen);
        self.session.screen = Screen::PauseMenu;
        self.stop_round_clocks();
        self.drag = None;
        self.bins.set_hover(self.pointer, false, now_ms);
        log::info!("Paused with {:.1}s left", self.session.time_left());
    }

    /// Leave the pause menu for the screen it interrupted
    pub fn resume(&mut self, now_ms: f64) {
        if self.session.screen != Screen::PauseMenu {
            log::debug!("Resume ignored on {:?}", self.session.screen);
            return;
        }
        self.pause_modal.hide();
        if self.session.time_left() <= 0.0 {
            self.end_round(now_ms);
            return;
        }

        self.session.screen = self.session.pre_pause.take().unwrap_or(Screen::Playing);
        self.resume_round_clocks();
        self.audio.resume_ambient();
        self.audio.play(SoundEffect::UiClick, PlayOptions::default());
    }

    /// Wrong bin: explain where the item belongs
    pub(super) fn show_wrong_sort(&mut self, archetype: usize, now_ms: f64) {
        let Some(item) = self.catalog.get(archetype) else {
            return;
        };
        let correct = item.kind;
        let message = format!("Wrong! {} belongs in {}.", item.name, correct.dialog_target());
        log::debug!("{message}");

        self.wrong_sort = Some(WrongSort {
            message,
            archetype,
            correct,
        });
        self.session.screen = Screen::Dialog;
        self.stop_round_clocks();
        self.dialog_slide.open(now_ms);
        self.audio.play(SoundEffect::WrongSort, PlayOptions::default());
    }

    pub(super) fn dismiss_dialog(&mut self, now_ms: f64) {
        self.dialog_slide.hide();
        self.wrong_sort = None;
        if self.session.time_left() <= 0.0 {
            self.end_round(now_ms);
            return;
        }
        self.session.screen = Screen::Playing;
        self.resume_round_clocks();
    }

    pub(super) fn show_consequence(&mut self) {
        if self.wrong_sort.is_none() {
            return;
        }
        self.session.screen = Screen::Consequence;
        self.audio.play(SoundEffect::ShowDialog, PlayOptions::default());
    }

    pub(super) fn hide_consequence(&mut self) {
        if self.session.screen == Screen::Consequence {
            self.session.screen = Screen::Dialog;
        }
    }

    /// Run the action queued on a modal's close tween
    pub(super) fn run_deferred(&mut self, action: MenuAction, now_ms: f64) {
        match action {
            MenuAction::Resume => self.resume(now_ms),
            MenuAction::NewGame | MenuAction::PlayAgain => self.show_difficulty_menu(now_ms),
            MenuAction::MainMenu => self.show_main_menu(now_ms),
            other => log::debug!("No deferred handler for {other:?}"),
        }
    }

    fn save_snapshot(&mut self, now_ms: f64) {
        let session = &self.session;
        let snap = SessionSnapshot {
            score: session.score,
            time_left: session.time_left(),
            screen: session.screen,
            timestamp: now_ms,
            difficulty: session.difficulty,
            duration_secs: Some(session.duration_secs),
            actual_duration_secs: Some(session.actual_duration_secs),
        };
        snap.save(&mut self.storage);
        self.saved_round = snap.time_left > 0.0;
    }

    fn stop_round_clocks(&mut self) {
        self.spawner = None;
        self.session.timer.freeze();
        self.timeouts.clear();
    }

    /// Restart the clocks for the current screen. Only `Playing` spawns.
    fn resume_round_clocks(&mut self) {
        self.session.timer.freeze();
        if self.session.screen == Screen::Playing {
            let interval = self.difficulty_settings().spawn_interval_ms;
            self.spawner = Some(SpawnTicker::new(f64::from(interval)));
        }
    }

    /// Stop round clocks and clear round-only overlays. Items are left in
    /// place as the backdrop until the next round clears them.
    fn leave_round(&mut self) {
        self.stop_round_clocks();
        self.drag = None;
        self.bins.reset();
        self.wrong_sort = None;
        self.dialog_slide.hide();
        self.pause_modal.hide();
        self.game_over_modal.hide();
        self.guide.hide();
    }
}

#[cfg(test)]
mod tests {
    use crate::audio::SilentAudio;
    use crate::game::{Game, GameConfig, MenuAction};
    use crate::persistence::{MemoryStorage, SessionSnapshot, Storage, keys};
    use crate::sim::{Difficulty, Screen};

    fn playing(difficulty: Difficulty) -> Game<MemoryStorage, SilentAudio> {
        let mut game = Game::new(GameConfig::default(), MemoryStorage::new(), SilentAudio::new(), 0.0);
        game.start_round(difficulty, 0.0);
        game
    }

    #[test]
    fn start_round_persists_difficulty_and_clears_save() {
        let mut storage = MemoryStorage::new();
        storage.set_item(keys::SAVED_STATE, "{}");
        let mut game = Game::new(GameConfig::default(), storage, SilentAudio::new(), 0.0);
        game.start_round(Difficulty::Easy, 10.0);
        assert_eq!(game.screen(), Screen::Playing);
        assert_eq!(game.storage().get_item(keys::DIFFICULTY).as_deref(), Some("easy"));
        assert!(game.storage().get_item(keys::SAVED_STATE).is_none());
        assert_eq!(game.items().max_items(), 10);
        assert_eq!(game.session().time_left(), 60.0);
    }

    #[test]
    fn pause_is_idempotent_and_resume_restores_screen() {
        let mut game = playing(Difficulty::Medium);
        game.update(100.0);
        game.pause(200.0);
        let saved = game.storage().get_item(keys::SAVED_STATE);
        assert!(saved.is_some());
        game.pause(300.0);
        assert_eq!(game.screen(), Screen::PauseMenu);
        assert_eq!(game.storage().get_item(keys::SAVED_STATE), saved);

        game.resume(400.0);
        assert_eq!(game.screen(), Screen::Playing);
        assert!(game.spawn_interval_ms().is_some());
    }

    #[test]
    fn paused_time_is_not_counted() {
        let mut game = playing(Difficulty::Hard);
        game.update(0.0);
        game.update(1_000.0);
        game.pause(1_000.0);
        game.update(60_000.0);
        game.resume(60_000.0);
        game.update(60_000.0);
        game.update(61_000.0);
        assert!((game.session().time_left() - 22.0).abs() < 1e-3);
    }

    #[test]
    fn continue_without_time_redirects_to_difficulty_menu() {
        let mut game = playing(Difficulty::Easy);
        SessionSnapshot {
            score: 3,
            time_left: 0.0,
            screen: Screen::Playing,
            timestamp: 0.0,
            difficulty: Difficulty::Easy,
            duration_secs: None,
            actual_duration_secs: None,
        }
        .save(&mut game.storage);
        game.continue_round(10.0);
        assert_eq!(game.screen(), Screen::DifficultyMenu);
        assert!(game.storage().get_item(keys::SAVED_STATE).is_none());
    }

    #[test]
    fn pause_menu_actions_wait_for_close_animation() {
        let mut game = playing(Difficulty::Easy);
        game.pause(0.0);
        game.update(500.0);
        game.activate(MenuAction::MainMenu, 600.0);
        assert_eq!(game.screen(), Screen::PauseMenu);
        game.update(900.0);
        assert_eq!(game.screen(), Screen::PauseMenu);
        game.update(1_100.0);
        assert_eq!(game.screen(), Screen::MainMenu);
        assert!(game.has_saved_round());
    }
}
