//! Pointer, keyboard and host-page events

use glam::Vec2;
use rand::Rng;

use super::menu::{self, MenuAction};
use super::{Drag, Game};
use crate::audio::{AudioService, MusicTrack, PlayOptions, SoundEffect};
use crate::persistence::Storage;
use crate::sim::{Difficulty, ItemId, Screen};

impl<S: Storage, A: AudioService> Game<S, A> {
    /// Run a menu action. Actions that don't belong to the current screen
    /// are ignored.
    pub fn activate(&mut self, action: MenuAction, now_ms: f64) {
        if !self.accepts(action) {
            log::debug!("Ignoring {action:?} on {:?}", self.session.screen);
            return;
        }
        if action.clicks() {
            self.audio.play(SoundEffect::UiClick, PlayOptions::default());
        }

        match action {
            MenuAction::Start | MenuAction::BackToDifficulty => self.show_difficulty_menu(now_ms),
            MenuAction::Continue => self.continue_round(now_ms),
            MenuAction::ResetScores => self.reset_scores(),
            MenuAction::OpenGuide => self.guide.open(now_ms),
            MenuAction::CarouselPrev => {
                self.carousel.prev(now_ms);
            }
            MenuAction::CarouselNext => {
                self.carousel.next(now_ms);
            }
            MenuAction::PickDifficulty(difficulty) => self.start_round(difficulty, now_ms),
            MenuAction::OpenCustom => self.show_custom_settings(now_ms),
            MenuAction::BackToMain => self.show_main_menu(now_ms),
            MenuAction::Resume | MenuAction::NewGame | MenuAction::MainMenu | MenuAction::PlayAgain => {
                self.close_modal_then(action, now_ms)
            }
            MenuAction::Pause => self.pause(now_ms),
            MenuAction::MoreInfo => self.show_consequence(),
        }
    }

    fn accepts(&self, action: MenuAction) -> bool {
        use MenuAction::*;
        match self.session.screen {
            Screen::MainMenu => matches!(
                action,
                Start | Continue | ResetScores | OpenGuide | CarouselPrev | CarouselNext
            ),
            Screen::DifficultyMenu => match action {
                PickDifficulty(d) => d != Difficulty::Custom,
                OpenCustom | BackToMain => true,
                _ => false,
            },
            Screen::CustomSettings => {
                matches!(action, PickDifficulty(Difficulty::Custom) | BackToDifficulty)
            }
            Screen::PauseMenu => matches!(action, Resume | NewGame | MainMenu),
            Screen::GameOver => action == PlayAgain,
            Screen::Playing | Screen::Consequence => action == Pause,
            Screen::Dialog => matches!(action, Pause | MoreInfo),
        }
    }

    /// Slide the active modal out and run `action` once it is gone
    fn close_modal_then(&mut self, action: MenuAction, now_ms: f64) {
        let modal = if self.session.screen == Screen::GameOver {
            &mut self.game_over_modal
        } else {
            &mut self.pause_modal
        };
        if let Some(action) = modal.close(now_ms, action) {
            self.run_deferred(action, now_ms);
        }
    }

    pub fn pointer_down(&mut self, pos: Vec2, now_ms: f64) {
        self.pointer = pos;
        self.start_audio();

        let screen = self.session.screen;
        if screen == Screen::MainMenu && self.guide.is_open() {
            self.guide.click(now_ms);
            return;
        }
        if screen == Screen::CustomSettings && self.grab_slider(pos) {
            return;
        }
        if let Some(action) = menu::hit(&self.menu_items(), pos) {
            self.activate(action, now_ms);
            return;
        }

        match screen {
            Screen::Dialog => self.dismiss_dialog(now_ms),
            Screen::Consequence => self.hide_consequence(),
            Screen::Playing => self.pick_up(pos),
            _ => {}
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2, now_ms: f64) {
        self.pointer = pos;
        match self.session.screen {
            Screen::Playing => {
                self.bins.set_hover(pos, self.drag.is_some(), now_ms);
                if let Some(drag) = self.drag {
                    self.items.drag_to(drag.id, pos - drag.offset);
                }
            }
            Screen::CustomSettings => {
                for slider in self.sliders.iter().filter(|s| s.dragging) {
                    slider.apply(&mut self.custom, pos.x);
                }
            }
            _ => {}
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2, now_ms: f64) {
        self.pointer = pos;
        match self.session.screen {
            Screen::Playing => {
                if let Some(drag) = self.drag.take() {
                    self.drop_item(drag.id, now_ms);
                    self.bins.set_hover(pos, false, now_ms);
                }
            }
            Screen::CustomSettings => {
                let mut released = false;
                for slider in &mut self.sliders {
                    released |= slider.dragging;
                    slider.dragging = false;
                }
                if released {
                    self.custom.save(&mut self.storage);
                }
            }
            _ => {}
        }
    }

    /// Escape pauses a live round
    pub fn key_escape(&mut self, now_ms: f64) {
        if self.session.screen.is_in_round() {
            self.pause(now_ms);
        }
    }

    /// The host page hid the game. Save and pause without animation.
    pub fn modal_closed(&mut self, now_ms: f64) {
        self.pause_silently(now_ms);
        self.audio.suspend();
        self.guide.hide();
    }

    /// The host page showed the game again
    pub fn modal_opened(&mut self) {
        self.audio.resume();
        self.guide.hide();
    }

    /// Browsers only allow audio after a user gesture
    fn start_audio(&mut self) {
        if self.audio_started {
            return;
        }
        self.audio_started = true;
        self.audio.play_music(MusicTrack::Background);
        self.audio.play_ambient();
    }

    fn grab_slider(&mut self, pos: Vec2) -> bool {
        let Some(slider) = self.sliders.iter_mut().find(|s| s.rect().contains(pos)) else {
            return false;
        };
        slider.dragging = true;
        slider.apply(&mut self.custom, pos.x);
        true
    }

    fn pick_up(&mut self, pos: Vec2) {
        let Some(id) = self.items.item_at(pos) else {
            return;
        };
        let Some(item) = self.items.get(id) else {
            return;
        };
        let offset = pos - item.pos;
        self.items.pick_up(id);
        self.drag = Some(Drag { id, offset });

        let effect = if self.rng.random::<bool>() {
            SoundEffect::ItemPickup1
        } else {
            SoundEffect::ItemPickup2
        };
        self.audio.play(effect, PlayOptions::default());
    }

    /// Sort the released item if it landed on a bin
    fn drop_item(&mut self, id: ItemId, now_ms: f64) {
        let Some(item) = self.items.get(id) else {
            return;
        };
        let (pos, kind, archetype) = (item.pos, item.kind, item.archetype);
        let Some(bin) = self.bins.bin_at(pos) else {
            return;
        };
        let correct = bin.kind() == kind;
        self.items.remove(id);

        if correct {
            self.session.score += 1;
            self.session.stats.successes += 1;
            self.audio.play(SoundEffect::CorrectSort, PlayOptions::default());
        } else {
            self.show_wrong_sort(archetype, now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::audio::SilentAudio;
    use crate::game::{Game, GameConfig, MenuAction};
    use crate::persistence::MemoryStorage;
    use crate::sim::{Difficulty, ItemId, Screen};

    fn playing_with_item() -> (Game<MemoryStorage, SilentAudio>, ItemId) {
        let mut game = Game::new(GameConfig::default(), MemoryStorage::new(), SilentAudio::new(), 0.0);
        game.start_round(Difficulty::Easy, 0.0);
        let id = game.items.spawn(&game.catalog, &mut game.rng).unwrap();
        (game, id)
    }

    fn drag_to_bin(game: &mut Game<MemoryStorage, SilentAudio>, id: ItemId, correct: bool) {
        let item = game.items().get(id).unwrap();
        let (start, kind) = (item.pos, item.kind);
        let bin = game
            .bins()
            .iter()
            .find(|b| (b.kind() == kind) == correct)
            .unwrap();
        let target = Vec2::new(bin.x() + bin.width() / 2.0, bin.y + bin.height / 2.0);

        game.pointer_down(start, 10.0);
        assert_eq!(game.dragged_item(), Some(id));
        game.pointer_move(target, 20.0);
        game.pointer_up(target, 30.0);
    }

    #[test]
    fn correct_sort_scores() {
        let (mut game, id) = playing_with_item();
        drag_to_bin(&mut game, id, true);
        assert_eq!(game.session().score, 1);
        assert_eq!(game.session().stats.successes, 1);
        assert!(game.items().is_empty());
        assert_eq!(game.screen(), Screen::Playing);
    }

    #[test]
    fn wrong_sort_opens_dialog_then_consequence() {
        let (mut game, id) = playing_with_item();
        drag_to_bin(&mut game, id, false);
        assert_eq!(game.screen(), Screen::Dialog);
        assert_eq!(game.session().score, 0);
        let wrong = game.wrong_sort().unwrap();
        assert!(wrong.message.starts_with("Wrong!"));
        assert!(game.spawn_interval_ms().is_none());

        game.activate(MenuAction::MoreInfo, 40.0);
        assert_eq!(game.screen(), Screen::Consequence);
        game.pointer_down(Vec2::new(400.0, 300.0), 50.0);
        assert_eq!(game.screen(), Screen::Dialog);
        game.pointer_down(Vec2::new(400.0, 300.0), 60.0);
        assert_eq!(game.screen(), Screen::Playing);
        assert!(game.spawn_interval_ms().is_some());
    }

    #[test]
    fn release_outside_bins_keeps_item() {
        let (mut game, id) = playing_with_item();
        let start = game.items().get(id).unwrap().pos;
        game.pointer_down(start, 10.0);
        game.pointer_up(start, 20.0);
        assert_eq!(game.items().len(), 1);
        assert!(!game.items().get(id).unwrap().is_falling);
        assert_eq!(game.dragged_item(), None);
    }

    #[test]
    fn actions_from_other_screens_are_ignored() {
        let mut game = Game::new(GameConfig::default(), MemoryStorage::new(), SilentAudio::new(), 0.0);
        game.activate(MenuAction::Resume, 0.0);
        game.activate(MenuAction::PickDifficulty(Difficulty::Hard), 0.0);
        assert_eq!(game.screen(), Screen::MainMenu);
    }

    #[test]
    fn slider_drag_saves_on_release() {
        let mut game = Game::new(GameConfig::default(), MemoryStorage::new(), SilentAudio::new(), 0.0);
        game.activate(MenuAction::Start, 0.0);
        game.activate(MenuAction::OpenCustom, 0.0);
        let track = game.sliders()[0].rect();
        game.pointer_down(Vec2::new(track.x, track.center().y), 10.0);
        game.pointer_move(Vec2::new(track.right() + 50.0, track.center().y), 20.0);
        game.pointer_up(Vec2::new(track.right() + 50.0, track.center().y), 30.0);
        assert_eq!(game.custom().duration_secs(), 150);
        let stored = crate::sim::CustomDifficulty::load(game.storage());
        assert_eq!(stored.duration_secs(), 150);
    }

    #[test]
    fn hidden_page_pauses_without_animation() {
        let (mut game, _) = playing_with_item();
        game.modal_closed(100.0);
        assert_eq!(game.screen(), Screen::PauseMenu);
        assert_eq!(game.pause_progress(), 1.0);
        game.activate(MenuAction::Resume, 200.0);
        game.update(800.0);
        assert_eq!(game.screen(), Screen::Playing);
    }
}
