//! How-to-play overlay on the main menu

use crate::anim::{Easing, Tween, TweenState};

pub struct GuideSlide {
    pub image_id: &'static str,
    pub text: &'static str,
}

pub const SLIDES: [GuideSlide; 4] = [
    GuideSlide {
        image_id: "guide-0",
        text: "Hmm... a whole mountain of rubbish has piled up here.",
    },
    GuideSlide {
        image_id: "guide-1",
        text: "Time to sort it all out!",
    },
    GuideSlide {
        image_id: "guide-2",
        text: "Every piece of waste has its place. There are six kinds of bins - find the right one for the soda can.",
    },
    GuideSlide {
        image_id: "guide-3",
        text: "Great! Light packaging was the right choice. Sorting correctly helps nature.",
    },
];

const LAST_STEP: usize = SLIDES.len() - 1;

/// Four-step overlay faded in and out over 400 ms.
///
/// Clicks only count while fully shown. The last slide ignores the click
/// that revealed it; the next one closes the overlay.
#[derive(Debug, Clone)]
pub struct GuideOverlay {
    fade: Tween,
    step: usize,
    reached_last: bool,
    show_checked: bool,
}

impl Default for GuideOverlay {
    fn default() -> Self {
        Self {
            fade: Tween::new(400.0, Easing::CubicOut),
            step: 0,
            reached_last: false,
            show_checked: false,
        }
    }
}

impl GuideOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, now_ms: f64) {
        self.step = 0;
        self.reached_last = false;
        self.show_checked = false;
        self.fade.open(now_ms);
    }

    /// Drop the overlay immediately
    pub fn hide(&mut self) {
        self.fade.hide();
        self.step = 0;
        self.reached_last = false;
        self.show_checked = false;
    }

    pub fn update(&mut self, now_ms: f64) {
        self.fade.update(now_ms);
        if self.step == LAST_STEP && !self.show_checked && self.reached_last {
            self.show_checked = true;
        }
    }

    /// Handle a click anywhere while the overlay is open
    pub fn click(&mut self, now_ms: f64) {
        if self.fade.state() != TweenState::Shown {
            return;
        }
        if self.step < LAST_STEP {
            self.step += 1;
            if self.step == LAST_STEP {
                self.reached_last = true;
                self.show_checked = false;
            }
        } else if self.show_checked {
            self.fade.close(now_ms, ());
        }
    }

    /// True while any part of the overlay is on screen
    pub fn is_open(&self) -> bool {
        self.fade.is_visible()
    }

    pub fn alpha(&self) -> f32 {
        self.fade.progress()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn slide(&self) -> &'static GuideSlide {
        &SLIDES[self.step.min(LAST_STEP)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown_guide() -> GuideOverlay {
        let mut guide = GuideOverlay::new();
        guide.open(0.0);
        guide.update(400.0);
        guide
    }

    #[test]
    fn clicks_during_fade_in_are_ignored() {
        let mut guide = GuideOverlay::new();
        guide.open(0.0);
        guide.update(100.0);
        guide.click(100.0);
        assert_eq!(guide.step(), 0);
    }

    #[test]
    fn walks_slides_then_closes() {
        let mut guide = shown_guide();
        for expected in 1..=3 {
            guide.click(500.0);
            assert_eq!(guide.step(), expected);
        }
        // The click that reached the last slide can't also close it
        guide.click(510.0);
        assert!(guide.is_open());
        guide.update(520.0);
        guide.click(530.0);
        guide.update(700.0);
        assert!(guide.is_open());
        guide.update(930.0);
        assert!(!guide.is_open());
    }

    #[test]
    fn hide_resets_progress() {
        let mut guide = shown_guide();
        guide.click(500.0);
        guide.hide();
        assert!(!guide.is_open());
        assert_eq!(guide.step(), 0);
    }

    #[test]
    fn reopened_guide_rearms_last_slide() {
        let mut guide = shown_guide();
        for _ in 0..3 {
            guide.click(500.0);
        }
        guide.update(510.0);
        guide.hide();

        guide.open(1_000.0);
        guide.update(1_400.0);
        for _ in 0..3 {
            guide.click(1_500.0);
        }
        assert_eq!(guide.step(), 3);
        guide.click(1_510.0);
        guide.update(2_000.0);
        assert!(guide.is_open());
    }
}
