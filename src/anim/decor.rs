//! Main-menu decorations: title bounce, rising sun, best-score carousel

use super::easing::{Easing, ease_out_back, ease_out_quad, lerp};
use super::tween::Tween;

/// Title letters drop in with an overshooting bounce
#[derive(Debug, Clone)]
pub struct TitleBounce {
    tween: Tween,
}

impl TitleBounce {
    pub const DURATION_MS: f64 = 900.0;

    pub fn new() -> Self {
        Self {
            tween: Tween::shown(Self::DURATION_MS, Easing::CubicOut),
        }
    }

    pub fn restart(&mut self, now_ms: f64) {
        self.tween.open(now_ms);
    }

    pub fn update(&mut self, now_ms: f64) {
        self.tween.update(now_ms);
    }

    /// Cubic-eased fraction, used for fading
    pub fn t_norm(&self) -> f32 {
        self.tween.progress()
    }

    /// Back-eased scale, overshoots 1.0 before settling
    pub fn scale(&self) -> f32 {
        ease_out_back(self.tween.raw())
    }
}

impl Default for TitleBounce {
    fn default() -> Self {
        Self::new()
    }
}

/// Decorative sun that rises behind the menu after a short delay and
/// rotates continuously.
#[derive(Debug, Clone)]
pub struct SunArc {
    start_ms: f64,
    from_y: f32,
    to_y: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
    pub y: f32,
    /// Rotation in radians, advances every frame regardless of the delay
    pub angle: f32,
}

impl SunArc {
    pub const DELAY_MS: f64 = 1000.0;
    pub const APPEAR_MS: f64 = 4000.0;
    /// Radians per frame
    pub const SPIN: f32 = 0.0008;

    pub fn new(canvas_height: f32) -> Self {
        let from_y = canvas_height + 400.0;
        Self {
            start_ms: 0.0,
            from_y,
            to_y: canvas_height / 2.0 + 200.0,
            alpha: 0.0,
            y: from_y,
            angle: 0.0,
        }
    }

    pub fn restart(&mut self, now_ms: f64) {
        self.start_ms = now_ms;
        self.alpha = 0.0;
        self.y = self.from_y;
        self.angle = 0.0;
    }

    pub fn update(&mut self, now_ms: f64) {
        self.angle += Self::SPIN;

        let elapsed = now_ms - self.start_ms;
        if elapsed < Self::DELAY_MS {
            return;
        }

        let raw = ((elapsed - Self::DELAY_MS) / Self::APPEAR_MS).min(1.0) as f32;
        let t = ease_out_quad(raw);
        self.alpha = t;
        self.y = lerp(self.from_y, self.to_y, t);
    }

    pub fn resting_y(&self) -> f32 {
        self.to_y
    }
}

/// Best-score card carousel cycling through a fixed number of pages
#[derive(Debug, Clone)]
pub struct Carousel {
    len: usize,
    index: usize,
    to_index: usize,
    direction: i8,
    start_ms: f64,
    progress: f32,
}

impl Carousel {
    pub const SLIDE_MS: f64 = 300.0;

    pub fn new(len: usize) -> Self {
        Self {
            len: len.max(1),
            index: 0,
            to_index: 0,
            direction: 0,
            start_ms: 0.0,
            progress: 0.0,
        }
    }

    /// Start sliding to the next page. Ignored mid-slide.
    pub fn next(&mut self, now_ms: f64) -> bool {
        self.begin((self.index + 1) % self.len, 1, now_ms)
    }

    /// Start sliding to the previous page. Ignored mid-slide.
    pub fn prev(&mut self, now_ms: f64) -> bool {
        self.begin((self.index + self.len - 1) % self.len, -1, now_ms)
    }

    fn begin(&mut self, to: usize, direction: i8, now_ms: f64) -> bool {
        if self.direction != 0 {
            return false;
        }
        self.to_index = to;
        self.direction = direction;
        self.start_ms = now_ms;
        self.progress = 0.0;
        true
    }

    pub fn update(&mut self, now_ms: f64) {
        if self.direction == 0 {
            return;
        }
        let p = ((now_ms - self.start_ms) / Self::SLIDE_MS) as f32;
        if p >= 1.0 {
            self.index = self.to_index;
            self.direction = 0;
            self.progress = 1.0;
        } else {
            self.progress = p.max(0.0);
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn to_index(&self) -> usize {
        self.to_index
    }

    /// -1, 0 or 1
    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_waits_for_delay_but_keeps_spinning() {
        let mut sun = SunArc::new(720.0);
        sun.restart(0.0);
        sun.update(500.0);
        assert_eq!(sun.alpha, 0.0);
        assert!(sun.angle > 0.0);
        assert_eq!(sun.y, 720.0 + 400.0);
    }

    #[test]
    fn sun_reaches_resting_position() {
        let mut sun = SunArc::new(720.0);
        sun.restart(0.0);
        sun.update(SunArc::DELAY_MS + SunArc::APPEAR_MS + 10.0);
        assert_eq!(sun.alpha, 1.0);
        assert!((sun.y - sun.resting_y()).abs() < 1e-3);
    }

    #[test]
    fn title_overshoots_then_settles() {
        let mut title = TitleBounce::new();
        title.restart(0.0);
        title.update(600.0);
        assert!(title.scale() > 1.0);
        title.update(900.0);
        assert!((title.scale() - 1.0).abs() < 1e-5);
        assert!((title.t_norm() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn carousel_wraps_and_ignores_clicks_mid_slide() {
        let mut carousel = Carousel::new(3);
        assert!(carousel.prev(0.0));
        assert!(!carousel.next(100.0));
        carousel.update(150.0);
        assert_eq!(carousel.index(), 0);
        carousel.update(300.0);
        assert_eq!(carousel.index(), 2);
        assert_eq!(carousel.direction(), 0);
        assert!(carousel.next(400.0));
        carousel.update(800.0);
        assert_eq!(carousel.index(), 0);
    }
}
