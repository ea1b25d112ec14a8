//! Colors and smoothed color transitions

use serde::{Deserialize, Serialize};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS `rgba()` string for the canvas
    pub fn css(self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, alpha.clamp(0.0, 1.0))
    }
}

/// Timer bar colors
pub const BAR_GREEN: Rgb = Rgb::new(0x2e, 0xcc, 0x71);
pub const BAR_ORANGE: Rgb = Rgb::new(0xf3, 0x9c, 0x12);
pub const BAR_RED: Rgb = Rgb::new(0xe7, 0x4c, 0x3c);

/// Target bar color for the fraction of round time left
pub fn color_for_progress(progress: f32) -> Rgb {
    if progress > 0.6 {
        BAR_GREEN
    } else if progress > 0.3 {
        BAR_ORANGE
    } else {
        BAR_RED
    }
}

/// Exponentially smoothed color: each frame moves a fixed fraction of the
/// remaining distance toward the target.
#[derive(Debug, Clone)]
pub struct SmoothedColor {
    current: [f32; 3],
    target: Rgb,
    rate: f32,
}

impl SmoothedColor {
    pub fn new(color: Rgb, rate: f32) -> Self {
        Self {
            current: [color.r as f32, color.g as f32, color.b as f32],
            target: color,
            rate: rate.clamp(0.0, 1.0),
        }
    }

    /// Jump straight to `color`
    pub fn reset(&mut self, color: Rgb) {
        self.current = [color.r as f32, color.g as f32, color.b as f32];
        self.target = color;
    }

    pub fn set_target(&mut self, color: Rgb) {
        self.target = color;
    }

    /// Advance one frame
    pub fn step(&mut self) {
        let target = [self.target.r as f32, self.target.g as f32, self.target.b as f32];
        for (c, t) in self.current.iter_mut().zip(target) {
            *c += (t - *c) * self.rate;
        }
    }

    pub fn current(&self) -> Rgb {
        let [r, g, b] = self.current.map(|c| c.round().clamp(0.0, 255.0) as u8);
        Rgb::new(r, g, b)
    }

    pub fn target(&self) -> Rgb {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_of_bar_colors() {
        assert_eq!(Rgb::from_hex("#2ecc71"), Some(BAR_GREEN));
        assert_eq!(BAR_RED.to_hex(), "#e74c3c");
        assert_eq!(Rgb::from_hex("nope"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn thresholds_pick_color() {
        assert_eq!(color_for_progress(1.0), BAR_GREEN);
        assert_eq!(color_for_progress(0.61), BAR_GREEN);
        assert_eq!(color_for_progress(0.6), BAR_ORANGE);
        assert_eq!(color_for_progress(0.31), BAR_ORANGE);
        assert_eq!(color_for_progress(0.3), BAR_RED);
        assert_eq!(color_for_progress(0.0), BAR_RED);
    }

    #[test]
    fn smoothing_moves_a_tenth_per_frame() {
        let mut color = SmoothedColor::new(Rgb::new(0, 0, 0), 0.1);
        color.set_target(Rgb::new(100, 200, 0));
        color.step();
        assert_eq!(color.current(), Rgb::new(10, 20, 0));
    }

    #[test]
    fn smoothing_converges() {
        let mut color = SmoothedColor::new(BAR_GREEN, 0.1);
        color.set_target(BAR_RED);
        for _ in 0..200 {
            color.step();
        }
        assert_eq!(color.current(), BAR_RED);
    }
}
