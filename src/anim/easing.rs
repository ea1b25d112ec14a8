//! Easing curves
//!
//! Pure functions mapping a normalized time `t` in [0, 1] to eased progress.

/// Back-ease overshoot constant
pub const BACK_C1: f32 = 1.70158;
const BACK_C3: f32 = BACK_C1 + 1.0;

/// Easing curve selector for tweens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity
    Linear,
    /// Slow end, gentle
    QuadOut,
    /// Slow end, strong (slides and fades)
    #[default]
    CubicOut,
    /// Overshoots past 1 then settles (title bounce)
    BackOut,
}

impl Easing {
    /// Apply the curve to `t` (clamped to [0, 1])
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t.clamp(0.0, 1.0),
            Easing::QuadOut => ease_out_quad(t),
            Easing::CubicOut => ease_out_cubic(t),
            Easing::BackOut => ease_out_back(t),
        }
    }
}

/// `1 - (1 - t)^3`
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// `1 - (1 - t)^2`
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Cubic back-ease: exceeds 1 mid-way, lands exactly on 1
#[inline]
pub fn ease_out_back(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 + BACK_C3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
}

/// Linearly interpolate between two values
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for easing in [Easing::Linear, Easing::QuadOut, Easing::CubicOut, Easing::BackOut] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn cubic_out_is_monotonic_without_overshoot() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = ease_out_cubic(i as f32 / 100.0);
            assert!(v >= prev);
            assert!(v <= 1.0);
            prev = v;
        }
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (0..=100)
            .map(|i| ease_out_back(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.05, "peak was {peak}");
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(ease_out_cubic(-2.0), 0.0);
        assert_eq!(ease_out_cubic(3.0), 1.0);
    }

    #[test]
    fn lerp_midpoint() {
        assert!((lerp(100.0, 200.0, 0.5) - 150.0).abs() < 1e-4);
    }
}
