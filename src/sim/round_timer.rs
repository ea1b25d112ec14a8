//! Round countdown and the smoothed time bar

use crate::anim::{Rgb, SmoothedColor, color_for_progress};
use crate::consts::{BAR_SMOOTHING, COLOR_SMOOTHING};

/// Result of one timer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    Running,
    /// Time ran out on this tick. Reported once per round.
    Ended,
    /// Already ended
    Idle,
}

/// Wall-clock countdown. The first tick after `start`, `restore` or
/// `freeze` only records the clock, so paused time is never counted.
#[derive(Debug, Clone)]
pub struct RoundTimer {
    total_secs: f32,
    remaining_secs: f32,
    last_ms: Option<f64>,
    ended: bool,
    bar_width: f32,
    color: SmoothedColor,
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl RoundTimer {
    pub fn new(total_secs: f32) -> Self {
        let mut timer = Self {
            total_secs: 0.0,
            remaining_secs: 0.0,
            last_ms: None,
            ended: false,
            bar_width: 1.0,
            color: SmoothedColor::new(color_for_progress(1.0), COLOR_SMOOTHING),
        };
        timer.start(total_secs);
        timer
    }

    /// Full round from the top
    pub fn start(&mut self, total_secs: f32) {
        self.restore(total_secs, total_secs);
    }

    /// Pick up a saved round
    pub fn restore(&mut self, total_secs: f32, remaining_secs: f32) {
        self.total_secs = total_secs.max(0.0);
        self.remaining_secs = remaining_secs.clamp(0.0, self.total_secs);
        self.last_ms = None;
        self.ended = false;
        self.bar_width = self.progress();
        self.color.reset(color_for_progress(self.bar_width));
    }

    /// Forget the last timestamp
    pub fn freeze(&mut self) {
        self.last_ms = None;
    }

    pub fn tick(&mut self, now_ms: f64) -> TimerTick {
        if self.ended {
            return TimerTick::Idle;
        }
        if self.remaining_secs <= 0.0 {
            return self.finish();
        }

        let Some(last) = self.last_ms.replace(now_ms) else {
            return TimerTick::Running;
        };

        let dt = ((now_ms - last) / 1000.0).max(0.0) as f32;
        self.remaining_secs = (self.remaining_secs - dt).max(0.0);
        if self.remaining_secs <= 0.0 {
            return self.finish();
        }

        let target = self.progress();
        self.bar_width += (target - self.bar_width) * BAR_SMOOTHING;
        self.color.set_target(color_for_progress(target));
        self.color.step();
        TimerTick::Running
    }

    fn finish(&mut self) -> TimerTick {
        self.remaining_secs = 0.0;
        self.ended = true;
        self.last_ms = None;
        TimerTick::Ended
    }

    /// Fraction of the round left in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.total_secs > 0.0 {
            (self.remaining_secs / self.total_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn remaining_secs(&self) -> f32 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> f32 {
        self.total_secs
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Displayed bar fill, lagging behind `progress`
    pub fn bar_width(&self) -> f32 {
        self.bar_width
    }

    pub fn color(&self) -> Rgb {
        self.color.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anim::color::{BAR_GREEN, BAR_RED};

    #[test]
    fn first_tick_only_records_the_clock() {
        let mut timer = RoundTimer::new(10.0);
        assert_eq!(timer.tick(5_000.0), TimerTick::Running);
        assert_eq!(timer.remaining_secs(), 10.0);
        timer.tick(6_000.0);
        assert!((timer.remaining_secs() - 9.0).abs() < 1e-4);
    }

    #[test]
    fn ends_exactly_once() {
        let mut timer = RoundTimer::new(10.0);
        timer.restore(10.0, 0.5);
        assert_eq!(timer.tick(0.0), TimerTick::Running);
        assert_eq!(timer.tick(1_000.0), TimerTick::Ended);
        assert_eq!(timer.remaining_secs(), 0.0);
        assert_eq!(timer.tick(2_000.0), TimerTick::Idle);
        assert_eq!(timer.tick(3_000.0), TimerTick::Idle);
    }

    #[test]
    fn freeze_skips_paused_time() {
        let mut timer = RoundTimer::new(10.0);
        timer.tick(0.0);
        timer.tick(1_000.0);
        timer.freeze();
        timer.tick(60_000.0);
        timer.tick(61_000.0);
        assert!((timer.remaining_secs() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn restoring_empty_round_ends_on_first_tick() {
        let mut timer = RoundTimer::new(10.0);
        timer.restore(10.0, 0.0);
        assert_eq!(timer.tick(0.0), TimerTick::Ended);
    }

    #[test]
    fn bar_eases_toward_progress_and_turns_red() {
        let mut timer = RoundTimer::new(10.0);
        assert_eq!(timer.color(), BAR_GREEN);
        timer.tick(0.0);
        timer.tick(8_000.0);
        // target 0.2, width 1.0 -> 0.76
        assert!((timer.bar_width() - 0.76).abs() < 1e-4);
        for i in 1..300 {
            timer.tick(8_000.0 + i as f64);
        }
        assert!((timer.bar_width() - timer.progress()).abs() < 1e-3);
        assert_eq!(timer.color(), BAR_RED);
    }
}
