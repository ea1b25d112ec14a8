//! Wall-clock schedulers polled from the frame loop
//!
//! Neither type owns a timer handle: the game passes `now_ms` in and gets
//! back whatever became due. Dropping a scheduler cancels everything it held.

use crate::consts::MAX_SPAWN_CATCH_UP;

/// Fixed-interval spawn clock.
///
/// The first poll only anchors the clock; the first firing happens one full
/// interval later. A stalled frame fires at most [`MAX_SPAWN_CATCH_UP`]
/// times and then re-anchors, so a long hitch never floods the field.
#[derive(Debug, Clone)]
pub struct SpawnTicker {
    interval_ms: f64,
    next_ms: Option<f64>,
}

impl SpawnTicker {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            next_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Number of spawn attempts due at `now_ms`
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(mut next) = self.next_ms else {
            self.next_ms = Some(now_ms + self.interval_ms);
            return 0;
        };

        let mut fired = 0;
        while now_ms >= next && fired < MAX_SPAWN_CATCH_UP {
            next += self.interval_ms;
            fired += 1;
        }
        if now_ms >= next {
            log::debug!("Spawn clock fell behind, re-anchoring");
            next = now_ms + self.interval_ms;
        }
        self.next_ms = Some(next);
        fired
    }
}

/// Cancelable one-shot timeouts carrying plain data
#[derive(Debug, Clone)]
pub struct TimeoutRegistry<T> {
    pending: Vec<(f64, T)>,
}

impl<T> Default for TimeoutRegistry<T> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
        }
    }
}

impl<T> TimeoutRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, value: T) {
        self.pending.push((due_ms, value));
    }

    /// Remove and return everything due by `now_ms`, earliest first
    pub fn take_due(&mut self, now_ms: f64) -> Vec<T> {
        let mut due: Vec<(f64, T)> = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].0 <= now_ms {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, v)| v).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_anchors() {
        let mut ticker = SpawnTicker::new(1000.0);
        assert_eq!(ticker.poll(5_000.0), 0);
        assert_eq!(ticker.poll(5_999.0), 0);
        assert_eq!(ticker.poll(6_000.0), 1);
        assert_eq!(ticker.poll(6_500.0), 0);
        assert_eq!(ticker.poll(8_000.0), 2);
    }

    #[test]
    fn long_stall_is_capped() {
        let mut ticker = SpawnTicker::new(100.0);
        ticker.poll(0.0);
        assert_eq!(ticker.poll(10_000.0), MAX_SPAWN_CATCH_UP);
        // Re-anchored: nothing due until a full interval later
        assert_eq!(ticker.poll(10_050.0), 0);
        assert_eq!(ticker.poll(10_100.0), 1);
    }

    #[test]
    fn timeouts_fire_once_in_order() {
        let mut timeouts = TimeoutRegistry::new();
        timeouts.schedule(400.0, "late");
        timeouts.schedule(120.0, "early");
        timeouts.schedule(900.0, "later");
        assert!(timeouts.take_due(100.0).is_empty());
        assert_eq!(timeouts.take_due(500.0), vec!["early", "late"]);
        assert!(timeouts.take_due(500.0).is_empty());
        assert_eq!(timeouts.len(), 1);
        timeouts.clear();
        assert!(timeouts.take_due(10_000.0).is_empty());
    }
}
