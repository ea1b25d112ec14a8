//! Time-based tweens
//!
//! One tween drives every timed UI transition: panel slides, fades and the
//! pause/game-over modals. A tween moves through `Hidden -> In -> Shown` when
//! opened and `Shown -> Out -> Hidden` when closed. Closing can carry a
//! deferred action which `update` hands back exactly once, on the frame the
//! tween reaches `Hidden`.

use super::easing::Easing;

/// Discrete phase of a tween
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenState {
    #[default]
    Hidden,
    In,
    Shown,
    Out,
}

/// An eased 0..1 transition with an optional deferred action
#[derive(Debug, Clone)]
pub struct Tween<A = ()> {
    start_ms: f64,
    duration_ms: f64,
    easing: Easing,
    state: TweenState,
    /// Raw (un-eased) time fraction of the current phase
    t: f32,
    progress: f32,
    pending: Option<A>,
}

impl<A> Tween<A> {
    /// A hidden tween
    pub fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            start_ms: 0.0,
            duration_ms: duration_ms.max(1.0),
            easing,
            state: TweenState::Hidden,
            t: 0.0,
            progress: 0.0,
            pending: None,
        }
    }

    /// A tween that starts fully shown
    pub fn shown(duration_ms: f64, easing: Easing) -> Self {
        let mut tween = Self::new(duration_ms, easing);
        tween.state = TweenState::Shown;
        tween.t = 1.0;
        tween.progress = 1.0;
        tween
    }

    /// Start (or restart) the opening transition. Drops any queued action.
    pub fn open(&mut self, now_ms: f64) {
        self.start_ms = now_ms;
        self.state = TweenState::In;
        self.t = 0.0;
        self.progress = 0.0;
        self.pending = None;
    }

    /// Start the closing transition and queue `action` for its end.
    ///
    /// If the tween is already hidden the action is handed straight back for
    /// the caller to run. While already closing, the request is dropped so
    /// only the first queued action ever runs.
    pub fn close(&mut self, now_ms: f64, action: A) -> Option<A> {
        match self.state {
            TweenState::Hidden => Some(action),
            TweenState::Out => {
                log::debug!("Tween already closing, ignoring close request");
                None
            }
            TweenState::In | TweenState::Shown => {
                self.start_ms = now_ms;
                self.state = TweenState::Out;
                self.t = 0.0;
                self.pending = Some(action);
                None
            }
        }
    }

    /// Snap to hidden without running the queued action
    pub fn hide(&mut self) {
        self.state = TweenState::Hidden;
        self.t = 0.0;
        self.progress = 0.0;
        self.pending = None;
    }

    /// Advance to `now_ms`. Returns the deferred action when closing finishes.
    pub fn update(&mut self, now_ms: f64) -> Option<A> {
        if matches!(self.state, TweenState::Hidden | TweenState::Shown) {
            return None;
        }

        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32;
        self.t = t;
        let eased = self.easing.apply(t);

        match self.state {
            TweenState::In => {
                self.progress = eased;
                if t >= 1.0 {
                    self.state = TweenState::Shown;
                }
                None
            }
            TweenState::Out => {
                self.progress = 1.0 - eased;
                if t >= 1.0 {
                    self.state = TweenState::Hidden;
                    self.progress = 0.0;
                    self.pending.take()
                } else {
                    None
                }
            }
            TweenState::Hidden | TweenState::Shown => None,
        }
    }

    /// Eased visibility in [0, 1] (back-ease may exceed 1 while opening)
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Raw time fraction of the running phase
    #[inline]
    pub fn raw(&self) -> f32 {
        self.t
    }

    #[inline]
    pub fn state(&self) -> TweenState {
        self.state
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.state != TweenState::Hidden
    }

    #[inline]
    pub fn is_closing(&self) -> bool {
        self.state == TweenState::Out
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
