//! Eco Sort - a drag-and-drop waste sorting game
//!
//! Core modules:
//! - `sim`: Falling items, bins, particles, the round clock and scoring
//! - `anim`: Easing curves and UI tweens
//! - `game`: Screen state machine, input dispatch and round scheduling
//! - `persistence`: Key-value storage and the resumable session snapshot
//! - `audio`: Logical sound effects and playback backends
//! - `renderer`: 2D drawing abstraction and the per-frame draw pass

pub mod anim;
pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, GameConfig};
pub use highscores::{ScoreRecord, ScoreTable};
pub use settings::Settings;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Default canvas size in pixels
    pub const CANVAS_WIDTH: f32 = 960.0;
    pub const CANVAS_HEIGHT: f32 = 720.0;

    /// Spawn box (centered horizontally) where items come to rest
    pub const SPAWN_BAND_WIDTH: f32 = 650.0;
    pub const SPAWN_BAND_Y: f32 = 390.0;
    pub const SPAWN_BAND_HEIGHT: f32 = 120.0;
    /// Items enter from above the visible area
    pub const SPAWN_Y: f32 = -50.0;

    /// Item physics, in pixels per frame
    pub const ITEM_GRAVITY: f32 = 0.1;
    pub const BOUNCE_THRESHOLD: f32 = 1.0;
    pub const BOUNCE_DAMPING: f32 = 0.3;
    pub const WALL_MARGIN: f32 = 20.0;
    pub const WALL_DAMPING: f32 = 0.5;

    /// Item sprite sizing
    pub const ITEM_BASE_SIZE: f32 = 50.0;
    pub const ITEM_FALLBACK_SIZE: f32 = 40.0;

    /// Landing dust
    pub const LANDING_PARTICLES: usize = 15;
    pub const MAX_PARTICLES: usize = 15;

    /// Bin hover timings (ms) and per-frame open rate
    pub const HOVER_DEBOUNCE_MS: f64 = 50.0;
    pub const HOVER_GRACE_MS: f64 = 1000.0;
    pub const BIN_OPEN_RATE: f32 = 0.1;
    pub const BIN_CLOSED_HEIGHT: f32 = 120.0;
    pub const BIN_OPEN_EXTRA: f32 = 20.0;

    /// Progress bar smoothing per frame
    pub const BAR_SMOOTHING: f32 = 0.3;
    pub const COLOR_SMOOTHING: f32 = 0.1;

    /// Saved sessions older than this are discarded (24 h)
    pub const SNAPSHOT_MAX_AGE_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

    /// Delayed sound cues (ms)
    pub const SECOND_RUSTLE_DELAY_MS: f64 = 400.0;
    pub const START_RUSTLE_DELAY_MS: f64 = 120.0;

    /// Spawn attempts fired in one frame after a long stall
    pub const MAX_SPAWN_CATCH_UP: u32 = 3;

    /// Star rating: weight of missed spawns against efficiency
    pub const MISS_PENALTY_WEIGHT: f32 = 0.2;
}

/// Axis-aligned rectangle in canvas pixels (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Build a rectangle around a center point
    pub fn from_center(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Inclusive point test (edges count as inside)
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// Canvas dimensions the simulation lays itself out against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: consts::CANVAS_WIDTH,
            height: consts::CANVAS_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Spawn box centered horizontally on the canvas
    pub fn spawn_band(&self) -> Rect {
        Rect::new(
            (self.width - consts::SPAWN_BAND_WIDTH) / 2.0,
            consts::SPAWN_BAND_Y,
            consts::SPAWN_BAND_WIDTH,
            consts::SPAWN_BAND_HEIGHT,
        )
    }
}
