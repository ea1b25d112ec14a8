//! Gameplay simulation
//!
//! Everything here is driven by explicit timestamps and a seeded RNG:
//! - No wall-clock reads
//! - No rendering or platform dependencies
//! - Items and bins expose queries, the game layer decides what to do

pub mod bin;
pub mod catalog;
pub mod difficulty;
pub mod item;
pub mod particles;
pub mod round_timer;
pub mod scoring;
pub mod state;

pub use bin::{Bin, BinRack};
pub use catalog::{Archetype, BIN_LAYOUT, BinKind, BinSpec, Catalog, Consequence, Impact, STANDARD_ITEMS};
pub use difficulty::{CustomDifficulty, Difficulty, DifficultySettings};
pub use item::{FallingItem, ItemField, ItemId, ItemSound, Landing};
pub use particles::{Particle, ParticlePool};
pub use round_timer::{RoundTimer, TimerTick};
pub use scoring::{RoundStats, StarThresholds};
pub use state::{GameSession, Screen};
