//! UI animation
//!
//! Easing curves, the reusable [`Tween`], menu decorations and smoothed colors.
//! Everything here is a pure function of the timestamps passed in.

pub mod color;
pub mod decor;
pub mod easing;
pub mod tween;

pub use color::{Rgb, SmoothedColor, color_for_progress};
pub use decor::{Carousel, SunArc, TitleBounce};
pub use easing::{Easing, ease_out_back, ease_out_cubic, ease_out_quad, lerp};
pub use tween::{Tween, TweenState};
