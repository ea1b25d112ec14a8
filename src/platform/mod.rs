//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Mapping client pointer coordinates onto the logical canvas

use glam::Vec2;

use crate::Viewport;

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Position of the canvas element on the page, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Convert a client-space pointer position into logical canvas coordinates.
/// The canvas may be scaled by CSS, so the offset is stretched to the
/// viewport size.
pub fn to_canvas(client: Vec2, rect: ClientRect, viewport: Viewport) -> Vec2 {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return client - Vec2::new(rect.left, rect.top);
    }
    Vec2::new(
        (client.x - rect.left) * viewport.width / rect.width,
        (client.y - rect.top) * viewport.height / rect.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_css_pixels_to_viewport() {
        let rect = ClientRect {
            left: 100.0,
            top: 50.0,
            width: 480.0,
            height: 360.0,
        };
        let p = to_canvas(Vec2::new(340.0, 230.0), rect, Viewport::default());
        assert_eq!(p, Vec2::new(480.0, 360.0));
    }

    #[test]
    fn degenerate_rect_only_offsets() {
        let rect = ClientRect {
            left: 10.0,
            top: 20.0,
            width: 0.0,
            height: 0.0,
        };
        assert_eq!(to_canvas(Vec2::new(15.0, 25.0), rect, Viewport::default()), Vec2::new(5.0, 5.0));
    }

    #[test]
    fn clock_is_past_2020() {
        assert!(now_ms() > 1.5e12);
    }
}
