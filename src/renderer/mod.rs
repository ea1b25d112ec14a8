//! 2D rendering
//!
//! The draw pass ([`draw::draw_frame`]) only talks to the [`Renderer`]
//! trait. Backends:
//! - [`RecordingRenderer`]: keeps a command list (tests, headless runs)
//! - `CanvasRenderer` (wasm32): HTML canvas 2D context

pub mod draw;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use draw::{draw_frame, image_ids};

use std::collections::HashMap;

use glam::Vec2;

use crate::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Immediate-mode drawing surface. Colors are CSS color strings.
pub trait Renderer {
    /// Natural size of a loaded image, `None` while loading or missing
    fn image_size(&self, id: &str) -> Option<Vec2>;

    fn image_ready(&self, id: &str) -> bool {
        self.image_size(id).is_some()
    }

    fn draw_image(&mut self, id: &str, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: &str);
    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str);
    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, color: &str, align: TextAlign);
    /// Absolute opacity for following draws, until `restore`
    fn set_alpha(&mut self, alpha: f32);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, radians: f32);
    fn scale(&mut self, factor: f32);
}

/// Draw an image, or a flat placeholder while it isn't available
pub fn image_or_placeholder<R: Renderer + ?Sized>(r: &mut R, id: &str, rect: Rect, placeholder: &str) {
    if r.image_ready(id) {
        r.draw_image(id, rect);
    } else {
        r.fill_rect(rect, placeholder);
    }
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Image { id: String, rect: Rect },
    FillRect { rect: Rect, color: String },
    StrokeRect { rect: Rect, color: String },
    Circle { center: Vec2, radius: f32, color: String },
    Text { text: String, pos: Vec2 },
    Alpha(f32),
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    Scale(f32),
}

/// Renderer that records commands instead of drawing
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCmd>,
    images: HashMap<String, Vec2>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend an image finished loading
    pub fn add_image(&mut self, id: &str, size: Vec2) {
        self.images.insert(id.to_string(), size);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text drawn so far
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }
}

impl Renderer for RecordingRenderer {
    fn image_size(&self, id: &str) -> Option<Vec2> {
        self.images.get(id).copied()
    }

    fn draw_image(&mut self, id: &str, rect: Rect) {
        self.commands.push(DrawCmd::Image {
            id: id.to_string(),
            rect,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.commands.push(DrawCmd::FillRect {
            rect,
            color: color.to_string(),
        });
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, _line_width: f32) {
        self.commands.push(DrawCmd::StrokeRect {
            rect,
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, _size_px: f32, _color: &str, _align: TextAlign) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
        });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCmd::Alpha(alpha));
    }

    fn save(&mut self) {
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCmd::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCmd::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCmd::Rotate(radians));
    }

    fn scale(&mut self, factor: f32) {
        self.commands.push(DrawCmd::Scale(factor));
    }
}
