//! HTML canvas 2D backend

use std::collections::HashMap;

use glam::Vec2;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use wasm_bindgen::JsCast;

use super::{Renderer, TextAlign};
use crate::Rect;

const FONT_FAMILY: &str = "'Trebuchet MS', 'Segoe UI', sans-serif";

pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    images: HashMap<String, HtmlImageElement>,
}

impl CanvasRenderer {
    /// Grab the 2D context of `canvas`. `None` if the browser refuses one.
    pub fn new(canvas: &HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            ctx,
            images: HashMap::new(),
        })
    }

    /// Start loading `{base_url}/{id}.png` for every id. Loading is async;
    /// until an image completes the draw pass uses placeholders.
    pub fn load_images<'a>(&mut self, base_url: &str, ids: impl IntoIterator<Item = &'a str>) {
        for id in ids {
            if self.images.contains_key(id) {
                continue;
            }
            let Ok(img) = HtmlImageElement::new() else {
                log::warn!("Could not create image element for {id}");
                continue;
            };
            img.set_src(&format!("{base_url}/{id}.png"));
            self.images.insert(id.to_string(), img);
        }
        log::info!("Loading {} images from {base_url}", self.images.len());
    }

    /// True once every requested image has either loaded or failed
    pub fn images_settled(&self) -> bool {
        self.images.values().all(HtmlImageElement::complete)
    }

    pub fn clear(&self, width: f32, height: f32) {
        self.ctx.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn loaded(&self, id: &str) -> Option<&HtmlImageElement> {
        self.images
            .get(id)
            .filter(|img| img.complete() && img.natural_width() > 0)
    }
}

impl Renderer for CanvasRenderer {
    fn image_size(&self, id: &str) -> Option<Vec2> {
        self.loaded(id)
            .map(|img| Vec2::new(img.natural_width() as f32, img.natural_height() as f32))
    }

    fn draw_image(&mut self, id: &str, rect: Rect) {
        let Some(img) = self.loaded(id) else {
            return;
        };
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(
                img,
                rect.x as f64,
                rect.y as f64,
                rect.w as f64,
                rect.h as f64,
            )
            .ok();
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width as f64);
        self.ctx
            .stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
        self.ctx.fill();
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size_px: f32, color: &str, align: TextAlign) {
        self.ctx.set_fill_style_str(color);
        self.ctx.set_font(&format!("bold {size_px}px {FONT_FAMILY}"));
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        self.ctx.fill_text(text, pos.x as f64, pos.y as f64).ok();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        self.ctx.translate(offset.x as f64, offset.y as f64).ok();
    }

    fn rotate(&mut self, radians: f32) {
        self.ctx.rotate(radians as f64).ok();
    }

    fn scale(&mut self, factor: f32) {
        self.ctx.scale(factor as f64, factor as f64).ok();
    }
}
