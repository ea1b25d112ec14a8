//! Sorting bins and their hover-driven lid animation
//!
//! A bin opens while an item is dragged over it. Hover starts only after the
//! pointer stayed over the same bin for [`HOVER_DEBOUNCE_MS`]; once the
//! pointer leaves, the bin stays open for a [`HOVER_GRACE_MS`] grace period
//! so quick wobbles don't slam the lid.

use glam::Vec2;

use super::catalog::{BIN_LAYOUT, BinKind, BinSpec};
use crate::Viewport;
use crate::consts::*;

#[derive(Debug, Clone)]
pub struct Bin {
    pub spec: BinSpec,
    pub closed_height: f32,
    pub open_height: f32,
    pub height: f32,
    /// Top edge, recomputed from the current height each frame
    pub y: f32,
    /// 0 = closed, 1 = fully open
    pub open_progress: f32,
    pub hovered: bool,
    pub hover_lost_at: Option<f64>,
    pub open_sound_played: bool,
}

impl Bin {
    fn new(spec: BinSpec, canvas_height: f32) -> Self {
        let mut bin = Self {
            spec,
            closed_height: BIN_CLOSED_HEIGHT,
            open_height: BIN_CLOSED_HEIGHT + BIN_OPEN_EXTRA,
            height: BIN_CLOSED_HEIGHT,
            y: 0.0,
            open_progress: 0.0,
            hovered: false,
            hover_lost_at: None,
            open_sound_played: false,
        };
        bin.place(canvas_height);
        bin
    }

    #[inline]
    pub fn kind(&self) -> BinKind {
        self.spec.kind
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.spec.x
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.spec.width
    }

    fn place(&mut self, canvas_height: f32) {
        self.y = canvas_height - self.height - self.spec.bottom_offset;
    }

    /// Inclusive rectangle test against the current (animated) bounds
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.spec.x
            && p.x <= self.spec.x + self.spec.width
            && p.y >= self.y
            && p.y <= self.y + self.height
    }

    /// Start the grace timer unless it is already running
    fn lose_hover(&mut self, now_ms: f64) {
        if self.hovered && self.hover_lost_at.is_none() {
            self.hover_lost_at = Some(now_ms);
        }
    }

    /// One animation frame. Returns true when the lid sound should play.
    fn step(&mut self, now_ms: f64, canvas_height: f32) -> bool {
        if self
            .hover_lost_at
            .is_some_and(|lost| now_ms - lost >= HOVER_GRACE_MS)
        {
            self.hovered = false;
            self.hover_lost_at = None;
        }

        let prev = self.open_progress;
        self.open_progress = if self.hovered {
            (self.open_progress + BIN_OPEN_RATE).min(1.0)
        } else {
            (self.open_progress - BIN_OPEN_RATE).max(0.0)
        };

        let animated = self.spec.has_open_animation();
        self.height = if animated {
            self.closed_height + (self.open_height - self.closed_height) * self.open_progress
        } else {
            self.closed_height
        };
        self.place(canvas_height);

        let mut play = false;
        if animated && self.hovered && !self.open_sound_played && prev < 0.5 && self.open_progress >= 0.5 {
            self.open_sound_played = true;
            play = true;
        }
        if !self.hovered && self.open_progress == 0.0 {
            self.open_sound_played = false;
        }
        play
    }

    fn reset(&mut self, canvas_height: f32) {
        self.open_progress = 0.0;
        self.hovered = false;
        self.hover_lost_at = None;
        self.open_sound_played = false;
        self.height = self.closed_height;
        self.place(canvas_height);
    }
}

/// Debounce bookkeeping for the bin currently under the pointer
#[derive(Debug, Clone, Copy)]
struct HoverCandidate {
    kind: BinKind,
    since_ms: f64,
}

/// The row of bins, kept in draw order
#[derive(Debug, Clone)]
pub struct BinRack {
    bins: Vec<Bin>,
    candidate: Option<HoverCandidate>,
    canvas_height: f32,
}

impl BinRack {
    pub fn new(specs: &[BinSpec], viewport: Viewport) -> Self {
        let mut bins: Vec<Bin> = specs
            .iter()
            .map(|s| Bin::new(*s, viewport.height))
            .collect();
        bins.sort_by_key(|b| b.spec.order);
        Self {
            bins,
            candidate: None,
            canvas_height: viewport.height,
        }
    }

    pub fn standard(viewport: Viewport) -> Self {
        Self::new(&BIN_LAYOUT, viewport)
    }

    pub fn kinds(&self) -> Vec<BinKind> {
        self.bins.iter().map(|b| b.kind()).collect()
    }

    /// Derive heights from sprite aspect ratios once images are loaded.
    /// `natural_size` returns `None` for images that are not ready.
    pub fn resolve_dimensions(&mut self, natural_size: impl Fn(&str) -> Option<Vec2>) {
        let canvas_height = self.canvas_height;
        for bin in &mut self.bins {
            let aspect = |id: &str| {
                natural_size(id)
                    .filter(|n| n.x > 0.0)
                    .map(|n| n.y / n.x)
            };
            bin.closed_height = aspect(bin.spec.image_id)
                .map(|a| bin.spec.width * a)
                .unwrap_or(BIN_CLOSED_HEIGHT);
            bin.open_height = bin
                .spec
                .open_image_id
                .and_then(aspect)
                .map(|a| bin.spec.width * a)
                .unwrap_or(bin.closed_height + BIN_OPEN_EXTRA);
            bin.height = bin.closed_height;
            bin.place(canvas_height);
        }
    }

    /// Feed the pointer position. Only a dragged item can open a bin.
    pub fn set_hover(&mut self, point: Vec2, dragging: bool, now_ms: f64) {
        if !dragging {
            for bin in &mut self.bins {
                bin.lose_hover(now_ms);
            }
            self.candidate = None;
            return;
        }

        let under = self.bin_index_at(point);
        for (i, bin) in self.bins.iter_mut().enumerate() {
            if Some(i) != under {
                bin.lose_hover(now_ms);
            }
        }

        let Some(index) = under else {
            self.candidate = None;
            return;
        };

        let kind = self.bins[index].kind();
        match self.candidate {
            Some(c) if c.kind == kind => {
                if now_ms - c.since_ms >= HOVER_DEBOUNCE_MS {
                    let bin = &mut self.bins[index];
                    bin.hovered = true;
                    bin.hover_lost_at = None;
                }
            }
            _ => {
                self.candidate = Some(HoverCandidate {
                    kind,
                    since_ms: now_ms,
                });
            }
        }
    }

    /// Advance every bin one frame. Returns bins whose lid just opened.
    pub fn update(&mut self, now_ms: f64) -> Vec<BinKind> {
        let canvas_height = self.canvas_height;
        self.bins
            .iter_mut()
            .filter_map(|b| b.step(now_ms, canvas_height).then_some(b.kind()))
            .collect()
    }

    fn bin_index_at(&self, point: Vec2) -> Option<usize> {
        self.bins.iter().rposition(|b| b.contains(point))
    }

    /// Topmost bin under `point`
    pub fn bin_at(&self, point: Vec2) -> Option<&Bin> {
        self.bin_index_at(point).map(|i| &self.bins[i])
    }

    pub fn bin_by_kind(&self, kind: BinKind) -> Option<&Bin> {
        self.bins.iter().find(|b| b.kind() == kind)
    }

    /// Close every lid and forget hover state
    pub fn reset(&mut self) {
        self.candidate = None;
        let canvas_height = self.canvas_height;
        for bin in &mut self.bins {
            bin.reset(canvas_height);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bin> {
        self.bins.iter()
    }
}
