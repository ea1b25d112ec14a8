//! Menu layouts
//!
//! Every clickable element is a [`MenuItem`]: a tagged [`MenuAction`] plus
//! its bounds. Layouts are rebuilt from the viewport on demand, so input
//! and drawing always agree on where things are.

use glam::Vec2;

use crate::sim::{CustomDifficulty, Difficulty};
use crate::{Rect, Viewport};

/// Everything a click can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    // Main menu
    Start,
    Continue,
    ResetScores,
    OpenGuide,
    CarouselPrev,
    CarouselNext,
    // Difficulty and custom settings
    PickDifficulty(Difficulty),
    OpenCustom,
    BackToMain,
    BackToDifficulty,
    // Pause menu
    Resume,
    NewGame,
    MainMenu,
    // In round
    Pause,
    MoreInfo,
    // Game over
    PlayAgain,
}

impl MenuAction {
    /// Whether activating plays the generic UI click. Pausing plays its own.
    pub fn clicks(&self) -> bool {
        !matches!(self, MenuAction::Pause)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub action: MenuAction,
    pub rect: Rect,
    pub label: String,
}

impl MenuItem {
    pub fn new(action: MenuAction, rect: Rect, label: impl Into<String>) -> Self {
        Self {
            action,
            rect,
            label: label.into(),
        }
    }

    /// Button of `w` x `h` centered on (`cx`, `cy`)
    pub fn centered(action: MenuAction, cx: f32, cy: f32, w: f32, h: f32, label: impl Into<String>) -> Self {
        Self::new(action, Rect::from_center(cx, cy, w, h), label)
    }
}

/// First item under `point`, in layout order
pub fn hit(items: &[MenuItem], point: Vec2) -> Option<MenuAction> {
    items.iter().find(|i| i.rect.contains(point)).map(|i| i.action)
}

const TEXT_BUTTON: Vec2 = Vec2::new(200.0, 50.0);
const IMAGE_BUTTON: Vec2 = Vec2::new(230.0, 70.0);
const CORNER_MARGIN: f32 = 20.0;

/// Square button in the top-right corner
fn corner_button(viewport: Viewport, size: f32, action: MenuAction, label: &str) -> MenuItem {
    MenuItem::centered(
        action,
        viewport.width - CORNER_MARGIN - size / 2.0,
        CORNER_MARGIN + size / 2.0,
        size,
        size,
        label,
    )
}

/// Carousel card center
pub const CAROUSEL_CENTER_Y: f32 = 320.0;
pub const CAROUSEL_CARD: Vec2 = Vec2::new(260.0, 200.0);

/// Main menu, highest priority first: guide button, carousel arrows, then
/// the start/continue/reset buttons.
///
/// With any best score on record the buttons sit in a row near the bottom
/// to leave room for the carousel; otherwise they stack in the middle.
pub fn main_menu(viewport: Viewport, has_save: bool, carousel_pages: usize) -> Vec<MenuItem> {
    let mut items = vec![corner_button(viewport, 56.0, MenuAction::OpenGuide, "?")];

    let cx = viewport.center_x();
    if carousel_pages > 1 {
        items.push(MenuItem::centered(MenuAction::CarouselPrev, cx - 220.0, CAROUSEL_CENTER_Y, 48.0, 48.0, "<"));
        items.push(MenuItem::centered(MenuAction::CarouselNext, cx + 220.0, CAROUSEL_CENTER_Y, 48.0, 48.0, ">"));
    }

    let mut buttons = vec![(MenuAction::Start, "Start")];
    if has_save {
        buttons.push((MenuAction::Continue, "Continue"));
    }
    let has_best = carousel_pages > 0;
    if has_best {
        buttons.push((MenuAction::ResetScores, "Reset scores"));
    }

    let n = buttons.len() as f32;
    if has_best {
        let gap = 20.0;
        let total = IMAGE_BUTTON.x * n + gap * (n - 1.0);
        let mut x = cx - total / 2.0;
        let y = viewport.height - 80.0;
        for (action, label) in buttons {
            items.push(MenuItem::centered(action, x + IMAGE_BUTTON.x / 2.0, y, IMAGE_BUTTON.x, IMAGE_BUTTON.y, label));
            x += IMAGE_BUTTON.x + gap;
        }
    } else {
        let gap = 16.0;
        let total = IMAGE_BUTTON.y * n + gap * (n - 1.0);
        let mut y = viewport.height / 2.0 - total / 2.0;
        for (action, label) in buttons {
            items.push(MenuItem::centered(action, cx, y + IMAGE_BUTTON.y * 1.5, IMAGE_BUTTON.x, IMAGE_BUTTON.y, label));
            y += IMAGE_BUTTON.y + gap;
        }
    }
    items
}

pub fn difficulty_menu(viewport: Viewport) -> Vec<MenuItem> {
    let cx = viewport.center_x();
    let ranked = Difficulty::RANKED.iter().map(|d| {
        (
            MenuAction::PickDifficulty(*d),
            format!("{} ({} s)", d.label(), d.preset().duration_secs),
        )
    });
    ranked
        .chain([
            (MenuAction::OpenCustom, Difficulty::Custom.label().to_string()),
            (MenuAction::BackToMain, "Back".to_string()),
        ])
        .enumerate()
        .map(|(i, (action, label))| {
            MenuItem::centered(action, cx, 200.0 + 70.0 * i as f32, TEXT_BUTTON.x, TEXT_BUTTON.y, label)
        })
        .collect()
}

pub fn custom_menu(viewport: Viewport) -> Vec<MenuItem> {
    let cx = viewport.center_x();
    vec![
        MenuItem::centered(
            MenuAction::PickDifficulty(Difficulty::Custom),
            cx,
            450.0,
            TEXT_BUTTON.x,
            TEXT_BUTTON.y,
            "Start",
        ),
        MenuItem::centered(MenuAction::BackToDifficulty, cx, 520.0, TEXT_BUTTON.x, TEXT_BUTTON.y, "Back"),
    ]
}

/// Pause panel buttons, laid out for the fully slid-in panel
pub fn pause_menu(viewport: Viewport) -> Vec<MenuItem> {
    let cx = viewport.center_x();
    [
        (MenuAction::Resume, "Resume"),
        (MenuAction::NewGame, "New game"),
        (MenuAction::MainMenu, "Main menu"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (action, label))| {
        MenuItem::centered(
            action,
            cx,
            MODAL_TOP + 215.0 + 60.0 * i as f32,
            TEXT_BUTTON.x,
            TEXT_BUTTON.y,
            label,
        )
    })
    .collect()
}

pub fn game_over_menu(viewport: Viewport) -> Vec<MenuItem> {
    vec![MenuItem::centered(
        MenuAction::PlayAgain,
        viewport.center_x(),
        MODAL_TOP + MODAL_SIZE.y - 115.0,
        TEXT_BUTTON.x,
        TEXT_BUTTON.y,
        "Play again",
    )]
}

pub fn pause_button(viewport: Viewport) -> MenuItem {
    corner_button(viewport, 48.0, MenuAction::Pause, "II")
}

/// Resting top edge and size of the pause / game-over panels
pub const MODAL_TOP: f32 = 10.0;
pub const MODAL_SIZE: Vec2 = Vec2::new(500.0, 500.0);

/// Modal panel bounds for a slide progress in [0, 1]
pub fn modal_rect(viewport: Viewport, progress: f32) -> Rect {
    let y = viewport.height + (MODAL_TOP - viewport.height) * progress;
    Rect::new(viewport.center_x() - MODAL_SIZE.x / 2.0, y, MODAL_SIZE.x, MODAL_SIZE.y)
}

/// Wrong-sort message box along the bottom of the play area
pub fn dialog_box(viewport: Viewport) -> Rect {
    let h = 120.0;
    Rect::new(70.0, viewport.height - h - 70.0, viewport.width - 140.0, h)
}

/// "More info" button on the right edge of the dialog box
pub fn info_button(viewport: Viewport) -> MenuItem {
    let b = dialog_box(viewport);
    let (cx, cy) = (b.right() - 35.0, b.y + b.h / 2.0);
    MenuItem::new(MenuAction::MoreInfo, Rect::new(cx - 20.0, cy - 20.0, 40.0, 50.0), "i")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderKind {
    Duration,
    SpawnInterval,
    MaxItems,
}

/// Horizontal value slider on the custom settings screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slider {
    pub kind: SliderKind,
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub min: u32,
    pub max: u32,
    pub dragging: bool,
}

impl Slider {
    fn new(kind: SliderKind, center: Vec2, (min, max): (u32, u32)) -> Self {
        Self {
            kind,
            center,
            width: 300.0,
            height: 30.0,
            min,
            max,
            dragging: false,
        }
    }

    /// Duration, spawn interval and item cap sliders
    pub fn custom_sliders(viewport: Viewport) -> [Slider; 3] {
        let cx = viewport.center_x();
        [
            Slider::new(SliderKind::Duration, Vec2::new(cx, 180.0), CustomDifficulty::DURATION_RANGE),
            Slider::new(
                SliderKind::SpawnInterval,
                Vec2::new(cx, 260.0),
                CustomDifficulty::SPAWN_INTERVAL_RANGE,
            ),
            Slider::new(SliderKind::MaxItems, Vec2::new(cx, 340.0), CustomDifficulty::MAX_ITEMS_RANGE),
        ]
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.center.x, self.center.y, self.width, self.height)
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            SliderKind::Duration => "Round length (s)",
            SliderKind::SpawnInterval => "Spawn interval (ms)",
            SliderKind::MaxItems => "Max items",
        }
    }

    /// Value under pointer x, clamped to the track
    pub fn value_at(&self, x: f32) -> u32 {
        let left = self.center.x - self.width / 2.0;
        let pct = ((x - left) / self.width).clamp(0.0, 1.0);
        let raw = self.min as f32 + pct * (self.max - self.min) as f32;
        match self.kind {
            SliderKind::SpawnInterval => ((raw / 100.0).round() * 100.0) as u32,
            SliderKind::Duration | SliderKind::MaxItems => raw.round() as u32,
        }
    }

    /// Knob position in [0, 1] for `value`
    pub fn fraction(&self, value: u32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        (value.saturating_sub(self.min) as f32 / (self.max - self.min) as f32).clamp(0.0, 1.0)
    }

    pub fn current(&self, custom: &CustomDifficulty) -> u32 {
        match self.kind {
            SliderKind::Duration => custom.duration_secs(),
            SliderKind::SpawnInterval => custom.spawn_interval_ms(),
            SliderKind::MaxItems => custom.max_items(),
        }
    }

    /// Write the value under `x` into `custom`
    pub fn apply(&self, custom: &mut CustomDifficulty, x: f32) {
        let value = self.value_at(x);
        match self.kind {
            SliderKind::Duration => custom.set_duration(value),
            SliderKind::SpawnInterval => custom.set_spawn_interval(value),
            SliderKind::MaxItems => custom.set_max_items(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_menu_stacks_without_scores_and_rows_with_them() {
        let vp = Viewport::new(800.0, 600.0);

        let stacked = main_menu(vp, true, 0);
        let starts: Vec<_> = stacked.iter().filter(|i| i.action != MenuAction::OpenGuide).collect();
        assert_eq!(starts.len(), 2);
        assert_eq!(starts[0].rect.center().x, 400.0);
        assert!(starts[1].rect.y > starts[0].rect.y);

        let row = main_menu(vp, false, 2);
        let actions: Vec<_> = row.iter().map(|i| i.action).collect();
        assert!(actions.contains(&MenuAction::CarouselPrev));
        assert!(actions.contains(&MenuAction::ResetScores));
        assert!(!actions.contains(&MenuAction::Continue));
        let start = row.iter().find(|i| i.action == MenuAction::Start).unwrap();
        let reset = row.iter().find(|i| i.action == MenuAction::ResetScores).unwrap();
        assert_eq!(start.rect.center().y, reset.rect.center().y);
        assert!(start.rect.x < reset.rect.x);
    }

    #[test]
    fn single_scored_difficulty_has_no_arrows() {
        let vp = Viewport::new(800.0, 600.0);
        let items = main_menu(vp, false, 1);
        assert!(items.iter().all(|i| i.action != MenuAction::CarouselNext));
    }

    #[test]
    fn difficulty_buttons_match_layout() {
        let vp = Viewport::new(800.0, 600.0);
        let items = difficulty_menu(vp);
        assert_eq!(hit(&items, Vec2::new(400.0, 200.0)), Some(MenuAction::PickDifficulty(Difficulty::Easy)));
        assert_eq!(hit(&items, Vec2::new(400.0, 410.0)), Some(MenuAction::OpenCustom));
        assert_eq!(hit(&items, Vec2::new(400.0, 480.0)), Some(MenuAction::BackToMain));
        assert_eq!(hit(&items, Vec2::new(400.0, 235.0)), None);
        assert_eq!(items[1].label, "Medium (36 s)");
    }

    #[test]
    fn slider_maps_track_to_range() {
        let sliders = Slider::custom_sliders(Viewport::new(800.0, 600.0));
        let [duration, spawn, items] = sliders;
        assert_eq!(duration.value_at(0.0), 5);
        assert_eq!(duration.value_at(10_000.0), 150);
        assert_eq!(spawn.value_at(400.0), 2800);
        assert_eq!(items.value_at(400.0), 18);
        assert!((spawn.fraction(2750) - 0.5).abs() < 1e-6);

        let mut custom = CustomDifficulty::default();
        spawn.apply(&mut custom, 250.0);
        assert_eq!(custom.spawn_interval_ms(), 500);
        assert_eq!(spawn.current(&custom), 500);
    }

    #[test]
    fn modal_slides_up_from_below() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(modal_rect(vp, 0.0).y, 600.0);
        assert_eq!(modal_rect(vp, 1.0).y, MODAL_TOP);
        let resume = &pause_menu(vp)[0];
        assert_eq!(resume.rect.center(), Vec2::new(400.0, 225.0));
    }
}
