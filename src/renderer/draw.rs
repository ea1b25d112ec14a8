//! Per-frame scene drawing
//!
//! Reads the game through its accessors and issues [`Renderer`] calls.
//! Nothing here mutates game state.

use glam::Vec2;

use super::{Renderer, TextAlign, image_or_placeholder};
use crate::audio::AudioService;
use crate::game::guide::SLIDES;
use crate::game::menu::{self, CAROUSEL_CARD, CAROUSEL_CENTER_Y, MenuItem};
use crate::game::Game;
use crate::highscores::format_time;
use crate::persistence::Storage;
use crate::sim::{BIN_LAYOUT, Catalog, Difficulty, Screen};
use crate::{Rect, Viewport};

const SKY: &str = "#97daff";
const GRASS: &str = "#5cb85c";
const PANEL: &str = "#fdf6e3";
const PANEL_EDGE: &str = "#2e7d32";
const BUTTON: &str = "#43a047";
const TEXT: &str = "#1b1b1b";
const LIGHT_TEXT: &str = "#ffffff";
const SHADE: &str = "rgba(0, 0, 0, 0.45)";

const MENU_BACKGROUND: &str = "menu-background";
const PLAY_BACKGROUND: &str = "playzone-background";
const SUN_IMAGE: &str = "sun";
const GRASS_IMAGE: &str = "grass";
const GRASS_HEIGHT: f32 = 140.0;

/// Every image the scene may draw, for preloading
pub fn image_ids(catalog: &Catalog) -> Vec<&'static str> {
    let mut ids = vec![MENU_BACKGROUND, PLAY_BACKGROUND, SUN_IMAGE, GRASS_IMAGE];
    ids.extend(SLIDES.iter().map(|s| s.image_id));
    for spec in &BIN_LAYOUT {
        ids.push(spec.image_id);
        ids.extend(spec.open_image_id);
    }
    ids.extend(catalog.archetypes().iter().map(|a| a.image_id));
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Draw one full frame
pub fn draw_frame<R, S, A>(r: &mut R, game: &Game<S, A>)
where
    R: Renderer,
    S: Storage,
    A: AudioService,
{
    let vp = game.viewport();
    match game.screen() {
        Screen::MainMenu => draw_main_menu(r, game),
        Screen::DifficultyMenu => {
            draw_menu_backdrop(r, game);
            draw_panel(r, vp, game.difficulty_panel_progress(), "Choose difficulty");
            draw_buttons(r, &game.menu_items(), game.difficulty_panel_progress());
        }
        Screen::CustomSettings => {
            draw_menu_backdrop(r, game);
            draw_panel(r, vp, game.difficulty_panel_progress(), "Custom round");
            draw_sliders(r, game);
            draw_buttons(r, &game.menu_items(), game.difficulty_panel_progress());
        }
        Screen::Playing => draw_play_scene(r, game),
        Screen::Dialog => {
            draw_play_scene(r, game);
            draw_dialog(r, game);
        }
        Screen::Consequence => {
            draw_play_scene(r, game);
            draw_consequence(r, game);
        }
        Screen::PauseMenu => {
            draw_play_scene(r, game);
            draw_modal(r, vp, game.pause_progress(), "Paused", &game.menu_items(), &[]);
        }
        Screen::GameOver => {
            draw_play_scene(r, game);
            let lines = game_over_lines(game);
            draw_modal(r, vp, game.game_over_progress(), "Time's up!", &game.menu_items(), &lines);
        }
    }
}

fn draw_menu_backdrop<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let vp = game.viewport();
    let full = Rect::new(0.0, 0.0, vp.width, vp.height);
    image_or_placeholder(r, MENU_BACKGROUND, full, SKY);

    let sun = game.sun();
    if sun.alpha > 0.0 {
        r.save();
        r.set_alpha(sun.alpha);
        r.translate(Vec2::new(vp.width * 0.8, sun.y));
        r.rotate(sun.angle);
        let rect = Rect::from_center(0.0, 0.0, 160.0, 160.0);
        if r.image_ready(SUN_IMAGE) {
            r.draw_image(SUN_IMAGE, rect);
        } else {
            r.fill_circle(Vec2::ZERO, 60.0, "#ffd54f");
        }
        r.restore();
    }

    // Grass rises from below the bottom edge
    let lift = GRASS_HEIGHT * game.grass_progress();
    let grass = Rect::new(0.0, vp.height - lift, vp.width, GRASS_HEIGHT);
    image_or_placeholder(r, GRASS_IMAGE, grass, GRASS);
}

fn draw_main_menu<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let vp = game.viewport();
    draw_menu_backdrop(r, game);

    let title = game.title();
    r.save();
    r.set_alpha(title.t_norm());
    r.translate(Vec2::new(vp.center_x(), 130.0));
    r.scale(title.scale());
    r.fill_text("Eco Sort", Vec2::ZERO, 72.0, PANEL_EDGE, TextAlign::Center);
    r.restore();

    if !game.carousel_pages().is_empty() {
        draw_carousel(r, game);
    }
    draw_buttons(r, &game.menu_items(), game.menu_buttons_progress());

    if game.guide().is_open() {
        draw_guide(r, game);
    }
}

fn draw_carousel<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let vp = game.viewport();
    let pages = game.carousel_pages();
    let carousel = game.carousel();
    let shift = CAROUSEL_CARD.x + 60.0;

    if carousel.direction() == 0 {
        draw_score_card(r, game, pages[carousel.index() % pages.len()], vp.center_x());
        return;
    }
    let dir = f32::from(carousel.direction());
    let p = carousel.progress();
    let outgoing = vp.center_x() - dir * shift * p;
    let incoming = vp.center_x() + dir * shift * (1.0 - p);
    r.save();
    r.set_alpha(1.0 - p);
    draw_score_card(r, game, pages[carousel.index() % pages.len()], outgoing);
    r.set_alpha(p);
    draw_score_card(r, game, pages[carousel.to_index() % pages.len()], incoming);
    r.restore();
}

fn draw_score_card<R: Renderer, S: Storage, A: AudioService>(
    r: &mut R,
    game: &Game<S, A>,
    difficulty: Difficulty,
    center_x: f32,
) {
    let card = Rect::from_center(center_x, CAROUSEL_CENTER_Y, CAROUSEL_CARD.x, CAROUSEL_CARD.y);
    r.fill_rect(card, PANEL);
    r.stroke_rect(card, PANEL_EDGE, 3.0);

    let x = card.center().x;
    r.fill_text("Best score", Vec2::new(x, card.y + 36.0), 22.0, TEXT, TextAlign::Center);
    r.fill_text(difficulty.label(), Vec2::new(x, card.y + 68.0), 20.0, PANEL_EDGE, TextAlign::Center);

    let Some(best) = game.scores().best_for(difficulty) else {
        return;
    };
    let record = &best.record;
    r.fill_text(&record.score.to_string(), Vec2::new(x, card.y + 115.0), 40.0, TEXT, TextAlign::Center);
    r.fill_text(&stars_text(record.stars), Vec2::new(x, card.y + 150.0), 26.0, "#f9a825", TextAlign::Center);
    let time = format!("{} / {} s round", format_time(record.time), best.duration_secs);
    r.fill_text(&time, Vec2::new(x, card.y + 182.0), 16.0, TEXT, TextAlign::Center);
}

fn draw_guide<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let vp = game.viewport();
    let guide = game.guide();
    let slide = guide.slide();

    r.save();
    r.set_alpha(guide.alpha());
    r.fill_rect(Rect::new(0.0, 0.0, vp.width, vp.height), SHADE);
    let frame = Rect::from_center(vp.center_x(), vp.height / 2.0 - 60.0, 560.0, 360.0);
    image_or_placeholder(r, slide.image_id, frame, PANEL);
    let text_y = frame.bottom() + 50.0;
    r.fill_text(slide.text, Vec2::new(vp.center_x(), text_y), 20.0, LIGHT_TEXT, TextAlign::Center);
    let step = format!("{} / {}", guide.step() + 1, SLIDES.len());
    r.fill_text(&step, Vec2::new(vp.center_x(), text_y + 40.0), 16.0, LIGHT_TEXT, TextAlign::Center);
    r.restore();
}

/// Menu panel sliding down from above the canvas
fn draw_panel(r: &mut impl Renderer, vp: Viewport, progress: f32, heading: &str) {
    let h = vp.height - 80.0;
    let y = -h + (40.0 + h) * progress;
    let panel = Rect::new(vp.center_x() - 260.0, y, 520.0, h);
    r.fill_rect(panel, PANEL);
    r.stroke_rect(panel, PANEL_EDGE, 4.0);
    r.fill_text(heading, Vec2::new(vp.center_x(), y + 70.0), 36.0, PANEL_EDGE, TextAlign::Center);
}

fn draw_buttons(r: &mut impl Renderer, items: &[MenuItem], alpha: f32) {
    r.save();
    r.set_alpha(alpha);
    for item in items {
        r.fill_rect(item.rect, BUTTON);
        r.stroke_rect(item.rect, PANEL_EDGE, 2.0);
        let size = (item.rect.h * 0.4).clamp(14.0, 26.0);
        let pos = Vec2::new(item.rect.center().x, item.rect.center().y + size * 0.35);
        r.fill_text(&item.label, pos, size, LIGHT_TEXT, TextAlign::Center);
    }
    r.restore();
}

fn draw_sliders<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    for slider in game.sliders() {
        let track = slider.rect();
        let value = slider.current(game.custom());
        let label = format!("{}: {value}", slider.label());
        r.fill_text(&label, Vec2::new(track.center().x, track.y - 12.0), 18.0, TEXT, TextAlign::Center);

        r.fill_rect(track, "#c8e6c9");
        let filled = Rect::new(track.x, track.y, track.w * slider.fraction(value), track.h);
        r.fill_rect(filled, BUTTON);
        let knob = Vec2::new(filled.right(), track.center().y);
        let knob_color = if slider.dragging { "#fbc02d" } else { PANEL_EDGE };
        r.fill_circle(knob, track.h * 0.6, knob_color);
    }
}

fn draw_play_scene<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let vp = game.viewport();
    image_or_placeholder(r, PLAY_BACKGROUND, Rect::new(0.0, 0.0, vp.width, vp.height), SKY);

    for bin in game.bins().iter() {
        let rect = Rect::new(bin.x(), bin.y, bin.width(), bin.height);
        let open = bin.open_progress > 0.5;
        let id = match bin.spec.open_image_id {
            Some(open_id) if open => open_id,
            _ => bin.spec.image_id,
        };
        image_or_placeholder(r, id, rect, bin.kind().color_hex());
        if !r.image_ready(id) {
            let pos = Vec2::new(rect.center().x, rect.bottom() - 12.0);
            r.fill_text(bin.kind().label(), pos, 14.0, LIGHT_TEXT, TextAlign::Center);
        }
    }

    let catalog = game.catalog();
    for item in game.items().iter() {
        let rect = Rect::from_center(item.pos.x, item.pos.y, item.size.x, item.size.y);
        match catalog.get(item.archetype) {
            Some(archetype) if r.image_ready(archetype.image_id) => r.draw_image(archetype.image_id, rect),
            _ => r.fill_circle(item.pos, item.radius, item.kind.color_hex()),
        }
    }

    for particle in game.items().particles().iter() {
        let size = particle.current_size();
        r.save();
        r.set_alpha(particle.alpha());
        r.translate(particle.pos);
        r.rotate(particle.rotation);
        let color = particle.color.css(particle.color_alpha);
        r.fill_rect(Rect::from_center(0.0, 0.0, size, size * 0.5), &color);
        r.restore();
    }

    draw_hud(r, game);
}

fn draw_hud<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let vp = game.viewport();
    let session = game.session();

    r.save();
    r.set_alpha(game.round_intro_progress());
    let track = Rect::new(vp.center_x() - 200.0, 20.0, 400.0, 22.0);
    r.fill_rect(track, "rgba(255, 255, 255, 0.6)");
    let timer = &session.timer;
    let fill = Rect::new(track.x, track.y, track.w * timer.bar_width().clamp(0.0, 1.0), track.h);
    r.fill_rect(fill, &timer.color().to_hex());
    r.stroke_rect(track, TEXT, 2.0);
    let remaining = format_time(timer.remaining_secs());
    r.fill_text(&remaining, Vec2::new(track.center().x, track.bottom() + 22.0), 18.0, TEXT, TextAlign::Center);

    r.fill_text(&format!("Score: {}", session.score), Vec2::new(20.0, 40.0), 26.0, TEXT, TextAlign::Left);
    r.fill_text(session.difficulty.label(), Vec2::new(20.0, 70.0), 18.0, TEXT, TextAlign::Left);
    r.restore();

    if session.screen.is_in_round() {
        draw_buttons(r, &[menu::pause_button(vp)], 1.0);
    }
}

fn draw_dialog<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let Some(wrong) = game.wrong_sort() else {
        return;
    };
    let vp = game.viewport();
    let resting = menu::dialog_box(vp);
    let drop = (vp.height - resting.y) * (1.0 - game.dialog_progress());

    r.save();
    r.translate(Vec2::new(0.0, drop));
    r.fill_rect(resting, PANEL);
    r.stroke_rect(resting, "#c62828", 4.0);
    let text_pos = Vec2::new(resting.x + 24.0, resting.center().y + 8.0);
    r.fill_text(&wrong.message, text_pos, 22.0, TEXT, TextAlign::Left);
    draw_buttons(r, &[menu::info_button(vp)], 1.0);
    r.fill_text("Tap to continue", Vec2::new(resting.center().x, resting.bottom() - 10.0), 14.0, TEXT, TextAlign::Center);
    r.restore();
}

fn draw_consequence<R: Renderer, S: Storage, A: AudioService>(r: &mut R, game: &Game<S, A>) {
    let Some(wrong) = game.wrong_sort() else {
        return;
    };
    let Some(archetype) = game.catalog().get(wrong.archetype) else {
        return;
    };
    let vp = game.viewport();
    r.fill_rect(Rect::new(0.0, 0.0, vp.width, vp.height), SHADE);

    let panel = Rect::from_center(vp.center_x(), vp.height / 2.0, 640.0, 380.0);
    r.fill_rect(panel, PANEL);
    r.stroke_rect(panel, PANEL_EDGE, 4.0);

    let x = panel.x + 30.0;
    let icon = Rect::new(panel.right() - 130.0, panel.y + 30.0, 100.0, 100.0);
    image_or_placeholder(r, archetype.image_id, icon, archetype.kind.color_hex());

    let c = &archetype.consequence;
    let lines = [
        (archetype.name.to_string(), 30.0, PANEL_EDGE),
        (c.text.to_string(), 18.0, TEXT),
        (c.effect.to_string(), 18.0, TEXT),
        (format!("Impact: {}", c.impact.label()), 20.0, "#c62828"),
        (format!("Belongs in: {}", wrong.correct.label()), 20.0, PANEL_EDGE),
    ];
    let mut y = panel.y + 60.0;
    for (text, size, color) in &lines {
        r.fill_text(text, Vec2::new(x, y), *size, color, TextAlign::Left);
        y += size * 2.2;
    }
    r.fill_text("Tap to go back", Vec2::new(panel.center().x, panel.bottom() - 20.0), 14.0, TEXT, TextAlign::Center);
}

fn game_over_lines<S: Storage, A: AudioService>(game: &Game<S, A>) -> Vec<String> {
    let Some(result) = game.last_result() else {
        return Vec::new();
    };
    let mut lines = vec![
        format!("Score: {}", result.score),
        format!("Time: {}", format_time(result.elapsed_secs)),
    ];
    if result.difficulty != Difficulty::Custom {
        lines.push(stars_text(result.stars));
    }
    if result.new_best {
        lines.push("New best!".to_string());
    }
    lines
}

/// Shaded backdrop plus a panel sliding up from below
fn draw_modal(r: &mut impl Renderer, vp: Viewport, progress: f32, heading: &str, items: &[MenuItem], lines: &[String]) {
    r.save();
    r.set_alpha(progress);
    r.fill_rect(Rect::new(0.0, 0.0, vp.width, vp.height), SHADE);
    r.restore();

    let panel = menu::modal_rect(vp, progress);
    let rest = menu::modal_rect(vp, 1.0);
    r.save();
    r.translate(Vec2::new(0.0, panel.y - rest.y));
    r.fill_rect(rest, PANEL);
    r.stroke_rect(rest, PANEL_EDGE, 4.0);
    r.fill_text(heading, Vec2::new(rest.center().x, rest.y + 70.0), 40.0, PANEL_EDGE, TextAlign::Center);
    for (i, line) in lines.iter().enumerate() {
        let pos = Vec2::new(rest.center().x, rest.y + 130.0 + 50.0 * i as f32);
        r.fill_text(line, pos, 28.0, TEXT, TextAlign::Center);
    }
    draw_buttons(r, items, 1.0);
    r.restore();
}

fn stars_text(stars: u8) -> String {
    (0..3).map(|i| if i < stars { '\u{2605}' } else { '\u{2606}' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentAudio;
    use crate::game::{GameConfig, MenuAction};
    use crate::persistence::MemoryStorage;
    use crate::renderer::{DrawCmd, RecordingRenderer};

    fn game() -> Game<MemoryStorage, SilentAudio> {
        Game::new(GameConfig::default(), MemoryStorage::new(), SilentAudio::new(), 0.0)
    }

    #[test]
    fn main_menu_draws_title_and_buttons() {
        let mut r = RecordingRenderer::new();
        let game = game();
        draw_frame(&mut r, &game);
        assert!(r.has_text("Eco Sort"));
        assert!(r.has_text("Start"));
        assert!(!r.has_text("Best score"));
    }

    #[test]
    fn missing_images_fall_back_to_placeholders() {
        let mut r = RecordingRenderer::new();
        let mut game = game();
        game.activate(MenuAction::Start, 0.0);
        game.activate(MenuAction::PickDifficulty(Difficulty::Easy), 0.0);
        draw_frame(&mut r, &game);
        assert!(!r.commands.iter().any(|c| matches!(c, DrawCmd::Image { .. })));
        assert!(r.has_text("Score: 0"));
        assert!(r.has_text("Glass"));
    }

    #[test]
    fn loaded_images_are_drawn() {
        let mut r = RecordingRenderer::new();
        r.add_image(PLAY_BACKGROUND, Vec2::new(960.0, 720.0));
        let mut game = game();
        game.activate(MenuAction::Start, 0.0);
        game.activate(MenuAction::PickDifficulty(Difficulty::Easy), 0.0);
        draw_frame(&mut r, &game);
        assert!(matches!(&r.commands[0], DrawCmd::Image { id, .. } if id == PLAY_BACKGROUND));
    }

    #[test]
    fn preload_list_has_no_duplicates() {
        let ids = image_ids(&Catalog::standard());
        let mut sorted = ids.clone();
        sorted.dedup();
        assert_eq!(ids, sorted);
        assert!(ids.contains(&PLAY_BACKGROUND));
        assert!(ids.contains(&"guide-3"));
    }

    #[test]
    fn stars_are_drawn_filled_then_empty() {
        assert_eq!(stars_text(2), "\u{2605}\u{2605}\u{2606}");
        assert_eq!(stars_text(0).chars().count(), 3);
    }
}
