//! Eco Sort entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use eco_sort::audio::WebAudio;
    use eco_sort::persistence::LocalStorage;
    use eco_sort::platform::{self, ClientRect};
    use eco_sort::renderer::{self, CanvasRenderer, Renderer};
    use eco_sort::{Game, GameConfig, Settings, Viewport};

    const ASSET_BASE: &str = "assets/images";

    /// Everything the browser callbacks share
    struct App {
        game: Game<LocalStorage, WebAudio>,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        sizes_resolved: bool,
    }

    impl App {
        fn to_canvas(&self, client_x: i32, client_y: i32) -> Vec2 {
            let r = self.canvas.get_bounding_client_rect();
            let rect = ClientRect {
                left: r.left() as f32,
                top: r.top() as f32,
                width: r.width() as f32,
                height: r.height() as f32,
            };
            platform::to_canvas(
                Vec2::new(client_x as f32, client_y as f32),
                rect,
                self.game.viewport(),
            )
        }

        fn frame(&mut self) {
            if !self.sizes_resolved && self.renderer.images_settled() {
                let images = &self.renderer;
                self.game.resolve_image_sizes(|id| images.image_size(id));
                self.sizes_resolved = true;
                log::info!("Images settled, sprite sizes resolved");
            }

            self.game.update(platform::now_ms());
            let vp = self.game.viewport();
            self.renderer.clear(vp.width, vp.height);
            renderer::draw_frame(&mut self.renderer, &self.game);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Eco Sort starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let viewport = Viewport::default();
        canvas.set_width(viewport.width as u32);
        canvas.set_height(viewport.height as u32);

        let mut canvas_renderer = CanvasRenderer::new(&canvas).ok_or("no 2d context")?;

        let storage = LocalStorage::new();
        let audio = WebAudio::new(Settings::load(&storage));
        let config = GameConfig {
            viewport,
            seed: js_sys::Date::now() as u64,
            ..GameConfig::default()
        };
        log::info!("Seed: {}", config.seed);
        let game = Game::new(config, storage, audio, platform::now_ms());
        canvas_renderer.load_images(ASSET_BASE, renderer::image_ids(game.catalog()));

        let app = Rc::new(RefCell::new(App {
            game,
            renderer: canvas_renderer,
            canvas: canvas.clone(),
            sizes_resolved: false,
        }));

        setup_input_handlers(&canvas, app.clone())?;
        setup_auto_pause(app.clone())?;
        request_animation_frame(app);

        log::info!("Eco Sort running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Mouse down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.to_canvas(event.client_x(), event.client_y());
                a.game.audio_mut().unlock();
                a.game.pointer_down(pos, platform::now_ms());
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.to_canvas(event.client_x(), event.client_y());
                a.game.pointer_move(pos, platform::now_ms());
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse up on the window so drags released off-canvas still end
        {
            let app = app.clone();
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut a = app.borrow_mut();
                let pos = a.to_canvas(event.client_x(), event.client_y());
                a.game.pointer_up(pos, platform::now_ms());
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let mut a = app.borrow_mut();
                let pos = a.to_canvas(touch.client_x(), touch.client_y());
                a.game.audio_mut().unlock();
                a.game.pointer_down(pos, platform::now_ms());
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.touches().get(0) else {
                    return;
                };
                let mut a = app.borrow_mut();
                let pos = a.to_canvas(touch.client_x(), touch.client_y());
                a.game.pointer_move(pos, platform::now_ms());
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch end
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let Some(touch) = event.changed_touches().get(0) else {
                    return;
                };
                let mut a = app.borrow_mut();
                let pos = a.to_canvas(touch.client_x(), touch.client_y());
                a.game.pointer_up(pos, platform::now_ms());
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                match event.key().as_str() {
                    "Escape" | "p" | "P" => a.game.key_escape(platform::now_ms()),
                    "m" | "M" => {
                        let muted = !a.game.settings().muted;
                        a.game.set_muted(muted);
                        log::info!("Muted: {muted}");
                    }
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    a.game.modal_closed(platform::now_ms());
                    log::info!("Auto-paused (tab hidden)");
                } else {
                    a.game.modal_opened();
                }
            });
            document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                if a.game.screen().is_in_round() {
                    a.game.pause(platform::now_ms());
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().frame();
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(err) = wasm_game::run() {
        log::error!("Startup failed: {err:?}");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Eco Sort (native) starting...");
    log::info!("The playable build targets wasm32; running a headless bot round");

    let result = headless::bot_round(eco_sort::platform::now_ms() as u64);
    match result {
        Some(r) => log::info!(
            "Bot finished {}: score {}, {} stars, {:.1} s",
            r.difficulty.label(),
            r.score,
            r.stars,
            r.elapsed_secs
        ),
        None => log::warn!("Bot round did not finish"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Plays one Medium round by dragging each resting item into its bin
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec2;

    use eco_sort::audio::SilentAudio;
    use eco_sort::game::{MenuAction, RoundResult};
    use eco_sort::persistence::MemoryStorage;
    use eco_sort::renderer::{self, RecordingRenderer};
    use eco_sort::sim::{Difficulty, Screen};
    use eco_sort::{Game, GameConfig};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const BOT_REACTION_MS: f64 = 600.0;

    pub fn bot_round(seed: u64) -> Option<RoundResult> {
        let config = GameConfig {
            seed,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, MemoryStorage::new(), SilentAudio::new(), 0.0);
        let mut now = 0.0;
        game.activate(MenuAction::Start, now);
        game.activate(MenuAction::PickDifficulty(Difficulty::Medium), now);

        let mut next_move = BOT_REACTION_MS;
        let limit = (Difficulty::Medium.preset().duration_secs as f64 + 5.0) * 1000.0;
        while now < limit && game.screen() != Screen::GameOver {
            now += FRAME_MS;
            game.update(now);
            match game.screen() {
                Screen::Dialog | Screen::Consequence => game.pointer_down(Vec2::new(10.0, 10.0), now),
                Screen::PauseMenu => game.activate(MenuAction::Resume, now),
                Screen::Playing if now >= next_move => {
                    sort_one(&mut game, now);
                    next_move = now + BOT_REACTION_MS;
                }
                _ => {}
            }
        }

        let mut frame = RecordingRenderer::new();
        renderer::draw_frame(&mut frame, &game);
        log::debug!("Final frame: {} draw calls", frame.commands.len());
        game.last_result().copied()
    }

    fn sort_one(game: &mut Game<MemoryStorage, SilentAudio>, now: f64) {
        let Some((pos, kind)) = game
            .items()
            .iter()
            .find(|item| !item.is_falling)
            .map(|item| (item.pos, item.kind))
        else {
            return;
        };
        let Some(bin) = game.bins().bin_by_kind(kind) else {
            return;
        };
        let target = Vec2::new(bin.x() + bin.width() / 2.0, bin.y + bin.height / 2.0);
        game.pointer_down(pos, now);
        game.pointer_move(target, now);
        game.pointer_up(target, now);
    }
}
