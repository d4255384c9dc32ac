//! Skyhop entry point
//!
//! Browser builds run the game on a canvas; native builds run a headless
//! autopilot demo and log the run summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, PointerEvent};

    use skyhop::audio::HitSound;
    use skyhop::platform::frame::AnimationFrame;
    use skyhop::platform::{InputAction, map_key, overlay_visibility, pointer_activates, sprites};
    use skyhop::renderer::{RenderState, TextureSlot, scene};
    use skyhop::sim::{Command, FrameInput, GameEvent, Session, SpriteSource, tick};
    use skyhop::{Layout, Settings};

    /// Host handles for the two sprite slots
    const PLAYER_IMAGE: u32 = 1;
    const OBSTACLE_IMAGE: u32 = 2;

    /// Game instance holding all state
    struct Game {
        session: Session,
        settings: Settings,
        canvas: HtmlCanvasElement,
        render_state: Option<RenderState>,
        hit_sound: Option<HitSound>,
        /// Pending frame request, held only while playing
        frame: Option<AnimationFrame>,
        /// Handle of the frame callback currently running; it cannot be
        /// dropped from inside itself, so it is parked here for one frame
        spent_frame: Option<AnimationFrame>,
        autopilot: bool,
    }

    impl Game {
        fn new(session: Session, settings: Settings, canvas: HtmlCanvasElement) -> Self {
            Self {
                session,
                settings,
                canvas,
                render_state: None,
                hit_sound: None,
                frame: None,
                spent_frame: None,
                autopilot: false,
            }
        }

        /// Size the canvas for a layout; backing store scaled by device pixel ratio
        fn apply_layout(&mut self, layout: &Layout, dpr: f64) {
            let style = self.canvas.style();
            let _ = style.set_property("width", &format!("{}px", layout.width));
            let _ = style.set_property("height", &format!("{}px", layout.height));
            let width = (layout.width as f64 * dpr) as u32;
            let height = (layout.height as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            self.session.resize(layout.width, layout.height);
        }

        /// React to everything the session emitted
        fn flush_events(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    GameEvent::HitFeedback => {
                        if let Some(sound) = self.hit_sound.as_mut() {
                            sound.play();
                        }
                    }
                    GameEvent::GameOver { score, new_best } => {
                        dispatch_game_over(&self.canvas, score, new_best);
                    }
                    GameEvent::ScoreChanged(_) | GameEvent::SpeedChanged(_) => {}
                }
            }
        }

        /// Render the current frame
        fn redraw(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let frame = scene::build(&self.session.draw_state(), render_state.loaded_sprites());
            match render_state.render(&frame) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let phase = self.session.phase();

            set_text(&document, "hud-score", &self.session.score().to_string());
            set_text(&document, "hud-high", &self.session.high_score().to_string());
            set_text(
                &document,
                "hud-speed",
                &format!("{:.1}x", self.session.current_speed()),
            );

            let summary = self.session.last_summary();
            for (id, visible) in overlay_visibility(phase, summary) {
                set_visible(&document, id, visible);
            }
            if let Some(summary) = summary {
                set_text(&document, "final-score", &summary.score.to_string());
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", !visible);
        }
    }

    /// `skyhop:gameover` on the canvas, detail `{ score, newBest }`
    fn dispatch_game_over(canvas: &HtmlCanvasElement, score: u32, new_best: bool) {
        let detail = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&detail, &"score".into(), &JsValue::from(score));
        let _ = js_sys::Reflect::set(&detail, &"newBest".into(), &JsValue::from(new_best));
        let init = web_sys::CustomEventInit::new();
        init.set_detail(&detail);
        match web_sys::CustomEvent::new_with_event_init_dict("skyhop:gameover", &init) {
            Ok(event) => {
                let _ = canvas.dispatch_event(&event);
            }
            Err(e) => log::warn!("Could not create game over event: {:?}", e),
        }
    }

    fn window_size(window: &web_sys::Window) -> (f32, f32) {
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
        (width as f32, height as f32)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Skyhop starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = canvas
            .get_attribute("data-settings")
            .map(|json| Settings::from_json_or_default(&json))
            .unwrap_or_default();

        let (win_w, win_h) = window_size(&window);
        let layout = settings.layout(win_w, win_h);
        let seed = js_sys::Date::now() as u64;
        let session = Session::new(layout.game_config(seed));
        log::info!(
            "Session initialized with seed {} ({}x{}, {} profile)",
            seed,
            layout.width,
            layout.height,
            layout.profile.as_str()
        );

        let dpr = window.device_pixel_ratio();
        let game = Rc::new(RefCell::new(Game::new(session, settings.clone(), canvas.clone())));
        game.borrow_mut().apply_layout(&layout, dpr);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, canvas.width(), canvas.height()).await;
        {
            let mut g = game.borrow_mut();
            g.render_state = Some(render_state);
            g.hit_sound = Some(HitSound::new(&document, settings));
        }

        setup_sprites(&document, game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(game.clone());

        {
            let mut g = game.borrow_mut();
            g.redraw();
            g.update_hud();
        }

        log::info!("Skyhop running!");
    }

    /// Apply a command and bring the page up to date with the new phase
    fn apply(game: &Rc<RefCell<Game>>, command: Command) {
        let now = js_sys::Date::now();
        let needs_frame = {
            let mut g = game.borrow_mut();
            if let Err(e) = g.session.handle(command, now) {
                log::debug!("{}", e);
                return;
            }
            if let Some(sound) = g.hit_sound.as_ref() {
                sound.resume();
            }
            if !g.session.wants_frames() {
                g.frame = None;
            }
            g.flush_events();
            g.redraw();
            g.update_hud();
            g.session.wants_frames() && g.frame.is_none()
        };

        if needs_frame {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let handle = {
            let game = game.clone();
            AnimationFrame::request(move |time| game_loop(game, time))
        };
        game.borrow_mut().frame = handle;
    }

    fn game_loop(game: Rc<RefCell<Game>>, _time: f64) {
        let reschedule = {
            let mut g = game.borrow_mut();
            let running = g.frame.take();
            g.spent_frame = running;

            // Wall clock, same source as command timestamps
            let input = FrameInput {
                now_ms: js_sys::Date::now(),
                autopilot: g.autopilot,
            };
            let outcome = tick(&mut g.session, &input);

            g.flush_events();
            g.redraw();
            g.update_hud();
            outcome.reschedule()
        };

        if reschedule {
            request_animation_frame(game);
        }
    }

    fn setup_sprites(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, slot) in [
            ("player-sprite", TextureSlot::Player),
            ("obstacle-sprite", TextureSlot::Obstacle),
        ] {
            load_sprite(document, &game, id, slot);

            // Late images upload when they finish loading
            if let Some(img) = sprites::image_element(document, id) {
                if !sprites::is_ready(&img) {
                    let game = game.clone();
                    let document = document.clone();
                    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                        load_sprite(&document, &game, id, slot);
                    });
                    let _ = img.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
                    closure.forget();
                }
            }
        }
    }

    fn load_sprite(document: &Document, game: &Rc<RefCell<Game>>, id: &str, slot: TextureSlot) {
        let image = sprites::load(document, id);
        let mut g = game.borrow_mut();
        if let Some(render_state) = g.render_state.as_mut() {
            render_state.set_sprite(slot, image.as_ref());
        }
        let loaded = image.is_some();
        let source = |handle| {
            if loaded {
                SpriteSource::Image(handle)
            } else {
                SpriteSource::Procedural
            }
        };
        match slot {
            TextureSlot::Player => g.session.set_player_sprite(source(PLAYER_IMAGE)),
            TextureSlot::Obstacle => g.session.set_obstacle_sprite(source(OBSTACLE_IMAGE)),
            TextureSlot::White => {}
        }
        if !g.session.wants_frames() {
            g.redraw();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                match map_key(&event.code()) {
                    Some(InputAction::Command(command)) => {
                        event.prevent_default();
                        apply(&game, command);
                    }
                    Some(InputAction::ToggleAutopilot) => {
                        let mut g = game.borrow_mut();
                        g.autopilot = !g.autopilot;
                        log::info!("Autopilot: {}", g.autopilot);
                    }
                    None => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down (mouse, touch, pen)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let phase = game.borrow().session.phase();
                if pointer_activates(phase) {
                    event.prevent_default();
                    apply(&game, Command::Activate);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for (id, command) in [
            ("start-btn", Command::Start),
            ("play-again-btn", Command::PlayAgain),
            ("reset-btn", Command::Reset),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    apply(&game, command);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (win_w, win_h) = window_size(&window);
            let mut g = game.borrow_mut();
            let layout = g.settings.layout(win_w, win_h);
            g.apply_layout(&layout, window.device_pixel_ratio());
            if !g.session.wants_frames() {
                g.redraw();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames the headless demo runs when no count is given (one minute at 60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const DEMO_FRAMES: u64 = 3600;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;
    use skyhop::GameConfig;
    use skyhop::sim::{FrameInput, Session, tick};

    env_logger::init();
    log::info!("Skyhop (native) starting headless autopilot demo...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            GameConfig::from_json(&json).with_context(|| format!("parsing config {}", path))?
        }
        None => GameConfig::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse::<u64>().with_context(|| format!("bad frame count {:?}", n))?,
        None => DEMO_FRAMES,
    };

    log::info!(
        "{}x{} playfield, {} profile, seed {}",
        config.width,
        config.height,
        config.profile.as_str(),
        config.seed
    );

    let mut session = Session::new(config);
    session.start()?;
    session.activate(0.0)?;

    let mut frame = 0;
    while frame < frames {
        frame += 1;
        let input = FrameInput {
            now_ms: frame as f64 * 1000.0 / 60.0,
            autopilot: true,
        };
        if !tick(&mut session, &input).reschedule() {
            break;
        }
    }

    match session.last_summary() {
        Some(summary) => println!(
            "Crashed after {} frames: score {}, best {}, speed {:.1}",
            frame,
            summary.score,
            summary.high_score,
            session.current_speed()
        ),
        None => println!(
            "Survived {} frames: score {}, speed {:.1}",
            frame,
            session.score(),
            session.current_speed()
        ),
    }
    log::debug!("Final frame: {}", session.draw_state().to_json());

    Ok(())
}
