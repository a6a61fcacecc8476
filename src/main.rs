//! Rail Runner entry point
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
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use rail_runner::audio::AudioManager;
    use rail_runner::persistence::LocalStorage;
    use rail_runner::platform::{SwipeTracker, key_to_intent};
    use rail_runner::renderer::{RenderState, build_frame};
    use rail_runner::sim::{GameEvent, GamePhase};
    use rail_runner::ui::format_count;
    use rail_runner::{Character, Session, Tuning};

    /// Main game state for WASM
    struct Game {
        session: Session<LocalStorage>,
        render_state: Option<RenderState>,
        audio: AudioManager,
        swipe: SwipeTracker,
    }

    fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    fn set_class(id: &str, class: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.set_attribute("class", class);
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn show(id: &str, visible: bool) {
        set_class(id, if visible { "" } else { "hidden" });
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let session = Session::new(LocalStorage::new(), Tuning::default(), seed);
            let audio = AudioManager::new(session.settings().sound_enabled);
            Self {
                session,
                render_state: None,
                audio,
                swipe: SwipeTracker::new(),
            }
        }

        fn start_run(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.audio.resume();
            self.session.start_run(seed);
            show("menu", false);
            show("game-over", false);
            show("tutorial", false);
            show("hud", true);
        }

        fn resize(&mut self, width: u32, height: u32) {
            self.session.resize(width as f32, height as f32);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
        }

        fn frame(&mut self, time: f64) {
            self.session.frame(time);

            for cue in self.session.drain_cues() {
                self.audio.play(cue);
            }
            for event in self.session.drain_events() {
                if let GameEvent::ShowGameOver {
                    score,
                    coins,
                    best,
                    new_best,
                } = event
                {
                    self.show_game_over(score, coins, best, new_best);
                }
            }

            self.render();
            self.update_hud();
        }

        fn render(&mut self) {
            let palette = self.session.settings().character.palette();
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_frame(self.session.state(), &palette);
            match render_state.render(&vertices) {
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

        /// Copy the HUD snapshot into the DOM
        fn update_hud(&self) {
            let hud = self.session.hud();
            set_text("hud-score", &format_count(hud.score));
            set_text("hud-coins", &format_count(hud.coins as u64));
            show("hud-multiplier", hud.multiplier);

            match &hud.power_up {
                Some(p) => {
                    show("powerup-indicator", true);
                    set_text("powerup-icon", p.icon);
                    set_text("powerup-label", p.label);
                    if let Some(bar) = document().and_then(|d| d.get_element_by_id("powerup-bar"))
                    {
                        let _ = bar
                            .set_attribute("style", &format!("width: {:.0}%", p.remaining * 100.0));
                    }
                }
                None => show("powerup-indicator", false),
            }

            match &hud.notification {
                Some(text) if hud.notification_time > 0.0 => {
                    show("notification", true);
                    set_text("notification", text);
                }
                _ => show("notification", false),
            }

            show("pause-menu", self.session.phase() == GamePhase::Paused);
        }

        fn show_game_over(&self, score: u64, coins: u32, best: u64, new_best: bool) {
            set_text("final-score", &format_count(score));
            set_text("final-coins", &format_count(coins as u64));
            set_text("final-best", &format_count(best));
            show("new-best", new_best);
            show("hud", false);
            show("game-over", true);
        }

        fn show_menu(&self) {
            let records = self.session.records();
            set_text("menu-best", &format_count(records.best_score));
            set_text("menu-coins", &format_count(records.total_coins));
            let selected = self.session.settings().character;
            for c in Character::ALL {
                set_class(
                    &format!("char-{}", c.id()),
                    if c == selected { "char-btn selected" } else { "char-btn" },
                );
            }
            set_text(
                "sound-btn",
                if self.session.settings().sound_enabled {
                    "🔊"
                } else {
                    "🔇"
                },
            );
            show("game-over", false);
            show("hud", false);
            show("menu", true);
            show("tutorial", self.session.settings().first_run);
        }
    }

    /// Size the canvas backing store to its CSS box times the pixel ratio
    fn canvas_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Rail Runner starting...");

        let Some(document) = document() else {
            log::error!("No document");
            return;
        };
        show("loading", false);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No canvas element");
            return;
        };
        let (width, height) = canvas_size(&canvas);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        game.borrow_mut().resize(width, height);
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => game.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Renderer unavailable: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());
        setup_resize(canvas, game.clone());

        game.borrow().show_menu();
        request_animation_frame(game);

        log::info!("Rail Runner running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                let phase = g.session.phase();
                if matches!(phase, GamePhase::Menu | GamePhase::GameOver) {
                    if key == "Enter" || key == " " {
                        event.prevent_default();
                        g.start_run();
                    }
                    return;
                }
                if let Some(intent) = key_to_intent(&key) {
                    event.prevent_default();
                    g.session.apply_intent(intent);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    game.borrow_mut().swipe.begin(pos, event.time_stamp());
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end classifies the swipe
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let Some(touch) = event.changed_touches().get(0) else {
                    g.swipe.cancel();
                    return;
                };
                let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                if let Some(intent) = g.swipe.end(pos, event.time_stamp()) {
                    g.session.apply_intent(intent);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch cancel
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().swipe.cancel();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, game: Rc<RefCell<Game>>, handler: fn(&mut Game)) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            log::warn!("Missing button #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            handler(&mut game.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        on_click("start-btn", game.clone(), Game::start_run);
        on_click("restart-btn", game.clone(), Game::start_run);
        on_click("menu-btn", game.clone(), |g| g.show_menu());
        on_click("resume-btn", game.clone(), |g| {
            g.session.resume();
        });
        on_click("pause-btn", game.clone(), |g| {
            g.session.pause();
        });
        on_click("sound-btn", game.clone(), |g| {
            let enabled = g.session.toggle_sound();
            g.audio.set_enabled(enabled);
            g.audio.resume();
            set_text("sound-btn", if enabled { "🔊" } else { "🔇" });
            log::info!("Sound {}", if enabled { "on" } else { "off" });
        });

        for c in Character::ALL {
            let id = format!("char-{}", c.id());
            let Some(btn) = document().and_then(|d| d.get_element_by_id(&id)) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.session.select_character(c);
                g.show_menu();
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let (Some(window), Some(document)) = (web_sys::window(), document()) else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow_mut().session.pause()
                {
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if game.borrow_mut().session.pause() {
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let (width, height) = canvas_size(&canvas);
            game.borrow_mut().resize(width, height);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless demo: the autopilot plays one run at 60 fps
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rail_runner::persistence::MemoryStorage;
    use rail_runner::sim::{GameEvent, GamePhase};
    use rail_runner::{Session, Tuning};

    env_logger::init();
    log::info!("Rail Runner (native) starting...");
    log::info!("Native mode runs the autopilot headless - serve the wasm build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let tuning = match std::env::var("RAIL_RUNNER_TUNING") {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let mut session = Session::new(MemoryStorage::new(), tuning, seed);
    session.set_autopilot(true);
    session.start_run(seed);

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 180;
    let mut t = 0.0;
    for _ in 0..MAX_FRAMES {
        session.frame(t);
        t += FRAME_MS;
        let shown = session
            .drain_events()
            .into_iter()
            .any(|e| matches!(e, GameEvent::ShowGameOver { .. }));
        if shown {
            break;
        }
    }

    let state = session.state();
    let outcome = if state.phase == GamePhase::GameOver {
        "crashed"
    } else {
        "survived"
    };
    log::info!(
        "Autopilot {} after {:.1}s: score {}, coins {}, distance {:.0}",
        outcome,
        state.time,
        state.score,
        state.coins,
        state.distance
    );
}
