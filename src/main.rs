//! Rocket Lander entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use rocket_lander::renderer::CanvasRenderer;
    use rocket_lander::settings::ViewportConfig;
    use rocket_lander::{Game, Settings};

    /// Session plus the surface it draws to
    struct App {
        game: Game,
        renderer: CanvasRenderer,
    }

    fn browser_window() -> Result<web_sys::Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    /// Current CSS viewport size
    fn viewport_size(window: &web_sys::Window) -> Result<(f64, f64), JsValue> {
        let w = window.inner_width()?.as_f64().unwrap_or(1280.0);
        let h = window.inner_height()?.as_f64().unwrap_or(720.0);
        Ok((w, h))
    }

    /// Use the page's `#canvas` if there is one, otherwise add a full-window canvas
    fn find_or_create_canvas(document: &web_sys::Document) -> Result<HtmlCanvasElement, JsValue> {
        if let Some(el) = document.get_element_by_id("canvas") {
            return Ok(el.dyn_into()?);
        }
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        canvas.set_id("canvas");
        canvas.set_attribute(
            "style",
            "position:fixed;left:0;top:0;width:100vw;height:100vh;touch-action:none",
        )?;
        document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?
            .append_child(&canvas)?;
        Ok(canvas)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Rocket Lander starting...");

        let window = browser_window()?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas = find_or_create_canvas(&document)?;
        let (width, height) = viewport_size(&window)?;
        let renderer = CanvasRenderer::new(canvas.clone(), width, height, window.device_pixel_ratio())?;

        let settings = Settings {
            viewport: ViewportConfig::new(width, height),
            ..Settings::default()
        };
        let seed = js_sys::Date::now() as u64;
        let game = Game::new(seed, settings);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App { game, renderer }));

        setup_keyboard(&window, app.clone())?;
        setup_pointer(&canvas, app.clone())?;
        setup_window_events(&window, app.clone())?;

        request_animation_frame(app)?;

        log::info!("Rocket Lander running!");
        Ok(())
    }

    fn setup_keyboard(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if app.borrow_mut().game.key_down(&event.code()) {
                    event.prevent_default();
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                app.borrow_mut().game.key_up(&event.code());
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// Pointer position relative to the canvas in CSS pixels
    fn canvas_point(canvas: &HtmlCanvasElement, event: &PointerEvent) -> (f64, f64) {
        let rect = canvas.get_bounding_client_rect();
        (
            event.client_x() as f64 - rect.left(),
            event.client_y() as f64 - rect.top(),
        )
    }

    fn setup_pointer(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Pointer down
        {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                // Keep receiving moves for this finger even if it slides off the canvas
                let _ = target.set_pointer_capture(event.pointer_id());
                let (x, y) = canvas_point(&target, &event);
                app.borrow_mut().game.pointer_down(event.pointer_id(), x, y);
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer move
        {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let (x, y) = canvas_point(&target, &event);
                app.borrow_mut().game.pointer_move(event.pointer_id(), x, y);
            });
            canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Pointer up / cancel
        for name in ["pointerup", "pointercancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().game.pointer_up(event.pointer_id());
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn setup_window_events(window: &web_sys::Window, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        // Window blur: key-up events will not arrive, so let go of everything
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().game.release_all();
                log::info!("Input released (window blur)");
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Resize: new button layout and backing store, same world
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(window) = browser_window() else {
                    return;
                };
                let Ok((w, h)) = viewport_size(&window) else {
                    return;
                };
                let mut app = app.borrow_mut();
                app.game.resize(w, h);
                if let Err(e) = app.renderer.resize(w, h, window.device_pixel_ratio()) {
                    log::error!("Canvas resize failed: {:?}", e);
                }
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        browser_window()?.request_animation_frame(closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut app = app.borrow_mut();
            app.game.frame(time);
            if let Err(e) = app.renderer.render(&app.game) {
                log::error!("Render failed: {:?}", e);
            }
            if !app.game.running {
                log::info!("Game loop stopped");
                return;
            }
        }

        if let Err(e) = request_animation_frame(app) {
            log::error!("Could not schedule next frame: {:?}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Native run: fly an autopilot descent and report the outcome as JSON

    use glam::DVec2;
    use serde::Serialize;

    use rocket_lander::consts::SIM_DT;
    use rocket_lander::shortest_wrapped_delta;
    use rocket_lander::sim::{Contact, FlightState, GameState, Telemetry, TickInput, tick};

    /// Give up after two simulated minutes
    const MAX_TICKS: u64 = 60 * 120;
    /// Cruise altitude while far from the pad, clear of the tallest buildings
    const CRUISE_Y: f64 = 120.0;
    /// Horizontal distance at which the final descent begins
    const APPROACH_RANGE: f64 = 30.0;
    const MAX_CRUISE_SPEED: f64 = 40.0;
    const MAX_DESCENT_SPEED: f64 = 25.0;
    const MAX_BANK_DEG: f64 = 15.0;

    #[derive(Debug, Serialize)]
    pub struct Report {
        pub seed: u64,
        pub outcome: FlightState,
        pub cause: &'static str,
        pub ticks: u64,
        pub seconds: f64,
        pub touchdown_velocity: DVec2,
        pub telemetry: Telemetry,
    }

    /// Map the current state to control channels, nothing else
    pub fn autopilot(state: &GameState) -> TickInput {
        let rocket = &state.rocket;
        let pad = state.terrain.landing_pad.center();
        let dx = shortest_wrapped_delta(rocket.position.x, pad.x, state.terrain.length);

        // Horizontal: bank towards the pad, proportional to the speed error
        let want_vx = (dx * 0.5).clamp(-MAX_CRUISE_SPEED, MAX_CRUISE_SPEED);
        let want_tilt = ((want_vx - rocket.velocity.x) * 0.5).clamp(-MAX_BANK_DEG, MAX_BANK_DEG);
        let want_spin = (want_tilt - rocket.orientation) * 2.0;
        let spin_err = want_spin - rocket.angular_velocity;

        // Vertical: hold cruise height until lined up, then come down slowly
        let target_y = if dx.abs() > APPROACH_RANGE {
            CRUISE_Y
        } else {
            pad.y
        };
        let want_vy = ((target_y - rocket.position.y) * 0.5).clamp(-MAX_DESCENT_SPEED, MAX_DESCENT_SPEED);
        let burn = rocket.velocity.y > want_vy;

        TickInput {
            thrust_left: burn,
            thrust_right: burn,
            pitch_left: spin_err > 2.0,
            pitch_right: spin_err < -2.0,
        }
    }

    pub fn fly(state: &mut GameState) -> Report {
        let mut contact = Contact::None;
        while contact == Contact::None && state.time_ticks < MAX_TICKS {
            let input = autopilot(state);
            contact = tick(state, &input, SIM_DT);
        }
        if contact == Contact::None {
            log::warn!("No touchdown after {} ticks", state.time_ticks);
        }

        Report {
            seed: state.seed,
            outcome: state.flight_state(),
            cause: contact.describe(),
            ticks: state.time_ticks,
            seconds: state.time_ticks as f64 * SIM_DT,
            touchdown_velocity: state.rocket.velocity,
            telemetry: state.telemetry(),
        }
    }

}

/// Usage: rocket-lander [SETTINGS_JSON] [SEED]
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use rocket_lander::Settings;
    use rocket_lander::sim::GameState;

    env_logger::init();
    log::info!("Rocket Lander (native) starting...");
    log::info!("Native mode flies a headless autopilot - serve the wasm build for the playable version");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::from_json(&std::fs::read_to_string(&path)?)?,
        None => Settings::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => 1,
    };

    let mut state = GameState::new(seed, settings);
    let report = headless::fly(&mut state);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
