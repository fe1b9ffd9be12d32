//! Canvas2D rendering module
//!
//! Draws a read-only snapshot of the game each frame. World geometry is
//! repeated for the neighbouring tiles so the seam never shows.

pub mod hud;
pub mod world;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::game::Game;

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: &str = "black";
    pub const TERRAIN: &str = "white";
    pub const PAD_FILL: &str = "yellow";
    pub const PAD_STROKE: &str = "orange";
    pub const ROCKET: &str = "white";
    pub const ROCKET_CRASHED: &str = "red";

    pub const BLUE_FILL: &str = "rgba(41, 128, 185, 0.8)";
    pub const BLUE_STROKE: &str = "rgba(25, 79, 115, 0.8)";
    pub const BLUE_WINDOW: &str = "rgba(255, 255, 255, 0.25)";
    pub const ORANGE_FILL: &str = "#e67e22";
    pub const ORANGE_STROKE: &str = "#d35400";
    pub const ORANGE_WINDOW: &str = "rgba(255, 255, 255, 0.3)";

    pub const DASHBOARD: &str = "#222";
    pub const DASHBOARD_BORDER: &str = "#777";
    pub const BUTTON: &str = "#777";
    pub const BUTTON_ACTIVE: &str = "#aaa";
    pub const SAFE: &str = "green";
    pub const UNSAFE: &str = "red";
    pub const TEXT: &str = "white";
    pub const ARROW: &str = "red";
    pub const RESTART_BUTTON: &str = "gray";
}

/// Canvas render state
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    /// CSS pixel size (what the simulation sees)
    pub size: (f64, f64),
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, width: f64, height: f64, dpr: f64) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into()?;
        let mut renderer = Self {
            ctx,
            canvas,
            size: (width, height),
        };
        renderer.resize(width, height, dpr)?;
        Ok(renderer)
    }

    /// Match the backing store to the CSS size at the device pixel ratio
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) -> Result<(), JsValue> {
        self.size = (width, height);
        self.canvas.set_width((width * dpr) as u32);
        self.canvas.set_height((height * dpr) as u32);
        // Resizing resets the transform; draw in CSS pixels from here on
        self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
    }

    /// Draw one frame
    pub fn render(&self, game: &Game) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let state = game.state();
        let (w, h) = self.size;

        ctx.clear_rect(0.0, 0.0, w, h);
        ctx.set_fill_style_str(colors::BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        world::draw_world(ctx, state)?;
        world::draw_rocket(ctx, state);

        let controls = game.input().controls(game.layout());
        hud::draw_dashboard(ctx, &state.settings.viewport, &state.telemetry())?;
        hud::draw_buttons(ctx, game.layout(), &controls);

        if let Some(elapsed) = state.end_timer {
            hud::draw_end_screen(ctx, state, game.layout(), elapsed)?;
        }

        hud::draw_pad_arrow(ctx, &state.settings.viewport, state.pad_bearing())
    }
}
