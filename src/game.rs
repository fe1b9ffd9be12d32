//! Real-time session
//!
//! Owns the simulation state and input tracking, and turns variable frame
//! times into fixed `SIM_DT` ticks. Platform code forwards raw events here
//! and draws from `state()` after each frame.

use glam::DVec2;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::platform::{ButtonLayout, InputState, Key};
use crate::settings::{Settings, ViewportConfig};
use crate::sim::{GameState, tick};

/// Game instance holding all state
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    input: InputState,
    layout: ButtonLayout,
    accumulator: f64,
    last_time: Option<f64>,
    /// Frame loop keeps scheduling itself while true
    pub running: bool,
}

impl Game {
    pub fn new(seed: u64, settings: Settings) -> Self {
        let layout = ButtonLayout::for_viewport(&settings.viewport);
        Self {
            state: GameState::new(seed, settings),
            input: InputState::new(),
            layout,
            accumulator: 0.0,
            last_time: None,
            running: true,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn layout(&self) -> &ButtonLayout {
        &self.layout
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Advance by a scheduler timestamp in milliseconds. Returns ticks run.
    pub fn frame(&mut self, timestamp_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => (timestamp_ms - last) / 1000.0,
            None => 0.0,
        };
        self.last_time = Some(timestamp_ms);
        self.update(dt)
    }

    /// Run as many fixed ticks as `frame_dt` seconds allow. Returns ticks run.
    pub fn update(&mut self, frame_dt: f64) -> u32 {
        if !self.running {
            return 0;
        }

        // Long pauses (hidden tab) must not fast-forward the descent. The clamp
        // keeps a frame under MAX_SUBSTEPS ticks, so no backlog builds up.
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.controls(&self.layout);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// New viewport size; button layout follows, the world does not regenerate
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0) {
            log::warn!("Ignoring resize to {width}x{height}");
            return;
        }
        let viewport = ViewportConfig::new(width, height);
        self.layout = ButtonLayout::for_viewport(&viewport);
        self.state.set_viewport(viewport);
    }

    /// Handle a DOM key code. Returns true if the browser default should be suppressed.
    pub fn key_down(&mut self, code: &str) -> bool {
        let Some(key) = Key::from_code(code) else {
            return false;
        };
        if key.is_restart() {
            self.restart();
        } else {
            self.input.key_down(key);
        }
        key.prevents_default()
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.input.key_up(key);
        }
    }

    pub fn pointer_down(&mut self, id: i32, x: f64, y: f64) {
        let pos = DVec2::new(x, y);
        if self.state.is_over() && self.layout.restart.contains(pos) {
            self.restart();
            return;
        }
        self.input.pointer_down(id, pos);
    }

    pub fn pointer_move(&mut self, id: i32, x: f64, y: f64) {
        self.input.pointer_move(id, DVec2::new(x, y));
    }

    /// Pointer up or cancel
    pub fn pointer_up(&mut self, id: i32) {
        self.input.pointer_up(id);
    }

    /// Window lost focus: key-up events will never arrive
    pub fn release_all(&mut self) {
        self.input.clear();
    }

    /// Restart, but only once the run has ended. Returns true if restarted.
    pub fn restart(&mut self) -> bool {
        if !self.state.is_over() {
            return false;
        }
        log::info!("Restart requested after {:?}", self.state.flight_state());
        self.reset();
        true
    }

    /// Start a fresh run immediately
    pub fn reset(&mut self) {
        self.state.reset();
        self.input.clear();
        self.accumulator = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}
