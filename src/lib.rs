//! Rocket Lander - A thrust-controlled descent over a wrapping cityscape
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rocket dynamics, world, collisions, camera)
//! - `settings`: Viewport, world, physics and landing configuration
//! - `platform`: Browser/native input abstraction
//! - `game`: Real-time session driving fixed-timestep ticks
//! - `renderer`: Canvas2D drawing (wasm only)

pub mod game;
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::Settings;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the rate the physics constants are tuned for)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest real frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Main (bottom) engines fire at half power each
    pub const MAIN_ENGINE_POWER: f64 = 0.5;
    /// Main engine mount points, local space (x is mirrored per side)
    pub const MAIN_ENGINE_OFFSET: (f64, f64) = (10.0, 10.0);
    pub const MAIN_TORQUE_DIVISOR: f64 = 100.0;

    /// Pitch (top) engines are reaction control: huge thrust, torque only
    pub const PITCH_ENGINE_POWER: f64 = 25.0;
    pub const PITCH_ENGINE_OFFSET: (f64, f64) = (5.0, -20.0);
    pub const PITCH_TORQUE_DIVISOR: f64 = 200.0;

    /// Exhaust particles
    pub const EXHAUST_JITTER_RAD: f64 = 0.2;
    pub const EXHAUST_MIN_SPEED: f64 = 50.0;
    pub const EXHAUST_MAX_SPEED: f64 = 100.0;
    pub const EXHAUST_MIN_LIFETIME: f64 = 0.5;
    pub const EXHAUST_MAX_LIFETIME: f64 = 1.0;

    /// Building hit boxes are shrunk by this much on every side
    pub const BUILDING_MARGIN: f64 = 2.0;

    /// Camera horizontal dead-zone (fraction of viewport width)
    pub const CAMERA_DEAD_ZONE_LEFT: f64 = 0.2;
    pub const CAMERA_DEAD_ZONE_RIGHT: f64 = 0.8;
    /// Rocket is pinned below this fraction of viewport height while climbing
    pub const CAMERA_TOP_THRESHOLD: f64 = 0.1;
    /// Proportional follow per tick
    pub const CAMERA_FOLLOW: f64 = 0.1;

    /// Seconds each end-of-run message line takes to fade in
    pub const MESSAGE_FADE_SECS: f64 = 2.0;
}

/// Degrees to radians
#[inline]
pub fn deg_to_rad(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Radians to degrees
#[inline]
pub fn rad_to_deg(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Rotate a vector by an angle in degrees (positive = clockwise on a y-down screen)
#[inline]
pub fn rotate_deg(v: DVec2, degrees: f64) -> DVec2 {
    DVec2::from_angle(deg_to_rad(degrees)).rotate(v)
}

/// Normalize an angle in degrees to [-180, 180)
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let mut wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= 180.0 {
        wrapped -= 360.0;
    }
    wrapped
}

/// Reduce a world coordinate into [0, length)
#[inline]
pub fn wrap_coordinate(x: f64, length: f64) -> f64 {
    let wrapped = x.rem_euclid(length);
    if wrapped >= length { 0.0 } else { wrapped }
}

/// Signed horizontal distance from `from` to `to` taking the short way around the world
pub fn shortest_wrapped_delta(from: f64, to: f64, length: f64) -> f64 {
    let delta = wrap_coordinate(to - from, length);
    if delta > length / 2.0 {
        delta - length
    } else {
        delta
    }
}

/// Axis-aligned rectangle (y-down, `y` is the top edge)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive point test
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Shrink every side by `margin`
    pub fn shrunk(&self, margin: f64) -> Self {
        Self {
            x: self.x + margin,
            y: self.y + margin,
            width: (self.width - 2.0 * margin).max(0.0),
            height: (self.height - 2.0 * margin).max(0.0),
        }
    }

    /// Same rectangle moved horizontally
    pub fn shifted_x(&self, dx: f64) -> Self {
        Self {
            x: self.x + dx,
            ..*self
        }
    }

    /// Corners in drawing order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [DVec2; 4] {
        let (l, t) = (self.x, self.y);
        let (r, b) = (self.x + self.width, self.y + self.height);
        [
            DVec2::new(l, t),
            DVec2::new(r, t),
            DVec2::new(r, b),
            DVec2::new(l, b),
        ]
    }

    /// The four edges as segments
    pub fn edges(&self) -> [(DVec2, DVec2); 4] {
        let [tl, tr, br, bl] = self.corners();
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}
