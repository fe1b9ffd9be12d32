//! Game settings and tuning
//!
//! Replaces window-attached globals: everything that depends on screen size or
//! balance lives here and is passed explicitly to the components that need it.
//! Loaded from JSON (all fields optional) or built from defaults.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::SIM_DT;

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl ViewportConfig {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Nominal ground level (landing pad surface)
    pub fn surface_y(&self) -> f64 {
        self.height * 0.7
    }

    /// Where a fresh rocket appears
    pub fn spawn_point(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, 100.0)
    }
}

/// Procedural world parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Horizontal extent before the world repeats
    pub length: f64,
    /// Width of the flat landing pad
    pub pad_width: f64,
    /// Pad may start anywhere in [length * start, length * end]
    pub pad_window_start: f64,
    pub pad_window_end: f64,
    /// Terrain sample spacing range
    pub min_step: f64,
    pub max_step: f64,
    /// Terrain height noise (± around the surface)
    pub noise_amplitude: f64,
    /// Building candidate slot spacing range
    pub min_building_spacing: f64,
    pub max_building_spacing: f64,
    /// Chance that a candidate slot gets a building
    pub building_chance: f64,
    /// Chance that a building is decorative (blue, background)
    pub blue_chance: f64,
    /// Horizontal gap kept free of buildings on both sides of the pad
    pub pad_clearance: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            length: 6000.0,
            pad_width: 100.0,
            pad_window_start: 1.0 / 3.0,
            pad_window_end: 0.5,
            min_step: 10.0,
            max_step: 40.0,
            noise_amplitude: 25.0,
            min_building_spacing: 60.0,
            max_building_spacing: 100.0,
            building_chance: 0.3,
            blue_chance: 0.5,
            pad_clearance: 40.0,
        }
    }
}

impl WorldConfig {
    /// World-space x range in which the pad may start
    pub fn pad_window(&self) -> (f64, f64) {
        (
            self.length * self.pad_window_start,
            self.length * self.pad_window_end,
        )
    }
}

/// How drag is applied each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DampingModel {
    /// v *= 1 - k*dt (tuned feel; diverges at very low frame rates)
    #[default]
    Linear,
    /// v *= exp(-k*dt)
    Exponential,
}

impl DampingModel {
    /// Multiplicative factor for drag coefficient `k` over `dt`
    pub fn factor(&self, k: f64, dt: f64) -> f64 {
        match self {
            DampingModel::Linear => 1.0 - k * dt,
            DampingModel::Exponential => (-k * dt).exp(),
        }
    }

    /// Whether `k` keeps the per-tick factor in (0, 1]
    pub fn accepts(&self, k: f64) -> bool {
        let sane = k.is_finite() && k >= 0.0;
        match self {
            DampingModel::Linear => sane && k * SIM_DT < 1.0,
            DampingModel::Exponential => sane,
        }
    }
}

/// Rocket physics balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Downward acceleration (units/s²)
    pub gravity: f64,
    /// Base engine thrust; main engines use half, pitch engines 25x
    pub thrust_power: f64,
    pub linear_drag: f64,
    pub angular_drag: f64,
    pub damping: DampingModel,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 60.0,
            thrust_power: 150.0,
            linear_drag: 0.1,
            angular_drag: 0.2,
            damping: DampingModel::Linear,
        }
    }
}

/// Safe landing envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingEnvelope {
    pub max_vertical_speed: f64,
    pub max_horizontal_drift: f64,
    pub max_tilt_deg: f64,
    /// How close the rocket's bottom must be to the pad surface to count as touching
    pub touchdown_tolerance: f64,
}

impl Default for LandingEnvelope {
    fn default() -> Self {
        Self {
            max_vertical_speed: 50.0,
            max_horizontal_drift: 50.0,
            max_tilt_deg: 20.0,
            touchdown_tolerance: 5.0,
        }
    }
}

impl LandingEnvelope {
    pub fn vertical_ok(&self, vy: f64) -> bool {
        vy.abs() < self.max_vertical_speed
    }

    pub fn horizontal_ok(&self, vx: f64) -> bool {
        vx.abs() < self.max_horizontal_drift
    }

    pub fn tilt_ok(&self, tilt_deg: f64) -> bool {
        tilt_deg.abs() < self.max_tilt_deg
    }

    /// All three conditions of a safe touchdown
    pub fn is_safe(&self, velocity: DVec2, tilt_deg: f64) -> bool {
        self.vertical_ok(velocity.y) && self.horizontal_ok(velocity.x) && self.tilt_ok(tilt_deg)
    }
}

/// All game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub viewport: ViewportConfig,
    pub world: WorldConfig,
    pub physics: PhysicsTuning,
    pub landing: LandingEnvelope,
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.validated())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Replace values that would break generation or physics with defaults
    pub fn validated(mut self) -> Self {
        let defaults = Settings::default();

        if !(self.viewport.width > 0.0 && self.viewport.height > 0.0) {
            log::warn!(
                "Invalid viewport {}x{}, using default",
                self.viewport.width,
                self.viewport.height
            );
            self.viewport = defaults.viewport;
        }

        let w = &self.world;
        let (pad_lo, pad_hi) = w.pad_window();
        let world_ok = w.length > 0.0
            && w.pad_width > 0.0
            && w.min_step > 0.0
            && w.min_step <= w.max_step
            && w.min_building_spacing > 0.0
            && w.min_building_spacing <= w.max_building_spacing
            && pad_lo >= 0.0
            && pad_lo <= pad_hi
            && pad_hi + w.pad_width + w.max_step < w.length
            && (0.0..=1.0).contains(&w.building_chance)
            && (0.0..=1.0).contains(&w.blue_chance);
        if !world_ok {
            log::warn!("Invalid world config, using default");
            self.world = defaults.world;
        }

        let p = &self.physics;
        if !(p.gravity.is_finite() && p.thrust_power.is_finite())
            || !p.damping.accepts(p.linear_drag)
            || !p.damping.accepts(p.angular_drag)
        {
            log::warn!("Invalid physics tuning, using default");
            self.physics = defaults.physics;
        }

        let l = &self.landing;
        if l.max_vertical_speed <= 0.0
            || l.max_horizontal_drift <= 0.0
            || l.max_tilt_deg <= 0.0
            || l.touchdown_tolerance <= 0.0
        {
            log::warn!("Invalid landing envelope, using default");
            self.landing = defaults.landing;
        }

        self
    }
}
