//! Wrapping height-field terrain with a single landing pad
//!
//! The profile runs from x = 0 to x = length and closes on the starting
//! height, so three copies at -length, 0, +length tile seamlessly.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::building::{Building, generate_buildings};
use super::rng::UnitRng;
use crate::settings::WorldConfig;
use crate::wrap_coordinate;

/// The flat landing pad
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandingPad {
    pub start: f64,
    pub end: f64,
    /// Pad surface height (y-down)
    pub surface_y: f64,
}

impl LandingPad {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new((self.start + self.end) / 2.0, self.surface_y)
    }

    /// Inclusive test on a wrapped x
    pub fn spans(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }
}

/// Generated world: ground profile, pad and buildings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Terrain {
    /// World length (the profile covers [0, length])
    pub length: f64,
    /// Ground samples with strictly increasing x
    pub profile: Vec<DVec2>,
    pub landing_pad: LandingPad,
    pub buildings: Vec<Building>,
}

impl Terrain {
    /// Build a fresh world: profile and pad first, then buildings on top
    pub fn generate<R: UnitRng + ?Sized>(config: &WorldConfig, surface_y: f64, rng: &mut R) -> Self {
        let (profile, landing_pad) = generate_profile(config, surface_y, rng);
        let mut terrain = Self {
            length: config.length,
            profile,
            landing_pad,
            buildings: Vec::new(),
        };
        terrain.buildings = generate_buildings(config, &terrain, rng);

        log::debug!(
            "Generated world: {} samples, pad {:.0}..{:.0}, {} buildings ({} solid)",
            terrain.profile.len(),
            terrain.landing_pad.start,
            terrain.landing_pad.end,
            terrain.buildings.len(),
            terrain.buildings.iter().filter(|b| b.is_solid()).count()
        );
        terrain
    }

    /// Build from an explicit profile (must start at 0 and end at `length`)
    pub fn from_profile(profile: Vec<DVec2>, landing_pad: LandingPad, buildings: Vec<Building>) -> Self {
        let length = profile.last().map(|p| p.x).unwrap_or(0.0);
        Self {
            length,
            profile,
            landing_pad,
            buildings,
        }
    }

    /// Ground height under any world x (wrapped). None only for a malformed profile.
    pub fn height_at(&self, x: f64) -> Option<f64> {
        let x = wrap_coordinate(x, self.length);
        self.profile.windows(2).find_map(|seg| {
            let (a, b) = (seg[0], seg[1]);
            let span = b.x - a.x;
            // Zero-width segments are vertical walls; the neighbours cover them
            if span <= 0.0 || x < a.x || x > b.x {
                return None;
            }
            Some(a.y + (b.y - a.y) * ((x - a.x) / span))
        })
    }
}

/// Walk x across the world, emitting noisy samples and one flat pad
pub fn generate_profile<R: UnitRng + ?Sized>(
    config: &WorldConfig,
    surface_y: f64,
    rng: &mut R,
) -> (Vec<DVec2>, LandingPad) {
    let (window_start, window_end) = config.pad_window();
    let mut profile = Vec::new();
    let mut pad: Option<LandingPad> = None;
    let mut x = 0.0;

    while x < config.length {
        if pad.is_none() && x >= window_start && x <= window_end {
            let end = x + config.pad_width;
            profile.push(DVec2::new(x, surface_y));
            profile.push(DVec2::new(end, surface_y));
            pad = Some(LandingPad {
                start: x,
                end,
                surface_y,
            });
            x = end + rng.range(config.min_step, config.max_step);
        } else {
            let noise = rng.range(-config.noise_amplitude, config.noise_amplitude);
            profile.push(DVec2::new(x, surface_y + noise));
            x += rng.range(config.min_step, config.max_step);
        }
    }

    // Close the loop on the starting height
    let first_y = profile.first().map(|p| p.y).unwrap_or(surface_y);
    profile.push(DVec2::new(config.length, first_y));

    // A validated config always reaches the window; keep the pad guarantee regardless
    let pad = pad.unwrap_or_else(|| {
        log::warn!("Pad window never reached, flattening at window start");
        flatten_pad(&mut profile, window_start, config.pad_width, surface_y)
    });

    (profile, pad)
}

/// Carve a flat pad into an existing profile
fn flatten_pad(profile: &mut Vec<DVec2>, start: f64, width: f64, surface_y: f64) -> LandingPad {
    let end = start + width;
    profile.retain(|p| p.x < start || p.x > end);
    let at = profile.partition_point(|p| p.x < start);
    profile.insert(at, DVec2::new(start, surface_y));
    profile.insert(at + 1, DVec2::new(end, surface_y));
    LandingPad {
        start,
        end,
        surface_y,
    }
}
