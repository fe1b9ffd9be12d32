//! Game state
//!
//! The aggregate root of one run: rocket, generated world, camera and the
//! seeded RNG everything random draws from.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use super::camera::Camera;
use super::collision::Contact;
use super::rocket::{FlightState, Rocket};
use super::telemetry::Telemetry;
use super::terrain::Terrain;
use crate::settings::{Settings, ViewportConfig};
use crate::shortest_wrapped_delta;

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the current world was generated from
    pub seed: u64,
    /// Drives generation, exhaust jitter and the next run's seed
    pub(crate) rng: Pcg32,
    pub settings: Settings,
    pub rocket: Rocket,
    pub terrain: Terrain,
    pub camera: Camera,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds since landing or crashing; None while flying
    pub end_timer: Option<f64>,
    /// Contact that ended the run (None while flying)
    pub last_contact: Contact,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let terrain = Terrain::generate(&settings.world, settings.viewport.surface_y(), &mut rng);
        let rocket = Rocket::new(settings.viewport.spawn_point());
        log::info!("New run, seed {seed}");
        Self {
            seed,
            rng,
            settings,
            rocket,
            terrain,
            camera: Camera::new(),
            time_ticks: 0,
            end_timer: None,
            last_contact: Contact::None,
        }
    }

    /// Start over on a fresh world. Safe to call at any time.
    pub fn reset(&mut self) {
        let seed = self.rng.next_u64();
        self.reset_with_seed(seed);
    }

    /// Start over on the world generated from `seed`
    pub fn reset_with_seed(&mut self, seed: u64) {
        let settings = std::mem::take(&mut self.settings);
        *self = Self::new(seed, settings);
    }

    pub fn flight_state(&self) -> FlightState {
        self.rocket.state
    }

    /// Landed or crashed
    pub fn is_over(&self) -> bool {
        !self.rocket.is_flying()
    }

    /// Apply a new viewport. The world keeps its generated heights.
    pub fn set_viewport(&mut self, viewport: ViewportConfig) {
        self.settings.viewport = viewport;
    }

    /// Direction (radians, y-down) from the rocket to the pad centre, the short way around
    pub fn pad_bearing(&self) -> f64 {
        let pad = self.terrain.landing_pad.center();
        let dx = shortest_wrapped_delta(self.rocket.position.x, pad.x, self.terrain.length);
        let dy = pad.y - self.rocket.position.y;
        dy.atan2(dx)
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::from_rocket(&self.rocket, &self.settings.landing)
    }
}
