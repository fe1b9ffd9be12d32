//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod building;
pub mod camera;
pub mod collision;
pub mod particle;
pub mod rng;
pub mod rocket;
pub mod state;
pub mod telemetry;
pub mod terrain;
pub mod tick;

pub use building::{Building, BuildingKind, Dome, WindowStyle};
pub use camera::Camera;
pub use collision::{Contact, check_collision, hull_hits_rect, resolve, segments_intersect};
pub use particle::Particle;
pub use rng::{ScriptedRng, UnitRng};
pub use rocket::{Engine, FlightState, HULL, Rocket, Side};
pub use state::GameState;
pub use telemetry::{Reading, Telemetry, message_line_alpha};
pub use terrain::{LandingPad, Terrain};
pub use tick::{TickInput, tick};
