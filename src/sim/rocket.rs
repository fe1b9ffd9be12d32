//! Rocket dynamics
//!
//! Thrust always acts along the rocket's local "up" axis rotated into world
//! space, so tilting the rocket steers it. Torque comes from the engine mount
//! offset crossed with the thrust vector rather than per-engine tuning.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::particle::{Particle, update_particles};
use super::rng::UnitRng;
use crate::consts::*;
use crate::settings::PhysicsTuning;
use crate::{deg_to_rad, normalize_degrees, rotate_deg};

/// Local-space hull: nose, right tail, left tail
pub const HULL: [DVec2; 3] = [
    DVec2::new(0.0, -20.0),
    DVec2::new(10.0, 10.0),
    DVec2::new(-10.0, 10.0),
];

/// Flight state; Landed and Crashed are terminal until reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlightState {
    #[default]
    Flying,
    Landed,
    Crashed,
}

/// Which engine of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// -1 for left, +1 for right
    pub fn sign(&self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Engine pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Engine {
    /// Bottom engines: translation plus a little torque
    Main,
    /// Top engines: reaction control, rotation only
    Pitch,
}

impl Engine {
    /// Mount point in local space
    pub fn offset(&self, side: Side) -> DVec2 {
        let (x, y) = match self {
            Engine::Main => MAIN_ENGINE_OFFSET,
            Engine::Pitch => PITCH_ENGINE_OFFSET,
        };
        DVec2::new(x * side.sign(), y)
    }

    fn power(&self) -> f64 {
        match self {
            Engine::Main => MAIN_ENGINE_POWER,
            Engine::Pitch => PITCH_ENGINE_POWER,
        }
    }

    fn torque_divisor(&self) -> f64 {
        match self {
            Engine::Main => MAIN_TORQUE_DIVISOR,
            Engine::Pitch => PITCH_TORQUE_DIVISOR,
        }
    }
}

/// The player's rocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    /// World position (x unbounded, wrapped for gameplay)
    pub position: DVec2,
    /// Units per second
    pub velocity: DVec2,
    /// Degrees, normalized to [-180, 180) after every integration
    pub orientation: f64,
    /// Degrees per second
    pub angular_velocity: f64,
    pub particles: Vec<Particle>,
    pub state: FlightState,
}

impl Rocket {
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            orientation: 0.0,
            angular_velocity: 0.0,
            particles: Vec::new(),
            state: FlightState::Flying,
        }
    }

    #[inline]
    pub fn is_flying(&self) -> bool {
        self.state == FlightState::Flying
    }

    /// Fire one bottom engine for a tick
    pub fn apply_main_thrust(&mut self, side: Side, physics: &PhysicsTuning, dt: f64) {
        let thrust = self.fire(Engine::Main, side, physics, dt);
        self.velocity += thrust * dt;
    }

    /// Fire one top engine for a tick (no translation)
    pub fn apply_pitch_thrust(&mut self, side: Side, physics: &PhysicsTuning, dt: f64) {
        self.fire(Engine::Pitch, side, physics, dt);
    }

    /// Apply the engine's torque and return its world-space thrust vector
    fn fire(&mut self, engine: Engine, side: Side, physics: &PhysicsTuning, dt: f64) -> DVec2 {
        let local_thrust = DVec2::new(0.0, -physics.thrust_power * engine.power());
        let world_thrust = rotate_deg(local_thrust, self.orientation);
        let world_offset = rotate_deg(engine.offset(side), self.orientation);
        let torque = world_offset.perp_dot(world_thrust);
        self.angular_velocity += torque / engine.torque_divisor() * dt;
        world_thrust
    }

    /// Spawn one exhaust particle from a bottom engine
    pub fn emit_exhaust<R: UnitRng + ?Sized>(&mut self, side: Side, rng: &mut R) {
        self.emit(Engine::Main, side, rng);
    }

    /// Spawn one exhaust particle from a top engine
    pub fn emit_top_exhaust<R: UnitRng + ?Sized>(&mut self, side: Side, rng: &mut R) {
        self.emit(Engine::Pitch, side, rng);
    }

    fn emit<R: UnitRng + ?Sized>(&mut self, engine: Engine, side: Side, rng: &mut R) {
        let pos = self.engine_position(engine, side);
        // Exhaust leaves opposite to thrust, i.e. along local "down"
        let jitter = rng.range(-EXHAUST_JITTER_RAD, EXHAUST_JITTER_RAD);
        let dir = DVec2::from_angle(deg_to_rad(self.orientation) + jitter).rotate(DVec2::Y);
        let speed = rng.range(EXHAUST_MIN_SPEED, EXHAUST_MAX_SPEED);
        let lifetime = rng.range(EXHAUST_MIN_LIFETIME, EXHAUST_MAX_LIFETIME);
        self.particles.push(Particle::new(pos, dir * speed, lifetime));
    }

    /// Advance one fixed step. No-op once landed or crashed.
    pub fn integrate(&mut self, physics: &PhysicsTuning, dt: f64) {
        if !self.is_flying() {
            return;
        }

        self.velocity.y += physics.gravity * dt;
        self.position += self.velocity * dt;
        self.orientation += self.angular_velocity * dt;

        self.velocity *= physics.damping.factor(physics.linear_drag, dt);
        self.angular_velocity *= physics.damping.factor(physics.angular_drag, dt);

        self.orientation = normalize_degrees(self.orientation);

        update_particles(&mut self.particles, physics.gravity, dt);
    }

    /// Hull rotated by orientation and moved to position
    pub fn transformed_hull(&self) -> [DVec2; 3] {
        HULL.map(|p| rotate_deg(p, self.orientation) + self.position)
    }

    /// Midpoint of the two tail points (the touchdown point)
    pub fn bottom_center(&self) -> DVec2 {
        let hull = self.transformed_hull();
        (hull[1] + hull[2]) / 2.0
    }

    /// World position of an engine mount
    pub fn engine_position(&self, engine: Engine, side: Side) -> DVec2 {
        self.position + rotate_deg(engine.offset(side), self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;

    fn physics() -> PhysicsTuning {
        PhysicsTuning::default()
    }

    #[test]
    fn test_main_thrust_torque_signs_oppose() {
        let mut left = Rocket::new(DVec2::ZERO);
        let mut right = Rocket::new(DVec2::ZERO);
        left.apply_main_thrust(Side::Left, &physics(), SIM_DT);
        right.apply_main_thrust(Side::Right, &physics(), SIM_DT);

        assert!(left.angular_velocity > 0.0);
        assert!(right.angular_velocity < 0.0);
        assert!((left.angular_velocity + right.angular_velocity).abs() < 1e-12);
        // 150 * 0.5 * 10 / 100 / 60
        assert!((left.angular_velocity - 0.125).abs() < 1e-12);
    }

    #[test]
    fn test_main_thrust_pushes_along_nose() {
        let mut rocket = Rocket::new(DVec2::ZERO);
        rocket.apply_main_thrust(Side::Left, &physics(), SIM_DT);
        assert_eq!(rocket.velocity.x, 0.0);
        assert!((rocket.velocity.y - (-75.0 / 60.0)).abs() < 1e-12);

        // Tilted 90 degrees clockwise, "up" is +x
        let mut tilted = Rocket::new(DVec2::ZERO);
        tilted.orientation = 90.0;
        tilted.apply_main_thrust(Side::Right, &physics(), SIM_DT);
        assert!((tilted.velocity.x - 75.0 / 60.0).abs() < 1e-9);
        assert!(tilted.velocity.y.abs() < 1e-9);
    }

    #[test]
    fn test_pitch_thrust_rotates_only() {
        let mut rocket = Rocket::new(DVec2::ZERO);
        rocket.apply_pitch_thrust(Side::Left, &physics(), SIM_DT);
        assert_eq!(rocket.velocity, DVec2::ZERO);
        // (-5 * -3750) / 200 / 60
        assert!((rocket.angular_velocity - 1.5625).abs() < 1e-12);

        let mut other = Rocket::new(DVec2::ZERO);
        other.apply_pitch_thrust(Side::Right, &physics(), SIM_DT);
        assert!(other.angular_velocity < 0.0);
    }

    #[test]
    fn test_integrate_gravity_and_drag() {
        let mut rocket = Rocket::new(DVec2::new(100.0, 100.0));
        rocket.integrate(&physics(), SIM_DT);
        let expected_vy = 1.0 * (1.0 - 0.1 * SIM_DT);
        assert!((rocket.velocity.y - expected_vy).abs() < 1e-12);
        assert!((rocket.position.y - (100.0 + 1.0 / 60.0)).abs() < 1e-12);
        assert_eq!(rocket.position.x, 100.0);
    }

    #[test]
    fn test_orientation_normalized_after_integrate() {
        let mut rocket = Rocket::new(DVec2::ZERO);
        rocket.orientation = 179.0;
        rocket.angular_velocity = 600.0;
        rocket.integrate(&physics(), SIM_DT);
        assert!((rocket.orientation - (-171.0)).abs() < 1e-9);

        rocket.angular_velocity = -1.0e7;
        for _ in 0..100 {
            rocket.integrate(&physics(), SIM_DT);
            assert!((-180.0..180.0).contains(&rocket.orientation));
        }
    }

    #[test]
    fn test_terminal_rocket_is_frozen() {
        let mut rocket = Rocket::new(DVec2::new(5.0, 6.0));
        rocket.velocity = DVec2::new(3.0, 4.0);
        rocket.angular_velocity = 10.0;
        rocket.orientation = 12.0;
        rocket.state = FlightState::Crashed;
        for _ in 0..10 {
            rocket.integrate(&physics(), SIM_DT);
        }
        assert_eq!(rocket.position, DVec2::new(5.0, 6.0));
        assert_eq!(rocket.velocity, DVec2::new(3.0, 4.0));
        assert_eq!(rocket.orientation, 12.0);
    }

    #[test]
    fn test_transformed_hull_and_bottom_center() {
        let mut rocket = Rocket::new(DVec2::new(50.0, 50.0));
        let hull = rocket.transformed_hull();
        assert_eq!(hull[0], DVec2::new(50.0, 30.0));
        assert_eq!(rocket.bottom_center(), DVec2::new(50.0, 60.0));

        rocket.orientation = 180.0;
        let bottom = rocket.bottom_center();
        assert!((bottom.x - 50.0).abs() < 1e-9);
        assert!((bottom.y - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_exhaust_particle_ranges() {
        let mut rocket = Rocket::new(DVec2::new(0.0, 0.0));
        // jitter=0 (mid), speed=75, lifetime=0.75
        let mut rng = ScriptedRng::constant(0.5);
        rocket.emit_exhaust(Side::Left, &mut rng);
        let p = &rocket.particles[0];
        assert_eq!(p.pos, DVec2::new(-10.0, 10.0));
        assert!(p.vel.x.abs() < 1e-9);
        assert!((p.vel.y - 75.0).abs() < 1e-9);
        assert!((p.lifetime - 0.75).abs() < 1e-12);

        // Top engines emit from the nose mounts
        rocket.emit_top_exhaust(Side::Right, &mut rng);
        assert_eq!(rocket.particles[1].pos, DVec2::new(5.0, -20.0));
    }

    #[test]
    fn test_tilted_exhaust_leaves_engine_mount() {
        let mut rocket = Rocket::new(DVec2::new(100.0, 50.0));
        rocket.orientation = 90.0;
        let mount = rocket.engine_position(Engine::Main, Side::Left);
        assert!((mount - DVec2::new(90.0, 40.0)).length() < 1e-9);

        rocket.emit_exhaust(Side::Left, &mut ScriptedRng::constant(0.5));
        assert!((rocket.particles[0].pos - mount).length() < 1e-12);
        // Lying on its right side, exhaust blows to the left
        assert!((rocket.particles[0].vel.x + 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_exhaust_jitter_bounded() {
        let mut rocket = Rocket::new(DVec2::ZERO);
        let mut rng = ScriptedRng::new(vec![0.0, 0.0, 0.0, 0.999, 0.999, 0.999]);
        rocket.emit_exhaust(Side::Right, &mut rng);
        rocket.emit_exhaust(Side::Right, &mut rng);
        for p in &rocket.particles {
            let angle = p.vel.x.atan2(p.vel.y).abs();
            assert!(angle <= EXHAUST_JITTER_RAD + 1e-9);
            let speed = p.vel.length();
            assert!(speed > EXHAUST_MIN_SPEED - 1e-9 && speed < EXHAUST_MAX_SPEED);
            assert!((EXHAUST_MIN_LIFETIME..EXHAUST_MAX_LIFETIME).contains(&p.lifetime));
        }
    }

    #[test]
    fn test_particles_frozen_with_rocket() {
        let mut rocket = Rocket::new(DVec2::ZERO);
        rocket.particles.push(Particle::new(DVec2::ZERO, DVec2::ZERO, 0.5));
        for _ in 0..30 {
            rocket.integrate(&physics(), SIM_DT);
        }
        assert_eq!(rocket.particles.len(), 1);
        rocket.integrate(&physics(), SIM_DT);
        assert!(rocket.particles.is_empty());
    }
}
