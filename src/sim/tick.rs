//! Fixed timestep simulation tick
//!
//! Camera first, then input, dynamics and collision while the rocket flies.

use super::collision::{Contact, check_collision};
use super::rocket::Side;
use super::state::GameState;

/// Control channels asserted for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left bottom engine
    pub thrust_left: bool,
    /// Right bottom engine
    pub thrust_right: bool,
    /// Left top engine
    pub pitch_left: bool,
    /// Right top engine
    pub pitch_right: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.thrust_left || self.thrust_right || self.pitch_left || self.pitch_right
    }

    /// Channel-wise OR (keyboard and pointer may assert the same channel)
    pub fn union(self, other: TickInput) -> TickInput {
        TickInput {
            thrust_left: self.thrust_left || other.thrust_left,
            thrust_right: self.thrust_right || other.thrust_right,
            pitch_left: self.pitch_left || other.pitch_left,
            pitch_right: self.pitch_right || other.pitch_right,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f64) -> Contact {
    // The camera keeps framing a landed or crashed rocket
    state
        .camera
        .update(state.rocket.position, &state.settings.viewport, state.terrain.length);
    state.time_ticks += 1;

    if !state.rocket.is_flying() {
        if let Some(elapsed) = state.end_timer.as_mut() {
            *elapsed += dt;
        }
        return Contact::None;
    }

    let physics = &state.settings.physics;
    let rocket = &mut state.rocket;
    let rng = &mut state.rng;

    if input.thrust_left {
        rocket.apply_main_thrust(Side::Left, physics, dt);
        rocket.emit_exhaust(Side::Left, rng);
    }
    if input.thrust_right {
        rocket.apply_main_thrust(Side::Right, physics, dt);
        rocket.emit_exhaust(Side::Right, rng);
    }
    if input.pitch_left {
        rocket.apply_pitch_thrust(Side::Left, physics, dt);
        rocket.emit_top_exhaust(Side::Left, rng);
    }
    if input.pitch_right {
        rocket.apply_pitch_thrust(Side::Right, physics, dt);
        rocket.emit_top_exhaust(Side::Right, rng);
    }

    rocket.integrate(physics, dt);

    let contact = check_collision(rocket, &state.terrain, &state.settings.landing);
    if contact.outcome().is_some() {
        let v = rocket.velocity;
        log::info!(
            "{} at tick {}: vx={:.1} vy={:.1} tilt={:.1}",
            contact.describe(),
            state.time_ticks,
            v.x,
            v.y,
            rocket.orientation
        );
        state.end_timer = Some(0.0);
        state.last_contact = contact;
    }
    contact
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::rocket::FlightState;
    use glam::DVec2;

    /// Fresh run with the rocket parked above the pad centre
    fn above_pad(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Settings::default());
        let pad = state.terrain.landing_pad.center();
        state.rocket.position = DVec2::new(pad.x, 100.0);
        state
    }

    fn fly(state: &mut GameState, controller: impl Fn(&GameState) -> TickInput) -> Contact {
        for _ in 0..5000 {
            let input = controller(state);
            let contact = tick(state, &input, SIM_DT);
            if contact != Contact::None {
                return contact;
            }
        }
        Contact::None
    }

    #[test]
    fn test_balanced_descent_lands() {
        for seed in [1, 2, 3] {
            let mut state = above_pad(seed);
            let contact = fly(&mut state, |s| {
                let brake = s.rocket.velocity.y > 30.0;
                TickInput {
                    thrust_left: brake,
                    thrust_right: brake,
                    ..TickInput::default()
                }
            });
            assert_eq!(contact, Contact::Landed, "seed {seed}");
            assert_eq!(state.flight_state(), FlightState::Landed);
            assert_eq!(state.rocket.velocity.x, 0.0);
            assert_eq!(state.rocket.orientation, 0.0);
            assert_eq!(state.end_timer, Some(0.0));
        }
    }

    #[test]
    fn test_free_fall_crashes() {
        for seed in [1, 2, 3] {
            let mut state = above_pad(seed);
            let contact = fly(&mut state, |_| TickInput::default());
            assert_eq!(contact, Contact::HardLanding, "seed {seed}");
            assert_eq!(state.flight_state(), FlightState::Crashed);
            assert!(state.rocket.velocity.y >= 50.0);
        }
    }

    #[test]
    fn test_terminal_state_is_frozen() {
        let mut state = above_pad(9);
        fly(&mut state, |_| TickInput::default());
        assert_eq!(state.flight_state(), FlightState::Crashed);
        let (pos, vel, angle) = (state.rocket.position, state.rocket.velocity, state.rocket.orientation);
        let all = TickInput {
            thrust_left: true,
            thrust_right: true,
            pitch_left: true,
            pitch_right: true,
        };
        for _ in 0..60 {
            assert_eq!(tick(&mut state, &all, SIM_DT), Contact::None);
        }
        assert_eq!(state.rocket.position, pos);
        assert_eq!(state.rocket.velocity, vel);
        assert_eq!(state.rocket.orientation, angle);
        assert_eq!(state.flight_state(), FlightState::Crashed);
        assert_eq!(state.last_contact, Contact::HardLanding);
        let elapsed = state.end_timer.unwrap();
        assert!((elapsed - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_camera_updates_after_landing() {
        let mut state = above_pad(4);
        state.rocket.state = FlightState::Landed;
        // Pad sits well right of the dead zone, so the camera keeps moving
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.camera.world_offset_x > 0.0);
    }

    #[test]
    fn test_channels_combine() {
        let mut state = GameState::new(6, Settings::default());
        let input = TickInput {
            thrust_left: true,
            pitch_right: true,
            ..TickInput::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.rocket.particles.len(), 2);
        // The top engine's torque outweighs the bottom engine's
        assert!(state.rocket.angular_velocity < 0.0);
        assert!(state.rocket.velocity.y < 0.0);
    }

    #[test]
    fn test_pitch_only_rotates() {
        let mut state = GameState::new(6, Settings::default());
        state.settings.physics.gravity = 0.0;
        let input = TickInput {
            pitch_left: true,
            ..TickInput::default()
        };
        tick(&mut state, &input, SIM_DT);
        assert!(state.rocket.angular_velocity > 0.0);
        assert_eq!(state.rocket.velocity, DVec2::ZERO);
    }

    #[test]
    fn test_input_union() {
        let keys = TickInput {
            thrust_left: true,
            ..TickInput::default()
        };
        let touch = TickInput {
            pitch_right: true,
            ..TickInput::default()
        };
        let both = keys.union(touch);
        assert!(both.thrust_left && both.pitch_right);
        assert!(!both.thrust_right && !both.pitch_left);
        assert!(!TickInput::default().any());
    }
}
