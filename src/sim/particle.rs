//! Exhaust particles
//!
//! Purely visual: ballistic motion under gravity, faded out by remaining lifetime.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// A single exhaust particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: DVec2,
    pub vel: DVec2,
    /// Seconds left; removed once this reaches zero
    pub lifetime: f64,
}

impl Particle {
    pub fn new(pos: DVec2, vel: DVec2, lifetime: f64) -> Self {
        Self { pos, vel, lifetime }
    }

    /// Advance one step (position first, then gravity, then age)
    pub fn update(&mut self, gravity: f64, dt: f64) {
        self.pos += self.vel * dt;
        self.vel.y += gravity * dt;
        self.lifetime -= dt;
    }

    pub fn is_alive(&self) -> bool {
        self.lifetime > 0.0
    }

    /// Render opacity, 1.0 for anything with a second or more left
    pub fn alpha(&self) -> f64 {
        self.lifetime.clamp(0.0, 1.0)
    }
}

/// Advance all particles and drop the dead ones
pub fn update_particles(particles: &mut Vec<Particle>, gravity: f64, dt: f64) {
    particles.retain_mut(|p| {
        p.update(gravity, dt);
        p.is_alive()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_particle_ballistic_step() {
        let mut p = Particle::new(DVec2::ZERO, DVec2::new(60.0, 0.0), 1.0);
        p.update(60.0, SIM_DT);
        assert!((p.pos.x - 1.0).abs() < 1e-12);
        assert_eq!(p.pos.y, 0.0);
        assert!((p.vel.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_particle_lifecycle_thirty_ticks() {
        let mut particles = vec![Particle::new(DVec2::ZERO, DVec2::ZERO, 0.5)];
        for _ in 0..30 {
            update_particles(&mut particles, 60.0, SIM_DT);
        }
        assert_eq!(particles.len(), 1);
        update_particles(&mut particles, 60.0, SIM_DT);
        assert!(particles.is_empty());
    }

    #[test]
    fn test_alpha_fades() {
        let p = Particle::new(DVec2::ZERO, DVec2::ZERO, 0.25);
        assert_eq!(p.alpha(), 0.25);
        let p = Particle::new(DVec2::ZERO, DVec2::ZERO, 3.0);
        assert_eq!(p.alpha(), 1.0);
    }
}
