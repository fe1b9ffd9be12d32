//! Collision resolution against the wrapped world
//!
//! Order matters: the pad is checked first, then solid buildings, then the
//! ground. The first contact found decides the outcome for the tick.

use glam::DVec2;

use super::building::Building;
use super::rocket::{FlightState, Rocket};
use super::terrain::Terrain;
use crate::consts::BUILDING_MARGIN;
use crate::settings::LandingEnvelope;
use crate::{Rect, wrap_coordinate};

/// What the rocket touched this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Still airborne
    None,
    /// Touched the pad inside the safe envelope
    Landed,
    /// Touched the pad too fast or too tilted
    HardLanding,
    /// Hit a solid building (index into `Terrain::buildings`)
    Building(usize),
    Terrain,
}

impl Contact {
    /// Flight state this contact leads to, if any
    pub fn outcome(&self) -> Option<FlightState> {
        match self {
            Contact::None => None,
            Contact::Landed => Some(FlightState::Landed),
            Contact::HardLanding | Contact::Building(_) | Contact::Terrain => {
                Some(FlightState::Crashed)
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Contact::None => "airborne",
            Contact::Landed => "safe touchdown",
            Contact::HardLanding => "hard landing",
            Contact::Building(_) => "building impact",
            Contact::Terrain => "terrain impact",
        }
    }
}

/// Run the collision checks and apply the outcome. No-op unless flying.
pub fn check_collision(rocket: &mut Rocket, terrain: &Terrain, envelope: &LandingEnvelope) -> Contact {
    if !rocket.is_flying() {
        return Contact::None;
    }
    let contact = resolve(rocket, terrain, envelope);
    if let Some(state) = contact.outcome() {
        rocket.state = state;
    }
    contact
}

/// Classify the rocket's contact with the world without mutating anything
pub fn resolve(rocket: &Rocket, terrain: &Terrain, envelope: &LandingEnvelope) -> Contact {
    let bottom = rocket.bottom_center();
    let wrapped_x = wrap_coordinate(bottom.x, terrain.length);

    let pad = &terrain.landing_pad;
    if pad.spans(wrapped_x) && (bottom.y - pad.surface_y).abs() < envelope.touchdown_tolerance {
        return if envelope.is_safe(rocket.velocity, rocket.orientation) {
            Contact::Landed
        } else {
            Contact::HardLanding
        };
    }

    // Bring the hull into the same wrapped frame as the buildings
    let shift = DVec2::new(wrapped_x - bottom.x, 0.0);
    let hull = rocket.transformed_hull().map(|p| p + shift);
    if let Some(index) = building_hit(&hull, &terrain.buildings, terrain.length) {
        return Contact::Building(index);
    }

    match terrain.height_at(wrapped_x) {
        Some(ground) if bottom.y >= ground => Contact::Terrain,
        _ => Contact::None,
    }
}

/// First solid building (any toroidal copy) the hull touches
fn building_hit(hull: &[DVec2], buildings: &[Building], length: f64) -> Option<usize> {
    buildings
        .iter()
        .enumerate()
        .filter(|(_, b)| b.is_solid())
        .find(|(_, b)| {
            let bounds = b.footprint().shrunk(BUILDING_MARGIN);
            [-1.0, 0.0, 1.0]
                .iter()
                .any(|k| hull_hits_rect(hull, &bounds.shifted_x(k * length)))
        })
        .map(|(index, _)| index)
}

/// True if any hull vertex is inside the rectangle or any hull edge crosses one of its edges
pub fn hull_hits_rect(hull: &[DVec2], rect: &Rect) -> bool {
    if hull.iter().any(|&p| rect.contains(p)) {
        return true;
    }
    let n = hull.len();
    (0..n).any(|i| {
        let (a, b) = (hull[i], hull[(i + 1) % n]);
        rect.edges()
            .iter()
            .any(|&(c, d)| segments_intersect(a, b, c, d))
    })
}

/// Segment-segment intersection (endpoints inclusive). Parallel or collinear
/// segments never intersect.
pub fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = r.perp_dot(s);
    if denom == 0.0 {
        return false;
    }
    let qp = q1 - p1;
    let t = qp.perp_dot(s) / denom;
    let u = qp.perp_dot(r) / denom;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotate_deg;
    use crate::sim::building::BuildingKind;
    use crate::sim::rocket::HULL;
    use crate::sim::terrain::LandingPad;
    use proptest::prelude::*;

    const GROUND: f64 = 500.0;

    fn flat_world(buildings: Vec<Building>) -> Terrain {
        let pad = LandingPad {
            start: 1000.0,
            end: 1100.0,
            surface_y: GROUND,
        };
        Terrain::from_profile(
            vec![
                DVec2::new(0.0, GROUND),
                DVec2::new(1000.0, GROUND),
                DVec2::new(1100.0, GROUND),
                DVec2::new(6000.0, GROUND),
            ],
            pad,
            buildings,
        )
    }

    fn building(x: f64, base: f64, width: f64, height: f64, is_blue: bool) -> Building {
        Building {
            x,
            y: base,
            width,
            height,
            is_blue,
            kind: BuildingKind::Standard,
            windows: Vec::new(),
        }
    }

    /// Rocket whose bottom centre sits exactly at `bottom`
    fn rocket_at(bottom: DVec2, angle: f64, velocity: DVec2) -> Rocket {
        let tail_mid = (HULL[1] + HULL[2]) / 2.0;
        let mut rocket = Rocket::new(bottom - rotate_deg(tail_mid, angle));
        rocket.orientation = angle;
        rocket.velocity = velocity;
        rocket
    }

    fn over_pad(angle: f64, velocity: DVec2) -> Rocket {
        rocket_at(DVec2::new(1050.0, GROUND - 2.0), angle, velocity)
    }

    #[test]
    fn test_safe_landing_on_pad() {
        let terrain = flat_world(Vec::new());
        let mut rocket = over_pad(0.0, DVec2::new(0.0, -10.0));
        let contact = check_collision(&mut rocket, &terrain, &LandingEnvelope::default());
        assert_eq!(contact, Contact::Landed);
        assert_eq!(rocket.state, FlightState::Landed);
    }

    #[test]
    fn test_tilted_touchdown_crashes() {
        let terrain = flat_world(Vec::new());
        let mut rocket = over_pad(25.0, DVec2::new(0.0, -10.0));
        let contact = check_collision(&mut rocket, &terrain, &LandingEnvelope::default());
        assert_eq!(contact, Contact::HardLanding);
        assert_eq!(rocket.state, FlightState::Crashed);
    }

    #[test]
    fn test_each_violation_alone_crashes() {
        let terrain = flat_world(Vec::new());
        let env = LandingEnvelope::default();
        let cases = [
            (0.0, DVec2::new(0.0, 50.0)),
            (0.0, DVec2::new(0.0, -60.0)),
            (0.0, DVec2::new(50.0, 10.0)),
            (0.0, DVec2::new(-70.0, 10.0)),
            (20.0, DVec2::new(0.0, 10.0)),
            (-30.0, DVec2::new(0.0, 10.0)),
        ];
        for (angle, velocity) in cases {
            let rocket = over_pad(angle, velocity);
            assert_eq!(resolve(&rocket, &terrain, &env), Contact::HardLanding, "{angle} {velocity}");
        }
        let rocket = over_pad(-19.9, DVec2::new(49.9, 49.9));
        assert_eq!(resolve(&rocket, &terrain, &env), Contact::Landed);
    }

    #[test]
    fn test_outside_tolerance_is_airborne() {
        let terrain = flat_world(Vec::new());
        let rocket = rocket_at(DVec2::new(1050.0, GROUND - 6.0), 0.0, DVec2::ZERO);
        assert_eq!(resolve(&rocket, &terrain, &LandingEnvelope::default()), Contact::None);
    }

    #[test]
    fn test_pad_edges_inclusive() {
        let terrain = flat_world(Vec::new());
        let env = LandingEnvelope::default();
        for x in [1000.0, 1100.0] {
            let rocket = rocket_at(DVec2::new(x, GROUND), 0.0, DVec2::new(0.0, 5.0));
            assert_eq!(resolve(&rocket, &terrain, &env), Contact::Landed);
        }
    }

    #[test]
    fn test_pad_priority_over_terrain() {
        // Ground sampled above the pad surface: terrain alone would say crash
        let mut terrain = flat_world(Vec::new());
        for p in terrain.profile.iter_mut() {
            p.y = GROUND - 20.0;
        }
        let rocket = rocket_at(DVec2::new(1050.0, GROUND + 2.0), 0.0, DVec2::new(0.0, 10.0));
        assert_eq!(terrain.height_at(1050.0), Some(GROUND - 20.0));
        assert_eq!(resolve(&rocket, &terrain, &LandingEnvelope::default()), Contact::Landed);
    }

    #[test]
    fn test_terrain_impact() {
        let terrain = flat_world(Vec::new());
        let env = LandingEnvelope::default();
        let rocket = rocket_at(DVec2::new(3000.0, GROUND), 0.0, DVec2::new(0.0, 10.0));
        assert_eq!(resolve(&rocket, &terrain, &env), Contact::Terrain);
        let rocket = rocket_at(DVec2::new(3000.0, GROUND - 1.0), 0.0, DVec2::new(0.0, 10.0));
        assert_eq!(resolve(&rocket, &terrain, &env), Contact::None);
        // Unwrapped positions resolve against the same ground
        let rocket = rocket_at(DVec2::new(3000.0 - 6000.0 * 3.0, GROUND + 1.0), 0.0, DVec2::ZERO);
        assert_eq!(resolve(&rocket, &terrain, &env), Contact::Terrain);
    }

    #[test]
    fn test_vertex_inside_solid_building() {
        let terrain = flat_world(vec![building(2990.0, GROUND, 40.0, 200.0, false)]);
        let rocket = rocket_at(DVec2::new(3000.0, 400.0), 0.0, DVec2::ZERO);
        assert_eq!(resolve(&rocket, &terrain, &LandingEnvelope::default()), Contact::Building(0));
    }

    #[test]
    fn test_blue_building_never_collides() {
        let terrain = flat_world(vec![building(2990.0, GROUND, 40.0, 200.0, true)]);
        let rocket = rocket_at(DVec2::new(3000.0, 400.0), 0.0, DVec2::ZERO);
        assert_eq!(resolve(&rocket, &terrain, &LandingEnvelope::default()), Contact::None);
    }

    #[test]
    fn test_edge_crossing_without_vertex_inside() {
        // Thin slab (2 units tall after the margin) cutting through the hull's middle
        let center = DVec2::new(3000.0, 300.0);
        let slab = building(center.x - 50.0, center.y + 3.0, 100.0, 6.0, false);
        let terrain = flat_world(vec![slab]);
        let rocket = Rocket::new(center);
        let bounds = terrain.buildings[0].footprint().shrunk(BUILDING_MARGIN);
        assert!(rocket.transformed_hull().iter().all(|&p| !bounds.contains(p)));
        assert_eq!(resolve(&rocket, &terrain, &LandingEnvelope::default()), Contact::Building(0));
    }

    #[test]
    fn test_margin_shrinks_hit_box() {
        // Right tail at x = 2991 touches the raw box but not the shrunk one
        let terrain = flat_world(vec![building(2990.0, GROUND, 40.0, 200.0, false)]);
        let rocket = rocket_at(DVec2::new(2981.0, 400.0), 0.0, DVec2::ZERO);
        assert_eq!(resolve(&rocket, &terrain, &LandingEnvelope::default()), Contact::None);
    }

    #[test]
    fn test_building_across_seam() {
        // Building straddles x = length; its copy at -length covers x in [-20, 20]
        let terrain = flat_world(vec![building(5980.0, GROUND, 40.0, 200.0, false)]);
        let env = LandingEnvelope::default();
        let rocket = rocket_at(DVec2::new(5.0, 400.0), 0.0, DVec2::ZERO);
        assert_eq!(resolve(&rocket, &terrain, &env), Contact::Building(0));
        let rocket = rocket_at(DVec2::new(6000.0 * 2.0 + 5.0, 400.0), 0.0, DVec2::ZERO);
        assert_eq!(resolve(&rocket, &terrain, &env), Contact::Building(0));
    }

    #[test]
    fn test_terminal_state_is_not_rechecked() {
        let terrain = flat_world(Vec::new());
        let mut rocket = rocket_at(DVec2::new(3000.0, GROUND + 50.0), 0.0, DVec2::ZERO);
        rocket.state = FlightState::Landed;
        let contact = check_collision(&mut rocket, &terrain, &LandingEnvelope::default());
        assert_eq!(contact, Contact::None);
        assert_eq!(rocket.state, FlightState::Landed);
    }

    #[test]
    fn test_segments_intersect_basic() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 10.0);
        assert!(segments_intersect(a, b, DVec2::new(0.0, 10.0), DVec2::new(10.0, 0.0)));
        assert!(!segments_intersect(a, b, DVec2::new(20.0, 0.0), DVec2::new(30.0, 10.0)));
        // Touching at an endpoint counts
        assert!(segments_intersect(a, b, b, DVec2::new(20.0, 0.0)));
    }

    #[test]
    fn test_parallel_segments_never_intersect() {
        let a = DVec2::new(0.0, 0.0);
        let b = DVec2::new(10.0, 0.0);
        assert!(!segments_intersect(a, b, DVec2::new(0.0, 5.0), DVec2::new(10.0, 5.0)));
        // Collinear overlap is also reported as no intersection
        assert!(!segments_intersect(a, b, DVec2::new(5.0, 0.0), DVec2::new(15.0, 0.0)));
    }

    proptest! {
        #[test]
        fn prop_segment_intersection_symmetric(
            ax in -100.0f64..100.0, ay in -100.0f64..100.0,
            bx in -100.0f64..100.0, by in -100.0f64..100.0,
            cx in -100.0f64..100.0, cy in -100.0f64..100.0,
            dx in -100.0f64..100.0, dy in -100.0f64..100.0,
        ) {
            let (a, b) = (DVec2::new(ax, ay), DVec2::new(bx, by));
            let (c, d) = (DVec2::new(cx, cy), DVec2::new(dx, dy));
            prop_assert_eq!(segments_intersect(a, b, c, d), segments_intersect(c, d, a, b));
        }
    }
}
