//! City buildings
//!
//! Every building is an axis-aligned footprint standing on the terrain.
//! Orange buildings are solid; blue ones are background decoration.
//! The `kind` only drives drawing and is fixed at creation, including
//! which window lights are on.

use serde::{Deserialize, Serialize};

use super::rng::UnitRng;
use super::terrain::Terrain;
use crate::Rect;
use crate::settings::WorldConfig;

/// Lights per dome ring
pub const DOME_LIGHTS: usize = 8;
/// Support beams on a dome tower
pub const TOWER_BEAMS: usize = 3;
/// Lights per tower beam
pub const BEAM_LIGHTS: usize = 5;
/// Vertical spacing of the lights running up a spire
pub const SPIRE_LIGHT_SPACING: f64 = 15.0;
/// Chance that a dome or beam light is on
const RING_LIGHT_CHANCE: f64 = 0.7;

/// One dome in a dome cluster, relative to the building's base-left corner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dome {
    pub offset_x: f64,
    /// Height of the dome centre above the base
    pub offset_y: f64,
    pub radius: f64,
    pub lights: [bool; DOME_LIGHTS],
}

/// Building variant and its kind-specific layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BuildingKind {
    Standard,
    Tall,
    Wide,
    /// Tapered needle with a ball on top
    Spire { ball_lights: [bool; DOME_LIGHTS] },
    /// Sloped roof; `step` is how much taller one wall is than the other
    PentHouse { tall_side_right: bool, step: f64 },
    /// Thin tower carrying a dome; the footprint includes the dome
    DomeTower {
        dome_radius: f64,
        beam_lights: [[bool; BEAM_LIGHTS]; TOWER_BEAMS],
        dome_lights: [bool; DOME_LIGHTS],
    },
    /// Crossed arches with a suspended disk
    Lax { disk_lights: [bool; DOME_LIGHTS] },
    DomeCluster { domes: Vec<Dome> },
    Poo,
}

impl BuildingKind {
    pub const COUNT: usize = 9;

    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::Standard => "standard",
            BuildingKind::Tall => "tall",
            BuildingKind::Wide => "wide",
            BuildingKind::Spire { .. } => "spire",
            BuildingKind::PentHouse { .. } => "penthouse",
            BuildingKind::DomeTower { .. } => "dome-tower",
            BuildingKind::Lax { .. } => "lax",
            BuildingKind::DomeCluster { .. } => "dome-cluster",
            BuildingKind::Poo => "poo",
        }
    }
}

/// Facade window pattern, depends only on colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowStyle {
    pub size: f64,
    pub spacing: f64,
    pub probability: f64,
}

impl WindowStyle {
    pub fn for_building(is_blue: bool) -> Self {
        if is_blue {
            Self {
                size: 2.0,
                spacing: 6.0,
                probability: 0.5,
            }
        } else {
            Self {
                size: 4.0,
                spacing: 8.0,
                probability: 0.7,
            }
        }
    }

    /// Window columns and rows that fit a facade
    pub fn grid(&self, width: f64, height: f64) -> (usize, usize) {
        let fit = |extent: f64| ((extent / self.spacing).floor() as isize - 1).max(0) as usize;
        (fit(width), fit(height))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Left edge in world space
    pub x: f64,
    /// Base (ground) y; the building extends upward from here
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub is_blue: bool,
    pub kind: BuildingKind,
    /// Facade lights, row-major over `window_grid()` (a single column for spires)
    pub windows: Vec<bool>,
}

impl Building {
    /// Only orange buildings collide
    pub fn is_solid(&self) -> bool {
        !self.is_blue
    }

    /// Bounding box used for collision
    pub fn footprint(&self) -> Rect {
        Rect::new(self.x, self.y - self.height, self.width, self.height)
    }

    pub fn window_style(&self) -> WindowStyle {
        WindowStyle::for_building(self.is_blue)
    }

    /// Columns and rows of the facade light grid
    pub fn window_grid(&self) -> (usize, usize) {
        match self.kind {
            BuildingKind::Spire { .. } => (1, (self.height / SPIRE_LIGHT_SPACING).floor() as usize),
            BuildingKind::Standard
            | BuildingKind::Tall
            | BuildingKind::Wide
            | BuildingKind::PentHouse { .. } => self.window_style().grid(self.width, self.height),
            _ => (0, 0),
        }
    }

    /// Roll a random kind with the factory size ranges, standing at (x, base_y)
    pub fn random<R: UnitRng + ?Sized>(x: f64, base_y: f64, is_blue_chance: f64, rng: &mut R) -> Self {
        let (kind, width, height) = match rng.pick(BuildingKind::COUNT) {
            0 => {
                let height = rng.range(30.0, 130.0);
                (BuildingKind::Standard, rng.range(20.0, 50.0), height)
            }
            1 => {
                let height = rng.range(100.0, 200.0);
                (BuildingKind::Tall, rng.range(15.0, 35.0), height)
            }
            2 => {
                let height = rng.range(20.0, 60.0);
                (BuildingKind::Wide, rng.range(40.0, 80.0), height)
            }
            3 => {
                let height = rng.range(120.0, 200.0);
                let width = rng.range(15.0, 25.0);
                let ball_lights = ring_lights(rng);
                (BuildingKind::Spire { ball_lights }, width, height)
            }
            4 => {
                let width = rng.range(30.0, 70.0);
                let short = rng.range(60.0, 140.0);
                let step = rng.range(20.0, 50.0);
                let tall_side_right = rng.chance(0.5);
                (
                    BuildingKind::PentHouse {
                        tall_side_right,
                        step,
                    },
                    width,
                    short + step,
                )
            }
            5 => {
                let width = rng.range(40.0, 70.0);
                let tower = rng.range(100.0, 220.0);
                let dome_radius = width * 0.5;
                let mut beam_lights = [[false; BEAM_LIGHTS]; TOWER_BEAMS];
                for beam in beam_lights.iter_mut() {
                    for light in beam.iter_mut() {
                        *light = rng.chance(RING_LIGHT_CHANCE);
                    }
                }
                let dome_lights = ring_lights(rng);
                (
                    BuildingKind::DomeTower {
                        dome_radius,
                        beam_lights,
                        dome_lights,
                    },
                    width,
                    tower + 2.0 * dome_radius,
                )
            }
            6 => {
                let width = rng.range(120.0, 160.0);
                let height = rng.range(100.0, 130.0);
                let disk_lights = ring_lights(rng);
                (BuildingKind::Lax { disk_lights }, width, height)
            }
            7 => {
                let width = rng.range(80.0, 120.0);
                let height = rng.range(60.0, 100.0);
                let count = 3 + rng.pick(2);
                let domes = (0..count)
                    .map(|i| {
                        let radius = rng.range(15.0, 25.0);
                        let offset_x = i as f64 * width / (count as f64 - 0.5) + radius;
                        let offset_y = radius + rng.next_unit() * height * 0.3;
                        Dome {
                            offset_x,
                            offset_y,
                            radius,
                            lights: ring_lights(rng),
                        }
                    })
                    .collect();
                (BuildingKind::DomeCluster { domes }, width, height)
            }
            _ => {
                let width = rng.range(60.0, 80.0);
                (BuildingKind::Poo, width, rng.range(80.0, 110.0))
            }
        };

        let is_blue = rng.chance(is_blue_chance);
        let mut building = Self {
            x,
            y: base_y,
            width,
            height,
            is_blue,
            kind,
            windows: Vec::new(),
        };
        let (cols, rows) = building.window_grid();
        let probability = building.window_style().probability;
        building.windows = (0..cols * rows).map(|_| rng.chance(probability)).collect();
        building
    }
}

fn ring_lights<R: UnitRng + ?Sized>(rng: &mut R) -> [bool; DOME_LIGHTS] {
    let mut lights = [false; DOME_LIGHTS];
    for light in lights.iter_mut() {
        *light = rng.chance(RING_LIGHT_CHANCE);
    }
    lights
}

/// True if [x0, x1] touches the pad (plus clearance) in any toroidal copy
fn in_pad_zone(x0: f64, x1: f64, terrain: &Terrain, clearance: f64) -> bool {
    let pad = &terrain.landing_pad;
    let (lo, hi) = (pad.start - clearance, pad.end + clearance);
    [-1.0, 0.0, 1.0].iter().any(|k| {
        let shift = k * terrain.length;
        x1 >= lo + shift && x0 <= hi + shift
    })
}

/// Scatter buildings along the world, never inside the pad exclusion zone
pub fn generate_buildings<R: UnitRng + ?Sized>(
    config: &WorldConfig,
    terrain: &Terrain,
    rng: &mut R,
) -> Vec<Building> {
    let mut buildings = Vec::new();
    let mut x = 0.0;

    while x < config.length {
        if rng.chance(config.building_chance) {
            let base_y = terrain.height_at(x).unwrap_or(terrain.landing_pad.surface_y);
            let building = Building::random(x, base_y, config.blue_chance, rng);
            if !in_pad_zone(x, x + building.width, terrain, config.pad_clearance) {
                buildings.push(building);
            }
        }
        x += rng.range(config.min_building_spacing, config.max_building_spacing);
    }

    buildings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn world(seed: u64) -> Terrain {
        let mut rng = Pcg32::seed_from_u64(seed);
        Terrain::generate(&WorldConfig::default(), 504.0, &mut rng)
    }

    #[test]
    fn test_buildings_never_overlap_pad() {
        let config = WorldConfig::default();
        for seed in 0..30 {
            let terrain = world(seed);
            let pad = terrain.landing_pad;
            for b in &terrain.buildings {
                let fp = b.footprint();
                let clear = fp.x + fp.width < pad.start - config.pad_clearance
                    || fp.x > pad.end + config.pad_clearance;
                assert!(clear, "seed {seed}: {} at {} overlaps pad", b.kind.name(), b.x);
            }
        }
    }

    #[test]
    fn test_buildings_stand_on_terrain() {
        let terrain = world(4);
        assert!(!terrain.buildings.is_empty());
        for b in &terrain.buildings {
            assert_eq!(Some(b.y), terrain.height_at(b.x));
            let fp = b.footprint();
            assert!((fp.y + fp.height - b.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_every_kind_is_reachable() {
        let mut seen = std::collections::HashSet::new();
        for seed in 0..40 {
            for b in world(seed).buildings {
                seen.insert(b.kind.name());
            }
        }
        assert_eq!(seen.len(), BuildingKind::COUNT);
    }

    #[test]
    fn test_window_grid_matches_flags() {
        for b in world(11).buildings {
            let (cols, rows) = b.window_grid();
            assert_eq!(b.windows.len(), cols * rows);
        }
    }

    #[test]
    fn test_window_style_grid() {
        let style = WindowStyle::for_building(false);
        assert_eq!(style.grid(40.0, 100.0), (4, 11));
        assert_eq!(style.grid(5.0, 5.0), (0, 0));
    }

    #[test]
    fn test_penthouse_height_includes_step() {
        // pick(9) with 4.5/9 -> index 4
        let mut rng = ScriptedRng::new(vec![0.5, 0.5, 0.5, 0.5, 0.9, 0.0]);
        let b = Building::random(0.0, 500.0, 0.5, &mut rng);
        match b.kind {
            BuildingKind::PentHouse {
                tall_side_right,
                step,
            } => {
                assert!(!tall_side_right);
                assert_eq!(step, 35.0);
                assert_eq!(b.height, 100.0 + 35.0);
                assert_eq!(b.width, 50.0);
            }
            other => panic!("expected penthouse, got {other:?}"),
        }
        assert!(b.is_blue);
    }

    #[test]
    fn test_blue_is_not_solid() {
        let mut rng = ScriptedRng::constant(0.0);
        let b = Building::random(10.0, 500.0, 1.0, &mut rng);
        assert!(b.is_blue);
        assert!(!b.is_solid());
        assert_eq!(b.kind, BuildingKind::Standard);
    }

    #[test]
    fn test_pad_zone_wraps() {
        let mut terrain = world(1);
        terrain.landing_pad.start = 10.0;
        terrain.landing_pad.end = 110.0;
        // A building straddling the seam reaches the pad's copy at +length
        assert!(in_pad_zone(terrain.length - 20.0, terrain.length + 5.0, &terrain, 40.0));
        assert!(!in_pad_zone(3000.0, 3050.0, &terrain, 40.0));
    }
}
