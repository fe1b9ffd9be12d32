//! Terrain, buildings, rocket and exhaust

use std::f64::consts::{PI, TAU};

use glam::DVec2;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::colors;
use crate::sim::building::{BEAM_LIGHTS, DOME_LIGHTS, SPIRE_LIGHT_SPACING};
use crate::sim::{Building, BuildingKind, Camera, FlightState, GameState, Terrain};

const PAD_THICKNESS: f64 = 5.0;
const PARTICLE_SIZE: f64 = 2.0;
const LIGHT_SIZE: f64 = 2.0;

/// Fill and stroke colours for one building
struct Palette {
    fill: &'static str,
    stroke: &'static str,
    window: &'static str,
    line_width: f64,
}

impl Palette {
    fn for_building(b: &Building) -> Self {
        if b.is_blue {
            Self {
                fill: colors::BLUE_FILL,
                stroke: colors::BLUE_STROKE,
                window: colors::BLUE_WINDOW,
                line_width: 1.0,
            }
        } else {
            Self {
                fill: colors::ORANGE_FILL,
                stroke: colors::ORANGE_STROKE,
                window: colors::ORANGE_WINDOW,
                line_width: 2.0,
            }
        }
    }
}

/// Terrain, pad and buildings for the three tiles around the camera
pub fn draw_world(ctx: &CanvasRenderingContext2d, state: &GameState) -> Result<(), JsValue> {
    let camera = &state.camera;
    let terrain = &state.terrain;
    let view_width = state.settings.viewport.width;

    for k in -1..=1 {
        let origin = camera.tile_origin_x(k, terrain.length);
        if origin > view_width || origin + terrain.length < 0.0 {
            continue;
        }
        draw_terrain_tile(ctx, terrain, camera, origin);
        for building in &terrain.buildings {
            let left = origin + building.x;
            if left + building.width < 0.0 || left > view_width {
                continue;
            }
            draw_building(ctx, building, left, building.y - camera.offset_y)?;
        }
    }
    Ok(())
}

fn draw_terrain_tile(ctx: &CanvasRenderingContext2d, terrain: &Terrain, camera: &Camera, origin: f64) {
    let mut points = terrain.profile.iter();
    if let Some(first) = points.next() {
        ctx.begin_path();
        ctx.move_to(origin + first.x, first.y - camera.offset_y);
        for p in points {
            ctx.line_to(origin + p.x, p.y - camera.offset_y);
        }
        ctx.set_stroke_style_str(colors::TERRAIN);
        ctx.set_line_width(1.0);
        ctx.stroke();
    }

    let pad = &terrain.landing_pad;
    let (x, y) = (origin + pad.start, pad.surface_y - camera.offset_y);
    ctx.set_fill_style_str(colors::PAD_FILL);
    ctx.fill_rect(x, y, pad.width(), PAD_THICKNESS);
    ctx.set_stroke_style_str(colors::PAD_STROKE);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(x, y, pad.width(), PAD_THICKNESS);
}

/// Draw a building with its base-left corner at screen (x, base)
fn draw_building(ctx: &CanvasRenderingContext2d, b: &Building, x: f64, base: f64) -> Result<(), JsValue> {
    let palette = Palette::for_building(b);
    let top = base - b.height;
    ctx.set_line_width(palette.line_width);

    match &b.kind {
        BuildingKind::Standard | BuildingKind::Tall | BuildingKind::Wide => {
            block(ctx, &palette, x, top, b.width, b.height);
            draw_windows(ctx, b, &palette, x, top);
        }
        BuildingKind::Spire { ball_lights } => {
            let ball_r = b.width * 0.4;
            let cx = x + b.width / 2.0;
            polygon(
                ctx,
                &palette,
                &[
                    DVec2::new(x, base),
                    DVec2::new(x + b.width, base),
                    DVec2::new(cx + 1.0, top + ball_r),
                    DVec2::new(cx - 1.0, top + ball_r),
                ],
            );
            disc(ctx, &palette, cx, top + ball_r, ball_r)?;
            ring_lights(ctx, &palette, cx, top + ball_r, ball_r * 0.6, ball_lights);

            // One light every few pixels up the needle
            ctx.set_fill_style_str(palette.window);
            let (_, rows) = b.window_grid();
            for (row, _) in b.windows.iter().take(rows).enumerate().filter(|(_, on)| **on) {
                let y = base - (row as f64 + 1.0) * SPIRE_LIGHT_SPACING;
                if y > top + 2.0 * ball_r {
                    ctx.fill_rect(cx - LIGHT_SIZE / 2.0, y, LIGHT_SIZE, LIGHT_SIZE);
                }
            }
        }
        BuildingKind::PentHouse { tall_side_right, step } => {
            let (left_top, right_top) = if *tall_side_right {
                (top + step, top)
            } else {
                (top, top + step)
            };
            polygon(
                ctx,
                &palette,
                &[
                    DVec2::new(x, base),
                    DVec2::new(x, left_top),
                    DVec2::new(x + b.width, right_top),
                    DVec2::new(x + b.width, base),
                ],
            );
            // Keep facade lights under the sloped roof
            draw_windows_below(ctx, b, &palette, x, top, top + step);
        }
        BuildingKind::DomeTower {
            dome_radius,
            beam_lights,
            dome_lights,
        } => {
            let cx = x + b.width / 2.0;
            let dome_y = top + dome_radius;
            let tower_w = b.width * 0.3;
            block(ctx, &palette, cx - tower_w / 2.0, dome_y, tower_w, base - dome_y);

            let spread = b.width / 2.0 - 2.0;
            for (i, lights) in beam_lights.iter().enumerate() {
                let foot = x + 2.0 + spread * i as f64;
                ctx.begin_path();
                ctx.move_to(foot, base);
                ctx.line_to(cx, dome_y);
                ctx.set_stroke_style_str(palette.stroke);
                ctx.stroke();
                ctx.set_fill_style_str(palette.window);
                for (j, _) in lights.iter().enumerate().filter(|(_, on)| **on) {
                    let t = (j as f64 + 1.0) / (BEAM_LIGHTS as f64 + 1.0);
                    let p = DVec2::new(foot, base).lerp(DVec2::new(cx, dome_y), t);
                    ctx.fill_rect(p.x - 1.0, p.y - 1.0, LIGHT_SIZE, LIGHT_SIZE);
                }
            }

            disc(ctx, &palette, cx, dome_y, *dome_radius)?;
            ring_lights(ctx, &palette, cx, dome_y, dome_radius * 0.7, dome_lights);
        }
        BuildingKind::Lax { disk_lights } => {
            // Two crossed arches with the disk hung where they meet
            let cx = x + b.width / 2.0;
            ctx.set_stroke_style_str(palette.stroke);
            ctx.set_line_width(palette.line_width + 2.0);
            for (from, to) in [(x, x + b.width * 0.75), (x + b.width, x + b.width * 0.25)] {
                ctx.begin_path();
                ctx.move_to(from, base);
                ctx.quadratic_curve_to(cx, top - b.height * 0.2, to, base);
                ctx.stroke();
            }
            ctx.set_line_width(palette.line_width);
            let disk_r = b.width * 0.15;
            let disk_y = top + b.height * 0.45;
            disc(ctx, &palette, cx, disk_y, disk_r)?;
            ring_lights(ctx, &palette, cx, disk_y, disk_r * 0.7, disk_lights);
        }
        BuildingKind::DomeCluster { domes } => {
            let plinth = b.height * 0.2;
            block(ctx, &palette, x, base - plinth, b.width, plinth);
            for dome in domes {
                let (cx, cy) = (x + dome.offset_x, base - dome.offset_y);
                disc(ctx, &palette, cx, cy, dome.radius)?;
                ring_lights(ctx, &palette, cx, cy, dome.radius * 0.6, &dome.lights);
            }
        }
        BuildingKind::Poo => {
            // Three stacked tiers, each narrower than the one below
            let tier_h = b.height / 3.0;
            for tier in 0..3 {
                let inset = b.width * 0.15 * tier as f64;
                let y = base - tier_h * (tier as f64 + 1.0);
                block(ctx, &palette, x + inset, y, b.width - 2.0 * inset, tier_h);
            }
        }
    }
    Ok(())
}

fn block(ctx: &CanvasRenderingContext2d, palette: &Palette, x: f64, y: f64, w: f64, h: f64) {
    ctx.set_fill_style_str(palette.fill);
    ctx.fill_rect(x, y, w, h);
    ctx.set_stroke_style_str(palette.stroke);
    ctx.stroke_rect(x, y, w, h);
}

fn polygon(ctx: &CanvasRenderingContext2d, palette: &Palette, points: &[DVec2]) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
    ctx.set_fill_style_str(palette.fill);
    ctx.fill();
    ctx.set_stroke_style_str(palette.stroke);
    ctx.stroke();
}

fn disc(ctx: &CanvasRenderingContext2d, palette: &Palette, cx: f64, cy: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(cx, cy, r, 0.0, TAU)?;
    ctx.set_fill_style_str(palette.fill);
    ctx.fill();
    ctx.set_stroke_style_str(palette.stroke);
    ctx.stroke();
    Ok(())
}

fn ring_lights(
    ctx: &CanvasRenderingContext2d,
    palette: &Palette,
    cx: f64,
    cy: f64,
    r: f64,
    lights: &[bool; DOME_LIGHTS],
) {
    ctx.set_fill_style_str(palette.window);
    for (i, _) in lights.iter().enumerate().filter(|(_, on)| **on) {
        let angle = i as f64 / DOME_LIGHTS as f64 * TAU - PI / 2.0;
        let p = DVec2::new(cx, cy) + DVec2::from_angle(angle) * r;
        ctx.fill_rect(p.x - 1.0, p.y - 1.0, LIGHT_SIZE, LIGHT_SIZE);
    }
}

fn draw_windows(ctx: &CanvasRenderingContext2d, b: &Building, palette: &Palette, x: f64, top: f64) {
    draw_windows_below(ctx, b, palette, x, top, f64::NEG_INFINITY);
}

/// Facade grid, skipping any window whose top is above `min_y`
fn draw_windows_below(
    ctx: &CanvasRenderingContext2d,
    b: &Building,
    palette: &Palette,
    x: f64,
    top: f64,
    min_y: f64,
) {
    let style = b.window_style();
    let (cols, _) = b.window_grid();
    if cols == 0 {
        return;
    }
    ctx.set_fill_style_str(palette.window);
    for (i, _) in b.windows.iter().enumerate().filter(|(_, on)| **on) {
        let (row, col) = (i / cols, i % cols);
        let wx = x + (col as f64 + 1.0) * style.spacing;
        let wy = top + (row as f64 + 1.0) * style.spacing;
        if wy >= min_y {
            ctx.fill_rect(wx, wy, style.size, style.size);
        }
    }
}

/// Exhaust first so the hull draws over it
pub fn draw_rocket(ctx: &CanvasRenderingContext2d, state: &GameState) {
    let camera = &state.camera;
    let rocket = &state.rocket;

    for p in &rocket.particles {
        let s = camera.world_to_screen(p.pos);
        ctx.set_fill_style_str(&format!("rgba(255, 255, 0, {:.3})", p.alpha()));
        ctx.fill_rect(s.x, s.y, PARTICLE_SIZE, PARTICLE_SIZE);
    }

    let hull = rocket.transformed_hull().map(|p| camera.world_to_screen(p));
    ctx.begin_path();
    ctx.move_to(hull[0].x, hull[0].y);
    for p in &hull[1..] {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
    let color = if rocket.state == FlightState::Crashed {
        colors::ROCKET_CRASHED
    } else {
        colors::ROCKET
    };
    ctx.set_stroke_style_str(color);
    ctx.set_line_width(1.0);
    ctx.stroke();
}
