//! Dashboard, touch buttons, pad arrow and the end-of-run overlay

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::colors;
use crate::Rect;
use crate::platform::ButtonLayout;
use crate::settings::ViewportConfig;
use crate::sim::{FlightState, GameState, Reading, Telemetry, TickInput, message_line_alpha};

/// Fraction of the viewport height taken by the dashboard
const DASHBOARD_FRACTION: f64 = 0.2;
/// Arrow sits this far from the centre towards the screen edge
const ARROW_REACH: f64 = 0.9;

/// Help text faded in line by line once the run is over
pub const END_MESSAGE_LINES: [&str; 6] = [
    "In case nobody told you:",
    "Left and Right Shift fire the bottom engines...",
    "...and so do the arrow keys.",
    "Q and E fire the pitch thrusters up top.",
    "Come down on the yellow pad, slow and upright.",
    "Blue buildings are only scenery.",
];

fn reading_color(reading: &Reading) -> &'static str {
    if reading.safe { colors::SAFE } else { colors::UNSAFE }
}

pub fn draw_dashboard(
    ctx: &CanvasRenderingContext2d,
    viewport: &ViewportConfig,
    telemetry: &Telemetry,
) -> Result<(), JsValue> {
    let height = viewport.height * DASHBOARD_FRACTION;
    let top = viewport.height - height;
    ctx.set_fill_style_str(colors::DASHBOARD);
    ctx.fill_rect(0.0, top, viewport.width, height);
    ctx.set_stroke_style_str(colors::DASHBOARD_BORDER);
    ctx.set_line_width(2.0);
    ctx.stroke_rect(0.0, top, viewport.width, height);

    // Readouts sit between the two thrust buttons
    let x = ButtonLayout::MARGIN * 2.0 + ButtonLayout::THRUST_SIZE;
    let y = top + 30.0;
    ctx.set_font("18px Helvetica");
    let lines = [
        (
            format!("Vertical Speed: {:.1} m/s", telemetry.vertical_speed.value),
            &telemetry.vertical_speed,
        ),
        (
            format!("Horizontal Drift: {:.1} m/s", telemetry.horizontal_drift.value),
            &telemetry.horizontal_drift,
        ),
        (format!("Tilt Angle: {:.1}°", telemetry.tilt.value), &telemetry.tilt),
    ];
    for (i, (text, reading)) in lines.iter().enumerate() {
        ctx.set_fill_style_str(reading_color(reading));
        ctx.fill_text(text, x, y + i as f64 * 25.0)?;
    }
    Ok(())
}

/// Touch controls; held buttons are drawn lighter
pub fn draw_buttons(ctx: &CanvasRenderingContext2d, layout: &ButtonLayout, active: &TickInput) {
    let buttons = [
        (layout.thrust_left, active.thrust_left),
        (layout.thrust_right, active.thrust_right),
        (layout.pitch_left, active.pitch_left),
        (layout.pitch_right, active.pitch_right),
    ];
    for (rect, held) in buttons {
        ctx.set_fill_style_str(if held { colors::BUTTON_ACTIVE } else { colors::BUTTON });
        fill(ctx, &rect);
    }
}

/// Outcome banner, restart button and the fading help lines
pub fn draw_end_screen(
    ctx: &CanvasRenderingContext2d,
    state: &GameState,
    layout: &ButtonLayout,
    elapsed: f64,
) -> Result<(), JsValue> {
    let center = state.settings.viewport.width / 2.0;

    ctx.set_font("24px Arial");
    let (banner, color) = match state.flight_state() {
        FlightState::Landed => ("LANDED SUCCESSFULLY!", colors::SAFE),
        _ => ("CRASHED!", colors::UNSAFE),
    };
    ctx.set_text_align("center");
    ctx.set_fill_style_str(color);
    ctx.fill_text(banner, center, 50.0)?;
    ctx.set_fill_style_str(colors::TEXT);
    ctx.fill_text("Press R, Enter, or tap Restart.", center, 80.0)?;

    let button = layout.restart;
    ctx.set_fill_style_str(colors::RESTART_BUTTON);
    fill(ctx, &button);
    ctx.set_stroke_style_str(colors::TEXT);
    ctx.set_line_width(1.0);
    ctx.stroke_rect(button.x, button.y, button.width, button.height);
    ctx.set_fill_style_str(colors::TEXT);
    ctx.set_font("20px Arial");
    ctx.fill_text("Restart", button.x + button.width / 2.0, button.y + 28.0)?;

    ctx.set_text_align("left");
    for (i, line) in END_MESSAGE_LINES.iter().enumerate() {
        let alpha = message_line_alpha(elapsed, i);
        if alpha <= 0.0 {
            break;
        }
        ctx.save();
        ctx.set_global_alpha(alpha);
        ctx.fill_text(line, center - 200.0, 130.0 + i as f64 * 30.0)?;
        ctx.restore();
    }
    Ok(())
}

/// Arrow near the screen edge pointing the short way to the pad
pub fn draw_pad_arrow(
    ctx: &CanvasRenderingContext2d,
    viewport: &ViewportConfig,
    bearing: f64,
) -> Result<(), JsValue> {
    let (half_w, half_h) = (viewport.width / 2.0, viewport.height / 2.0);
    let (sin, cos) = bearing.sin_cos();
    // Scale to whichever edge the ray hits first
    let scale = (half_w / cos.abs()).min(half_h / sin.abs()) * ARROW_REACH;

    ctx.save();
    ctx.translate(half_w + cos * scale, half_h + sin * scale)?;
    ctx.rotate(bearing)?;
    ctx.begin_path();
    ctx.move_to(0.0, 0.0);
    ctx.line_to(-20.0, -10.0);
    ctx.line_to(-20.0, 10.0);
    ctx.close_path();
    ctx.set_fill_style_str(colors::ARROW);
    ctx.fill();
    ctx.restore();
    Ok(())
}

fn fill(ctx: &CanvasRenderingContext2d, rect: &Rect) {
    ctx.fill_rect(rect.x, rect.y, rect.width, rect.height);
}
