//! HUD readouts and end-of-run message timing

use serde::Serialize;

use super::rocket::Rocket;
use crate::consts::MESSAGE_FADE_SECS;
use crate::settings::LandingEnvelope;

/// One HUD value and whether it is inside the landing envelope
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub value: f64,
    pub safe: bool,
}

/// Landing telemetry for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Telemetry {
    pub vertical_speed: Reading,
    pub horizontal_drift: Reading,
    /// Degrees
    pub tilt: Reading,
}

impl Telemetry {
    /// Classify with the same strict bounds the pad check uses
    pub fn from_rocket(rocket: &Rocket, envelope: &LandingEnvelope) -> Self {
        let vy = rocket.velocity.y;
        let vx = rocket.velocity.x;
        let tilt = rocket.orientation;
        Self {
            vertical_speed: Reading {
                value: vy,
                safe: envelope.vertical_ok(vy),
            },
            horizontal_drift: Reading {
                value: vx,
                safe: envelope.horizontal_ok(vx),
            },
            tilt: Reading {
                value: tilt,
                safe: envelope.tilt_ok(tilt),
            },
        }
    }
}

/// Opacity of end message line `line` after `elapsed` seconds.
/// Each line fades in over two seconds, starting two seconds after the previous one.
pub fn message_line_alpha(elapsed: f64, line: usize) -> f64 {
    let start = line as f64 * MESSAGE_FADE_SECS;
    ((elapsed - start) / MESSAGE_FADE_SECS).clamp(0.0, 1.0)
}
