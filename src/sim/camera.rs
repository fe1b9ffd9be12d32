//! Side-scrolling camera over the wrapping world
//!
//! Horizontal offset accumulates without bound; the wrapped copy is what
//! terrain drawing uses to pick tile offsets. Vertical offset is never
//! positive, so the default framing always shows the ground.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CAMERA_DEAD_ZONE_LEFT, CAMERA_DEAD_ZONE_RIGHT, CAMERA_FOLLOW, CAMERA_TOP_THRESHOLD};
use crate::settings::ViewportConfig;
use crate::wrap_coordinate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Unwrapped horizontal offset
    pub world_offset_x: f64,
    /// `world_offset_x` reduced into [0, length)
    pub wrapped_offset_x: f64,
    /// Vertical offset, always <= 0
    pub offset_y: f64,
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Follow `target` by one tick of proportional tracking
    pub fn update(&mut self, target: DVec2, viewport: &ViewportConfig, length: f64) {
        let screen_x = target.x - self.world_offset_x;
        let left = viewport.width * CAMERA_DEAD_ZONE_LEFT;
        let right = viewport.width * CAMERA_DEAD_ZONE_RIGHT;
        if screen_x < left {
            self.world_offset_x += (screen_x - left) * CAMERA_FOLLOW;
        } else if screen_x > right {
            self.world_offset_x += (screen_x - right) * CAMERA_FOLLOW;
        }
        self.wrapped_offset_x = wrap_coordinate(self.world_offset_x, length);

        let top = viewport.height * CAMERA_TOP_THRESHOLD;
        let target_y = target.y - top;
        self.offset_y += (target_y - self.offset_y) * CAMERA_FOLLOW;
        // Never let a climbing rocket leave through the top
        if target.y - self.offset_y < top {
            self.offset_y = target_y;
        }
        self.offset_y = self.offset_y.min(0.0);
    }

    /// World point to screen point, using the unwrapped offset
    pub fn world_to_screen(&self, p: DVec2) -> DVec2 {
        DVec2::new(p.x - self.world_offset_x, p.y - self.offset_y)
    }

    /// Screen x of world tile copy `k` (terrain is drawn at k = -1, 0, 1)
    pub fn tile_origin_x(&self, k: i32, length: f64) -> f64 {
        k as f64 * length - self.wrapped_offset_x
    }
}
