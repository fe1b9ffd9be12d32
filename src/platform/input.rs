//! Keyboard and pointer tracking
//!
//! Event callbacks only toggle membership here; the session reads the
//! resulting channels once per tick.

use std::collections::{HashMap, HashSet};

use glam::DVec2;

use crate::Rect;
use crate::settings::ViewportConfig;
use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowLeft,
    ShiftLeft,
    ArrowRight,
    ShiftRight,
    Q,
    E,
    R,
    Enter,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code`; unknown codes are ignored
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ShiftLeft" => Some(Key::ShiftLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            "ShiftRight" => Some(Key::ShiftRight),
            "KeyQ" => Some(Key::Q),
            "KeyE" => Some(Key::E),
            "KeyR" => Some(Key::R),
            "Enter" => Some(Key::Enter),
            _ => None,
        }
    }

    pub fn is_restart(&self) -> bool {
        matches!(self, Key::R | Key::Enter)
    }

    /// Keys whose default browser action (scrolling) should be suppressed
    pub fn prevents_default(&self) -> bool {
        matches!(
            self,
            Key::ArrowLeft | Key::ArrowRight | Key::ShiftLeft | Key::ShiftRight
        )
    }
}

/// On-screen control rectangles, derived from the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonLayout {
    pub thrust_left: Rect,
    pub thrust_right: Rect,
    pub pitch_left: Rect,
    pub pitch_right: Rect,
    pub restart: Rect,
}

impl ButtonLayout {
    pub const MARGIN: f64 = 20.0;
    pub const THRUST_SIZE: f64 = 100.0;
    pub const PITCH_SIZE: f64 = 60.0;
    pub const GAP: f64 = 10.0;
    pub const RESTART_WIDTH: f64 = 100.0;
    pub const RESTART_HEIGHT: f64 = 40.0;

    pub fn for_viewport(viewport: &ViewportConfig) -> Self {
        let (w, h) = (viewport.width, viewport.height);
        let thrust_y = h - Self::THRUST_SIZE - Self::MARGIN;
        let thrust_left = Rect::new(Self::MARGIN, thrust_y, Self::THRUST_SIZE, Self::THRUST_SIZE);
        let thrust_right = Rect::new(
            w - Self::THRUST_SIZE - Self::MARGIN,
            thrust_y,
            Self::THRUST_SIZE,
            Self::THRUST_SIZE,
        );

        // Pitch buttons sit centred above their thrust button
        let inset = (Self::THRUST_SIZE - Self::PITCH_SIZE) / 2.0;
        let pitch_y = thrust_y - Self::PITCH_SIZE - Self::GAP;
        let pitch_left = Rect::new(thrust_left.x + inset, pitch_y, Self::PITCH_SIZE, Self::PITCH_SIZE);
        let pitch_right = Rect::new(thrust_right.x + inset, pitch_y, Self::PITCH_SIZE, Self::PITCH_SIZE);

        let restart = Rect::new(
            w / 2.0 - Self::RESTART_WIDTH / 2.0,
            h - 200.0,
            Self::RESTART_WIDTH,
            Self::RESTART_HEIGHT,
        );

        Self {
            thrust_left,
            thrust_right,
            pitch_left,
            pitch_right,
            restart,
        }
    }
}

/// Control channels asserted by held pointers. Each pointer drives at most one channel.
pub fn pointer_controls<'a>(
    pointers: impl IntoIterator<Item = &'a DVec2>,
    layout: &ButtonLayout,
) -> TickInput {
    let mut input = TickInput::default();
    for &p in pointers {
        if layout.thrust_left.contains(p) {
            input.thrust_left = true;
        } else if layout.thrust_right.contains(p) {
            input.thrust_right = true;
        } else if layout.pitch_left.contains(p) {
            input.pitch_left = true;
        } else if layout.pitch_right.contains(p) {
            input.pitch_right = true;
        }
    }
    input
}

/// Held keys and tracked pointers
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<Key>,
    pointers: HashMap<i32, DVec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.keys.insert(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn pointer_down(&mut self, id: i32, pos: DVec2) {
        self.pointers.insert(id, pos);
    }

    /// Moves only update pointers that went down on the canvas
    pub fn pointer_move(&mut self, id: i32, pos: DVec2) {
        if let Some(tracked) = self.pointers.get_mut(&id) {
            *tracked = pos;
        }
    }

    /// Pointer released or cancelled
    pub fn pointer_up(&mut self, id: i32) {
        self.pointers.remove(&id);
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pointers(&self) -> impl Iterator<Item = &DVec2> {
        self.pointers.values()
    }

    /// Drop all held keys and pointers
    pub fn clear(&mut self) {
        self.keys.clear();
        self.pointers.clear();
    }

    /// Channels asserted by the keyboard
    pub fn key_controls(&self) -> TickInput {
        TickInput {
            thrust_left: self.is_held(Key::ArrowLeft) || self.is_held(Key::ShiftLeft),
            thrust_right: self.is_held(Key::ArrowRight) || self.is_held(Key::ShiftRight),
            pitch_left: self.is_held(Key::Q),
            pitch_right: self.is_held(Key::E),
        }
    }

    /// Keyboard and pointer channels combined
    pub fn controls(&self, layout: &ButtonLayout) -> TickInput {
        self.key_controls()
            .union(pointer_controls(self.pointers(), layout))
    }
}
