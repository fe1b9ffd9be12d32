//! Platform abstraction layer
//!
//! Browser event data arrives here as plain values (key codes, pointer ids and
//! viewport coordinates) and leaves as simulation control channels.

pub mod input;

pub use input::{ButtonLayout, InputState, Key, pointer_controls};
