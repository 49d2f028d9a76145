//! Collaborator interfaces between the game core and the platform.
//!
//! The core never polls a global clock, keyboard or screen. Each frame it is
//! handed a [`FrameInput`] and a delta time, and it draws through a
//! [`Renderer`]. Anything implementing these traits can host the game.

use std::time::Instant;

use crate::geometry::{Rect, Vec2};

/// Frames longer than this are treated as this long, so a stall does not
/// turn into one huge movement or spawn jump.
pub const MAX_FRAME_DELTA: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Edge-triggered keys the game reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Fire,
    Pause,
    Confirm,
    /// Number row, 1-based as printed on the key.
    Digit(u8),
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    /// Primary pointer button, in world coordinates.
    Click(Vec2),
}

/// Continuous state of the movement and fire keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Everything the platform reports for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    pub held: HeldKeys,
    /// Pointer position in world coordinates.
    pub pointer: Vec2,
    pub events: Vec<InputEvent>,
    /// Window closed or interrupt requested.
    pub quit: bool,
}

pub trait Input {
    /// Sample held keys and pointer and drain the pending events.
    fn sample(&mut self) -> FrameInput;
}

// ── Time ──────────────────────────────────────────────────────────────────────

pub trait Clock {
    /// Seconds elapsed since the previous call.
    fn delta(&mut self) -> f32;
}

/// Wall-clock time from `std::time::Instant`.
pub struct SystemClock {
    last: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { last: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

/// Returns the same step every frame. Used for deterministic runs.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub f32);

impl Clock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.0
    }
}

pub fn clamp_delta(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DELTA)
    } else {
        0.0
    }
}

// ── Drawing ───────────────────────────────────────────────────────────────────

/// Primitive drawing in world coordinates.
pub trait Renderer {
    type Error;

    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color);
    fn text(&mut self, pos: Vec2, text: &str, color: Color);
    /// Text centred horizontally on `pos.x`.
    fn text_centered(&mut self, pos: Vec2, text: &str, color: Color);
    fn present(&mut self) -> Result<(), Self::Error>;
}
