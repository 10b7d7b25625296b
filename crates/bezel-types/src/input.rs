//! Input event types consumed by the focus grid and widgets.
//!
//! Hosts translate their device input (gamepad, keys, pointer) into the
//! platform-agnostic `UiInput` events. Held directions are delivered as
//! repeated discrete events produced by a `Repeater`, so containers move
//! focus exactly one step per event.

use serde::{Deserialize, Serialize};

/// Directional navigation. One focus step per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavDir {
    Up,
    Down,
    Left,
    Right,
}

/// A discrete UI input event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum UiInput {
    /// Directional navigation or value adjust, already repeat-gated.
    Nav(NavDir),
    /// Accept / activate the focused widget.
    Confirm,
    /// Dismiss / back out.
    Cancel,
    /// Pointer moved; coordinates in the host's logical units.
    PointerMove { x: f32, y: f32 },
    /// Pointer button went down this frame.
    PointerPress { x: f32, y: f32 },
    /// Pointer button came up this frame.
    PointerRelease { x: f32, y: f32 },
}

/// Per-frame pointer snapshot with press/release edge queries.
///
/// `begin_frame` is called once per frame with the polled state; the edge
/// queries then answer for that frame only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
    pressed: bool,
    was_pressed: bool,
}

impl PointerState {
    /// Record this frame's polled pointer state.
    pub fn begin_frame(&mut self, x: f32, y: f32, pressed: bool) {
        self.x = x;
        self.y = y;
        self.was_pressed = self.pressed;
        self.pressed = pressed;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Pressed this frame, up last frame.
    pub fn just_pressed(&self) -> bool {
        self.pressed && !self.was_pressed
    }

    /// Released this frame, down last frame.
    pub fn just_released(&self) -> bool {
        !self.pressed && self.was_pressed
    }
}

/// Repeat gate for a held direction: fires once immediately on press,
/// then after `delay_ms` repeats every `interval_ms` while held.
///
/// `tick` returns how many discrete events to deliver this frame, which
/// can exceed one when a long frame spans several repeat intervals.
#[derive(Debug, Clone)]
pub struct Repeater {
    delay_ms: u64,
    interval_ms: u64,
    held_ms: u64,
    next_fire_ms: u64,
    holding: bool,
}

impl Repeater {
    pub fn new(delay_ms: u64, interval_ms: u64) -> Self {
        Self {
            delay_ms,
            interval_ms: interval_ms.max(1),
            held_ms: 0,
            next_fire_ms: 0,
            holding: false,
        }
    }

    /// Advance the gate by `dt_ms` with the direction's current held state.
    pub fn tick(&mut self, held: bool, dt_ms: u64) -> u32 {
        if !held {
            self.holding = false;
            self.held_ms = 0;
            return 0;
        }
        let mut fires = 0u32;
        if !self.holding {
            self.holding = true;
            self.held_ms = 0;
            self.next_fire_ms = self.delay_ms;
            fires += 1;
        }
        self.held_ms += dt_ms;
        while self.held_ms >= self.next_fire_ms {
            fires += 1;
            self.next_fire_ms += self.interval_ms;
        }
        fires
    }
}
