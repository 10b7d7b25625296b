//! Fan layout for single-row tile strips.
//!
//! Tiles sit on an ellipse arc like a hand of cards: the focused tile
//! front and center at the bottom of the arc, neighbors receding up and
//! outward to either side. Positions come from one precomputed arc
//! table indexed by distance from the focused column; columns right of
//! focus take the X-mirrored slot, so a focus change slides every tile
//! one slot along the arc. `FanStrip` wires the table to a single-row
//! grid of tiles.

use bezel_types::backend::GpuDevice;
use bezel_types::error::Result;
use bezel_types::input::UiInput;
use vek::Vec3;

use crate::grid::Grid;
use crate::shared_index::SharedIndexBuffer;
use crate::tile::Tile;
use crate::widget::{UiEvent, Widget};

/// Most tiles a fan can place; also the position table length.
pub const MAX_FAN_TILES: usize = 20;

/// Backward tilt applied to every tile in the fan, radians about X.
pub const TIP_BACK_ANGLE: f32 = -0.3;

const X_RADIUS: f32 = 6.5;
const ELLIPSE_RATIO: f32 = 0.8;
const Y_RADIUS: f32 = X_RADIUS * ELLIPSE_RATIO;
/// Arc step between neighboring tiles, radians.
const DELTA_THETA: f32 = 0.19;

/// Precomputed arc positions, indexed by distance from focus.
#[derive(Debug, Clone)]
pub struct FanLayout {
    positions: [Vec3<f32>; MAX_FAN_TILES],
}

impl FanLayout {
    pub fn new() -> Self {
        let mut positions = [Vec3::zero(); MAX_FAN_TILES];
        let mut theta = 0.0f32;
        for slot in &mut positions {
            *slot = Vec3::new(
                -theta.sin() * X_RADIUS,
                0.0,
                Y_RADIUS + theta.cos() * Y_RADIUS,
            );
            theta += DELTA_THETA;
        }
        Self { positions }
    }

    /// Target position for the tile in `col` while `focus` is focused.
    /// Columns left of focus walk up the left side of the arc; columns
    /// right of it take the X-mirrored slot. Distances past the table
    /// end clamp to its last entry.
    pub fn target(&self, col: usize, focus: usize) -> Vec3<f32> {
        let offset = focus as isize - col as isize;
        let distance = offset.unsigned_abs().min(MAX_FAN_TILES - 1);
        let mut position = self.positions[distance];
        if offset < 0 {
            position.x = -position.x;
        }
        position
    }
}

impl Default for FanLayout {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw order that keeps overlap correct for a fan: both edges inward,
/// focused column last so it lands on top of its neighbors. `focus`
/// past the end clamps to the last column.
pub fn fan_render_order(count: usize, focus: usize) -> impl Iterator<Item = usize> {
    let focus = focus.min(count.saturating_sub(1));
    let left_end = if count == 0 { 0 } else { focus + 1 };
    (focus + 1..count).rev().chain(0..left_end)
}

/// How long a tile takes to glide to a new arc slot.
const SLIDE_TIME_MS: u32 = 200;

/// A single-row grid of tiles arranged on the fan arc.
///
/// Wraps [`Grid`] for focus and navigation but positions cells itself:
/// after a focus change, or once marked stale, every tile glides to its
/// arc slot tipped back by [`TIP_BACK_ANGLE`].
pub struct FanStrip {
    grid: Grid<Tile>,
    fan: FanLayout,
    count: usize,
    last_focus: Option<usize>,
    stale: bool,
    slide_time_ms: u32,
}

impl FanStrip {
    /// `capacity` fixes the column count up front.
    pub fn new(capacity: usize) -> Self {
        Self {
            grid: Grid::new(capacity.max(1), 1).with_manual_layout(),
            fan: FanLayout::new(),
            count: 0,
            last_focus: None,
            stale: true,
            slide_time_ms: SLIDE_TIME_MS,
        }
    }

    /// Appends a tile to the next free column.
    pub fn push(&mut self, tile: Tile) {
        assert!(self.count < self.grid.cols(), "fan strip is full");
        self.grid.insert(self.count, 0, tile);
        self.count += 1;
        self.stale = true;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn tile(&self, col: usize) -> Option<&Tile> {
        self.grid.at(col, 0)
    }

    pub fn tile_mut(&mut self, col: usize) -> Option<&mut Tile> {
        self.grid.at_mut(col, 0)
    }

    pub fn focused(&self) -> Option<&Tile> {
        self.grid.focused()
    }

    pub fn focus_col(&self) -> usize {
        self.grid.focus().0
    }

    pub fn set_focus(&mut self, col: usize, events: &mut Vec<UiEvent>) -> bool {
        self.grid.set_focus(col, 0, events)
    }

    /// Forces re-applying arc positions on the next update, after
    /// hiding or revealing tiles.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    pub fn activate(&mut self, events: &mut Vec<UiEvent>) {
        self.grid.activate(events);
    }

    pub fn deactivate(&mut self, events: &mut Vec<UiEvent>) {
        self.grid.deactivate(events);
    }

    pub fn handle_input(&mut self, input: &UiInput, events: &mut Vec<UiEvent>) -> bool {
        self.grid.handle_input(input, events)
    }

    pub fn update(&mut self, dt_ms: u32, events: &mut Vec<UiEvent>) {
        let focus = self.grid.focus().0;
        if self.stale || self.last_focus != Some(focus) {
            self.apply_arc(focus);
            self.last_focus = Some(focus);
            self.stale = false;
        }
        self.grid.update(dt_ms, events);
    }

    fn apply_arc(&mut self, focus: usize) {
        for col in 0..self.count {
            let target = self.fan.target(col, focus);
            if let Some(tile) = self.grid.at_mut(col, 0) {
                tile.set_rotation(Vec3::new(TIP_BACK_ANGLE, 0.0, 0.0));
                tile.slide_to(target, self.slide_time_ms);
            }
        }
    }

    /// Draws edges inward so tiles overlap toward the focused one.
    pub fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        let focus = self.grid.focus().0;
        for col in fan_render_order(self.count, focus) {
            if let Some(tile) = self.grid.at_mut(col, 0)
                && tile.is_visible()
            {
                tile.render(device)?;
            }
        }
        Ok(())
    }

    pub fn alloc_gpu(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
        pow2: bool,
    ) -> Result<()> {
        self.grid.alloc_gpu(device, shared, pow2)
    }

    pub fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        self.grid.release(device, shared)
    }

    pub fn device_reset(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        self.grid.device_reset(device)
    }
}
