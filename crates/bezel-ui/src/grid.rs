//! Focus grid: a 2D arrangement of widgets with one focused cell.
//!
//! Navigation is driven by discrete [`UiInput::Nav`] events, one focus
//! step each; key repeat happens upstream in a
//! [`Repeater`](bezel_types::input::Repeater), never here. Empty and
//! invisible cells are skipped. When focus moves, the old widget is
//! deselected before the new one is selected, in that order, so
//! anything tracking selection (a help overlay, audio cues) never sees
//! two cells focused at once.
//!
//! Layout packs cells tight: each row is as tall as its tallest widget,
//! each column as wide as its widest, rows laid out top to bottom and
//! columns left to right around the grid origin.

use bezel_types::backend::GpuDevice;
use bezel_types::error::Result;
use bezel_types::input::{NavDir, UiInput};
use vek::{Vec2, Vec3};

use crate::animation::{Easing, TwitchField, TwitchSet};
use crate::focus::{FocusStack, ScopeId};
use crate::shared_index::SharedIndexBuffer;
use crate::widget::{UiEvent, Widget};

/// Order cells are drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderOrder {
    /// Row-major.
    #[default]
    Sequential,
    /// Both ends first, walking inward, focused cell last. For strips
    /// whose cells overlap: the focused one lands on top.
    EndsIn,
}

/// Grid of optional widgets with focus navigation and layout.
pub struct Grid<W: Widget> {
    cols: usize,
    rows: usize,
    cells: Vec<Option<W>>,
    /// Cell centers from the last layout pass, parallel to `cells`.
    centers: Vec<Vec2<f32>>,
    focus: (usize, usize),
    wrap: bool,
    render_order: RenderOrder,
    origin: Vec3<f32>,
    scroll: Vec2<f32>,
    /// Recenter-on-focus animation time; `None` disables scrolling.
    scroll_time_ms: Option<u32>,
    twitch: TwitchSet,
    layout_stale: bool,
    /// Packed layout runs from `update` unless a specialized container
    /// positions cells itself.
    layout_enabled: bool,
    /// Scope pushed on the focus stack while this grid is active.
    scope: Option<ScopeId>,
}

impl<W: Widget> Grid<W> {
    pub fn new(cols: usize, rows: usize) -> Self {
        assert!(cols > 0 && rows > 0, "grid dimensions must be non-zero");
        let count = cols * rows;
        let mut cells = Vec::with_capacity(count);
        cells.resize_with(count, || None);
        Self {
            cols,
            rows,
            cells,
            centers: vec![Vec2::zero(); count],
            focus: (0, 0),
            wrap: false,
            render_order: RenderOrder::Sequential,
            origin: Vec3::zero(),
            scroll: Vec2::zero(),
            scroll_time_ms: None,
            twitch: TwitchSet::new(),
            layout_stale: true,
            layout_enabled: true,
            scope: None,
        }
    }

    /// Navigation wraps from one edge to the other instead of stopping.
    pub fn with_wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    pub fn with_render_order(mut self, order: RenderOrder) -> Self {
        self.render_order = order;
        self
    }

    /// Enables scrolling: focus changes recenter the focused cell on
    /// the grid origin over `scroll_time_ms`, with a little overshoot.
    pub fn with_scrolling(mut self, scroll_time_ms: u32) -> Self {
        self.scroll_time_ms = Some(scroll_time_ms);
        self
    }

    pub fn with_origin(mut self, origin: Vec3<f32>) -> Self {
        self.origin = origin;
        self
    }

    /// Disables packed row/column layout. The caller becomes responsible
    /// for positioning every cell, typically through widget twitches.
    pub fn with_manual_layout(mut self) -> Self {
        self.layout_enabled = false;
        self
    }

    /// Ties this grid to a focus scope; `set_active` pushes and pops it.
    pub fn with_scope(mut self, scope: ScopeId) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn focus(&self) -> (usize, usize) {
        self.focus
    }

    fn idx(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    /// Places a widget, returning whatever occupied the cell before.
    pub fn insert(&mut self, col: usize, row: usize, widget: W) -> Option<W> {
        assert!(
            col < self.cols && row < self.rows,
            "cell ({col},{row}) outside {}x{} grid",
            self.cols,
            self.rows
        );
        let idx = self.idx(col, row);
        self.layout_stale = true;
        self.cells[idx].replace(widget)
    }

    pub fn remove(&mut self, col: usize, row: usize) -> Option<W> {
        let idx = self.idx(col, row);
        self.layout_stale = true;
        self.cells[idx].take()
    }

    pub fn at(&self, col: usize, row: usize) -> Option<&W> {
        self.cells[self.idx(col, row)].as_ref()
    }

    pub fn at_mut(&mut self, col: usize, row: usize) -> Option<&mut W> {
        let idx = self.idx(col, row);
        self.cells[idx].as_mut()
    }

    pub fn focused(&self) -> Option<&W> {
        self.at(self.focus.0, self.focus.1)
    }

    pub fn focused_mut(&mut self) -> Option<&mut W> {
        self.at_mut(self.focus.0, self.focus.1)
    }

    fn is_focusable_at(&self, col: usize, row: usize) -> bool {
        self.at(col, row).is_some_and(Widget::is_visible)
    }

    fn first_focusable(&self) -> Option<(usize, usize)> {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.is_focusable_at(col, row) {
                    return Some((col, row));
                }
            }
        }
        None
    }

    /// Selects the focused cell, falling back to the first focusable
    /// one when focus points at an empty slot. Call when the grid
    /// becomes active.
    pub fn activate(&mut self, events: &mut Vec<UiEvent>) {
        if !self.is_focusable_at(self.focus.0, self.focus.1) {
            match self.first_focusable() {
                Some(cell) => self.focus = cell,
                None => return,
            }
        }
        let focus = self.focus;
        if let Some(widget) = self.at_mut(focus.0, focus.1) {
            widget.set_selected(true, events);
        }
    }

    /// Deselects the focused cell. Call when the grid goes inactive.
    pub fn deactivate(&mut self, events: &mut Vec<UiEvent>) {
        let focus = self.focus;
        if let Some(widget) = self.at_mut(focus.0, focus.1) {
            widget.set_selected(false, events);
        }
    }

    /// Activates or deactivates together with the focus stack: the
    /// grid's scope, when it has one, is pushed on activate and popped
    /// on deactivate.
    pub fn set_active(&mut self, active: bool, stack: &mut FocusStack, events: &mut Vec<UiEvent>) {
        if active {
            if let Some(scope) = self.scope {
                stack.push(scope);
            }
            self.activate(events);
        } else {
            self.deactivate(events);
            if let Some(scope) = self.scope {
                stack.pop(scope);
            }
        }
    }

    /// Whether this grid's scope is on top of the stack. Scopeless
    /// grids always own input.
    pub fn owns_input(&self, stack: &FocusStack) -> bool {
        self.scope.is_none_or(|scope| stack.is_top(scope))
    }

    /// Moves focus directly to a cell. No-op unless the cell holds a
    /// visible widget.
    pub fn set_focus(&mut self, col: usize, row: usize, events: &mut Vec<UiEvent>) -> bool {
        if col >= self.cols || row >= self.rows || !self.is_focusable_at(col, row) {
            return false;
        }
        self.change_focus((col, row), events)
    }

    /// One focus step. Skips empty and invisible cells, walking at most
    /// one full axis length so a wrap-around that finds nothing ends
    /// where it started. Returns whether focus moved.
    pub fn move_focus(&mut self, dir: NavDir, events: &mut Vec<UiEvent>) -> bool {
        let (dc, dr): (i32, i32) = match dir {
            NavDir::Left => (-1, 0),
            NavDir::Right => (1, 0),
            NavDir::Up => (0, -1),
            NavDir::Down => (0, 1),
        };
        let (mut col, mut row) = self.focus;
        let limit = if dr != 0 { self.rows } else { self.cols };
        for _ in 0..limit {
            let Some(next_col) = step_axis(col, self.cols, dc, self.wrap) else {
                break;
            };
            let Some(next_row) = step_axis(row, self.rows, dr, self.wrap) else {
                break;
            };
            if (next_col, next_row) == self.focus {
                break;
            }
            col = next_col;
            row = next_row;
            if self.is_focusable_at(col, row) {
                return self.change_focus((col, row), events);
            }
        }
        false
    }

    fn change_focus(&mut self, to: (usize, usize), events: &mut Vec<UiEvent>) -> bool {
        if to == self.focus {
            return false;
        }
        // Old cell reports Deselected before the new one Selected.
        let old = self.focus;
        if let Some(widget) = self.at_mut(old.0, old.1) {
            widget.set_selected(false, events);
        }
        self.focus = to;
        if let Some(widget) = self.at_mut(to.0, to.1) {
            widget.set_selected(true, events);
        }
        self.start_recenter();
        true
    }

    fn start_recenter(&mut self) {
        let Some(time_ms) = self.scroll_time_ms else {
            return;
        };
        let center = self.centers[self.idx(self.focus.0, self.focus.1)];
        self.twitch.start(
            TwitchField::PositionX,
            self.scroll.x,
            -center.x,
            time_ms,
            Easing::OvershootOut,
        );
        self.twitch.start(
            TwitchField::PositionY,
            self.scroll.y,
            -center.y,
            time_ms,
            Easing::OvershootOut,
        );
    }

    /// Offers the input to the focused widget, then falls back to
    /// navigation (`Nav`) or activation (`Confirm`).
    pub fn handle_input(&mut self, input: &UiInput, events: &mut Vec<UiEvent>) -> bool {
        if let Some(widget) = self.focused_mut()
            && widget.handle_input(input, events)
        {
            return true;
        }
        match input {
            UiInput::Nav(dir) => self.move_focus(*dir, events),
            UiInput::Confirm => match self.focused() {
                Some(widget) => {
                    events.push(UiEvent::Activated { id: widget.id() });
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Recomputes row heights, column widths, and every cell center,
    /// then repositions the widgets. Runs automatically from `update`
    /// after any insert or remove.
    pub fn refresh_layout(&mut self) {
        let mut row_heights = vec![0.0f32; self.rows];
        let mut col_widths = vec![0.0f32; self.cols];
        for row in 0..self.rows {
            for col in 0..self.cols {
                if let Some(widget) = self.at(col, row) {
                    let size = widget.size();
                    col_widths[col] = col_widths[col].max(size.x);
                    row_heights[row] = row_heights[row].max(size.y);
                }
            }
        }

        let total_h: f32 = row_heights.iter().sum();
        let total_w: f32 = col_widths.iter().sum();

        // Row centers walk down from the top, column centers right
        // from the left, each stepping by half the previous cell plus
        // half the next.
        let mut row_centers = vec![0.0f32; self.rows];
        row_centers[0] = total_h / 2.0 - row_heights[0] / 2.0;
        for r in 1..self.rows {
            row_centers[r] = row_centers[r - 1] - (row_heights[r - 1] + row_heights[r]) / 2.0;
        }
        let mut col_centers = vec![0.0f32; self.cols];
        col_centers[0] = -total_w / 2.0 + col_widths[0] / 2.0;
        for c in 1..self.cols {
            col_centers[c] = col_centers[c - 1] + (col_widths[c - 1] + col_widths[c]) / 2.0;
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                let idx = self.idx(col, row);
                self.centers[idx] = Vec2::new(col_centers[col], row_centers[row]);
            }
        }
        self.layout_stale = false;
        self.apply_positions();
    }

    fn apply_positions(&mut self) {
        let origin = self.origin;
        let scroll = self.scroll;
        for idx in 0..self.cells.len() {
            let center = self.centers[idx];
            if let Some(widget) = self.cells[idx].as_mut() {
                widget.set_position(
                    origin + Vec3::new(center.x + scroll.x, center.y + scroll.y, 0.0),
                );
            }
        }
    }

    /// Ticks the scroll animation and updates every widget.
    pub fn update(&mut self, dt_ms: u32, events: &mut Vec<UiEvent>) {
        if self.layout_stale && self.layout_enabled {
            self.refresh_layout();
        }

        let mut scroll = self.scroll;
        self.twitch.tick(dt_ms, |field, value| match field {
            TwitchField::PositionX => scroll.x = value,
            TwitchField::PositionY => scroll.y = value,
            _ => {}
        });
        if scroll != self.scroll {
            self.scroll = scroll;
            self.apply_positions();
        }

        for cell in self.cells.iter_mut().flatten() {
            cell.update(dt_ms, events);
        }
    }

    /// Draws visible cells in the configured order.
    pub fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        let drawable: Vec<usize> = (0..self.cells.len())
            .filter(|&idx| self.cells[idx].as_ref().is_some_and(Widget::is_visible))
            .collect();

        match self.render_order {
            RenderOrder::Sequential => {
                for idx in drawable {
                    if let Some(widget) = self.cells[idx].as_mut() {
                        widget.render(device)?;
                    }
                }
            }
            RenderOrder::EndsIn => {
                let focus_idx = self.idx(self.focus.0, self.focus.1);
                let pivot = drawable
                    .iter()
                    .position(|&idx| idx == focus_idx)
                    .unwrap_or(drawable.len().saturating_sub(1));
                for &idx in &drawable[..pivot] {
                    if let Some(widget) = self.cells[idx].as_mut() {
                        widget.render(device)?;
                    }
                }
                for &idx in drawable[pivot + 1..].iter().rev() {
                    if let Some(widget) = self.cells[idx].as_mut() {
                        widget.render(device)?;
                    }
                }
                if let Some(&idx) = drawable.get(pivot)
                    && let Some(widget) = self.cells[idx].as_mut()
                {
                    widget.render(device)?;
                }
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
        for cell in self.cells.iter_mut().flatten() {
            cell.alloc_gpu(device, shared, pow2)?;
        }
        Ok(())
    }

    pub fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        for cell in self.cells.iter_mut().flatten() {
            cell.release(device, shared)?;
        }
        Ok(())
    }

    pub fn device_reset(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        for cell in self.cells.iter_mut().flatten() {
            cell.device_reset(device)?;
        }
        Ok(())
    }
}

/// One raw navigation step along an axis. `None` means clamped at the
/// edge with wrapping off.
fn step_axis(pos: usize, dim: usize, delta: i32, wrap: bool) -> Option<usize> {
    if delta == 0 {
        return Some(pos);
    }
    if delta > 0 {
        if pos + 1 < dim {
            Some(pos + 1)
        } else if wrap {
            Some(0)
        } else {
            None
        }
    } else if pos > 0 {
        Some(pos - 1)
    } else if wrap {
        Some(dim - 1)
    } else {
        None
    }
}
