//! Widget trait and the event stream widgets report through.
//!
//! Widgets never call back into application code. Anything user-visible
//! that happens during input handling or an update is pushed onto a
//! caller-owned `Vec<UiEvent>`; the application drains it after the
//! frame and reacts (plays a click, updates a setting, opens help).
//! Event order within a frame is meaningful: a focus move pushes the
//! old cell's `Deselected` before the new cell's `Selected`, so a help
//! overlay tracking focus never sees two widgets selected at once.

use bezel_types::backend::GpuDevice;
use bezel_types::error::Result;
use bezel_types::input::UiInput;
use vek::{Vec2, Vec3};

use crate::shared_index::SharedIndexBuffer;

/// Caller-assigned identity carried by every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(pub u32);

/// Something user-visible a widget did this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// Focus left this widget.
    Deselected { id: WidgetId },
    /// Focus landed on this widget.
    Selected { id: WidgetId },
    /// A slider's logical value changed.
    ValueChanged { id: WidgetId, value: f32 },
    /// A step was requested but the value was already at that end.
    StepRefused { id: WidgetId },
    /// A checkbox flipped.
    Toggled { id: WidgetId, checked: bool },
    /// Confirm pressed on the focused widget.
    Activated { id: WidgetId },
    /// A dialog became visible and took focus.
    DialogShown { id: WidgetId },
    /// A dialog left the screen.
    DialogHidden { id: WidgetId },
    /// A dialog was cancelled without choosing a button.
    Dismissed { id: WidgetId },
}

/// A focusable, renderable cell in a grid or strip.
///
/// GPU resources follow the same lifecycle everywhere: `alloc_gpu`
/// before first render, `release` when leaving the scene, and
/// `device_reset` when the device recreated its surfaces. All three are
/// idempotent for every widget in this crate.
pub trait Widget {
    fn id(&self) -> WidgetId;

    // -----------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------

    /// Extent used by grid layout, margins included, in world units.
    fn size(&self) -> Vec2<f32>;

    fn position(&self) -> Vec3<f32>;

    fn set_position(&mut self, position: Vec3<f32>);

    // -----------------------------------------------------------------
    // Focus and input
    // -----------------------------------------------------------------

    /// Invisible widgets are skipped by grid navigation and not drawn.
    fn is_visible(&self) -> bool {
        true
    }

    fn is_selected(&self) -> bool;

    /// Changes focus state, reporting `Selected` / `Deselected`.
    /// Setting the state it already has reports nothing.
    fn set_selected(&mut self, selected: bool, events: &mut Vec<UiEvent>);

    /// Offers one input to the widget. Returns true when consumed.
    fn handle_input(&mut self, _input: &UiInput, _events: &mut Vec<UiEvent>) -> bool {
        false
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Advances animations and time-based input state.
    fn update(&mut self, dt_ms: u32, events: &mut Vec<UiEvent>);

    fn alloc_gpu(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
        pow2: bool,
    ) -> Result<()>;

    fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()>;

    fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()>;

    fn device_reset(&mut self, device: &mut dyn GpuDevice) -> Result<()>;

    // -----------------------------------------------------------------
    // Help
    // -----------------------------------------------------------------

    /// Line shown by a help overlay while this widget has focus.
    fn help_text(&self) -> Option<&str> {
        None
    }
}

impl<W: Widget + ?Sized> Widget for Box<W> {
    fn id(&self) -> WidgetId {
        (**self).id()
    }

    fn size(&self) -> Vec2<f32> {
        (**self).size()
    }

    fn position(&self) -> Vec3<f32> {
        (**self).position()
    }

    fn set_position(&mut self, position: Vec3<f32>) {
        (**self).set_position(position);
    }

    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }

    fn is_selected(&self) -> bool {
        (**self).is_selected()
    }

    fn set_selected(&mut self, selected: bool, events: &mut Vec<UiEvent>) {
        (**self).set_selected(selected, events);
    }

    fn handle_input(&mut self, input: &UiInput, events: &mut Vec<UiEvent>) -> bool {
        (**self).handle_input(input, events)
    }

    fn update(&mut self, dt_ms: u32, events: &mut Vec<UiEvent>) {
        (**self).update(dt_ms, events);
    }

    fn alloc_gpu(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
        pow2: bool,
    ) -> Result<()> {
        (**self).alloc_gpu(device, shared, pow2)
    }

    fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        (**self).render(device)
    }

    fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        (**self).release(device, shared)
    }

    fn device_reset(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        (**self).device_reset(device)
    }

    fn help_text(&self) -> Option<&str> {
        (**self).help_text()
    }
}
