//! Modal dialog panel.
//!
//! One cached surface carries the whole dialog: title, wrapped body
//! text, and a centered row of buttons along the bottom edge. Showing
//! the dialog pushes its scope on the focus stack so whatever sits
//! underneath stops taking directional input; hiding pops it. While
//! the dialog is on top it swallows every input: Left/Right move
//! button focus, Confirm reports the focused button's tag, Cancel
//! dismisses.

use bezel_types::backend::{FixedFunction, GpuDevice, ShaderBinding};
use bezel_types::color::Color;
use bezel_types::error::{BezelError, Result};
use bezel_types::input::{NavDir, UiInput};
use vek::Vec3;

use crate::animation::{Easing, TwitchField, TwitchSet};
use crate::cache::SurfaceCache;
use crate::focus::{FocusStack, ScopeId};
use crate::mesh::NineSliceMesh;
use crate::shared_index::SharedIndexBuffer;
use crate::widget::{UiEvent, WidgetId};

const FADE_TIME_MS: u32 = 150;
const MAX_BODY_LINES: u32 = 6;

const BODY_BG: Color = Color::rgba(16, 16, 16, 240);
const TITLE_COLOR: Color = Color::WHITE;
const BODY_COLOR: Color = Color::rgb(200, 200, 200);
const BUTTON_COLOR: Color = Color::rgb(150, 150, 150);
const BUTTON_FOCUS_BG: Color = Color::rgb(60, 60, 60);

/// Button row placement in surface UV space.
const BUTTON_ROW_TOP: f32 = 0.70;
const BUTTON_ROW_BOTTOM: f32 = 0.92;
const BUTTON_MARGIN: f32 = 0.08;

/// One choice offered by a dialog. `tag` comes back in `Activated`.
#[derive(Debug, Clone)]
pub struct DialogButton {
    pub label: String,
    pub tag: WidgetId,
}

/// Construction parameters for [`Dialog`].
#[derive(Debug, Clone)]
pub struct DialogParams {
    pub title: String,
    pub body: String,
    /// Panel geometry, world units.
    pub width: f32,
    pub height: f32,
    pub edge_size: f32,
    pub buttons: Vec<DialogButton>,
}

impl Default for DialogParams {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            width: 8.0,
            height: 4.0,
            edge_size: 0.5,
            buttons: Vec::new(),
        }
    }
}

/// Modal panel composed of a mesh, a cached surface, and button focus.
pub struct Dialog {
    id: WidgetId,
    scope: ScopeId,
    title: String,
    body: String,
    buttons: Vec<DialogButton>,
    focus_idx: usize,
    visible: bool,
    alpha: f32,
    position: Vec3<f32>,
    mesh: NineSliceMesh,
    cache: SurfaceCache,
    binding: Box<dyn ShaderBinding>,
    twitch: TwitchSet,
}

impl Dialog {
    pub fn new(id: WidgetId, scope: ScopeId, params: DialogParams) -> Result<Self> {
        let mesh = NineSliceMesh::new(params.width, params.height, params.edge_size)?;
        let cache = SurfaceCache::new(params.width, params.height);
        Ok(Self {
            id,
            scope,
            title: params.title,
            body: params.body,
            buttons: params.buttons,
            focus_idx: 0,
            visible: false,
            alpha: 1.0,
            position: Vec3::zero(),
            mesh,
            cache,
            binding: Box::new(FixedFunction),
            twitch: TwitchSet::new(),
        })
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Vec3<f32> {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3<f32>) {
        self.position = position;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn focused_button(&self) -> Option<&DialogButton> {
        self.buttons.get(self.focus_idx)
    }

    /// Swaps the shader binding used for the panel draw.
    pub fn set_shader(&mut self, binding: Box<dyn ShaderBinding>) {
        self.binding = binding;
    }

    /// Brings the dialog up: takes the top of the focus stack, focuses
    /// the first button, and fades in.
    pub fn show(&mut self, stack: &mut FocusStack, events: &mut Vec<UiEvent>) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.focus_idx = 0;
        self.cache.mark_dirty();
        stack.push(self.scope);
        events.push(UiEvent::DialogShown { id: self.id });
        if let Some(button) = self.buttons.first() {
            events.push(UiEvent::Selected { id: button.tag });
        }
        self.alpha = 0.0;
        self.twitch
            .start(TwitchField::Alpha, 0.0, 1.0, FADE_TIME_MS, Easing::EaseOut);
    }

    /// Takes the dialog down and gives the stack back.
    pub fn hide(&mut self, stack: &mut FocusStack, events: &mut Vec<UiEvent>) {
        if !self.visible {
            return;
        }
        self.visible = false;
        stack.pop(self.scope);
        events.push(UiEvent::DialogHidden { id: self.id });
    }

    /// Cancel path: reports `Dismissed`, then hides.
    pub fn dismiss(&mut self, stack: &mut FocusStack, events: &mut Vec<UiEvent>) {
        events.push(UiEvent::Dismissed { id: self.id });
        self.hide(stack, events);
    }

    /// Consumes every input while visible and on top of the stack.
    /// Pointer coordinates are surface UVs across the dialog's face.
    pub fn handle_input(
        &mut self,
        input: &UiInput,
        stack: &mut FocusStack,
        events: &mut Vec<UiEvent>,
    ) -> bool {
        if !self.visible || !stack.is_top(self.scope) {
            return false;
        }
        match input {
            UiInput::Nav(NavDir::Left) => {
                self.move_button_focus(-1, events);
                true
            }
            UiInput::Nav(NavDir::Right) => {
                self.move_button_focus(1, events);
                true
            }
            UiInput::Confirm => {
                if let Some(button) = self.buttons.get(self.focus_idx) {
                    events.push(UiEvent::Activated { id: button.tag });
                }
                true
            }
            UiInput::Cancel => {
                self.dismiss(stack, events);
                true
            }
            UiInput::PointerPress { x, y } => {
                if let Some(idx) = hit_button(*x, *y, self.buttons.len()) {
                    self.set_button_focus(idx, events);
                    events.push(UiEvent::Activated {
                        id: self.buttons[idx].tag,
                    });
                }
                true
            }
            // Modal: vertical nav and stray pointer events go nowhere
            // else either.
            _ => true,
        }
    }

    fn move_button_focus(&mut self, delta: i32, events: &mut Vec<UiEvent>) {
        if self.buttons.is_empty() {
            return;
        }
        let last = self.buttons.len() - 1;
        let new = self.focus_idx.saturating_add_signed(delta as isize).min(last);
        self.set_button_focus(new, events);
    }

    fn set_button_focus(&mut self, idx: usize, events: &mut Vec<UiEvent>) {
        if idx == self.focus_idx || idx >= self.buttons.len() {
            return;
        }
        // Old button reports Deselected before the new one Selected.
        events.push(UiEvent::Deselected {
            id: self.buttons[self.focus_idx].tag,
        });
        self.focus_idx = idx;
        events.push(UiEvent::Selected {
            id: self.buttons[idx].tag,
        });
        self.cache.mark_dirty();
    }

    pub fn update(&mut self, dt_ms: u32, _events: &mut Vec<UiEvent>) {
        let mut alpha = self.alpha;
        self.twitch.tick(dt_ms, |field, value| {
            if field == TwitchField::Alpha {
                alpha = value;
            }
        });
        self.alpha = alpha;
    }

    pub fn alloc_gpu(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
        pow2: bool,
    ) -> Result<()> {
        self.cache.alloc(device, pow2)?;
        let (mu, mv) = self.cache.max_uv();
        self.mesh.set_atlas_clamp(mu, mv);
        self.mesh.alloc_gpu(device, shared)
    }

    pub fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        let Some((w, h)) = self.cache.used_pixel_size() else {
            debug_assert!(false, "dialog rendered before alloc_gpu");
            return Err(BezelError::NotInitialized("dialog surface"));
        };
        let title = self.title.as_str();
        let body = self.body.as_str();
        let buttons = self.buttons.as_slice();
        let focus_idx = self.focus_idx;
        self.cache
            .refresh(device, |d| paint(d, w, h, title, body, buttons, focus_idx))?;

        self.binding.set_diffuse(self.cache.texture());
        self.binding.set_alpha(self.alpha);
        self.mesh.render(device, self.binding.as_mut())
    }

    pub fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        self.cache.release(device)?;
        self.mesh.release(device, shared)
    }

    pub fn device_reset(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        self.cache.device_reset(device)
    }
}

/// Button rectangle in surface UV space, buttons evenly sharing the
/// bottom row.
fn button_region(index: usize, count: usize) -> (f32, f32, f32, f32) {
    let width = (1.0 - 2.0 * BUTTON_MARGIN) / count as f32;
    let u0 = BUTTON_MARGIN + index as f32 * width;
    (u0, BUTTON_ROW_TOP, u0 + width, BUTTON_ROW_BOTTOM)
}

fn hit_button(u: f32, v: f32, count: usize) -> Option<usize> {
    if count == 0 || !(BUTTON_ROW_TOP..=BUTTON_ROW_BOTTOM).contains(&v) {
        return None;
    }
    if u < BUTTON_MARGIN || u > 1.0 - BUTTON_MARGIN {
        return None;
    }
    let width = (1.0 - 2.0 * BUTTON_MARGIN) / count as f32;
    Some((((u - BUTTON_MARGIN) / width) as usize).min(count - 1))
}

/// Paints the whole dialog face. Pixel coordinates, origin top-left.
fn paint(
    device: &mut dyn GpuDevice,
    w: u32,
    h: u32,
    title: &str,
    body: &str,
    buttons: &[DialogButton],
    focus_idx: usize,
) -> Result<()> {
    device.fill_rect(0, 0, w, h, BODY_BG)?;

    let margin = (w as f32 * 0.05) as i32;
    let title_font = (h as f32 * 0.09).max(10.0) as u16;
    let body_font = (h as f32 * 0.06).max(8.0) as u16;
    device.draw_text(title, margin, margin, title_font, TITLE_COLOR)?;

    let body_y = margin + device.measure_text_height(title_font) as i32 + margin / 2;
    let body_w = (w as i32 - 2 * margin).max(0) as u32;
    device.draw_text_wrapped(body, margin, body_y, body_font, BODY_COLOR, body_w, MAX_BODY_LINES)?;

    for (i, button) in buttons.iter().enumerate() {
        let (u0, v0, u1, v1) = button_region(i, buttons.len());
        let x = (u0 * w as f32) as i32;
        let y = (v0 * h as f32) as i32;
        let bw = ((u1 - u0) * w as f32) as u32;
        let bh = ((v1 - v0) * h as f32) as u32;
        if i == focus_idx {
            device.fill_rect(x, y, bw, bh, BUTTON_FOCUS_BG)?;
        }
        let label_w = device.measure_text(&button.label, body_font);
        let label_h = device.measure_text_height(body_font);
        let tx = x + (bw.saturating_sub(label_w) / 2) as i32;
        let ty = y + (bh.saturating_sub(label_h) / 2) as i32;
        let color = if i == focus_idx { TITLE_COLOR } else { BUTTON_COLOR };
        device.draw_text(&button.label, tx, ty, body_font, color)?;
    }
    Ok(())
}
