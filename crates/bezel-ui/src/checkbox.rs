//! Labeled checkbox.
//!
//! A white panel with a check mark on the left and a wrapped label
//! beside it, painted into a cached surface at higher density than the
//! other widgets so its small glyphs stay sharp. The check itself can
//! be a pair of loaded textures (checked / unchecked art) or, when the
//! host supplies none, a simple drawn box.

use bezel_types::backend::{FixedFunction, GpuDevice, ShaderBinding, TextureId, TextureRef};
use bezel_types::color::Color;
use bezel_types::error::{BezelError, Result};
use bezel_types::input::UiInput;
use vek::{Vec2, Vec3};

use crate::animation::{Easing, TwitchField, TwitchSet};
use crate::cache::SurfaceCache;
use crate::mesh::NineSliceMesh;
use crate::shared_index::SharedIndexBuffer;
use crate::widget::{UiEvent, Widget, WidgetId};

/// Paint density for checkbox surfaces.
const CHECKBOX_DPI: u32 = 128;

const UNFOCUSED_DIM: f32 = 0.5;
const FOCUSED_DIM: f32 = 1.0;
const DIM_TIME_MS: u32 = 200;

const LABEL_COLOR: Color = Color::rgb(127, 127, 127);
const LABEL_SHADOW: Color = Color::rgba(0, 0, 0, 20);
const LABEL_SHADOW_OFFSET: i32 = 6;
const MAX_LABEL_LINES: u32 = 3;

/// Construction parameters for [`Checkbox`].
#[derive(Debug, Clone)]
pub struct CheckboxParams {
    pub label: String,
    /// Panel geometry, world units.
    pub width: f32,
    pub height: f32,
    pub edge_size: f32,
    pub checked: bool,
    /// Checked / unchecked art. `None` paints a drawn box instead.
    pub art: Option<(TextureId, TextureId)>,
    pub help: Option<String>,
}

impl Default for CheckboxParams {
    fn default() -> Self {
        Self {
            label: String::new(),
            width: 3.0,
            height: 1.0,
            edge_size: 0.25,
            checked: false,
            art: None,
            help: None,
        }
    }
}

/// Checkbox widget with a cached composite surface.
pub struct Checkbox {
    id: WidgetId,
    label: String,
    help: Option<String>,
    checked: bool,
    art: Option<(TextureId, TextureId)>,
    selected: bool,
    dim: f32,
    position: Vec3<f32>,
    mesh: NineSliceMesh,
    cache: SurfaceCache,
    binding: Box<dyn ShaderBinding>,
    twitch: TwitchSet,
}

impl Checkbox {
    pub fn new(id: WidgetId, params: CheckboxParams) -> Result<Self> {
        let mesh = NineSliceMesh::new(params.width, params.height, params.edge_size)?;
        let cache = SurfaceCache::with_dpi(params.width, params.height, CHECKBOX_DPI);
        Ok(Self {
            id,
            label: params.label,
            help: params.help,
            checked: params.checked,
            art: params.art,
            selected: false,
            dim: UNFOCUSED_DIM,
            position: Vec3::zero(),
            mesh,
            cache,
            binding: Box::new(FixedFunction),
            twitch: TwitchSet::new(),
        })
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    /// Flips the state and reports `Toggled`. Returns the new state.
    pub fn toggle(&mut self, events: &mut Vec<UiEvent>) -> bool {
        self.checked = !self.checked;
        self.cache.mark_dirty();
        events.push(UiEvent::Toggled {
            id: self.id,
            checked: self.checked,
        });
        self.checked
    }

    /// Sets the state, reporting `Toggled` only on an actual change.
    /// Returns whether anything changed and the surface went dirty.
    pub fn set_checked(&mut self, checked: bool, events: &mut Vec<UiEvent>) -> bool {
        if self.checked == checked {
            return false;
        }
        self.toggle(events);
        true
    }
}

impl Widget for Checkbox {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn size(&self) -> Vec2<f32> {
        Vec2::new(self.mesh.width(), self.mesh.height())
    }

    fn position(&self) -> Vec3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vec3<f32>) {
        self.position = position;
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool, events: &mut Vec<UiEvent>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        let target = if selected { FOCUSED_DIM } else { UNFOCUSED_DIM };
        self.twitch
            .start(TwitchField::Dim, self.dim, target, DIM_TIME_MS, Easing::EaseInOut);
        events.push(if selected {
            UiEvent::Selected { id: self.id }
        } else {
            UiEvent::Deselected { id: self.id }
        });
    }

    fn handle_input(&mut self, input: &UiInput, events: &mut Vec<UiEvent>) -> bool {
        match input {
            UiInput::Confirm | UiInput::PointerPress { .. } => {
                self.toggle(events);
                true
            }
            _ => false,
        }
    }

    fn update(&mut self, dt_ms: u32, _events: &mut Vec<UiEvent>) {
        let mut dim = self.dim;
        self.twitch.tick(dt_ms, |field, value| {
            if field == TwitchField::Dim {
                dim = value;
            }
        });
        if dim != self.dim {
            self.dim = dim;
            self.cache.mark_dirty();
        }
    }

    fn alloc_gpu(
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

    fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        let Some((w, h)) = self.cache.used_pixel_size() else {
            debug_assert!(false, "checkbox rendered before alloc_gpu");
            return Err(BezelError::NotInitialized("checkbox surface"));
        };
        let label = self.label.as_str();
        let art = self.art.map(|(on, off)| if self.checked { on } else { off });
        let checked = self.checked;
        let dim = self.dim;
        self.cache
            .refresh(device, |d| paint(d, w, h, label, art, checked, dim))?;

        self.binding.set_diffuse(self.cache.texture());
        self.mesh.render(device, self.binding.as_mut())
    }

    fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        self.cache.release(device)?;
        self.mesh.release(device, shared)
    }

    fn device_reset(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        self.cache.device_reset(device)
    }

    fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Paints body, check art (or drawn box), and the wrapped label.
fn paint(
    device: &mut dyn GpuDevice,
    w: u32,
    h: u32,
    label: &str,
    art: Option<TextureId>,
    checked: bool,
    dim: f32,
) -> Result<()> {
    device.fill_rect(0, 0, w, h, Color::WHITE.scale_rgb(dim))?;

    // Check square on the left, 60% of the panel height.
    let side = (h as f32 * 0.6) as u32;
    let pad = (h as f32 * 0.2) as i32;
    match art {
        Some(tex) => {
            device.blit(TextureRef::Texture(tex), pad, pad, side, side)?;
        }
        None => {
            device.fill_rect(pad, pad, side, side, Color::rgb(90, 90, 90))?;
            device.fill_rect(
                pad + 2,
                pad + 2,
                side.saturating_sub(4),
                side.saturating_sub(4),
                Color::WHITE.scale_rgb(dim),
            )?;
            if checked {
                let quarter = (side / 4) as i32;
                device.fill_rect(
                    pad + quarter,
                    pad + quarter,
                    side / 2,
                    side / 2,
                    Color::rgb(60, 60, 60),
                )?;
            }
        }
    }

    let text_x = pad + side as i32 + pad;
    let text_w = (w as i32 - text_x - pad).max(0) as u32;
    let font = (h as f32 * 0.22).max(8.0) as u16;
    let text_y = pad;
    // Shadow pass first, then the label on top of it.
    device.draw_text_wrapped(
        label,
        text_x,
        text_y + LABEL_SHADOW_OFFSET,
        font,
        LABEL_SHADOW,
        text_w,
        MAX_LABEL_LINES,
    )?;
    device.draw_text_wrapped(
        label,
        text_x,
        text_y,
        font,
        LABEL_COLOR,
        text_w,
        MAX_LABEL_LINES,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{DeviceCall, MockDevice};

    fn checkbox(label: &str) -> Checkbox {
        Checkbox::new(
            WidgetId(3),
            CheckboxParams {
                label: label.into(),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn toggle_flips_and_reports() {
        let mut c = checkbox("Show hints");
        let mut events = Vec::new();

        assert!(c.toggle(&mut events));
        assert!(c.is_checked());
        assert!(!c.toggle(&mut events));
        assert!(!c.is_checked());
        assert_eq!(
            events,
            vec![
                UiEvent::Toggled {
                    id: WidgetId(3),
                    checked: true
                },
                UiEvent::Toggled {
                    id: WidgetId(3),
                    checked: false
                },
            ]
        );
    }

    #[test]
    fn set_checked_reports_only_changes() {
        let mut c = checkbox("x");
        let mut events = Vec::new();
        assert!(!c.set_checked(false, &mut events));
        assert!(events.is_empty());
        assert!(c.set_checked(true, &mut events));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn confirm_and_press_toggle_cancel_does_not() {
        let mut c = checkbox("x");
        let mut events = Vec::new();

        assert!(c.handle_input(&UiInput::Confirm, &mut events));
        assert!(c.is_checked());
        assert!(c.handle_input(&UiInput::PointerPress { x: 0.5, y: 0.5 }, &mut events));
        assert!(!c.is_checked());
        assert!(!c.handle_input(&UiInput::Cancel, &mut events));
    }

    #[test]
    fn paints_at_high_density() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let mut c = Checkbox::new(
            WidgetId(1),
            CheckboxParams {
                width: 2.0,
                height: 1.0,
                ..Default::default()
            },
        )
        .unwrap();

        c.alloc_gpu(&mut device, &mut shared, false).unwrap();
        assert_eq!(c.cache.pixel_size(), Some((256, 128)));
    }

    #[test]
    fn render_uses_art_when_supplied() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let on = TextureId(101);
        let off = TextureId(102);
        let mut c = Checkbox::new(
            WidgetId(1),
            CheckboxParams {
                label: "Sound".into(),
                checked: true,
                art: Some((on, off)),
                ..Default::default()
            },
        )
        .unwrap();

        c.alloc_gpu(&mut device, &mut shared, false).unwrap();
        c.render(&mut device).unwrap();
        assert_eq!(device.blitted(), vec![TextureRef::Texture(on)]);

        let mut events = Vec::new();
        c.toggle(&mut events);
        c.render(&mut device).unwrap();
        assert_eq!(
            device.blitted(),
            vec![TextureRef::Texture(on), TextureRef::Texture(off)]
        );
    }

    #[test]
    fn render_falls_back_to_drawn_box() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let mut c = checkbox("Sound");

        c.alloc_gpu(&mut device, &mut shared, false).unwrap();
        c.render(&mut device).unwrap();

        assert_eq!(device.blit_count(), 0);
        assert!(device.has_text("Sound"));
        assert_eq!(device.draw_indexed_count(), 1);
    }

    #[test]
    fn long_labels_cap_at_three_lines() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let mut c = checkbox(
            "toggle an option with an extremely wordy explanation that cannot \
             possibly fit on a single line of a small panel",
        );

        c.alloc_gpu(&mut device, &mut shared, false).unwrap();
        c.render(&mut device).unwrap();

        let label_lines = device
            .calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DrawText { color, .. } if *color == LABEL_COLOR))
            .count();
        assert!(label_lines > 1, "expected a wrapped label");
        assert!(label_lines as u32 <= MAX_LABEL_LINES);

        // The shadow pass mirrors the label pass.
        let shadow_lines = device
            .calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DrawText { color, .. } if *color == LABEL_SHADOW))
            .count();
        assert_eq!(shadow_lines, label_lines);
    }

    #[test]
    fn toggling_repaints_on_next_render() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let mut c = checkbox("x");
        let mut events = Vec::new();

        c.alloc_gpu(&mut device, &mut shared, false).unwrap();
        c.render(&mut device).unwrap();
        let binds = device.clear_count();

        c.render(&mut device).unwrap();
        assert_eq!(device.clear_count(), binds, "clean render must not repaint");

        c.toggle(&mut events);
        c.render(&mut device).unwrap();
        assert_eq!(device.clear_count(), binds + 1);
    }

    #[test]
    fn two_mutations_repaint_once() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let mut c = checkbox("x");
        let mut events = Vec::new();

        c.alloc_gpu(&mut device, &mut shared, false).unwrap();
        c.render(&mut device).unwrap();
        let repaints = device.clear_count();

        // Both flips land in the same frame; one repaint covers them.
        c.toggle(&mut events);
        c.toggle(&mut events);
        c.render(&mut device).unwrap();
        assert_eq!(device.clear_count(), repaints + 1);
    }
}
