//! Stepped value slider.
//!
//! The slider holds a value in `min..=max` that moves in `increment`
//! steps. Left/Right adjust it while focused (the grid's focus stays
//! put; the slider consumes those inputs), and holding a direction past
//! a configured delay multiplies the step for fast scrolling across
//! wide ranges. Pointer drags land anywhere on the track and snap to
//! the nearest stop, rounding half up.
//!
//! Two values exist at once: the logical value, which changes
//! instantly and is what events report, and a displayed value that
//! eases after it over a short tween so the fill bar animates. Text
//! shows the logical value.

use bezel_types::backend::{FixedFunction, GpuDevice, ShaderBinding};
use bezel_types::color::Color;
use bezel_types::config::UiConfig;
use bezel_types::error::{BezelError, Result};
use bezel_types::input::{NavDir, UiInput};
use vek::{Vec2, Vec3};

use crate::animation::{Easing, TwitchField, TwitchSet};
use crate::cache::SurfaceCache;
use crate::mesh::NineSliceMesh;
use crate::shared_index::SharedIndexBuffer;
use crate::widget::{UiEvent, Widget, WidgetId};

const UNFOCUSED_DIM: f32 = 0.5;
const FOCUSED_DIM: f32 = 1.0;
const DIM_TIME_MS: u32 = 200;
const VALUE_TIME_MS: u32 = 100;
/// A pause in the repeat stream longer than this ends the hold.
const HOLD_GAP_MS: u64 = 400;
/// Horizontal track inset as a fraction of the widget width.
const TRACK_INSET: f32 = 0.05;

const BODY: Color = Color::rgba(24, 24, 24, 235);
const TRACK: Color = Color::rgb(70, 70, 70);
const TEXT: Color = Color::WHITE;

/// How the value readout prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderFormat {
    /// Whole numbers, "3".
    Integer,
    /// Fixed decimal places, "7.50" at two.
    Float { decimals: u8 },
}

/// Construction parameters for [`Slider`].
#[derive(Debug, Clone)]
pub struct SliderParams {
    pub label: String,
    /// Panel geometry, world units.
    pub width: f32,
    pub height: f32,
    pub edge_size: f32,
    pub min: f32,
    pub max: f32,
    pub increment: f32,
    pub initial: f32,
    /// Value readout style; `None` derives it from the increment.
    pub format: Option<SliderFormat>,
    pub help: Option<String>,
}

impl Default for SliderParams {
    fn default() -> Self {
        Self {
            label: String::new(),
            width: 4.0,
            height: 1.0,
            edge_size: 0.25,
            min: 0.0,
            max: 1.0,
            increment: 0.1,
            initial: 0.0,
            format: None,
            help: None,
        }
    }
}

/// Stepped slider widget with a cached composite surface.
pub struct Slider {
    id: WidgetId,
    label: String,
    help: Option<String>,
    min: f32,
    max: f32,
    step_size: f32,
    format: SliderFormat,
    value: f32,
    displayed: f32,
    selected: bool,
    dim: f32,
    position: Vec3<f32>,
    mesh: NineSliceMesh,
    cache: SurfaceCache,
    binding: Box<dyn ShaderBinding>,
    twitch: TwitchSet,
    hold_dir: Option<i32>,
    hold_ms: u64,
    gap_ms: u64,
    dragging: bool,
    fast_delay_ms: u64,
    fast_scalar: u32,
}

impl Slider {
    pub fn new(id: WidgetId, params: SliderParams, config: &UiConfig) -> Result<Self> {
        if !params.increment.is_finite() || params.increment <= 0.0 {
            return Err(BezelError::InvalidGeometry(format!(
                "slider increment must be positive, got {}",
                params.increment
            )));
        }
        if !(params.min < params.max) {
            return Err(BezelError::InvalidGeometry(format!(
                "slider range must satisfy min < max, got {}..{}",
                params.min, params.max
            )));
        }
        let mesh = NineSliceMesh::new(params.width, params.height, params.edge_size)?;
        let cache = SurfaceCache::new(params.width, params.height);
        let initial = params.initial.clamp(params.min, params.max);
        Ok(Self {
            id,
            label: params.label,
            help: params.help,
            min: params.min,
            max: params.max,
            step_size: params.increment,
            format: params.format.unwrap_or_else(|| derive_format(params.increment)),
            value: initial,
            displayed: initial,
            selected: false,
            dim: UNFOCUSED_DIM,
            position: Vec3::zero(),
            mesh,
            cache,
            binding: Box::new(FixedFunction),
            twitch: TwitchSet::new(),
            hold_dir: None,
            hold_ms: 0,
            gap_ms: 0,
            dragging: false,
            fast_delay_ms: config.fast_scroll_delay_ms,
            fast_scalar: config.fast_scroll_scalar,
        })
    }

    /// Swaps the shader binding used for the panel draw.
    pub fn set_shader(&mut self, binding: Box<dyn ShaderBinding>) {
        self.binding = binding;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// The animating value the fill bar shows.
    pub fn displayed_value(&self) -> f32 {
        self.displayed
    }

    /// Logical value as a 0..1 fraction of the range.
    pub fn percentage(&self) -> f32 {
        (self.value - self.min) / (self.max - self.min)
    }

    /// Number of increment stops across the range.
    fn stops(&self) -> i32 {
        ((self.max - self.min) / self.step_size + 0.5) as i32
    }

    /// Sets the value from a 0..1 fraction, snapping to the nearest
    /// stop with halves rounding up. Returns whether the value changed.
    pub fn set_percentage(&mut self, p: f32, events: &mut Vec<UiEvent>) -> bool {
        let p = p.clamp(0.0, 1.0);
        let step = (p * self.stops() as f32 + 0.5) as i32;
        let new = (self.min + step as f32 * self.step_size).min(self.max);
        self.commit(new, events)
    }

    /// Steps the value up one increment. Returns false (and reports
    /// `StepRefused`) when already at the top.
    pub fn increment(&mut self, events: &mut Vec<UiEvent>) -> bool {
        self.step(1, events)
    }

    /// Steps the value down one increment.
    pub fn decrement(&mut self, events: &mut Vec<UiEvent>) -> bool {
        self.step(-1, events)
    }

    fn step(&mut self, dir: i32, events: &mut Vec<UiEvent>) -> bool {
        let fast = self.hold_dir == Some(dir) && self.hold_ms >= self.fast_delay_ms;
        if self.hold_dir != Some(dir) {
            self.hold_dir = Some(dir);
            self.hold_ms = 0;
        }
        self.gap_ms = 0;

        let scale = if fast { self.fast_scalar as f32 } else { 1.0 };
        let new = (self.value + dir as f32 * self.step_size * scale).clamp(self.min, self.max);
        if self.commit(new, events) {
            true
        } else {
            events.push(UiEvent::StepRefused { id: self.id });
            false
        }
    }

    fn commit(&mut self, new: f32, events: &mut Vec<UiEvent>) -> bool {
        if new == self.value {
            return false;
        }
        self.value = new;
        self.twitch.start(
            TwitchField::DisplayValue,
            self.displayed,
            new,
            VALUE_TIME_MS,
            Easing::EaseOut,
        );
        self.cache.mark_dirty();
        events.push(UiEvent::ValueChanged {
            id: self.id,
            value: new,
        });
        true
    }

    fn apply_pointer(&mut self, u: f32, events: &mut Vec<UiEvent>) {
        let p = ((u - TRACK_INSET) / (1.0 - 2.0 * TRACK_INSET)).clamp(0.0, 1.0);
        self.set_percentage(p, events);
    }

    fn fill_fraction(&self) -> f32 {
        ((self.displayed - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

impl Widget for Slider {
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

    /// Pointer coordinates are widget-local UVs: the container resolves
    /// hits and hands (0,0)..(1,1) across this widget's face. Presses
    /// on the lower half grab the track.
    fn handle_input(&mut self, input: &UiInput, events: &mut Vec<UiEvent>) -> bool {
        match input {
            UiInput::Nav(NavDir::Right) => {
                self.step(1, events);
                true
            }
            UiInput::Nav(NavDir::Left) => {
                self.step(-1, events);
                true
            }
            UiInput::PointerPress { x, y } => {
                if *y > 0.5 {
                    self.dragging = true;
                    self.apply_pointer(*x, events);
                    true
                } else {
                    false
                }
            }
            UiInput::PointerMove { x, .. } => {
                if self.dragging {
                    self.apply_pointer(*x, events);
                }
                self.dragging
            }
            UiInput::PointerRelease { .. } => {
                let was = self.dragging;
                self.dragging = false;
                was
            }
            _ => false,
        }
    }

    fn update(&mut self, dt_ms: u32, _events: &mut Vec<UiEvent>) {
        if self.hold_dir.is_some() {
            self.hold_ms += dt_ms as u64;
            self.gap_ms += dt_ms as u64;
            if self.gap_ms > HOLD_GAP_MS {
                self.hold_dir = None;
                self.hold_ms = 0;
            }
        }

        let mut displayed = self.displayed;
        let mut dim = self.dim;
        self.twitch.tick(dt_ms, |field, value| match field {
            TwitchField::DisplayValue => displayed = value,
            TwitchField::Dim => dim = value,
            _ => {}
        });
        if displayed != self.displayed || dim != self.dim {
            self.displayed = displayed;
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
            debug_assert!(false, "slider rendered before alloc_gpu");
            return Err(BezelError::NotInitialized("slider surface"));
        };
        let label = self.label.as_str();
        let value_text = format_value(self.value, self.format);
        let frac = self.fill_fraction();
        let dim = self.dim;
        self.cache
            .refresh(device, |d| paint(d, w, h, label, &value_text, frac, dim))?;

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

/// Paints the composite slider look into the cached surface. Pixel
/// coordinates, origin top-left.
fn paint(
    device: &mut dyn GpuDevice,
    w: u32,
    h: u32,
    label: &str,
    value_text: &str,
    frac: f32,
    dim: f32,
) -> Result<()> {
    device.fill_rect(0, 0, w, h, BODY.scale_rgb(dim))?;

    let inset = (w as f32 * TRACK_INSET) as u32;
    let font = (h as f32 * 0.30).max(8.0) as u16;
    device.draw_text(
        label,
        inset as i32,
        (h / 10) as i32,
        font,
        TEXT.scale_rgb(dim),
    )?;
    let value_w = device.measure_text(value_text, font);
    device.draw_text(
        value_text,
        (w.saturating_sub(inset + value_w)) as i32,
        (h / 10) as i32,
        font,
        TEXT.scale_rgb(dim),
    )?;

    let track_x = inset;
    let track_w = w.saturating_sub(2 * inset);
    let track_y = (h as f32 * 0.60) as u32;
    let track_h = (h as f32 * 0.25).max(1.0) as u32;
    device.fill_rect(
        track_x as i32,
        track_y as i32,
        track_w,
        track_h,
        TRACK.scale_rgb(dim),
    )?;
    let filled = (track_w as f32 * frac) as u32;
    if filled > 0 {
        device.fill_rect(
            track_x as i32,
            track_y as i32,
            filled,
            track_h,
            Color::WHITE.scale_rgb(dim),
        )?;
    }
    Ok(())
}

/// Picks a readout style from the step size: whole-number steps print
/// as integers, tenths get one decimal, anything finer two.
fn derive_format(step_size: f32) -> SliderFormat {
    let decimals = (0..=2)
        .find(|d| {
            let scaled = step_size * 10f32.powi(*d);
            (scaled - scaled.round()).abs() < 1e-4
        })
        .unwrap_or(3) as u8;
    if decimals == 0 {
        SliderFormat::Integer
    } else {
        SliderFormat::Float { decimals }
    }
}

fn format_value(value: f32, format: SliderFormat) -> String {
    match format {
        SliderFormat::Integer => format!("{value:.0}"),
        SliderFormat::Float { decimals } => format!("{value:.prec$}", prec = decimals as usize),
    }
}
