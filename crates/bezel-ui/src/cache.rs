//! Dirty-flag render target cache.
//!
//! Widgets paint their composite look (panel body, text, decals) into an
//! offscreen target once, then reuse that texture every frame until some
//! state change marks it dirty. [`SurfaceCache`] owns the target, the
//! dirty flag, and the repaint protocol: bind target, clear, run the
//! caller's draw closure, restore the backbuffer.
//!
//! Two device realities leak in here and are handled per frame: the
//! target can refuse to bind while the device is mid-reset (skip the
//! repaint, stay dirty, try again next frame), and its contents can be
//! discarded behind our back (repaint on next refresh).

use bezel_types::backend::{GpuDevice, RenderTargetId, SurfaceFormat, TextureRef};
use bezel_types::color::Color;
use bezel_types::error::{BezelError, Result};

/// Pixel density most cached widgets paint at.
pub const DEFAULT_DPI: u32 = 96;

/// Offscreen texture with a dirty flag.
///
/// Logical size is in world units; pixel size is derived at allocation
/// from the DPI, optionally rounded up to powers of two for devices
/// that want them. After pow2 rounding only part of the surface is
/// used, and [`SurfaceCache::max_uv`] reports the used fraction so
/// panel meshes can clamp their overall UVs to it.
#[derive(Debug)]
pub struct SurfaceCache {
    width: f32,
    height: f32,
    dpi: u32,
    clear_color: Color,
    dirty: bool,
    target: Option<RenderTargetId>,
    alloc_px: Option<(u32, u32)>,
    used_px: Option<(u32, u32)>,
    max_uv: (f32, f32),
}

impl SurfaceCache {
    /// Cache for a `width` x `height` world-unit surface at the
    /// default DPI. Starts dirty and unallocated.
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_dpi(width, height, DEFAULT_DPI)
    }

    pub fn with_dpi(width: f32, height: f32, dpi: u32) -> Self {
        Self {
            width,
            height,
            dpi,
            clear_color: Color::TRANSPARENT,
            dirty: true,
            target: None,
            alloc_px: None,
            used_px: None,
            max_uv: (1.0, 1.0),
        }
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Requests a repaint on the next refresh. Idempotent.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_allocated(&self) -> bool {
        self.target.is_some()
    }

    /// Fraction of the allocated surface actually painted, 1.0 each way
    /// unless pow2 rounding padded the target.
    pub fn max_uv(&self) -> (f32, f32) {
        self.max_uv
    }

    /// Allocated pixel dimensions, once allocated.
    pub fn pixel_size(&self) -> Option<(u32, u32)> {
        self.alloc_px
    }

    /// Painted pixel dimensions: the area draw closures should fill.
    /// Smaller than `pixel_size` when pow2 rounding padded the target.
    pub fn used_pixel_size(&self) -> Option<(u32, u32)> {
        self.used_px
    }

    pub fn logical_size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// The cached surface as a blittable / bindable texture.
    pub fn texture(&self) -> Option<TextureRef> {
        self.target.map(TextureRef::Target)
    }

    /// Creates the render target. Degenerate logical sizes round up to
    /// one texel. Idempotent; call `release` first to change sizing.
    pub fn alloc(&mut self, device: &mut dyn GpuDevice, pow2: bool) -> Result<()> {
        if self.target.is_some() {
            return Ok(());
        }
        let used_w = ((self.width * self.dpi as f32).round() as u32).max(1);
        let used_h = ((self.height * self.dpi as f32).round() as u32).max(1);
        let (alloc_w, alloc_h) = if pow2 {
            (used_w.next_power_of_two(), used_h.next_power_of_two())
        } else {
            (used_w, used_h)
        };

        let target = device.create_render_target(alloc_w, alloc_h, SurfaceFormat::Color)?;
        log::debug!(
            "cached surface allocated: {used_w}x{used_h} used of {alloc_w}x{alloc_h}"
        );
        self.target = Some(target);
        self.alloc_px = Some((alloc_w, alloc_h));
        self.used_px = Some((used_w, used_h));
        self.max_uv = (
            used_w as f32 / alloc_w as f32,
            used_h as f32 / alloc_h as f32,
        );
        self.dirty = true;
        Ok(())
    }

    /// Repaints the surface if it needs it.
    ///
    /// Returns `Ok(true)` when `draw` ran and the cache is now clean,
    /// `Ok(false)` when nothing was painted: either the cache was
    /// already clean, or the target would not bind this frame (the
    /// device is mid-reset; the cache stays dirty and the next refresh
    /// retries). Lost target contents are detected here and force a
    /// repaint even when the flag says clean.
    pub fn refresh(
        &mut self,
        device: &mut dyn GpuDevice,
        draw: impl FnOnce(&mut dyn GpuDevice) -> Result<()>,
    ) -> Result<bool> {
        let Some(target) = self.target else {
            debug_assert!(false, "cached surface refreshed before alloc");
            return Err(BezelError::NotInitialized("cached surface target"));
        };

        if !self.dirty && device.is_content_lost(target) {
            log::warn!("cached surface contents lost, repainting");
            self.dirty = true;
        }
        if !self.dirty {
            return Ok(false);
        }

        match device.set_render_target(target) {
            Ok(()) => {}
            Err(BezelError::SurfaceUnavailable(why)) => {
                log::debug!("cached surface refresh deferred: {why}");
                return Ok(false);
            }
            Err(e) => return Err(e),
        }

        let painted = device.clear(self.clear_color).and_then(|()| draw(device));
        device.restore_backbuffer()?;
        painted?;

        self.dirty = false;
        Ok(true)
    }

    /// Drops and recreates the target after a device reset. Contents
    /// are gone, so the cache comes back dirty.
    pub fn device_reset(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        if let Some(old) = self.target.take() {
            device.destroy_render_target(old)?;
        }
        if let Some((w, h)) = self.alloc_px {
            let target = device.create_render_target(w, h, SurfaceFormat::Color)?;
            log::info!("cached surface recreated after device reset ({w}x{h})");
            self.target = Some(target);
        }
        self.dirty = true;
        Ok(())
    }

    /// Destroys the target. The cache returns to its unallocated,
    /// dirty state. Idempotent.
    pub fn release(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        if let Some(target) = self.target.take() {
            device.destroy_render_target(target)?;
        }
        self.alloc_px = None;
        self.used_px = None;
        self.max_uv = (1.0, 1.0);
        self.dirty = true;
        Ok(())
    }
}
