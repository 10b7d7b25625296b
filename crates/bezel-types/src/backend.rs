//! Graphics device trait definitions.
//!
//! The toolkit never calls a concrete engine. All GPU work is dispatched
//! through the `GpuDevice` trait, and shader state through `ShaderBinding`;
//! engine integrations adapt these to their native device objects.
//!
//! `GpuDevice` splits into core methods (required) and extended helpers
//! (optional, with default implementations built on the core methods), so
//! a minimal backend stays small while richer ones can override for
//! native-accelerated paths.

use crate::color::Color;
use crate::error::Result;
use crate::vertex::PanelVertex;

/// Opaque handle to a device vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBufferId(pub u64);

/// Opaque handle to a device index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferId(pub u64);

/// Opaque handle to an offscreen render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u64);

/// Opaque handle to a loaded texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// Pixel format for allocated render targets.
///
/// `Color` (8-bit RGBA) is the only format the toolkit allocates; the
/// parameter exists so backends with stricter surface rules can map it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceFormat {
    Color,
}

/// A texture source for sampling: either a loaded texture or the color
/// surface of a render target. Cached widget surfaces and loaded art
/// share one blit/bind path through this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRef {
    Texture(TextureId),
    Target(RenderTargetId),
}

/// Rendering device trait.
///
/// # Core methods (required)
///
/// Buffer objects, render targets, textures, rect fills, and text. These
/// have no default implementations; every backend provides them.
///
/// # Extended helpers (optional, with defaults)
///
/// Tinted blits and composite text calls default to the core methods, so
/// a backend works without overriding any of them.
#[allow(clippy::too_many_arguments)]
pub trait GpuDevice {
    // -----------------------------------------------------------------------
    // Core: buffer objects
    // -----------------------------------------------------------------------

    /// Upload a vertex slice as an immutable vertex buffer.
    fn create_vertex_buffer(&mut self, vertices: &[PanelVertex]) -> Result<VertexBufferId>;

    /// Destroy a previously created vertex buffer.
    fn destroy_vertex_buffer(&mut self, buf: VertexBufferId) -> Result<()>;

    /// Upload a 16-bit index slice as an immutable index buffer.
    fn create_index_buffer(&mut self, indices: &[u16]) -> Result<IndexBufferId>;

    /// Destroy a previously created index buffer.
    fn destroy_index_buffer(&mut self, buf: IndexBufferId) -> Result<()>;

    /// Bind both buffers and issue one indexed triangle-list draw.
    ///
    /// Side effect: the buffers stay bound on the device afterward. Callers
    /// that care about bound-buffer state restore it themselves.
    fn draw_indexed(
        &mut self,
        vertices: VertexBufferId,
        indices: IndexBufferId,
        vertex_count: u32,
        triangle_count: u32,
    ) -> Result<()>;

    // -----------------------------------------------------------------------
    // Core: render targets
    // -----------------------------------------------------------------------

    /// Allocate an offscreen render target of the given pixel size.
    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        format: SurfaceFormat,
    ) -> Result<RenderTargetId>;

    /// Destroy a previously allocated render target.
    fn destroy_render_target(&mut self, target: RenderTargetId) -> Result<()>;

    /// Redirect subsequent draws to an offscreen target.
    ///
    /// Fails with `SurfaceUnavailable` while the device is mid-reset; the
    /// caller drops the frame and retries after the reset notification.
    fn set_render_target(&mut self, target: RenderTargetId) -> Result<()>;

    /// Restore drawing to the backbuffer.
    fn restore_backbuffer(&mut self) -> Result<()>;

    /// Clear the active surface to a solid color.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Whether the host environment invalidated this target's contents
    /// (display mode change, surface loss). Queried once per frame by
    /// cache owners, which re-render when it reports `true`.
    fn is_content_lost(&self, target: RenderTargetId) -> bool;

    // -----------------------------------------------------------------------
    // Core: textures and 2D raster
    // -----------------------------------------------------------------------

    /// Load raw RGBA pixel data as a texture.
    fn load_texture(&mut self, width: u32, height: u32, rgba_data: &[u8]) -> Result<TextureId>;

    /// Destroy a previously loaded texture.
    fn destroy_texture(&mut self, tex: TextureId) -> Result<()>;

    /// Blit a texture into the active surface at the given rectangle.
    fn blit(&mut self, tex: TextureRef, x: i32, y: i32, w: u32, h: u32) -> Result<()>;

    /// Fill a rectangle of the active surface with a solid color.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    // -----------------------------------------------------------------------
    // Core: text
    // -----------------------------------------------------------------------

    /// Draw text into the active surface. `size_px` is a hint; backends
    /// may approximate with their available font.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size_px: u16, color: Color)
    -> Result<()>;

    /// Measure the width of a string at the given size, in pixels.
    fn measure_text(&self, text: &str, size_px: u16) -> u32;

    // -----------------------------------------------------------------------
    // Extended: blits (defaulted)
    // -----------------------------------------------------------------------

    /// Blit with a multiplicative tint. The default ignores the tint.
    fn blit_tinted(
        &mut self,
        tex: TextureRef,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        tint: Color,
    ) -> Result<()> {
        let _ = tint;
        self.blit(tex, x, y, w, h)
    }

    // -----------------------------------------------------------------------
    // Extended: text (defaulted)
    // -----------------------------------------------------------------------

    /// Measure the line height of text at the given size.
    fn measure_text_height(&self, size_px: u16) -> u32 {
        (size_px as f32 * 1.2) as u32
    }

    /// Draw text with a drop shadow: shadow pass at `offset`, then the
    /// foreground pass on top.
    fn draw_text_shadowed(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        size_px: u16,
        color: Color,
        shadow: Color,
        offset: (i32, i32),
    ) -> Result<()> {
        self.draw_text(text, x + offset.0, y + offset.1, size_px, shadow)?;
        self.draw_text(text, x, y, size_px, color)
    }

    /// Draw word-wrapped text within `max_width`, stopping after
    /// `max_lines` lines. Returns the number of lines drawn.
    fn draw_text_wrapped(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        size_px: u16,
        color: Color,
        max_width: u32,
        max_lines: u32,
    ) -> Result<u32> {
        let line_h = self.measure_text_height(size_px) as i32;
        let mut lines_drawn = 0u32;
        let mut cy = y;
        'outer: for paragraph in text.split('\n') {
            let words: Vec<&str> = paragraph.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            let mut current = String::new();
            for word in words {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.measure_text(&candidate, size_px) > max_width && !current.is_empty() {
                    self.draw_text(&current, x, cy, size_px, color)?;
                    lines_drawn += 1;
                    cy += line_h;
                    if lines_drawn == max_lines {
                        break 'outer;
                    }
                    current = word.to_string();
                } else {
                    current = candidate;
                }
            }
            if !current.is_empty() {
                self.draw_text(&current, x, cy, size_px, color)?;
                lines_drawn += 1;
                cy += line_h;
                if lines_drawn == max_lines {
                    break;
                }
            }
        }
        Ok(lines_drawn)
    }
}

/// Shader state for a panel draw.
///
/// Models a multi-pass effect: `Render` applies each pass in turn and
/// issues one indexed draw per pass. Bindings that expose a diffuse
/// texture parameter receive the widget's cached surface through
/// `set_diffuse` before the draw.
pub trait ShaderBinding {
    /// Number of passes the current technique defines. At least 1.
    fn pass_count(&self) -> u32;

    /// Commit pass state to the device ahead of the indexed draw.
    fn apply_pass(&mut self, device: &mut dyn GpuDevice, pass: u32) -> Result<()>;

    /// Supply the diffuse texture for subsequent passes. Bindings without
    /// a diffuse parameter ignore this.
    fn set_diffuse(&mut self, texture: Option<TextureRef>) {
        let _ = texture;
    }

    /// Supply overall opacity for subsequent passes. Bindings without an
    /// alpha parameter ignore this.
    fn set_alpha(&mut self, alpha: f32) {
        let _ = alpha;
    }
}

/// A single-pass binding with no shader parameters. Useful for engines
/// whose panel technique is fixed, and for tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedFunction;

impl ShaderBinding for FixedFunction {
    fn pass_count(&self) -> u32 {
        1
    }

    fn apply_pass(&mut self, _device: &mut dyn GpuDevice, _pass: u32) -> Result<()> {
        Ok(())
    }
}
