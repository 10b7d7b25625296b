//! Shared mock device for mesh, cache, and widget tests.
//!
//! `MockDevice` implements `GpuDevice` by recording every call into a
//! `DeviceCall` list that tests assert against, and exposes knobs for the
//! failure paths: a one-shot `SurfaceUnavailable` on target bind, and
//! per-target content-lost reporting.

use std::cell::RefCell;
use std::rc::Rc;

use bezel_types::backend::{
    GpuDevice, IndexBufferId, RenderTargetId, ShaderBinding, SurfaceFormat, TextureId, TextureRef,
    VertexBufferId,
};
use bezel_types::color::Color;
use bezel_types::error::{BezelError, Result};
use bezel_types::vertex::PanelVertex;

/// Glyph advance used by `measure_text`, so line-breaking tests can
/// compute expected widths by character count.
pub const MOCK_GLYPH_WIDTH: u32 = 8;

/// One recorded device call.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    CreateVertexBuffer {
        id: VertexBufferId,
        vertex_count: usize,
    },
    DestroyVertexBuffer(VertexBufferId),
    CreateIndexBuffer {
        id: IndexBufferId,
        index_count: usize,
    },
    DestroyIndexBuffer(IndexBufferId),
    DrawIndexed {
        vertices: VertexBufferId,
        indices: IndexBufferId,
        vertex_count: u32,
        triangle_count: u32,
    },
    CreateRenderTarget {
        id: RenderTargetId,
        width: u32,
        height: u32,
    },
    DestroyRenderTarget(RenderTargetId),
    SetRenderTarget(RenderTargetId),
    RestoreBackbuffer,
    Clear(Color),
    LoadTexture {
        id: TextureId,
        width: u32,
        height: u32,
    },
    DestroyTexture(TextureId),
    Blit {
        tex: TextureRef,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    },
    FillRect {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        color: Color,
    },
    DrawText {
        text: String,
        x: i32,
        y: i32,
        size_px: u16,
        color: Color,
    },
}

/// Recording `GpuDevice` used across the crate's tests.
pub struct MockDevice {
    pub calls: Vec<DeviceCall>,
    /// When set, the next `set_render_target` fails with
    /// `SurfaceUnavailable` and the flag clears.
    pub fail_next_target_bind: bool,
    /// Targets currently reporting lost contents.
    pub lost_targets: Vec<RenderTargetId>,
    next_id: u64,
}

impl MockDevice {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            fail_next_target_bind: false,
            lost_targets: Vec::new(),
            next_id: 0,
        }
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn mark_content_lost(&mut self, target: RenderTargetId) {
        if !self.lost_targets.contains(&target) {
            self.lost_targets.push(target);
        }
    }

    pub fn clear_content_lost(&mut self) {
        self.lost_targets.clear();
    }

    // -- Query helpers --

    pub fn draw_indexed_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DrawIndexed { .. }))
            .count()
    }

    pub fn clear_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::Clear(_)))
            .count()
    }

    pub fn vertex_buffers_created(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::CreateVertexBuffer { .. }))
            .count()
    }

    pub fn index_buffers_created(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::CreateIndexBuffer { .. }))
            .count()
    }

    pub fn render_targets_created(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::CreateRenderTarget { .. }))
            .count()
    }

    /// Index buffers created minus destroyed.
    pub fn live_index_buffers(&self) -> isize {
        let created = self.index_buffers_created() as isize;
        let destroyed = self
            .calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DestroyIndexBuffer(_)))
            .count() as isize;
        created - destroyed
    }

    /// Vertex buffers created minus destroyed.
    pub fn live_vertex_buffers(&self) -> isize {
        let created = self.vertex_buffers_created() as isize;
        let destroyed = self
            .calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::DestroyVertexBuffer(_)))
            .count() as isize;
        created - destroyed
    }

    pub fn blit_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DeviceCall::Blit { .. }))
            .count()
    }

    /// Vertex buffer ids of every `DrawIndexed`, in call order. Each
    /// mesh owns its vertex buffer, so this doubles as a draw-order
    /// probe for mesh-backed widgets.
    pub fn draw_indexed_vbufs(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::DrawIndexed { vertices, .. } => Some(vertices.0),
                _ => None,
            })
            .collect()
    }

    /// X coordinates of every `FillRect`, in call order. Stub widgets
    /// draw an id-keyed marker rect, so this doubles as a draw-order
    /// probe.
    pub fn fill_rect_xs(&self) -> Vec<i32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::FillRect { x, .. } => Some(*x),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// Blitted texture sources, in call order.
    pub fn blitted(&self) -> Vec<TextureRef> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::Blit { tex, .. } => Some(*tex),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuDevice for MockDevice {
    fn create_vertex_buffer(&mut self, vertices: &[PanelVertex]) -> Result<VertexBufferId> {
        let id = VertexBufferId(self.fresh_id());
        self.calls.push(DeviceCall::CreateVertexBuffer {
            id,
            vertex_count: vertices.len(),
        });
        Ok(id)
    }

    fn destroy_vertex_buffer(&mut self, buf: VertexBufferId) -> Result<()> {
        self.calls.push(DeviceCall::DestroyVertexBuffer(buf));
        Ok(())
    }

    fn create_index_buffer(&mut self, indices: &[u16]) -> Result<IndexBufferId> {
        let id = IndexBufferId(self.fresh_id());
        self.calls.push(DeviceCall::CreateIndexBuffer {
            id,
            index_count: indices.len(),
        });
        Ok(id)
    }

    fn destroy_index_buffer(&mut self, buf: IndexBufferId) -> Result<()> {
        self.calls.push(DeviceCall::DestroyIndexBuffer(buf));
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        vertices: VertexBufferId,
        indices: IndexBufferId,
        vertex_count: u32,
        triangle_count: u32,
    ) -> Result<()> {
        self.calls.push(DeviceCall::DrawIndexed {
            vertices,
            indices,
            vertex_count,
            triangle_count,
        });
        Ok(())
    }

    fn create_render_target(
        &mut self,
        width: u32,
        height: u32,
        _format: SurfaceFormat,
    ) -> Result<RenderTargetId> {
        let id = RenderTargetId(self.fresh_id());
        self.calls
            .push(DeviceCall::CreateRenderTarget { id, width, height });
        Ok(id)
    }

    fn destroy_render_target(&mut self, target: RenderTargetId) -> Result<()> {
        self.calls.push(DeviceCall::DestroyRenderTarget(target));
        self.lost_targets.retain(|t| *t != target);
        Ok(())
    }

    fn set_render_target(&mut self, target: RenderTargetId) -> Result<()> {
        if self.fail_next_target_bind {
            self.fail_next_target_bind = false;
            return Err(BezelError::SurfaceUnavailable(format!(
                "target {}",
                target.0
            )));
        }
        self.calls.push(DeviceCall::SetRenderTarget(target));
        Ok(())
    }

    fn restore_backbuffer(&mut self) -> Result<()> {
        self.calls.push(DeviceCall::RestoreBackbuffer);
        Ok(())
    }

    fn clear(&mut self, color: Color) -> Result<()> {
        self.calls.push(DeviceCall::Clear(color));
        Ok(())
    }

    fn is_content_lost(&self, target: RenderTargetId) -> bool {
        self.lost_targets.contains(&target)
    }

    fn load_texture(&mut self, width: u32, height: u32, _rgba_data: &[u8]) -> Result<TextureId> {
        let id = TextureId(self.fresh_id());
        self.calls
            .push(DeviceCall::LoadTexture { id, width, height });
        Ok(id)
    }

    fn destroy_texture(&mut self, tex: TextureId) -> Result<()> {
        self.calls.push(DeviceCall::DestroyTexture(tex));
        Ok(())
    }

    fn blit(&mut self, tex: TextureRef, x: i32, y: i32, w: u32, h: u32) -> Result<()> {
        self.calls.push(DeviceCall::Blit { tex, x, y, w, h });
        Ok(())
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()> {
        self.calls.push(DeviceCall::FillRect { x, y, w, h, color });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        size_px: u16,
        color: Color,
    ) -> Result<()> {
        self.calls.push(DeviceCall::DrawText {
            text: text.to_string(),
            x,
            y,
            size_px,
            color,
        });
        Ok(())
    }

    fn measure_text(&self, text: &str, _size_px: u16) -> u32 {
        text.chars().count() as u32 * MOCK_GLYPH_WIDTH
    }
}

/// Minimal widget for grid and focus tests: fixed size, records what
/// the container does to it.
pub struct StubWidget {
    id: crate::widget::WidgetId,
    size: vek::Vec2<f32>,
    position: vek::Vec3<f32>,
    selected: bool,
    pub visible: bool,
    /// When true, `handle_input` claims every input.
    pub consume_input: bool,
    pub inputs: Vec<bezel_types::input::UiInput>,
    pub update_count: u32,
    pub render_count: u32,
    pub alloc_count: u32,
    pub release_count: u32,
    pub reset_count: u32,
}

impl StubWidget {
    pub fn new(id: crate::widget::WidgetId, width: f32, height: f32) -> Self {
        Self {
            id,
            size: vek::Vec2::new(width, height),
            position: vek::Vec3::zero(),
            selected: false,
            visible: true,
            consume_input: false,
            inputs: Vec::new(),
            update_count: 0,
            render_count: 0,
            alloc_count: 0,
            release_count: 0,
            reset_count: 0,
        }
    }
}

impl crate::widget::Widget for StubWidget {
    fn id(&self) -> crate::widget::WidgetId {
        self.id
    }

    fn size(&self) -> vek::Vec2<f32> {
        self.size
    }

    fn position(&self) -> vek::Vec3<f32> {
        self.position
    }

    fn set_position(&mut self, position: vek::Vec3<f32>) {
        self.position = position;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool, events: &mut Vec<crate::widget::UiEvent>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        events.push(if selected {
            crate::widget::UiEvent::Selected { id: self.id }
        } else {
            crate::widget::UiEvent::Deselected { id: self.id }
        });
    }

    fn handle_input(
        &mut self,
        input: &bezel_types::input::UiInput,
        _events: &mut Vec<crate::widget::UiEvent>,
    ) -> bool {
        self.inputs.push(*input);
        self.consume_input
    }

    fn update(&mut self, _dt_ms: u32, _events: &mut Vec<crate::widget::UiEvent>) {
        self.update_count += 1;
    }

    fn alloc_gpu(
        &mut self,
        _device: &mut dyn GpuDevice,
        _shared: &mut crate::shared_index::SharedIndexBuffer,
        _pow2: bool,
    ) -> Result<()> {
        self.alloc_count += 1;
        Ok(())
    }

    fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        self.render_count += 1;
        // Leaves a marker keyed by id so tests can assert draw order.
        device.fill_rect(self.id.0 as i32, 0, 1, 1, Color::WHITE)
    }

    fn release(
        &mut self,
        _device: &mut dyn GpuDevice,
        _shared: &mut crate::shared_index::SharedIndexBuffer,
    ) -> Result<()> {
        self.release_count += 1;
        Ok(())
    }

    fn device_reset(&mut self, _device: &mut dyn GpuDevice) -> Result<()> {
        self.reset_count += 1;
        Ok(())
    }
}

/// Shader binding that records applied passes and diffuse bindings.
pub struct RecordingBinding {
    passes: u32,
    pub applied: Vec<u32>,
    pub diffuse_history: Vec<Option<TextureRef>>,
    pub alpha_history: Vec<f32>,
}

impl RecordingBinding {
    pub fn new(passes: u32) -> Self {
        Self {
            passes,
            applied: Vec::new(),
            diffuse_history: Vec::new(),
            alpha_history: Vec::new(),
        }
    }

    pub fn last_diffuse(&self) -> Option<TextureRef> {
        self.diffuse_history.last().copied().flatten()
    }
}

impl ShaderBinding for RecordingBinding {
    fn pass_count(&self) -> u32 {
        self.passes
    }

    fn apply_pass(&mut self, _device: &mut dyn GpuDevice, pass: u32) -> Result<()> {
        self.applied.push(pass);
        Ok(())
    }

    fn set_diffuse(&mut self, texture: Option<TextureRef>) {
        self.diffuse_history.push(texture);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.alpha_history.push(alpha);
    }
}

/// Clones share one `RecordingBinding`, so a test can keep a handle to
/// state a widget owns through `Box<dyn ShaderBinding>`.
#[derive(Clone)]
pub struct SharedBinding(pub Rc<RefCell<RecordingBinding>>);

impl SharedBinding {
    pub fn new(passes: u32) -> Self {
        Self(Rc::new(RefCell::new(RecordingBinding::new(passes))))
    }
}

impl ShaderBinding for SharedBinding {
    fn pass_count(&self) -> u32 {
        self.0.borrow().pass_count()
    }

    fn apply_pass(&mut self, device: &mut dyn GpuDevice, pass: u32) -> Result<()> {
        self.0.borrow_mut().apply_pass(device, pass)
    }

    fn set_diffuse(&mut self, texture: Option<TextureRef>) {
        self.0.borrow_mut().set_diffuse(texture);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.0.borrow_mut().set_alpha(alpha);
    }
}
