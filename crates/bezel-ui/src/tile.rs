//! Texture tile widget.
//!
//! Tiles are the one widget with no surface cache: the art is an
//! externally loaded texture bound straight onto the panel mesh, so
//! there is nothing to compose and nothing to go dirty. A tile with no
//! texture draws nothing, which is how a menu reserves a slot before
//! its art is loaded.

use bezel_types::backend::{FixedFunction, GpuDevice, ShaderBinding, TextureId, TextureRef};
use bezel_types::error::Result;
use vek::{Vec2, Vec3};

use crate::animation::{Easing, TwitchField, TwitchSet};
use crate::mesh::NineSliceMesh;
use crate::shared_index::SharedIndexBuffer;
use crate::widget::{UiEvent, Widget, WidgetId};

const SELECTED_SCALE: f32 = 1.0;
const UNSELECTED_SCALE: f32 = 0.85;
const SCALE_TIME_MS: u32 = 200;

/// A panel mesh showing one externally owned texture.
pub struct Tile {
    id: WidgetId,
    mesh: NineSliceMesh,
    texture: Option<TextureId>,
    binding: Box<dyn ShaderBinding>,
    position: Vec3<f32>,
    rotation: Vec3<f32>,
    scale: f32,
    alpha: f32,
    selected: bool,
    visible: bool,
    twitch: TwitchSet,
    help: Option<String>,
}

impl Tile {
    pub fn new(id: WidgetId, width: f32, height: f32, edge_size: f32) -> Result<Self> {
        Ok(Self {
            id,
            mesh: NineSliceMesh::new(width, height, edge_size)?,
            texture: None,
            binding: Box::new(FixedFunction),
            position: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: UNSELECTED_SCALE,
            alpha: 1.0,
            selected: false,
            visible: true,
            twitch: TwitchSet::new(),
            help: None,
        })
    }

    pub fn with_texture(mut self, texture: TextureId) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Swaps the shader binding used for the panel draw.
    pub fn set_shader(&mut self, binding: Box<dyn ShaderBinding>) {
        self.binding = binding;
    }

    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<TextureId>) {
        self.texture = texture;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Euler rotation in radians; fan strips tip tiles back with this.
    pub fn rotation(&self) -> Vec3<f32> {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Vec3<f32>) {
        self.rotation = rotation;
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Glides to `target` with a little overshoot, the move a fan strip
    /// uses when tiles change arc slots.
    pub fn slide_to(&mut self, target: Vec3<f32>, duration_ms: u32) {
        self.twitch.start(
            TwitchField::PositionX,
            self.position.x,
            target.x,
            duration_ms,
            Easing::OvershootOut,
        );
        self.twitch.start(
            TwitchField::PositionY,
            self.position.y,
            target.y,
            duration_ms,
            Easing::OvershootOut,
        );
        self.twitch.start(
            TwitchField::PositionZ,
            self.position.z,
            target.z,
            duration_ms,
            Easing::OvershootOut,
        );
    }

    /// Fades the bound art toward `alpha`.
    pub fn fade_to(&mut self, alpha: f32, duration_ms: u32) {
        self.twitch.start(
            TwitchField::Alpha,
            self.alpha,
            alpha.clamp(0.0, 1.0),
            duration_ms,
            Easing::EaseOut,
        );
    }
}

impl Widget for Tile {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn size(&self) -> Vec2<f32> {
        Vec2::new(self.mesh.width(), self.mesh.height())
    }

    fn position(&self) -> Vec3<f32> {
        self.position
    }

    /// Instant placement; any glide in flight is dropped.
    fn set_position(&mut self, position: Vec3<f32>) {
        self.twitch.cancel(TwitchField::PositionX);
        self.twitch.cancel(TwitchField::PositionY);
        self.twitch.cancel(TwitchField::PositionZ);
        self.position = position;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_selected(&self) -> bool {
        self.selected
    }

    fn set_selected(&mut self, selected: bool, events: &mut Vec<UiEvent>) {
        if self.selected == selected {
            return;
        }
        self.selected = selected;
        let target = if selected { SELECTED_SCALE } else { UNSELECTED_SCALE };
        self.twitch.start(
            TwitchField::Scale,
            self.scale,
            target,
            SCALE_TIME_MS,
            Easing::EaseInOut,
        );
        events.push(if selected {
            UiEvent::Selected { id: self.id }
        } else {
            UiEvent::Deselected { id: self.id }
        });
    }

    fn update(&mut self, dt_ms: u32, _events: &mut Vec<UiEvent>) {
        let mut position = self.position;
        let mut scale = self.scale;
        let mut alpha = self.alpha;
        self.twitch.tick(dt_ms, |field, value| match field {
            TwitchField::PositionX => position.x = value,
            TwitchField::PositionY => position.y = value,
            TwitchField::PositionZ => position.z = value,
            TwitchField::Scale => scale = value,
            TwitchField::Alpha => alpha = value,
            _ => {}
        });
        self.position = position;
        self.scale = scale;
        self.alpha = alpha;
    }

    fn alloc_gpu(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
        _pow2: bool,
    ) -> Result<()> {
        self.mesh.alloc_gpu(device, shared)
    }

    fn render(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        let Some(texture) = self.texture else {
            return Ok(());
        };
        self.binding.set_diffuse(Some(TextureRef::Texture(texture)));
        self.binding.set_alpha(self.alpha);
        self.mesh.render(device, self.binding.as_mut())
    }

    fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        self.mesh.release(device, shared)
    }

    /// Buffers and app-owned textures survive a reset; nothing to
    /// rebuild here.
    fn device_reset(&mut self, _device: &mut dyn GpuDevice) -> Result<()> {
        Ok(())
    }

    fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockDevice, SharedBinding};

    fn art_tile(id: u32, tex: u64) -> Tile {
        Tile::new(WidgetId(id), 2.0, 2.0, 0.25)
            .unwrap()
            .with_texture(TextureId(tex))
    }

    #[test]
    fn textureless_tile_draws_nothing() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let mut tile = Tile::new(WidgetId(1), 2.0, 2.0, 0.25).unwrap();

        tile.alloc_gpu(&mut device, &mut shared, false).unwrap();
        tile.render(&mut device).unwrap();
        assert_eq!(device.draw_indexed_count(), 0);
    }

    #[test]
    fn render_binds_the_texture_and_alpha() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let spy = SharedBinding::new(1);
        let mut tile = art_tile(1, 9);
        tile.set_shader(Box::new(spy.clone()));

        tile.alloc_gpu(&mut device, &mut shared, false).unwrap();
        tile.render(&mut device).unwrap();

        assert_eq!(device.draw_indexed_count(), 1);
        let binding = spy.0.borrow();
        assert_eq!(
            binding.last_diffuse(),
            Some(TextureRef::Texture(TextureId(9)))
        );
        assert_eq!(binding.alpha_history.last(), Some(&1.0));
    }

    #[test]
    fn no_surface_cache_is_allocated() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let mut tile = art_tile(1, 3);

        tile.alloc_gpu(&mut device, &mut shared, true).unwrap();
        assert_eq!(device.render_targets_created(), 0);
        assert_eq!(device.vertex_buffers_created(), 1);
        assert_eq!(device.index_buffers_created(), 1);
    }

    #[test]
    fn selection_scales_up_and_back() {
        let mut tile = art_tile(4, 1);
        let mut events = Vec::new();
        assert_eq!(tile.scale(), UNSELECTED_SCALE);

        tile.set_selected(true, &mut events);
        tile.update(SCALE_TIME_MS, &mut events);
        assert_eq!(tile.scale(), SELECTED_SCALE);

        tile.set_selected(false, &mut events);
        tile.update(SCALE_TIME_MS, &mut events);
        assert_eq!(tile.scale(), UNSELECTED_SCALE);
        assert_eq!(
            events,
            vec![
                UiEvent::Selected { id: WidgetId(4) },
                UiEvent::Deselected { id: WidgetId(4) },
            ]
        );
    }

    #[test]
    fn slide_overshoots_then_settles() {
        let mut tile = art_tile(1, 1);
        let mut events = Vec::new();
        tile.slide_to(Vec3::new(2.0, 0.0, 1.0), 100);

        tile.update(50, &mut events);
        assert!(tile.position().x > 2.0);

        tile.update(50, &mut events);
        assert_eq!(tile.position(), Vec3::new(2.0, 0.0, 1.0));
    }

    #[test]
    fn set_position_drops_the_glide() {
        let mut tile = art_tile(1, 1);
        let mut events = Vec::new();
        tile.slide_to(Vec3::new(2.0, 0.0, 0.0), 200);
        tile.set_position(Vec3::new(5.0, 5.0, 5.0));

        tile.update(200, &mut events);
        assert_eq!(tile.position(), Vec3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn fade_reaches_the_binding() {
        let mut device = MockDevice::new();
        let mut shared = SharedIndexBuffer::new();
        let spy = SharedBinding::new(1);
        let mut tile = art_tile(1, 2);
        tile.set_shader(Box::new(spy.clone()));
        let mut events = Vec::new();

        tile.alloc_gpu(&mut device, &mut shared, false).unwrap();
        tile.fade_to(0.0, 100);
        tile.update(100, &mut events);
        tile.render(&mut device).unwrap();

        assert_eq!(tile.alpha(), 0.0);
        assert_eq!(spy.0.borrow().alpha_history.last(), Some(&0.0));
    }

    #[test]
    fn device_reset_touches_nothing() {
        let mut device = MockDevice::new();
        let mut tile = art_tile(1, 1);
        tile.device_reset(&mut device).unwrap();
        assert!(device.calls.is_empty());
    }
}
