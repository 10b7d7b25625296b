//! Nine-slice panel mesh.
//!
//! A panel is a 4x4 vertex grid: four corner cells that keep their size,
//! edge bands that stretch along one axis, and a center that stretches
//! both ways. Corner and band thickness come from a single `edge_size`
//! measured in the same units as the panel width and height. The triangle
//! topology is identical for every panel, so all meshes share one index
//! buffer through [`SharedIndexBuffer`](crate::shared_index::SharedIndexBuffer);
//! each mesh owns only its vertex buffer.
//!
//! Construction is pure. GPU objects appear only in [`NineSliceMesh::alloc_gpu`]
//! and go away in [`NineSliceMesh::release`].

use bezel_types::backend::{GpuDevice, IndexBufferId, ShaderBinding, VertexBufferId};
use bezel_types::error::{BezelError, Result};
use bezel_types::vertex::PanelVertex;

use crate::shared_index::SharedIndexBuffer;

/// Triangle list for the 4x4 vertex grid, two triangles per cell,
/// wound the same way throughout. Vertex index is `row * 4 + col`,
/// row 0 at the top.
pub const PANEL_INDICES: [u16; 54] = [
    // top row of cells
    0, 1, 5, 0, 5, 4, //
    1, 2, 6, 1, 6, 5, //
    2, 3, 7, 2, 7, 6, //
    // middle row
    4, 5, 9, 4, 9, 8, //
    5, 6, 10, 5, 10, 9, //
    6, 7, 11, 6, 11, 10, //
    // bottom row
    8, 9, 13, 8, 13, 12, //
    9, 10, 14, 9, 14, 13, //
    10, 11, 15, 10, 15, 14,
];

/// Geometry inputs a vertex buffer is derived from. `alloc_gpu` rebuilds
/// the buffer only when these change.
#[derive(Debug, Clone, Copy, PartialEq)]
struct MeshParams {
    width: f32,
    height: f32,
    edge: f32,
    max_u: f32,
    max_v: f32,
}

/// Scalable nine-slice panel.
#[derive(Debug)]
pub struct NineSliceMesh {
    width: f32,
    height: f32,
    edge: f32,
    max_u: f32,
    max_v: f32,
    vbuf: Option<VertexBufferId>,
    ibuf: Option<IndexBufferId>,
    built: Option<MeshParams>,
}

impl NineSliceMesh {
    pub const VERTEX_COUNT: u32 = 16;
    pub const TRIANGLE_COUNT: u32 = 18;

    /// Panel covering the full 0..1 UV range of its texture.
    pub fn new(width: f32, height: f32, edge_size: f32) -> Result<Self> {
        Self::with_atlas_clamp(width, height, edge_size, 1.0, 1.0)
    }

    /// Panel whose overall UVs sweep `0..max_u` by `0..max_v`, for
    /// textures that only use part of their allocated surface.
    pub fn with_atlas_clamp(
        width: f32,
        height: f32,
        edge_size: f32,
        max_u: f32,
        max_v: f32,
    ) -> Result<Self> {
        validate(width, height, edge_size)?;
        Ok(Self {
            width,
            height,
            edge: edge_size,
            max_u,
            max_v,
            vbuf: None,
            ibuf: None,
            built: None,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn edge_size(&self) -> f32 {
        self.edge
    }

    /// Updates the overall-UV sweep. Takes effect on the next
    /// `alloc_gpu`, which rebuilds the vertex buffer if the values
    /// changed.
    pub fn set_atlas_clamp(&mut self, max_u: f32, max_v: f32) {
        self.max_u = max_u;
        self.max_v = max_v;
    }

    pub fn is_allocated(&self) -> bool {
        self.vbuf.is_some() && self.ibuf.is_some()
    }

    fn params(&self) -> MeshParams {
        MeshParams {
            width: self.width,
            height: self.height,
            edge: self.edge,
            max_u: self.max_u,
            max_v: self.max_v,
        }
    }

    /// Computes the 16 vertices. Pure; does not touch the device.
    ///
    /// Row 0 is the top edge (`y = height / 2`), row 3 the bottom.
    /// Scaled UVs pin interior lines to 0.5; overall UVs place the
    /// interior lines at the geometric edge fraction so texel bands
    /// stay aligned with the mesh bands.
    pub fn vertices(&self) -> [PanelVertex; 16] {
        let w2 = self.width / 2.0;
        let h2 = self.height / 2.0;
        let e = self.edge;

        // Fraction of each axis covered by one edge band. Zero-size
        // panels keep finite UVs.
        let fu = if self.width > 0.0 { e / self.width } else { 0.0 };
        let fv = if self.height > 0.0 { e / self.height } else { 0.0 };

        let xs = [-w2, -w2 + e, w2 - e, w2];
        let ys = [h2, h2 - e, -h2 + e, -h2];
        let scaled = [0.0, 0.5, 0.5, 1.0];
        let ou = [
            0.0,
            self.max_u * fu,
            self.max_u * (1.0 - fu),
            self.max_u,
        ];
        let ov = [
            0.0,
            self.max_v * fv,
            self.max_v * (1.0 - fv),
            self.max_v,
        ];

        let mut out = [PanelVertex::new([0.0; 3], [0.0; 2], [0.0; 2]); 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = PanelVertex::new(
                    [xs[col], ys[row], 0.0],
                    [scaled[col], scaled[row]],
                    [ou[col], ov[row]],
                );
            }
        }
        out
    }

    /// Creates the GPU buffers. Safe to call every frame: the shared
    /// index buffer is acquired once, and the vertex buffer is rebuilt
    /// only when the geometry parameters changed since the last build.
    pub fn alloc_gpu(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        if self.ibuf.is_none() {
            self.ibuf = Some(shared.acquire(device)?);
        }
        let params = self.params();
        if self.built != Some(params) {
            if let Some(old) = self.vbuf.take() {
                device.destroy_vertex_buffer(old)?;
            }
            self.vbuf = Some(device.create_vertex_buffer(&self.vertices())?);
            self.built = Some(params);
        }
        Ok(())
    }

    /// Draws the panel once per pass of `shader`.
    ///
    /// Rendering before `alloc_gpu` is a caller bug: loud in debug
    /// builds, `NotInitialized` otherwise.
    pub fn render(
        &self,
        device: &mut dyn GpuDevice,
        shader: &mut dyn ShaderBinding,
    ) -> Result<()> {
        let (Some(vbuf), Some(ibuf)) = (self.vbuf, self.ibuf) else {
            debug_assert!(false, "nine-slice mesh rendered before alloc_gpu");
            return Err(BezelError::NotInitialized("nine-slice mesh buffers"));
        };
        for pass in 0..shader.pass_count() {
            shader.apply_pass(device, pass)?;
            device.draw_indexed(vbuf, ibuf, Self::VERTEX_COUNT, Self::TRIANGLE_COUNT)?;
        }
        Ok(())
    }

    /// Destroys the vertex buffer and drops this mesh's reference on
    /// the shared index buffer. Idempotent.
    pub fn release(
        &mut self,
        device: &mut dyn GpuDevice,
        shared: &mut SharedIndexBuffer,
    ) -> Result<()> {
        if let Some(vb) = self.vbuf.take() {
            device.destroy_vertex_buffer(vb)?;
        }
        self.built = None;
        if self.ibuf.take().is_some() {
            shared.release(device)?;
        }
        Ok(())
    }
}

fn validate(width: f32, height: f32, edge: f32) -> Result<()> {
    if !width.is_finite() || !height.is_finite() || !edge.is_finite() {
        return Err(BezelError::InvalidGeometry(format!(
            "dimensions must be finite, got {width} x {height} with edge {edge}"
        )));
    }
    if width < 0.0 {
        return Err(BezelError::InvalidGeometry(format!(
            "width must be non-negative, got {width}"
        )));
    }
    if height < 0.0 {
        return Err(BezelError::InvalidGeometry(format!(
            "height must be non-negative, got {height}"
        )));
    }
    if edge < 0.0 {
        return Err(BezelError::InvalidGeometry(format!(
            "edge size must be non-negative, got {edge}"
        )));
    }
    if width < 2.0 * edge {
        return Err(BezelError::InvalidGeometry(format!(
            "edge size {edge} exceeds half of width {width}"
        )));
    }
    if height < 2.0 * edge {
        return Err(BezelError::InvalidGeometry(format!(
            "edge size {edge} exceeds half of height {height}"
        )));
    }
    Ok(())
}
