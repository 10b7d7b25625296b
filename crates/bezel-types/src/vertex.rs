//! Vertex format for scalable panel meshes.
//!
//! Each vertex carries two UV sets: a "scaled" set whose interior
//! coordinates pin to 0.5 so border art keeps its thickness at any panel
//! size, and an "overall" set that sweeps the full atlas region for
//! full-coverage decals. The bound shader picks which set to sample.

/// One vertex of a panel mesh. Layout is `#[repr(C)]` so backends can
/// upload slices of these directly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelVertex {
    /// Local position, centered at the panel origin, in the XY plane.
    pub position: [f32; 3],
    /// Edge-relative UV: 0 or 1 at corners, 0.5 on interior grid lines.
    pub uv_scaled: [f32; 2],
    /// Full-atlas UV, 0..max_u / 0..max_v across the whole rectangle.
    pub uv_overall: [f32; 2],
}

impl PanelVertex {
    /// Byte stride of one vertex as uploaded to the device.
    pub const STRIDE: usize = std::mem::size_of::<Self>();

    pub const fn new(position: [f32; 3], uv_scaled: [f32; 2], uv_overall: [f32; 2]) -> Self {
        Self {
            position,
            uv_scaled,
            uv_overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_is_seven_floats() {
        assert_eq!(PanelVertex::STRIDE, 7 * 4);
    }

    #[test]
    fn field_order_matches_layout() {
        let v = PanelVertex::new([1.0, 2.0, 0.0], [0.5, 0.0], [0.25, 0.75]);
        assert_eq!(v.position[1], 2.0);
        assert_eq!(v.uv_scaled, [0.5, 0.0]);
        assert_eq!(v.uv_overall, [0.25, 0.75]);
    }
}
