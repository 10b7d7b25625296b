//! bezel-ui: Scalable panel widgets built on the `GpuDevice` backend.
//!
//! This crate provides the 9-slice panel mesh, the dirty-tracked
//! surface cache widgets compose their look into, and a widget toolkit
//! with grid focus navigation. All rendering goes through `GpuDevice`
//! trait methods -- no platform-specific code.

pub mod animation;
pub use bezel_types::backend;
pub mod cache;
pub mod checkbox;
pub use bezel_types::color;
pub mod dialog;
pub mod focus;
pub mod grid;
pub mod mesh;
pub mod radial;
pub mod shared_index;
pub mod slider;
pub mod tile;
pub mod widget;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::SurfaceCache;
pub use grid::Grid;
pub use mesh::NineSliceMesh;
pub use shared_index::SharedIndexBuffer;
pub use widget::{UiEvent, Widget, WidgetId};
