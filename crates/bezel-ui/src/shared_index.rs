//! Reference-counted registry for the panel index buffer.
//!
//! Every nine-slice panel shares one triangle topology, so the index
//! buffer is created once on first acquire and destroyed when the last
//! holder releases it. Meshes keep the returned id but never destroy it
//! themselves.

use bezel_types::backend::{GpuDevice, IndexBufferId};
use bezel_types::error::Result;

use crate::mesh::PANEL_INDICES;

/// Shared, refcounted owner of the panel index buffer.
#[derive(Debug, Default)]
pub struct SharedIndexBuffer {
    buffer: Option<IndexBufferId>,
    refs: u32,
}

impl SharedIndexBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the shared buffer id, creating the GPU object on the
    /// first acquire.
    pub fn acquire(&mut self, device: &mut dyn GpuDevice) -> Result<IndexBufferId> {
        let id = match self.buffer {
            Some(id) => id,
            None => {
                let id = device.create_index_buffer(&PANEL_INDICES)?;
                log::debug!("panel index buffer created ({} indices)", PANEL_INDICES.len());
                self.buffer = Some(id);
                id
            }
        };
        self.refs += 1;
        Ok(id)
    }

    /// Drops one reference, destroying the GPU object when the count
    /// reaches zero.
    pub fn release(&mut self, device: &mut dyn GpuDevice) -> Result<()> {
        debug_assert!(self.refs > 0, "panel index buffer released more times than acquired");
        if self.refs == 0 {
            return Ok(());
        }
        self.refs -= 1;
        if self.refs == 0
            && let Some(id) = self.buffer.take()
        {
            device.destroy_index_buffer(id)?;
            log::debug!("panel index buffer destroyed");
        }
        Ok(())
    }

    pub fn active_refs(&self) -> u32 {
        self.refs
    }

    pub fn id(&self) -> Option<IndexBufferId> {
        self.buffer
    }
}
