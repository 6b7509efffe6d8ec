/// ResourceHandleTable: identity bookkeeping for buffers, images and descriptor sets.
///
/// Each resource kind has its own table and its own handle counter. The
/// table maps handles to allocation records; it never creates or destroys
/// native objects.

use crate::error::Result;
use super::allocation::{BufferAllocation, DescriptorSetAllocation, ImageAllocation};
use super::handle_table::HandleTable;
use super::resource_handle::{BufferHandle, DescriptorSetHandle, ImageHandle};

/// Buffer, image and descriptor set tables with independent handle counters
#[derive(Debug, Clone, Default)]
pub struct ResourceHandleTable {
    buffers: HandleTable<BufferHandle, BufferAllocation>,
    images: HandleTable<ImageHandle, ImageAllocation>,
    descriptor_sets: HandleTable<DescriptorSetHandle, DescriptorSetAllocation>,
}

impl ResourceHandleTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    // ===== BUFFERS =====

    /// Store a buffer record under a new handle
    pub fn cache_buffer(&mut self, allocation: BufferAllocation) -> BufferHandle {
        self.buffers.cache(allocation)
    }

    /// Look up a buffer record; `NotFound` for unknown or freed handles
    pub fn get_buffer(&self, handle: BufferHandle) -> Result<&BufferAllocation> {
        self.buffers.get(handle)
    }

    /// Remove a buffer record; the native buffer must be released separately
    pub fn free_buffer(&mut self, handle: BufferHandle) -> Result<BufferAllocation> {
        self.buffers.free(handle)
    }

    /// Read-only view of the buffer table
    pub fn buffers(&self) -> &HandleTable<BufferHandle, BufferAllocation> {
        &self.buffers
    }

    // ===== IMAGES =====

    /// Store an image record under a new handle
    pub fn cache_image(&mut self, allocation: ImageAllocation) -> ImageHandle {
        self.images.cache(allocation)
    }

    /// Look up an image record; `NotFound` for unknown or freed handles
    pub fn get_image(&self, handle: ImageHandle) -> Result<&ImageAllocation> {
        self.images.get(handle)
    }

    /// Remove an image record; the native image must be released separately
    pub fn free_image(&mut self, handle: ImageHandle) -> Result<ImageAllocation> {
        self.images.free(handle)
    }

    /// Read-only view of the image table
    pub fn images(&self) -> &HandleTable<ImageHandle, ImageAllocation> {
        &self.images
    }

    // ===== DESCRIPTOR SETS =====

    /// Store a descriptor set record under a new handle
    pub fn cache_descriptor_set(&mut self, allocation: DescriptorSetAllocation) -> DescriptorSetHandle {
        self.descriptor_sets.cache(allocation)
    }

    /// Look up a descriptor set record; `NotFound` for unknown or freed handles
    pub fn get_descriptor_set(&self, handle: DescriptorSetHandle) -> Result<&DescriptorSetAllocation> {
        self.descriptor_sets.get(handle)
    }

    /// Remove a descriptor set record; its slots must be released separately
    pub fn free_descriptor_set(&mut self, handle: DescriptorSetHandle) -> Result<DescriptorSetAllocation> {
        self.descriptor_sets.free(handle)
    }

    /// Read-only view of the descriptor set table
    pub fn descriptor_sets(&self) -> &HandleTable<DescriptorSetHandle, DescriptorSetAllocation> {
        &self.descriptor_sets
    }

    // ===== TEARDOWN =====

    /// Remove every buffer record, oldest first
    pub fn drain_buffers(&mut self) -> Vec<(BufferHandle, BufferAllocation)> {
        self.buffers.drain()
    }

    /// Remove every image record, oldest first
    pub fn drain_images(&mut self) -> Vec<(ImageHandle, ImageAllocation)> {
        self.images.drain()
    }

    /// Remove every descriptor set record, oldest first
    pub fn drain_descriptor_sets(&mut self) -> Vec<(DescriptorSetHandle, DescriptorSetAllocation)> {
        self.descriptor_sets.drain()
    }

    /// Total number of cached records over all kinds
    pub fn len(&self) -> usize {
        self.buffers.len() + self.images.len() + self.descriptor_sets.len()
    }

    /// True when no record of any kind is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "resource_handle_table_tests.rs"]
mod tests;
