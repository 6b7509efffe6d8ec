//! Resource identity bookkeeping
//!
//! Maps opaque handles to allocation records for buffers, images and
//! descriptor sets.

mod allocation;
mod handle_table;
mod resource_handle;
mod resource_handle_table;

pub use allocation::{
    BufferUsage, ImageUsage, ImageFormat,
    BufferDesc, ImageDesc,
    BufferAllocation, ImageAllocation, DescriptorSetAllocation,
};
pub use handle_table::{HandleTable, FIRST_HANDLE};
pub use resource_handle::{
    ResourceKind, ResourceHandle, NativeHandle,
    BufferHandle, ImageHandle, DescriptorSetHandle,
};
pub use resource_handle_table::ResourceHandleTable;
