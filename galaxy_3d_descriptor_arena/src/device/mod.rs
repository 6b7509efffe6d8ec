//! Device backend seam
//!
//! The trait a graphics backend implements to write descriptors and own
//! native objects, plus a host-memory reference implementation.

mod descriptor_backend;
mod host_descriptor_backend;

pub use descriptor_backend::{
    DescriptorBackend, DescriptorWrite,
    SamplerDesc, SamplerFilter, SamplerAddressMode,
};
pub use host_descriptor_backend::{HostDescriptorBackend, HostDescriptor, HOST_DESCRIPTOR_SIZE};

// Mock backend for tests (no GPU required)
#[cfg(test)]
pub mod mock_descriptor_backend;
