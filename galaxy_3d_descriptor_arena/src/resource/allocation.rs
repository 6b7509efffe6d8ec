/// Allocation records and creation descriptors for buffers, images and descriptor sets
///
/// Records describe native objects owned by the device backend. They own no
/// GPU memory themselves.

use bitflags::bitflags;
use crate::arena::DescriptorSlot;
use super::resource_handle::NativeHandle;

// ===== USAGE FLAGS =====

bitflags! {
    /// How a buffer may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const VERTEX = 1 << 0;
        const INDEX = 1 << 1;
        /// May be bound as a uniform buffer descriptor
        const UNIFORM = 1 << 2;
        /// May be bound as a storage buffer descriptor
        const STORAGE = 1 << 3;
        const TRANSFER_SRC = 1 << 4;
        const TRANSFER_DST = 1 << 5;
    }
}

bitflags! {
    /// How an image may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ImageUsage: u32 {
        /// May be bound as a sampled image descriptor
        const SAMPLED = 1 << 0;
        /// May be bound as a storage image descriptor
        const STORAGE = 1 << 1;
        const RENDER_TARGET = 1 << 2;
        const DEPTH_STENCIL = 1 << 3;
        const TRANSFER_SRC = 1 << 4;
        const TRANSFER_DST = 1 << 5;
    }
}

// ===== IMAGE FORMAT =====

/// Pixel format of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum ImageFormat {
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,
    R16G16B16A16_SFLOAT,
    R32G32B32A32_SFLOAT,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
}

impl ImageFormat {
    /// Size of one texel in bytes
    pub fn bytes_per_pixel(&self) -> u64 {
        match self {
            ImageFormat::R8G8B8A8_SRGB
            | ImageFormat::R8G8B8A8_UNORM
            | ImageFormat::B8G8R8A8_SRGB
            | ImageFormat::B8G8R8A8_UNORM
            | ImageFormat::D32_FLOAT
            | ImageFormat::D24_UNORM_S8_UINT => 4,
            ImageFormat::R16G16B16A16_SFLOAT => 8,
            ImageFormat::R32G32B32A32_SFLOAT => 16,
        }
    }
}

// ===== CREATION DESCRIPTORS =====

/// Descriptor for creating a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    pub usage: BufferUsage,
}

/// Descriptor for creating a 2D image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDesc {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub usage: ImageUsage,
}

// ===== ALLOCATION RECORDS =====

/// A buffer created by the device backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferAllocation {
    pub size: u64,
    pub usage: BufferUsage,
    pub native: NativeHandle,
}

/// An image created by the device backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAllocation {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
    pub usage: ImageUsage,
    pub native: NativeHandle,
}

impl ImageAllocation {
    /// Approximate size of the base level in bytes
    pub fn size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel()
    }
}

/// A group of descriptor slots bound together
///
/// With descriptor buffers a set has no native object of its own, so
/// `native` stays null unless a backend chooses to track one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSetAllocation {
    pub slots: Vec<DescriptorSlot>,
    pub native: NativeHandle,
}
