/// Device backend trait - the native side of the descriptor arena
///
/// The arena only hands out byte offsets. A backend turns those offsets
/// into real descriptors (e.g. vkGetDescriptorEXT into a descriptor buffer)
/// and owns every native buffer, image and arena allocation.

use crate::arena::DescriptorCategory;
use crate::error::Result;
use crate::resource::{BufferDesc, ImageDesc, NativeHandle};

// ===== SAMPLER STATE =====

/// Texel filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerFilter {
    Nearest,
    #[default]
    Linear,
}

/// Texture coordinate addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerAddressMode {
    #[default]
    Repeat,
    MirroredRepeat,
    ClampToEdge,
}

/// Sampler state written into a Sampler slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerDesc {
    pub filter: SamplerFilter,
    pub address_mode: SamplerAddressMode,
}

// ===== DESCRIPTOR WRITE =====

/// Payload of one descriptor, referring to native objects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorWrite {
    Sampler(SamplerDesc),
    SampledImage {
        image: NativeHandle,
    },
    StorageImage {
        image: NativeHandle,
    },
    UniformBuffer {
        buffer: NativeHandle,
        offset: u64,
        range: u64,
    },
    StorageBuffer {
        buffer: NativeHandle,
        offset: u64,
        range: u64,
    },
}

impl DescriptorWrite {
    /// Arena region this descriptor must be written to
    pub fn category(&self) -> DescriptorCategory {
        match self {
            DescriptorWrite::Sampler(_) => DescriptorCategory::Sampler,
            DescriptorWrite::SampledImage { .. } => DescriptorCategory::SampledImage,
            DescriptorWrite::StorageImage { .. } => DescriptorCategory::StorageImage,
            DescriptorWrite::UniformBuffer { .. } => DescriptorCategory::UniformBuffer,
            DescriptorWrite::StorageBuffer { .. } => DescriptorCategory::StorageBuffer,
        }
    }
}

// ===== BACKEND TRAIT =====

/// Device resource backend
///
/// Implemented by graphics-API-specific types. All native objects created
/// here are destroyed through the matching `destroy_*` call; the descriptor
/// heap makes those calls, the backend never tracks identity for it.
pub trait DescriptorBackend: Send + Sync {
    /// Bytes one encoded descriptor of `category` occupies
    ///
    /// Slot strides smaller than this are rejected when the heap is built.
    fn descriptor_size(&self, category: DescriptorCategory) -> u64;

    /// Allocate the single backing range for the descriptor arena
    ///
    /// # Arguments
    ///
    /// * `size` - Arena size in bytes (sum of all category regions)
    fn create_arena(&mut self, size: u64) -> Result<NativeHandle>;

    /// Release the arena backing range
    fn destroy_arena(&mut self, arena: NativeHandle) -> Result<()>;

    /// Write one descriptor at `offset` inside the arena
    ///
    /// # Arguments
    ///
    /// * `arena` - Arena returned by `create_arena`
    /// * `offset` - Slot byte offset returned by the slot arena
    /// * `write` - Descriptor payload
    fn write_descriptor(&mut self, arena: NativeHandle, offset: u64, write: &DescriptorWrite) -> Result<()>;

    /// Create a native buffer
    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<NativeHandle>;

    /// Destroy a native buffer
    fn destroy_buffer(&mut self, buffer: NativeHandle) -> Result<()>;

    /// Create a native image
    fn create_image(&mut self, desc: &ImageDesc) -> Result<NativeHandle>;

    /// Destroy a native image
    fn destroy_image(&mut self, image: NativeHandle) -> Result<()>;
}
