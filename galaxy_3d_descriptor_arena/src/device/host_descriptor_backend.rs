/// Host-memory descriptor backend (no GPU required)
///
/// Keeps each arena as a byte vector and encodes descriptors as fixed
/// 32-byte `HostDescriptor` records at the slot offset. Native buffers and
/// images are plain bookkeeping entries. Useful for headless tools, CPU-side
/// validation, and tests.

use bytemuck::{Pod, Zeroable};
use rustc_hash::FxHashMap;
use crate::arena::DescriptorCategory;
use crate::error::Result;
use crate::resource::{BufferDesc, ImageDesc, ImageUsage, BufferUsage, NativeHandle};
use crate::{engine_bail, engine_debug, engine_err};
use super::descriptor_backend::{DescriptorBackend, DescriptorWrite};

const SOURCE: &str = "galaxy3d::HostBackend";

/// Encoded descriptor as stored in a host arena
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct HostDescriptor {
    /// `DescriptorCategory` discriminant
    pub category: u32,
    /// Sampler filter in bits 0..8, address mode in bits 8..16 (samplers only)
    pub sampler_state: u32,
    /// Native buffer or image (0 for samplers)
    pub native: u64,
    /// Buffer range start (buffers only)
    pub offset: u64,
    /// Buffer range length (buffers only)
    pub range: u64,
}

/// Byte size of one encoded descriptor; slot strides must be at least this
pub const HOST_DESCRIPTOR_SIZE: u64 = std::mem::size_of::<HostDescriptor>() as u64;

impl HostDescriptor {
    fn encode(write: &DescriptorWrite) -> Self {
        let mut record = HostDescriptor::zeroed();
        record.category = write.category().index() as u32;
        match *write {
            DescriptorWrite::Sampler(desc) => {
                record.sampler_state = desc.filter as u32 | (desc.address_mode as u32) << 8;
            }
            DescriptorWrite::SampledImage { image } | DescriptorWrite::StorageImage { image } => {
                record.native = image.0;
            }
            DescriptorWrite::UniformBuffer { buffer, offset, range }
            | DescriptorWrite::StorageBuffer { buffer, offset, range } => {
                record.native = buffer.0;
                record.offset = offset;
                record.range = range;
            }
        }
        record
    }
}

/// Descriptor backend living entirely in host memory
#[derive(Debug, Default)]
pub struct HostDescriptorBackend {
    arenas: FxHashMap<u64, Vec<u8>>,
    buffers: FxHashMap<u64, BufferDesc>,
    images: FxHashMap<u64, ImageDesc>,
    next_native: u64,
}

impl HostDescriptorBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the descriptor stored at `offset`
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the arena is unknown or the record would
    /// run past its end.
    pub fn read_descriptor(&self, arena: NativeHandle, offset: u64) -> Result<HostDescriptor> {
        let bytes = self.arena_bytes(arena)?;
        let range = Self::record_range(bytes.len(), offset)?;
        Ok(bytemuck::pod_read_unaligned(&bytes[range]))
    }

    /// Raw contents of an arena
    pub fn arena_bytes(&self, arena: NativeHandle) -> Result<&[u8]> {
        self.arenas
            .get(&arena.0)
            .map(|bytes| bytes.as_slice())
            .ok_or_else(|| engine_err!(BackendError, SOURCE, "unknown arena {}", arena.0))
    }

    /// Number of live arenas
    pub fn arena_count(&self) -> usize {
        self.arenas.len()
    }

    /// Number of live buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /// Number of live images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    fn allocate_native(&mut self) -> NativeHandle {
        self.next_native += 1;
        NativeHandle(self.next_native)
    }

    fn record_range(arena_len: usize, offset: u64) -> Result<std::ops::Range<usize>> {
        let end = offset.checked_add(HOST_DESCRIPTOR_SIZE);
        match end {
            Some(end) if end <= arena_len as u64 => Ok(offset as usize..end as usize),
            _ => engine_bail!(BackendError, SOURCE,
                "descriptor at offset {} does not fit in arena of {} bytes", offset, arena_len),
        }
    }

    fn check_buffer(&self, buffer: NativeHandle, usage: BufferUsage, offset: u64, range: u64) -> Result<()> {
        let Some(desc) = self.buffers.get(&buffer.0) else {
            engine_bail!(BackendError, SOURCE, "unknown buffer {}", buffer.0);
        };
        if !desc.usage.contains(usage) {
            engine_bail!(BackendError, SOURCE,
                "buffer {} lacks usage {:?}", buffer.0, usage);
        }
        if offset.checked_add(range).map_or(true, |end| end > desc.size) {
            engine_bail!(BackendError, SOURCE,
                "range [{}, +{}) exceeds buffer {} of {} bytes", offset, range, buffer.0, desc.size);
        }
        Ok(())
    }

    fn check_image(&self, image: NativeHandle, usage: ImageUsage) -> Result<()> {
        let Some(desc) = self.images.get(&image.0) else {
            engine_bail!(BackendError, SOURCE, "unknown image {}", image.0);
        };
        if !desc.usage.contains(usage) {
            engine_bail!(BackendError, SOURCE,
                "image {} lacks usage {:?}", image.0, usage);
        }
        Ok(())
    }
}

impl DescriptorBackend for HostDescriptorBackend {
    fn descriptor_size(&self, _category: DescriptorCategory) -> u64 {
        HOST_DESCRIPTOR_SIZE
    }

    fn create_arena(&mut self, size: u64) -> Result<NativeHandle> {
        let len = match usize::try_from(size) {
            Ok(len) => len,
            Err(_) => engine_bail!(BackendError, SOURCE,
                "arena of {} bytes does not fit in host memory", size),
        };
        let handle = self.allocate_native();
        self.arenas.insert(handle.0, vec![0; len]);
        engine_debug!(SOURCE, "Created host arena {} ({} bytes)", handle.0, size);
        Ok(handle)
    }

    fn destroy_arena(&mut self, arena: NativeHandle) -> Result<()> {
        if self.arenas.remove(&arena.0).is_none() {
            engine_bail!(BackendError, SOURCE, "cannot destroy unknown arena {}", arena.0);
        }
        Ok(())
    }

    fn write_descriptor(&mut self, arena: NativeHandle, offset: u64, write: &DescriptorWrite) -> Result<()> {
        match *write {
            DescriptorWrite::Sampler(_) => {}
            DescriptorWrite::SampledImage { image } => self.check_image(image, ImageUsage::SAMPLED)?,
            DescriptorWrite::StorageImage { image } => self.check_image(image, ImageUsage::STORAGE)?,
            DescriptorWrite::UniformBuffer { buffer, offset, range } => {
                self.check_buffer(buffer, BufferUsage::UNIFORM, offset, range)?
            }
            DescriptorWrite::StorageBuffer { buffer, offset, range } => {
                self.check_buffer(buffer, BufferUsage::STORAGE, offset, range)?
            }
        }

        let record = HostDescriptor::encode(write);
        let Some(bytes) = self.arenas.get_mut(&arena.0) else {
            engine_bail!(BackendError, SOURCE, "unknown arena {}", arena.0);
        };
        let range = Self::record_range(bytes.len(), offset)?;
        bytes[range].copy_from_slice(bytemuck::bytes_of(&record));
        Ok(())
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<NativeHandle> {
        let handle = self.allocate_native();
        self.buffers.insert(handle.0, desc.clone());
        Ok(handle)
    }

    fn destroy_buffer(&mut self, buffer: NativeHandle) -> Result<()> {
        if self.buffers.remove(&buffer.0).is_none() {
            engine_bail!(BackendError, SOURCE, "cannot destroy unknown buffer {}", buffer.0);
        }
        Ok(())
    }

    fn create_image(&mut self, desc: &ImageDesc) -> Result<NativeHandle> {
        let handle = self.allocate_native();
        self.images.insert(handle.0, desc.clone());
        Ok(handle)
    }

    fn destroy_image(&mut self, image: NativeHandle) -> Result<()> {
        if self.images.remove(&image.0).is_none() {
            engine_bail!(BackendError, SOURCE, "cannot destroy unknown image {}", image.0);
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "host_descriptor_backend_tests.rs"]
mod tests;
