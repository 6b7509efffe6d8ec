/// DescriptorHeap: owner of the descriptor arena and of everything bound into it.
///
/// Allocating a descriptor takes a slot from the arena, asks the backend to
/// write the native descriptor at the slot's offset, and hands the caller a
/// `DescriptorSlot`. Buffers and images are created through the backend and
/// cached in the handle table, so callers only ever hold opaque handles.
///
/// The heap is constructed explicitly and owned by its caller. For shared
/// use, wrap the whole heap in one mutex (`into_shared`).

use std::sync::{Arc, Mutex, MutexGuard};
use rustc_hash::FxHashSet;
use crate::arena::{ArenaConfig, ArenaStats, DescriptorCategory, DescriptorSlot, TypedSlotArena};
use crate::device::{DescriptorBackend, DescriptorWrite, SamplerDesc};
use crate::error::Result;
use crate::resource::{
    BufferAllocation, BufferDesc, BufferHandle, BufferUsage,
    DescriptorSetAllocation, DescriptorSetHandle,
    ImageAllocation, ImageDesc, ImageHandle, ImageUsage,
    NativeHandle, ResourceHandleTable,
};
use crate::{engine_bail, engine_err, engine_info, engine_trace, engine_warn};

const SOURCE: &str = "galaxy3d::DescriptorHeap";

/// Descriptor heap shared behind a single lock
pub type SharedDescriptorHeap = Arc<Mutex<DescriptorHeap>>;

fn lock_backend<'a>(
    backend: &'a Mutex<dyn DescriptorBackend + 'static>,
) -> Result<MutexGuard<'a, dyn DescriptorBackend + 'static>> {
    backend
        .lock()
        .map_err(|_| engine_err!(BackendError, SOURCE, "Backend lock poisoned"))
}

pub struct DescriptorHeap {
    /// Device backend that owns every native object
    backend: Arc<Mutex<dyn DescriptorBackend>>,
    /// Slot allocator over the arena byte range
    arena: TypedSlotArena,
    /// Handle -> record bookkeeping for buffers, images and sets
    resources: ResourceHandleTable,
    /// Backing allocation of the arena
    native_arena: NativeHandle,
    /// Slots currently grouped in a descriptor set
    set_slots: FxHashSet<DescriptorSlot>,
}

impl DescriptorHeap {
    /// Lay out the arena and create its backing allocation
    ///
    /// # Arguments
    ///
    /// * `backend` - Device backend creating native objects and writing descriptors
    /// * `config` - Category capacities and strides
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a bad configuration or for a stride
    /// smaller than the backend's descriptor size, or the backend's error if
    /// the arena allocation fails.
    pub fn new(backend: Arc<Mutex<dyn DescriptorBackend>>, config: &ArenaConfig) -> Result<Self> {
        let arena = TypedSlotArena::new(config)?;
        let native_arena = {
            let mut device = lock_backend(&backend)?;
            for entry in &config.categories {
                let size = device.descriptor_size(entry.category);
                if entry.stride < size {
                    engine_bail!(InvalidArgument, SOURCE,
                        "{} stride {} is smaller than the {}-byte descriptor the backend writes",
                        entry.category, entry.stride, size);
                }
            }
            device.create_arena(arena.total_size())?
        };

        engine_info!(SOURCE, "Descriptor arena created ({} bytes, {} categories)",
            arena.total_size(), arena.categories().len());

        Ok(Self {
            backend,
            arena,
            resources: ResourceHandleTable::new(),
            native_arena,
            set_slots: FxHashSet::default(),
        })
    }

    /// Wrap the heap for shared access behind one mutex
    pub fn into_shared(self) -> SharedDescriptorHeap {
        Arc::new(Mutex::new(self))
    }

    // ===== BUFFERS =====

    /// Create a native buffer and cache its record
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero size or empty usage, or the
    /// backend's error if creation fails.
    pub fn create_buffer(&mut self, desc: &BufferDesc) -> Result<BufferHandle> {
        if desc.size == 0 {
            engine_bail!(InvalidArgument, SOURCE, "buffer size must be non-zero");
        }
        if desc.usage.is_empty() {
            engine_bail!(InvalidArgument, SOURCE, "buffer usage must not be empty");
        }

        let native = lock_backend(&self.backend)?.create_buffer(desc)?;
        let handle = self.resources.cache_buffer(BufferAllocation {
            size: desc.size,
            usage: desc.usage,
            native,
        });
        engine_trace!(SOURCE, "Created {} ({} bytes)", handle, desc.size);
        Ok(handle)
    }

    /// Destroy a buffer's native object and forget its handle
    ///
    /// Descriptors already written for the buffer are not freed; the caller
    /// releases them first.
    pub fn destroy_buffer(&mut self, handle: BufferHandle) -> Result<()> {
        let native = self.resources.get_buffer(handle)?.native;
        lock_backend(&self.backend)?.destroy_buffer(native)?;
        self.resources.free_buffer(handle)?;
        engine_trace!(SOURCE, "Destroyed {}", handle);
        Ok(())
    }

    /// Allocation record of a buffer
    pub fn buffer(&self, handle: BufferHandle) -> Result<&BufferAllocation> {
        self.resources.get_buffer(handle)
    }

    // ===== IMAGES =====

    /// Create a native image and cache its record
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a zero extent or empty usage, or the
    /// backend's error if creation fails.
    pub fn create_image(&mut self, desc: &ImageDesc) -> Result<ImageHandle> {
        if desc.width == 0 || desc.height == 0 {
            engine_bail!(InvalidArgument, SOURCE,
                "image extent {}x{} must be non-zero", desc.width, desc.height);
        }
        if desc.usage.is_empty() {
            engine_bail!(InvalidArgument, SOURCE, "image usage must not be empty");
        }

        let native = lock_backend(&self.backend)?.create_image(desc)?;
        let handle = self.resources.cache_image(ImageAllocation {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
            native,
        });
        engine_trace!(SOURCE, "Created {} ({}x{} {:?})", handle, desc.width, desc.height, desc.format);
        Ok(handle)
    }

    /// Destroy an image's native object and forget its handle
    pub fn destroy_image(&mut self, handle: ImageHandle) -> Result<()> {
        let native = self.resources.get_image(handle)?.native;
        lock_backend(&self.backend)?.destroy_image(native)?;
        self.resources.free_image(handle)?;
        engine_trace!(SOURCE, "Destroyed {}", handle);
        Ok(())
    }

    /// Allocation record of an image
    pub fn image(&self, handle: ImageHandle) -> Result<&ImageAllocation> {
        self.resources.get_image(handle)
    }

    // ===== DESCRIPTORS =====

    /// Allocate a slot in the write's category and have the backend fill it
    ///
    /// If the backend fails, the slot is returned to the arena before the
    /// error is propagated.
    ///
    /// # Errors
    ///
    /// - `Exhausted` if the category region is full
    /// - `PoolNotInitialized` if the arena has no region for the category
    /// - the backend's error if the write fails
    pub fn write_descriptor(&mut self, write: &DescriptorWrite) -> Result<DescriptorSlot> {
        let category = write.category();
        let offset = self.arena.allocate(category)?;

        let written = lock_backend(&self.backend)
            .and_then(|mut backend| backend.write_descriptor(self.native_arena, offset, write));
        if let Err(err) = written {
            self.arena.free(offset, category)?;
            return Err(err);
        }

        let slot = DescriptorSlot::new(category, offset);
        engine_trace!(SOURCE, "Wrote descriptor {}", slot);
        Ok(slot)
    }

    /// Write a sampler descriptor
    pub fn bind_sampler(&mut self, desc: SamplerDesc) -> Result<DescriptorSlot> {
        self.write_descriptor(&DescriptorWrite::Sampler(desc))
    }

    /// Write a sampled image descriptor for an image created with `ImageUsage::SAMPLED`
    pub fn bind_sampled_image(&mut self, image: ImageHandle) -> Result<DescriptorSlot> {
        let native = self.image_with_usage(image, ImageUsage::SAMPLED)?;
        self.write_descriptor(&DescriptorWrite::SampledImage { image: native })
    }

    /// Write a storage image descriptor for an image created with `ImageUsage::STORAGE`
    pub fn bind_storage_image(&mut self, image: ImageHandle) -> Result<DescriptorSlot> {
        let native = self.image_with_usage(image, ImageUsage::STORAGE)?;
        self.write_descriptor(&DescriptorWrite::StorageImage { image: native })
    }

    /// Write a uniform buffer descriptor over `[offset, offset + range)` of the buffer
    pub fn bind_uniform_buffer(&mut self, buffer: BufferHandle, offset: u64, range: u64) -> Result<DescriptorSlot> {
        let native = self.buffer_range_with_usage(buffer, BufferUsage::UNIFORM, offset, range)?;
        self.write_descriptor(&DescriptorWrite::UniformBuffer { buffer: native, offset, range })
    }

    /// Write a storage buffer descriptor over `[offset, offset + range)` of the buffer
    pub fn bind_storage_buffer(&mut self, buffer: BufferHandle, offset: u64, range: u64) -> Result<DescriptorSlot> {
        let native = self.buffer_range_with_usage(buffer, BufferUsage::STORAGE, offset, range)?;
        self.write_descriptor(&DescriptorWrite::StorageBuffer { buffer: native, offset, range })
    }

    /// Return a descriptor slot to the arena
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the slot belongs to a descriptor set (destroy the set instead)
    /// - `DoubleFree` if the slot was already freed
    pub fn free_descriptor(&mut self, slot: DescriptorSlot) -> Result<()> {
        if self.set_slots.contains(&slot) {
            engine_bail!(InvalidArgument, SOURCE,
                "descriptor {} belongs to a descriptor set", slot);
        }
        self.arena.free(slot.offset(), slot.category())?;
        engine_trace!(SOURCE, "Freed descriptor {}", slot);
        Ok(())
    }

    /// Shader-visible index of a slot within its category region
    pub fn slot_index(&self, slot: DescriptorSlot) -> Result<u64> {
        self.arena.slot_index(slot.offset(), slot.category())
    }

    // ===== DESCRIPTOR SETS =====

    /// Group allocated slots into a descriptor set
    ///
    /// The set takes ownership of its slots: they are freed when the set is
    /// destroyed and cannot be freed individually meanwhile.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if a slot is not allocated, is listed twice,
    /// or already belongs to another set.
    pub fn create_descriptor_set(&mut self, slots: Vec<DescriptorSlot>) -> Result<DescriptorSetHandle> {
        let mut unique = FxHashSet::default();
        for slot in &slots {
            if !self.arena.is_allocated(slot.offset(), slot.category()) {
                engine_bail!(InvalidArgument, SOURCE,
                    "descriptor {} is not allocated", slot);
            }
            if self.set_slots.contains(slot) || !unique.insert(*slot) {
                engine_bail!(InvalidArgument, SOURCE,
                    "descriptor {} is already part of a descriptor set", slot);
            }
        }

        self.set_slots.extend(unique);
        let handle = self.resources.cache_descriptor_set(DescriptorSetAllocation {
            slots,
            native: NativeHandle::NULL,
        });
        engine_trace!(SOURCE, "Created {}", handle);
        Ok(handle)
    }

    /// Destroy a descriptor set and free every slot it owns
    pub fn destroy_descriptor_set(&mut self, handle: DescriptorSetHandle) -> Result<()> {
        let set = self.resources.free_descriptor_set(handle)?;
        for slot in &set.slots {
            self.set_slots.remove(slot);
            self.arena.free(slot.offset(), slot.category())?;
        }
        engine_trace!(SOURCE, "Destroyed {} ({} slots)", handle, set.slots.len());
        Ok(())
    }

    /// Record of a descriptor set
    pub fn descriptor_set(&self, handle: DescriptorSetHandle) -> Result<&DescriptorSetAllocation> {
        self.resources.get_descriptor_set(handle)
    }

    // ===== QUERIES =====

    /// Usage of every arena region
    pub fn stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    /// Free slots left in a category
    pub fn available(&self, category: DescriptorCategory) -> Result<u64> {
        self.arena.available(category)
    }

    /// Slot arena
    pub fn arena(&self) -> &TypedSlotArena {
        &self.arena
    }

    /// Handle table
    pub fn resources(&self) -> &ResourceHandleTable {
        &self.resources
    }

    /// Native identity of the arena backing allocation
    pub fn native_arena(&self) -> NativeHandle {
        self.native_arena
    }

    // ===== HELPERS =====

    fn image_with_usage(&self, image: ImageHandle, usage: ImageUsage) -> Result<NativeHandle> {
        let record = self.resources.get_image(image)?;
        if !record.usage.contains(usage) {
            engine_bail!(InvalidArgument, SOURCE,
                "{} was not created with usage {:?}", image, usage);
        }
        Ok(record.native)
    }

    fn buffer_range_with_usage(
        &self,
        buffer: BufferHandle,
        usage: BufferUsage,
        offset: u64,
        range: u64,
    ) -> Result<NativeHandle> {
        let record = self.resources.get_buffer(buffer)?;
        if !record.usage.contains(usage) {
            engine_bail!(InvalidArgument, SOURCE,
                "{} was not created with usage {:?}", buffer, usage);
        }
        if range == 0 {
            engine_bail!(InvalidArgument, SOURCE, "descriptor range must be non-zero");
        }
        if offset.checked_add(range).map_or(true, |end| end > record.size) {
            engine_bail!(InvalidArgument, SOURCE,
                "range [{}, +{}) exceeds {} of {} bytes", offset, range, buffer, record.size);
        }
        Ok(record.native)
    }
}

impl Drop for DescriptorHeap {
    /// Release every native object still cached, then the arena itself
    fn drop(&mut self) {
        let sets = self.resources.drain_descriptor_sets();
        if !sets.is_empty() {
            engine_warn!(SOURCE, "{} descriptor sets still alive at teardown", sets.len());
        }
        let buffers = self.resources.drain_buffers();
        if !buffers.is_empty() {
            engine_warn!(SOURCE, "{} buffers still alive at teardown", buffers.len());
        }
        let images = self.resources.drain_images();
        if !images.is_empty() {
            engine_warn!(SOURCE, "{} images still alive at teardown", images.len());
        }

        let Ok(mut backend) = self.backend.lock() else {
            engine_warn!(SOURCE, "Backend lock poisoned, native objects leaked");
            return;
        };
        for (handle, record) in buffers {
            if let Err(err) = backend.destroy_buffer(record.native) {
                engine_warn!(SOURCE, "Failed to destroy {}: {}", handle, err);
            }
        }
        for (handle, record) in images {
            if let Err(err) = backend.destroy_image(record.native) {
                engine_warn!(SOURCE, "Failed to destroy {}: {}", handle, err);
            }
        }
        if let Err(err) = backend.destroy_arena(self.native_arena) {
            engine_warn!(SOURCE, "Failed to destroy descriptor arena: {}", err);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "descriptor_heap_tests.rs"]
mod tests;
