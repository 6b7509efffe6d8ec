/// Mock descriptor backend for unit tests (no GPU required)
///
/// Records every call so tests can check what the descriptor heap asked
/// the backend to do, and can be told to fail writes or creations.

use crate::arena::DescriptorCategory;
use crate::error::Result;
use crate::resource::{BufferDesc, ImageDesc, NativeHandle};
use crate::engine_bail;
use super::descriptor_backend::{DescriptorBackend, DescriptorWrite};

#[derive(Debug, Default)]
pub struct MockDescriptorBackend {
    /// Arenas created and not yet destroyed, with their size
    pub arenas: Vec<(NativeHandle, u64)>,
    pub destroyed_arenas: Vec<NativeHandle>,
    /// Every successful descriptor write, in call order
    pub writes: Vec<(u64, DescriptorWrite)>,
    pub created_buffers: Vec<NativeHandle>,
    pub destroyed_buffers: Vec<NativeHandle>,
    pub created_images: Vec<NativeHandle>,
    pub destroyed_images: Vec<NativeHandle>,
    /// When set, write_descriptor fails with BackendError
    pub fail_writes: bool,
    /// When set, create_buffer and create_image fail with BackendError
    pub fail_creates: bool,
    /// Reported for every category by descriptor_size
    pub descriptor_size: u64,
    next_native: u64,
}

impl MockDescriptorBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_native(&mut self) -> NativeHandle {
        self.next_native += 1;
        NativeHandle(self.next_native)
    }
}

impl DescriptorBackend for MockDescriptorBackend {
    fn descriptor_size(&self, _category: DescriptorCategory) -> u64 {
        self.descriptor_size
    }

    fn create_arena(&mut self, size: u64) -> Result<NativeHandle> {
        let handle = self.allocate_native();
        self.arenas.push((handle, size));
        Ok(handle)
    }

    fn destroy_arena(&mut self, arena: NativeHandle) -> Result<()> {
        self.arenas.retain(|(handle, _)| *handle != arena);
        self.destroyed_arenas.push(arena);
        Ok(())
    }

    fn write_descriptor(&mut self, _arena: NativeHandle, offset: u64, write: &DescriptorWrite) -> Result<()> {
        if self.fail_writes {
            engine_bail!(BackendError, "galaxy3d::mock", "write_descriptor: injected failure");
        }
        self.writes.push((offset, *write));
        Ok(())
    }

    fn create_buffer(&mut self, _desc: &BufferDesc) -> Result<NativeHandle> {
        if self.fail_creates {
            engine_bail!(BackendError, "galaxy3d::mock", "create_buffer: injected failure");
        }
        let handle = self.allocate_native();
        self.created_buffers.push(handle);
        Ok(handle)
    }

    fn destroy_buffer(&mut self, buffer: NativeHandle) -> Result<()> {
        self.destroyed_buffers.push(buffer);
        Ok(())
    }

    fn create_image(&mut self, _desc: &ImageDesc) -> Result<NativeHandle> {
        if self.fail_creates {
            engine_bail!(BackendError, "galaxy3d::mock", "create_image: injected failure");
        }
        let handle = self.allocate_native();
        self.created_images.push(handle);
        Ok(handle)
    }

    fn destroy_image(&mut self, image: NativeHandle) -> Result<()> {
        self.destroyed_images.push(image);
        Ok(())
    }
}
