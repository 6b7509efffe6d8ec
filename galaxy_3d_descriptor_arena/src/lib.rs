/*!
# Galaxy 3D Descriptor Arena

Bindless descriptor management for the Galaxy 3D engine.

One contiguous descriptor range (a descriptor buffer) is split into a
region per descriptor category. Each region is a fixed-stride slot pool
backed by a bitmap, so allocation and release are O(capacity / 64) with
no per-slot metadata beyond one bit.

## Architecture

- **BitPool**: First-fit bitmap slot allocator over a byte range
- **TypedSlotArena**: One BitPool per descriptor category, laid out back to back
- **ResourceHandleTable**: Opaque, never-reused handles for buffers, images and descriptor sets
- **DescriptorBackend**: Trait implemented by a graphics backend to write native descriptors
- **DescriptorHeap**: Ties the arena, the handle table and a backend together

Nothing here is a process-wide singleton except the logger: build a
`DescriptorHeap` explicitly and share it with `into_shared` when needed.
*/

// Internal modules
mod error;
pub mod log;
pub mod utils;
pub mod arena;
pub mod resource;
pub mod device;
pub mod heap;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Core allocators
    pub use crate::utils::BitPool;
    pub use crate::arena::TypedSlotArena;
    pub use crate::heap::{DescriptorHeap, SharedDescriptorHeap};

    // Logging sub-module (the engine_* macros resolve through these paths)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
            enabled, log, log_detailed,
        };
    }

    // Arena sub-module
    pub mod arena {
        pub use crate::arena::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Device backend sub-module
    pub mod device {
        pub use crate::device::*;
    }
}
