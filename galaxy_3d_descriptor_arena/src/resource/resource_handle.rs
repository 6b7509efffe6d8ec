/// Opaque resource handles
///
/// Handles are process-local integers identifying a cached allocation
/// record. They are distinct from the native identity a device backend
/// hands out (`NativeHandle`), so caller-visible identity never depends on
/// backend object lifetime.

use std::fmt;
use std::hash::Hash;

/// Resource families tracked by independent handle counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Image,
    DescriptorSet,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Buffer => write!(f, "Buffer"),
            ResourceKind::Image => write!(f, "Image"),
            ResourceKind::DescriptorSet => write!(f, "DescriptorSet"),
        }
    }
}

/// Typed wrapper around a raw handle value
pub trait ResourceHandle: Copy + Eq + Hash + fmt::Debug {
    /// Resource family of this handle type
    const KIND: ResourceKind;

    /// Wrap a raw handle value
    fn from_raw(raw: u64) -> Self;

    /// Raw handle value
    fn raw(self) -> u64;
}

/// Declare a typed handle over `u64`
macro_rules! new_handle_type {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl ResourceHandle for $name {
            const KIND: ResourceKind = ResourceKind::$kind;

            fn from_raw(raw: u64) -> Self {
                Self(raw)
            }

            fn raw(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", ResourceKind::$kind, self.0)
            }
        }
    };
}

new_handle_type! {
    /// Handle to a cached buffer allocation
    BufferHandle => Buffer
}

new_handle_type! {
    /// Handle to a cached image allocation
    ImageHandle => Image
}

new_handle_type! {
    /// Handle to a cached descriptor set
    DescriptorSetHandle => DescriptorSet
}

/// Identity of a native object owned by the device backend
///
/// Opaque to this crate: stored in allocation records and handed back to
/// the backend, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

impl NativeHandle {
    /// Placeholder for records whose native object does not exist yet
    pub const NULL: NativeHandle = NativeHandle(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}
