//! Descriptor heap
//!
//! Ties the typed slot arena, the resource handle table and a device
//! backend together.

mod descriptor_heap;

pub use descriptor_heap::{DescriptorHeap, SharedDescriptorHeap};
