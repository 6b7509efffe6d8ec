//! Typed descriptor arena
//!
//! Splits one contiguous descriptor range into per-category slot pools.

mod arena_config;
mod descriptor_category;
mod descriptor_slot;
mod typed_slot_arena;

pub use arena_config::{ArenaConfig, CategoryConfig};
pub use descriptor_category::DescriptorCategory;
pub use descriptor_slot::DescriptorSlot;
pub use typed_slot_arena::{ArenaStats, CategoryStats, TypedSlotArena};
