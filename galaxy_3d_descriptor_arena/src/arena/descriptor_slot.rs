/// A descriptor slot handed out by the descriptor heap

use std::fmt;
use super::descriptor_category::DescriptorCategory;

/// An allocated slot: its category and byte offset in the arena
///
/// Only the heap creates slots, so a slot always pairs an offset with the
/// category it was allocated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DescriptorSlot {
    category: DescriptorCategory,
    offset: u64,
}

impl DescriptorSlot {
    pub(crate) fn new(category: DescriptorCategory, offset: u64) -> Self {
        Self { category, offset }
    }

    /// Category region the slot lives in
    pub fn category(&self) -> DescriptorCategory {
        self.category
    }

    /// Byte offset of the slot in the arena
    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl fmt::Display for DescriptorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.category, self.offset)
    }
}
