/// TypedSlotArena: one contiguous byte range split into per-category slot pools.
///
/// Each configured category gets a BitPool covering its own region.
/// Regions are disjoint and laid out back to back from offset 0 in
/// configuration order, so the arena size is the sum of
/// `capacity * stride` over all categories.

use std::ops::Range;
use crate::error::Result;
use crate::utils::BitPool;
use crate::{engine_debug, engine_err};
use super::arena_config::ArenaConfig;
use super::descriptor_category::DescriptorCategory;

const SOURCE: &str = "galaxy3d::TypedSlotArena";

/// Usage of one category region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    pub category: DescriptorCategory,
    /// Byte offset of the region inside the arena
    pub offset: u64,
    pub stride: u64,
    pub capacity: u64,
    pub allocated: u64,
}

/// Usage of every region, in layout order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArenaStats {
    pub categories: Vec<CategoryStats>,
}

impl ArenaStats {
    /// Stats for one category, if present in the arena
    pub fn category(&self, category: DescriptorCategory) -> Option<&CategoryStats> {
        self.categories.iter().find(|stats| stats.category == category)
    }

    /// Allocated slots over all categories
    pub fn total_allocated(&self) -> u64 {
        self.categories.iter().map(|stats| stats.allocated).sum()
    }

    /// Slot capacity over all categories
    pub fn total_capacity(&self) -> u64 {
        self.categories.iter().map(|stats| stats.capacity).sum()
    }
}

/// Arena of typed descriptor slots
///
/// Owns its pools by value, indexed by category. Categories absent from the
/// configuration have no pool and report `PoolNotInitialized`.
#[derive(Debug, Clone)]
pub struct TypedSlotArena {
    pools: [Option<BitPool>; DescriptorCategory::COUNT],
    layout: Vec<DescriptorCategory>,
    total_size: u64,
}

impl TypedSlotArena {
    /// Lay out one pool per configured category
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the configuration is empty, repeats a
    /// category, has a zero stride, or overflows the address space.
    pub fn new(config: &ArenaConfig) -> Result<Self> {
        config.validate()?;

        let mut pools: [Option<BitPool>; DescriptorCategory::COUNT] = Default::default();
        let mut layout = Vec::with_capacity(config.categories.len());
        let mut offset: u64 = 0;

        for entry in &config.categories {
            let pool = BitPool::new(offset, entry.stride, entry.capacity)?;
            engine_debug!(SOURCE, "{} region: [{}, {}) ({} slots x {} bytes)",
                entry.category, offset, pool.end_offset(), entry.capacity, entry.stride);
            offset = pool.end_offset();
            pools[entry.category.index()] = Some(pool);
            layout.push(entry.category);
        }

        engine_debug!(SOURCE, "Registered {} categories, {} bytes total", layout.len(), offset);

        Ok(Self {
            pools,
            layout,
            total_size: offset,
        })
    }

    /// Allocate a slot of `category`, returning its byte offset in the arena
    ///
    /// # Errors
    ///
    /// - `PoolNotInitialized` if the category has no region
    /// - `Exhausted` if the region is full
    pub fn allocate(&mut self, category: DescriptorCategory) -> Result<u64> {
        self.pool_mut(category)?.allocate()
    }

    /// Release a slot previously returned by `allocate` for the same category
    ///
    /// An offset from another category's region is outside this category's
    /// pool and fails with `OutOfRange`.
    ///
    /// # Errors
    ///
    /// - `PoolNotInitialized` if the category has no region
    /// - `OutOfRange`, `Misaligned`, `DoubleFree` from the category's pool
    pub fn free(&mut self, offset: u64, category: DescriptorCategory) -> Result<()> {
        self.pool_mut(category)?.free(offset)
    }

    /// Index of a slot inside its category region
    pub fn slot_index(&self, offset: u64, category: DescriptorCategory) -> Result<u64> {
        self.pool(category)?.slot_index(offset)
    }

    /// Whether the slot at `offset` in `category` is allocated
    pub fn is_allocated(&self, offset: u64, category: DescriptorCategory) -> bool {
        self.pools[category.index()]
            .as_ref()
            .is_some_and(|pool| pool.is_allocated(offset))
    }

    /// Byte range owned by a category
    pub fn region(&self, category: DescriptorCategory) -> Result<Range<u64>> {
        let pool = self.pool(category)?;
        Ok(pool.starting_offset()..pool.end_offset())
    }

    /// Category whose region contains `offset`
    pub fn category_of(&self, offset: u64) -> Option<DescriptorCategory> {
        self.layout.iter().copied().find(|category| {
            self.pools[category.index()]
                .as_ref()
                .is_some_and(|pool| pool.contains(offset))
        })
    }

    /// Free slots left in a category
    pub fn available(&self, category: DescriptorCategory) -> Result<u64> {
        Ok(self.pool(category)?.available())
    }

    /// Total slots of a category
    pub fn capacity(&self, category: DescriptorCategory) -> Result<u64> {
        Ok(self.pool(category)?.capacity())
    }

    /// Slot size of a category
    pub fn stride(&self, category: DescriptorCategory) -> Result<u64> {
        Ok(self.pool(category)?.stride())
    }

    /// Arena size in bytes
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Configured categories, in layout order
    pub fn categories(&self) -> &[DescriptorCategory] {
        &self.layout
    }

    /// Whether `category` has a region
    pub fn has_category(&self, category: DescriptorCategory) -> bool {
        self.pools[category.index()].is_some()
    }

    /// Snapshot of region usage
    pub fn stats(&self) -> ArenaStats {
        let categories = self.layout.iter()
            .filter_map(|category| self.pools[category.index()].as_ref().map(|pool| CategoryStats {
                category: *category,
                offset: pool.starting_offset(),
                stride: pool.stride(),
                capacity: pool.capacity(),
                allocated: pool.allocated(),
            }))
            .collect();
        ArenaStats { categories }
    }

    /// Free every slot of every category
    pub fn reset(&mut self) {
        for pool in self.pools.iter_mut().flatten() {
            pool.reset();
        }
        engine_debug!(SOURCE, "Arena reset");
    }

    /// Pool of a category
    pub fn pool(&self, category: DescriptorCategory) -> Result<&BitPool> {
        self.pools[category.index()]
            .as_ref()
            .ok_or_else(|| engine_err!(PoolNotInitialized, SOURCE,
                "no {} region in this arena", category))
    }

    fn pool_mut(&mut self, category: DescriptorCategory) -> Result<&mut BitPool> {
        self.pools[category.index()]
            .as_mut()
            .ok_or_else(|| engine_err!(PoolNotInitialized, SOURCE,
                "no {} region in this arena", category))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "typed_slot_arena_tests.rs"]
mod tests;
