/// Arena layout configuration
///
/// An ArenaConfig is an ordered table of `category -> (capacity, stride)`.
/// Regions are laid out back to back in table order, starting at offset 0.
/// The table is domain policy, sized from the expected workload, not
/// something discovered at runtime.

use crate::error::Result;
use crate::engine_bail;
use super::descriptor_category::DescriptorCategory;

const SOURCE: &str = "galaxy3d::ArenaConfig";

/// Capacity and stride of one category region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryConfig {
    /// Category this region holds
    pub category: DescriptorCategory,
    /// Number of slots
    pub capacity: u64,
    /// Byte size of one slot
    pub stride: u64,
}

impl CategoryConfig {
    /// Byte size of the whole region, or None on overflow
    pub fn byte_size(&self) -> Option<u64> {
        self.capacity.checked_mul(self.stride)
    }
}

/// Ordered arena layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Category regions, in layout order
    pub categories: Vec<CategoryConfig>,
}

impl ArenaConfig {
    /// Create an empty configuration (add regions with `with_category`)
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Append a category region
    pub fn with_category(mut self, category: DescriptorCategory, capacity: u64, stride: u64) -> Self {
        self.categories.push(CategoryConfig { category, capacity, stride });
        self
    }

    /// Region settings for a category, if configured
    pub fn category(&self, category: DescriptorCategory) -> Option<&CategoryConfig> {
        self.categories.iter().find(|entry| entry.category == category)
    }

    /// Total arena size in bytes
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the sum of region sizes overflows.
    pub fn total_size(&self) -> Result<u64> {
        let mut total: u64 = 0;
        for entry in &self.categories {
            let size = entry.byte_size().and_then(|size| total.checked_add(size));
            match size {
                Some(size) => total = size,
                None => engine_bail!(InvalidArgument, SOURCE,
                    "{} region ({} x {} bytes) overflows the arena layout",
                    entry.category, entry.capacity, entry.stride),
            }
        }
        Ok(total)
    }

    /// Check the configuration can be laid out
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the table is empty, names a category twice,
    /// has a zero stride, or overflows the address space.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            engine_bail!(InvalidArgument, SOURCE, "arena configuration has no category");
        }

        let mut seen = [false; DescriptorCategory::COUNT];
        for entry in &self.categories {
            if seen[entry.category.index()] {
                engine_bail!(InvalidArgument, SOURCE,
                    "category {} is configured more than once", entry.category);
            }
            seen[entry.category.index()] = true;

            if entry.stride == 0 {
                engine_bail!(InvalidArgument, SOURCE,
                    "category {} has a zero stride", entry.category);
            }
        }

        self.total_size()?;
        Ok(())
    }
}

impl Default for ArenaConfig {
    /// Workload defaults, with strides large enough for the biggest
    /// descriptor sizes reported by current desktop drivers
    fn default() -> Self {
        Self::new()
            .with_category(DescriptorCategory::Sampler, 256, 32)
            .with_category(DescriptorCategory::SampledImage, 4096, 64)
            .with_category(DescriptorCategory::StorageImage, 1024, 64)
            .with_category(DescriptorCategory::UniformBuffer, 1024, 64)
            .with_category(DescriptorCategory::StorageBuffer, 4096, 64)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "arena_config_tests.rs"]
mod tests;
