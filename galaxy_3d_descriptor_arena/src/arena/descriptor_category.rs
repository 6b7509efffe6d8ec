/// Descriptor categories stored in the arena

use std::fmt;
use crate::error::{Error, Result};
use crate::engine_err;

/// Kind of descriptor a slot holds
///
/// Each category owns its own region of the arena, with its own stride and
/// capacity. The discriminant doubles as the index into per-category tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorCategory {
    /// Sampler state (filtering, addressing)
    Sampler = 0,
    /// Read-only image view
    SampledImage = 1,
    /// Read-write image view
    StorageImage = 2,
    /// Uniform buffer range (UBO)
    UniformBuffer = 3,
    /// Storage buffer range (SSBO)
    StorageBuffer = 4,
}

impl DescriptorCategory {
    /// Number of categories
    pub const COUNT: usize = 5;

    /// Every category, in discriminant order
    pub const ALL: [DescriptorCategory; Self::COUNT] = [
        DescriptorCategory::Sampler,
        DescriptorCategory::SampledImage,
        DescriptorCategory::StorageImage,
        DescriptorCategory::UniformBuffer,
        DescriptorCategory::StorageBuffer,
    ];

    /// Index into per-category tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            DescriptorCategory::Sampler => "Sampler",
            DescriptorCategory::SampledImage => "SampledImage",
            DescriptorCategory::StorageImage => "StorageImage",
            DescriptorCategory::UniformBuffer => "UniformBuffer",
            DescriptorCategory::StorageBuffer => "StorageBuffer",
        }
    }
}

impl fmt::Display for DescriptorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for DescriptorCategory {
    type Error = Error;

    /// Decode a raw category tag (e.g. read back from a shader-visible table)
    fn try_from(raw: u32) -> Result<Self> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or_else(|| engine_err!(InvalidArgument, "galaxy3d::DescriptorCategory",
                "unknown descriptor category tag {}", raw))
    }
}
