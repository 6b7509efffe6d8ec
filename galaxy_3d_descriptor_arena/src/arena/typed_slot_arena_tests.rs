use super::*;
use crate::error::Error;
use std::collections::HashSet;

/// A: Sampler (cap 4, stride 8), B: StorageBuffer (cap 4, stride 16)
fn two_category_arena() -> TypedSlotArena {
    let config = ArenaConfig::new()
        .with_category(DescriptorCategory::Sampler, 4, 8)
        .with_category(DescriptorCategory::StorageBuffer, 4, 16);
    TypedSlotArena::new(&config).unwrap()
}

// ============================================================================
// Layout tests
// ============================================================================

#[test]
fn test_regions_are_consecutive() {
    let arena = two_category_arena();
    assert_eq!(arena.region(DescriptorCategory::Sampler).unwrap(), 0..32);
    assert_eq!(arena.region(DescriptorCategory::StorageBuffer).unwrap(), 32..96);
    assert_eq!(arena.total_size(), 96);
    assert_eq!(
        arena.categories(),
        &[DescriptorCategory::Sampler, DescriptorCategory::StorageBuffer]
    );
}

#[test]
fn test_layout_follows_config_order() {
    let config = ArenaConfig::new()
        .with_category(DescriptorCategory::UniformBuffer, 2, 64)
        .with_category(DescriptorCategory::Sampler, 3, 32);
    let arena = TypedSlotArena::new(&config).unwrap();

    assert_eq!(arena.region(DescriptorCategory::UniformBuffer).unwrap(), 0..128);
    assert_eq!(arena.region(DescriptorCategory::Sampler).unwrap(), 128..224);
}

#[test]
fn test_default_config_builds() {
    let arena = TypedSlotArena::new(&ArenaConfig::default()).unwrap();
    assert_eq!(arena.total_size(), ArenaConfig::default().total_size().unwrap());
    for category in DescriptorCategory::ALL {
        assert!(arena.has_category(category));
    }
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ArenaConfig::new().with_category(DescriptorCategory::Sampler, 4, 0);
    assert!(matches!(TypedSlotArena::new(&config), Err(Error::InvalidArgument(_))));

    assert!(matches!(
        TypedSlotArena::new(&ArenaConfig::new()),
        Err(Error::InvalidArgument(_))
    ));
}

// ============================================================================
// Allocation tests
// ============================================================================

#[test]
fn test_arena_disjointness() {
    let mut arena = two_category_arena();
    let mut seen = HashSet::new();

    for _ in 0..4 {
        let a = arena.allocate(DescriptorCategory::Sampler).unwrap();
        assert!(a < 32, "sampler offset {} escaped its region", a);
        assert!(seen.insert(a));

        let b = arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
        assert!((32..96).contains(&b), "storage offset {} escaped its region", b);
        assert!(seen.insert(b));
    }
    assert_eq!(seen.len(), 8);
}

#[test]
fn test_categories_exhaust_independently() {
    let mut arena = two_category_arena();
    for _ in 0..4 {
        arena.allocate(DescriptorCategory::Sampler).unwrap();
    }

    let err = arena.allocate(DescriptorCategory::Sampler).unwrap_err();
    assert!(matches!(err, Error::Exhausted(_)));
    assert!(err.is_recoverable());

    assert_eq!(arena.allocate(DescriptorCategory::StorageBuffer).unwrap(), 32);
}

#[test]
fn test_exhaustion_is_reported_by_the_region_pool() {
    let mut arena = two_category_arena();
    for _ in 0..4 {
        arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
    }

    match arena.allocate(DescriptorCategory::StorageBuffer) {
        Err(Error::Exhausted(message)) => assert!(message.contains("offset 32"), "{}", message),
        other => panic!("expected Exhausted, got {:?}", other),
    }
    assert_eq!(arena.available(DescriptorCategory::StorageBuffer).unwrap(), 0);
    assert_eq!(arena.stats().total_allocated(), 4);
}

#[test]
fn test_missing_category_is_not_initialized() {
    let mut arena = two_category_arena();
    assert!(!arena.has_category(DescriptorCategory::SampledImage));
    assert!(matches!(
        arena.allocate(DescriptorCategory::SampledImage),
        Err(Error::PoolNotInitialized(_))
    ));
    assert!(matches!(
        arena.free(0, DescriptorCategory::SampledImage),
        Err(Error::PoolNotInitialized(_))
    ));
    assert!(matches!(
        arena.region(DescriptorCategory::SampledImage),
        Err(Error::PoolNotInitialized(_))
    ));
}

#[test]
fn test_unknown_category_tag_is_invalid_argument() {
    assert_eq!(DescriptorCategory::try_from(4).unwrap(), DescriptorCategory::StorageBuffer);
    assert!(matches!(DescriptorCategory::try_from(5), Err(Error::InvalidArgument(_))));
}

// ============================================================================
// Free tests
// ============================================================================

#[test]
fn test_free_and_reallocate() {
    let mut arena = two_category_arena();
    let first = arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
    let second = arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
    assert_eq!((first, second), (32, 48));

    arena.free(first, DescriptorCategory::StorageBuffer).unwrap();
    assert_eq!(arena.available(DescriptorCategory::StorageBuffer).unwrap(), 3);
    assert_eq!(arena.allocate(DescriptorCategory::StorageBuffer).unwrap(), 32);
}

#[test]
fn test_free_with_wrong_category_is_out_of_range() {
    let mut arena = two_category_arena();
    let sampler = arena.allocate(DescriptorCategory::Sampler).unwrap();

    assert!(matches!(
        arena.free(sampler, DescriptorCategory::StorageBuffer),
        Err(Error::OutOfRange(_))
    ));
    assert!(arena.is_allocated(sampler, DescriptorCategory::Sampler));
}

#[test]
fn test_double_free_through_arena() {
    let mut arena = two_category_arena();
    let offset = arena.allocate(DescriptorCategory::Sampler).unwrap();
    arena.free(offset, DescriptorCategory::Sampler).unwrap();
    assert!(matches!(
        arena.free(offset, DescriptorCategory::Sampler),
        Err(Error::DoubleFree(_))
    ));
}

#[test]
fn test_misaligned_free_through_arena() {
    let mut arena = two_category_arena();
    arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
    assert!(matches!(
        arena.free(40, DescriptorCategory::StorageBuffer),
        Err(Error::Misaligned(_))
    ));
}

// ============================================================================
// Query tests
// ============================================================================

#[test]
fn test_category_of() {
    let arena = two_category_arena();
    assert_eq!(arena.category_of(0), Some(DescriptorCategory::Sampler));
    assert_eq!(arena.category_of(31), Some(DescriptorCategory::Sampler));
    assert_eq!(arena.category_of(32), Some(DescriptorCategory::StorageBuffer));
    assert_eq!(arena.category_of(95), Some(DescriptorCategory::StorageBuffer));
    assert_eq!(arena.category_of(96), None);
}

#[test]
fn test_category_of_skips_empty_regions() {
    let config = ArenaConfig::new()
        .with_category(DescriptorCategory::Sampler, 0, 8)
        .with_category(DescriptorCategory::SampledImage, 2, 8);
    let arena = TypedSlotArena::new(&config).unwrap();
    assert_eq!(arena.category_of(0), Some(DescriptorCategory::SampledImage));
}

#[test]
fn test_slot_index_is_region_relative() {
    let mut arena = two_category_arena();
    arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
    let second = arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
    assert_eq!(arena.slot_index(second, DescriptorCategory::StorageBuffer).unwrap(), 1);
}

#[test]
fn test_capacity_and_stride() {
    let arena = two_category_arena();
    assert_eq!(arena.capacity(DescriptorCategory::Sampler).unwrap(), 4);
    assert_eq!(arena.stride(DescriptorCategory::Sampler).unwrap(), 8);
    assert_eq!(arena.stride(DescriptorCategory::StorageBuffer).unwrap(), 16);
}

#[test]
fn test_stats() {
    let mut arena = two_category_arena();
    arena.allocate(DescriptorCategory::Sampler).unwrap();
    arena.allocate(DescriptorCategory::StorageBuffer).unwrap();
    arena.allocate(DescriptorCategory::StorageBuffer).unwrap();

    let stats = arena.stats();
    assert_eq!(stats.categories.len(), 2);
    assert_eq!(stats.total_capacity(), 8);
    assert_eq!(stats.total_allocated(), 3);

    let storage = stats.category(DescriptorCategory::StorageBuffer).unwrap();
    assert_eq!(storage.offset, 32);
    assert_eq!(storage.stride, 16);
    assert_eq!(storage.allocated, 2);
    assert!(stats.category(DescriptorCategory::StorageImage).is_none());
}

#[test]
fn test_reset() {
    let mut arena = two_category_arena();
    for _ in 0..4 {
        arena.allocate(DescriptorCategory::Sampler).unwrap();
    }
    arena.allocate(DescriptorCategory::StorageBuffer).unwrap();

    arena.reset();
    assert_eq!(arena.stats().total_allocated(), 0);
    assert_eq!(arena.allocate(DescriptorCategory::Sampler).unwrap(), 0);
}
