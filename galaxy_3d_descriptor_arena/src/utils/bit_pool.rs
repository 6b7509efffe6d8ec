use crate::error::Result;
use crate::{engine_bail, engine_debug, engine_error, engine_trace};

const SOURCE: &str = "galaxy3d::BitPool";

/// Number of slots tracked by one bitmap word
const WORD_BITS: u64 = 64;

/// Fixed-capacity slot pool backed by a free bitmap.
///
/// Owns no memory, only index space: slot `i` maps to the byte offset
/// `starting_offset + i * stride` inside some externally owned arena.
/// One bit per slot, `1` = free, `0` = allocated. Bits past `capacity`
/// in the last word are padding and stay `0` forever.
///
/// Allocation is first-fit: the lowest free slot is always returned,
/// found by scanning words in order and taking the lowest set bit.
///
/// # Example
///
/// ```ignore
/// let mut pool = BitPool::new(0, 16, 3)?;
/// let a = pool.allocate()?;  // 0
/// let b = pool.allocate()?;  // 16
/// pool.free(a)?;             // slot 0 is free again
/// let c = pool.allocate()?;  // 0 (lowest free slot)
/// ```
#[derive(Debug, Clone)]
pub struct BitPool {
    bitmap: Vec<u64>,
    starting_offset: u64,
    stride: u64,
    capacity: u64,
    available: u64,
}

impl BitPool {
    /// Create a pool of `capacity` slots of `stride` bytes starting at `starting_offset`
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `stride` is zero, if the last slot
    /// would end past `u64::MAX`, or if the bitmap cannot be allocated.
    pub fn new(starting_offset: u64, stride: u64, capacity: u64) -> Result<Self> {
        if stride == 0 {
            engine_bail!(InvalidArgument, SOURCE,
                "stride must be non-zero (starting_offset = {}, capacity = {})",
                starting_offset, capacity);
        }
        if capacity > (u64::MAX - starting_offset) / stride {
            engine_bail!(InvalidArgument, SOURCE,
                "{} slots of {} bytes starting at {} overflow the address space",
                capacity, stride, starting_offset);
        }

        let word_count = match usize::try_from(capacity.div_ceil(WORD_BITS)) {
            Ok(count) => count,
            Err(_) => engine_bail!(InvalidArgument, SOURCE,
                "capacity {} does not fit in host memory", capacity),
        };
        let mut bitmap = Vec::new();
        if bitmap.try_reserve_exact(word_count).is_err() {
            engine_bail!(InvalidArgument, SOURCE,
                "cannot allocate a bitmap for {} slots", capacity);
        }
        bitmap.resize(word_count, 0);

        let mut pool = Self {
            bitmap,
            starting_offset,
            stride,
            capacity,
            available: 0,
        };
        pool.reset();

        engine_debug!(SOURCE, "Created pool [{}, {}) with {} slots of {} bytes",
            starting_offset, pool.end_offset(), capacity, stride);

        Ok(pool)
    }

    /// Allocate the lowest free slot and return its byte offset
    ///
    /// # Errors
    ///
    /// Returns `Exhausted` if every slot is allocated.
    ///
    /// # Panics
    ///
    /// Panics if the free count says a slot is available but the bitmap has
    /// no free bit. That state can only come from memory corruption.
    pub fn allocate(&mut self) -> Result<u64> {
        if self.available == 0 {
            engine_bail!(Exhausted, SOURCE,
                "all {} slots of pool at offset {} are allocated",
                self.capacity, self.starting_offset);
        }

        let found = self.bitmap.iter().enumerate().find(|(_, word)| **word != 0);
        let Some((word_index, &word)) = found else {
            engine_error!(SOURCE,
                "bitmap has no free bit but {} slots are counted as available",
                self.available);
            panic!("BitPool corrupted: free count {} with an empty bitmap", self.available);
        };

        let bit = word.trailing_zeros();
        self.bitmap[word_index] &= !(1u64 << bit);
        self.available -= 1;

        let index = word_index as u64 * WORD_BITS + bit as u64;
        let offset = self.starting_offset + index * self.stride;
        engine_trace!(SOURCE, "Allocated slot {} (offset {}), {} left",
            index, offset, self.available);
        Ok(offset)
    }

    /// Return the slot at `offset` to the pool
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `offset` is outside `[starting_offset, end_offset)`
    /// - `Misaligned` if `offset` is not on a slot boundary
    /// - `DoubleFree` if the slot is already free
    pub fn free(&mut self, offset: u64) -> Result<()> {
        let index = self.slot_index(offset)?;
        let (word_index, mask) = Self::locate(index);

        if self.bitmap[word_index] & mask != 0 {
            engine_bail!(DoubleFree, SOURCE,
                "slot {} (offset {}) is already free", index, offset);
        }

        self.bitmap[word_index] |= mask;
        self.available += 1;
        engine_trace!(SOURCE, "Freed slot {} (offset {}), {} left",
            index, offset, self.available);
        Ok(())
    }

    /// Slot index of a byte offset, validated against range and alignment
    ///
    /// # Errors
    ///
    /// - `OutOfRange` if `offset` is outside the pool
    /// - `Misaligned` if `offset` is not on a slot boundary
    pub fn slot_index(&self, offset: u64) -> Result<u64> {
        if !self.contains(offset) {
            engine_bail!(OutOfRange, SOURCE,
                "offset {} is outside pool [{}, {})",
                offset, self.starting_offset, self.end_offset());
        }
        let relative = offset - self.starting_offset;
        if relative % self.stride != 0 {
            engine_bail!(Misaligned, SOURCE,
                "offset {} is not a multiple of stride {} from pool start {}",
                offset, self.stride, self.starting_offset);
        }
        Ok(relative / self.stride)
    }

    /// Whether the slot at `offset` is currently allocated
    ///
    /// Returns false for offsets that do not name a slot of this pool.
    pub fn is_allocated(&self, offset: u64) -> bool {
        if !self.contains(offset) || (offset - self.starting_offset) % self.stride != 0 {
            return false;
        }
        let (word_index, mask) = Self::locate((offset - self.starting_offset) / self.stride);
        self.bitmap[word_index] & mask == 0
    }

    /// Whether `offset` falls in the byte range owned by this pool
    pub fn contains(&self, offset: u64) -> bool {
        offset >= self.starting_offset && offset < self.end_offset()
    }

    /// Mark every slot free again
    ///
    /// Padding bits past `capacity` in the last word are left cleared.
    pub fn reset(&mut self) {
        self.bitmap.fill(u64::MAX);
        let tail_bits = self.capacity % WORD_BITS;
        if tail_bits != 0 {
            if let Some(last) = self.bitmap.last_mut() {
                *last = (1u64 << tail_bits) - 1;
            }
        }
        self.available = self.capacity;
    }

    /// Byte offset of slot 0
    pub fn starting_offset(&self) -> u64 {
        self.starting_offset
    }

    /// Byte size of one slot
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Total number of slots
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of free slots
    pub fn available(&self) -> u64 {
        self.available
    }

    /// Number of allocated slots
    pub fn allocated(&self) -> u64 {
        self.capacity - self.available
    }

    /// One past the last byte owned by this pool
    pub fn end_offset(&self) -> u64 {
        self.starting_offset + self.capacity * self.stride
    }

    /// Whether no slot is allocated
    pub fn is_empty(&self) -> bool {
        self.available == self.capacity
    }

    /// Whether every slot is allocated
    pub fn is_full(&self) -> bool {
        self.available == 0
    }

    fn locate(index: u64) -> (usize, u64) {
        ((index / WORD_BITS) as usize, 1u64 << (index % WORD_BITS))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "bit_pool_tests.rs"]
mod tests;
