/// Handle-indexed table of allocation records for one resource kind.
///
/// Handles come from a monotonically increasing counter starting at 1 and
/// are never reused, so a stale handle can only miss, never alias a newer
/// record. A handle is valid iff its entry is present. Entries are removed
/// only by an explicit `free`; the table never evicts.

use std::marker::PhantomData;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::{engine_err, engine_trace};
use super::resource_handle::ResourceHandle;

const SOURCE: &str = "galaxy3d::ResourceHandleTable";

/// First handle value issued by a table (0 is never a valid handle)
pub const FIRST_HANDLE: u64 = 1;

/// Records of one kind keyed by `H`, issuing a fresh handle per `cache`
#[derive(Debug, Clone)]
pub struct HandleTable<H: ResourceHandle, R> {
    entries: FxHashMap<u64, R>,
    next_handle: u64,
    _handle: PhantomData<H>,
}

impl<H: ResourceHandle, R> HandleTable<H, R> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
            next_handle: FIRST_HANDLE,
            _handle: PhantomData,
        }
    }

    /// Store a record and return its new handle
    pub fn cache(&mut self, record: R) -> H {
        let raw = self.next_handle;
        self.next_handle += 1;
        self.entries.insert(raw, record);
        engine_trace!(SOURCE, "Cached {} handle {}", H::KIND, raw);
        H::from_raw(raw)
    }

    /// Record for a handle
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is unknown or was freed.
    pub fn get(&self, handle: H) -> Result<&R> {
        self.entries
            .get(&handle.raw())
            .ok_or_else(|| engine_err!(NotFound, SOURCE,
                "{} handle {} is not cached", H::KIND, handle.raw()))
    }

    /// Mutable record for a handle
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is unknown or was freed.
    pub fn get_mut(&mut self, handle: H) -> Result<&mut R> {
        self.entries
            .get_mut(&handle.raw())
            .ok_or_else(|| engine_err!(NotFound, SOURCE,
                "{} handle {} is not cached", H::KIND, handle.raw()))
    }

    /// Remove a handle and return its record
    ///
    /// Releasing the native object behind the record is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the handle is unknown or was already freed.
    pub fn free(&mut self, handle: H) -> Result<R> {
        let record = self.entries
            .remove(&handle.raw())
            .ok_or_else(|| engine_err!(NotFound, SOURCE,
                "cannot free {} handle {}: not cached", H::KIND, handle.raw()))?;
        engine_trace!(SOURCE, "Freed {} handle {}", H::KIND, handle.raw());
        Ok(record)
    }

    /// Whether a handle is currently cached
    pub fn contains(&self, handle: H) -> bool {
        self.entries.contains_key(&handle.raw())
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no record is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value the next `cache` call will return
    pub fn next_handle(&self) -> u64 {
        self.next_handle
    }

    /// Iterate over cached records (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (H, &R)> + '_ {
        self.entries.iter().map(|(raw, record)| (H::from_raw(*raw), record))
    }

    /// Remove every record, oldest handle first
    ///
    /// The handle counter keeps running, so drained handles are never reissued.
    pub fn drain(&mut self) -> Vec<(H, R)> {
        let mut drained: Vec<(H, R)> = self.entries
            .drain()
            .map(|(raw, record)| (H::from_raw(raw), record))
            .collect();
        drained.sort_by_key(|(handle, _)| handle.raw());
        drained
    }
}

impl<H: ResourceHandle, R> Default for HandleTable<H, R> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "handle_table_tests.rs"]
mod tests;
