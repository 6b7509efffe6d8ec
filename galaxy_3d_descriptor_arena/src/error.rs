//! Error types for the Galaxy3D descriptor arena
//!
//! This module defines the error type shared by the bit pools, the typed
//! slot arena, the resource handle table and the descriptor heap.

use std::fmt;

/// Result type for descriptor arena operations
pub type Result<T> = std::result::Result<T, Error>;

/// Descriptor arena errors
///
/// Only [`Error::Exhausted`] is a condition a well-behaved caller is
/// expected to handle. Every other variant is a configuration or caller
/// error and is surfaced immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bad configuration: zero stride, layout overflow, unknown category
    InvalidArgument(String),

    /// No free slot left in the requested pool
    Exhausted(String),

    /// Offset outside the byte range owned by a pool
    OutOfRange(String),

    /// Offset inside a pool's range but not on a slot boundary
    Misaligned(String),

    /// Slot released while already free
    DoubleFree(String),

    /// Unknown resource handle
    NotFound(String),

    /// Category has no pool in this arena
    PoolNotInitialized(String),

    /// Device backend failure (native descriptor write, object creation)
    BackendError(String),
}

impl Error {
    /// Whether a caller may reasonably recover from this error
    /// (grow, evict, or reject the request) instead of treating it as a bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Exhausted(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::Exhausted(msg) => write!(f, "Pool exhausted: {}", msg),
            Error::OutOfRange(msg) => write!(f, "Offset out of range: {}", msg),
            Error::Misaligned(msg) => write!(f, "Misaligned offset: {}", msg),
            Error::DoubleFree(msg) => write!(f, "Double free: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::PoolNotInitialized(msg) => write!(f, "Pool not initialized: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
