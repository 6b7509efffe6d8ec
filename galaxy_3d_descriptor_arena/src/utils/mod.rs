//! Low-level allocation utilities

mod bit_pool;

pub use bit_pool::BitPool;
