//! In-process keyed storage for cached credential records.

pub mod memory;

pub use memory::MemoryStore;
