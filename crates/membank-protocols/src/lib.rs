//! # Membank Protocols
//!
//! Core protocol definitions (types and traits) for membank.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`MemoryStore`] - Persistent record storage (insert, get, delete, list)
//! - [`LexicalIndex`] - Keyword search returning ids in relevance order
//! - [`VectorIndex`] - Nearest-neighbor search returning ids with a distance

pub mod error;
pub mod memory;

pub use error::MemoryError;
pub use memory::{
    join_tags, split_tags, LexicalHit, LexicalIndex, MemoryRecord, MemoryStore, NewMemory,
    VectorHit, VectorIndex,
};
