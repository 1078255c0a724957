//! Error types for the membank protocol layer.

mod memory;

pub use memory::*;
