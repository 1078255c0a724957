//! SQLite storage for membank.
//!
//! A single database file holds the memory records, an FTS5 index over
//! them (kept in sync by triggers) and the persisted embedding vectors.

mod fts;
mod schema;
mod store;

pub use fts::prefix_match_query;
pub use store::SqliteMemoryStore;
