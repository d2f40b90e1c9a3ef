//! Storage layer: SQLite-backed analysis records with atomic dedup.

mod error;
mod sqlite;

pub use error::StoreError;
pub use sqlite::MessageStore;
