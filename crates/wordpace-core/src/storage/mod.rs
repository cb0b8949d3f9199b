//! Storage Module
//!
//! SQLite-based progress store with:
//! - Per-(user, word) scheduling records
//! - Optimistic-concurrency review writes (last-write-wins token)
//! - Streak state with study-minute accumulation
//! - Append-only review history

mod migrations;
mod sqlite;

pub use migrations::MIGRATIONS;
pub use sqlite::{Result, ReviewLogEntry, Storage, StorageError};
