//! Test Database Manager
//!
//! Provides isolated database instances for testing:
//! - Temporary databases that are automatically cleaned up
//! - Concurrent test isolation (one database per manager)

use std::path::PathBuf;
use tempfile::TempDir;
use wordpace_core::Storage;

/// Manager for test databases
///
/// Creates isolated database instances for each test to prevent
/// interference. Automatically cleans up temporary databases when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
///
/// // Use the storage
/// db.storage.save_word("user-1", "word-1", Utc::now())?;
///
/// // Database is automatically deleted when `db` goes out of scope
/// ```
pub struct TestDatabaseManager {
    /// The storage instance
    pub storage: Storage,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: Option<TempDir>,
    /// Path to the database file
    db_path: PathBuf,
}

impl TestDatabaseManager {
    /// Create a new test database in a temporary directory
    ///
    /// The database is automatically deleted when the manager is dropped.
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_wordpace.db");

        let storage = Storage::new(Some(db_path.clone())).expect("Failed to create test storage");

        Self {
            storage,
            _temp_dir: Some(temp_dir),
            db_path,
        }
    }

    /// Create a test database at a specific path
    ///
    /// The database is NOT automatically deleted.
    pub fn new_at_path(path: PathBuf) -> Self {
        let storage = Storage::new(Some(path.clone())).expect("Failed to create test storage");

        Self {
            storage,
            _temp_dir: None,
            db_path: path,
        }
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Number of words a user has saved
    pub fn word_count(&self, user_id: &str) -> i64 {
        self.storage
            .get_stats(user_id)
            .map(|s| s.total_words)
            .unwrap_or(0)
    }

    /// Whether a user has no saved words
    pub fn is_empty(&self, user_id: &str) -> bool {
        self.word_count(user_id) == 0
    }
}
