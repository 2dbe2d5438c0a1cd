//! SQLite store configuration.

use std::path::PathBuf;

/// Database path configuration.
#[derive(Debug, Clone, Default)]
pub enum DatabasePath {
    /// In-memory database. Each opened connection gets its own private
    /// database, so this only suits single-connection use and tests.
    #[default]
    Memory,
    /// File-based database.
    File(PathBuf),
}

impl DatabasePath {
    /// Check if this is an in-memory database.
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

/// Configuration for the SQLite applied-state store.
#[derive(Debug, Clone)]
pub struct SqliteStoreConfig {
    /// Database path (or in-memory).
    pub path: DatabasePath,
    /// Busy timeout in milliseconds, for contention between workers.
    pub busy_timeout_ms: Option<u32>,
}

impl Default for SqliteStoreConfig {
    fn default() -> Self {
        Self {
            path: DatabasePath::Memory,
            busy_timeout_ms: Some(5_000),
        }
    }
}

impl SqliteStoreConfig {
    /// Configuration for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Configuration for a file-based database.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: DatabasePath::File(path.into()),
            ..Self::default()
        }
    }

    /// Set the busy timeout.
    pub fn busy_timeout_ms(mut self, ms: u32) -> Self {
        self.busy_timeout_ms = Some(ms);
        self
    }
}
