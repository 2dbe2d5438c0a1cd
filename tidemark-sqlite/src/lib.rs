//! SQLite-backed applied-state store for Tidemark.
//!
//! Implements the engine's [`AppliedStateStore`] contract over
//! `tokio-rusqlite`. Script execution and the tracking-table upsert run in
//! one transaction, so a failed script leaves no applied record.
//!
//! # Example
//!
//! ```rust,ignore
//! use tidemark_sqlite::{SqliteConnector, SqliteStoreConfig};
//! use tidemark_engine::{Reconciler, ReconcilerConfig};
//!
//! let connector = SqliteConnector::new(SqliteStoreConfig::file("./app.db"));
//! let reconciler = Reconciler::new(
//!     ReconcilerConfig::new().scripts_dir("./scripts"),
//!     connector,
//! );
//! ```
//!
//! [`AppliedStateStore`]: tidemark_engine::store::AppliedStateStore

pub mod config;
pub mod store;

pub use config::{DatabasePath, SqliteStoreConfig};
pub use store::{SqliteConnector, SqliteStore};
