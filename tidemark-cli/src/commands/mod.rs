//! Command implementations.

pub mod plan;
pub mod status;
pub mod update;
pub mod version;

use tidemark_engine::{Reconciler, ReconcilerConfig};
use tidemark_sqlite::{SqliteConnector, SqliteStoreConfig};

use crate::config::Settings;

/// Build a reconciler over the settings' SQLite database.
pub(crate) fn build_reconciler(settings: &Settings) -> Reconciler<SqliteConnector> {
    let connector = SqliteConnector::new(SqliteStoreConfig::file(&settings.database));
    Reconciler::new(
        ReconcilerConfig::new()
            .scripts_dir(&settings.scripts_dir)
            .group_size(settings.group_size),
        connector,
    )
}
