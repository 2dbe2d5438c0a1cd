//! SQLite-backed applied-state store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::params;
use tokio_rusqlite::Connection;
use tracing::debug;

use tidemark_engine::error::{EngineError, EngineResult};
use tidemark_engine::script::ScriptFile;
use tidemark_engine::store::{AppliedRecord, AppliedStateStore, StoreConnector};

use crate::config::{DatabasePath, SqliteStoreConfig};

/// DDL for the tracking table. Create-if-not-exists, safe on every run.
const INIT_SQL: &str = "
CREATE TABLE IF NOT EXISTS tidemark_applied (
    name_fingerprint    TEXT PRIMARY KEY,
    content_fingerprint TEXT NOT NULL,
    applied_at          TEXT NOT NULL
)
";

const SELECT_ALL_SQL: &str = "
SELECT name_fingerprint, content_fingerprint, applied_at
FROM tidemark_applied
ORDER BY applied_at, name_fingerprint
";

const UPSERT_SQL: &str = "
INSERT INTO tidemark_applied (name_fingerprint, content_fingerprint, applied_at)
VALUES (?1, ?2, ?3)
ON CONFLICT(name_fingerprint) DO UPDATE SET
    content_fingerprint = excluded.content_fingerprint,
    applied_at = excluded.applied_at
";

/// Applied-state store over a single SQLite connection.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a store against the configured database.
    pub async fn open(config: &SqliteStoreConfig) -> EngineResult<Self> {
        let conn = match &config.path {
            DatabasePath::Memory => Connection::open_in_memory().await,
            DatabasePath::File(path) => Connection::open(path).await,
        }
        .map_err(|e| EngineError::store(format!("failed to open database: {e}")))?;

        if let Some(ms) = config.busy_timeout_ms {
            conn.call(move |conn| {
                conn.busy_timeout(Duration::from_millis(u64::from(ms)))?;
                Ok(())
            })
            .await
            .map_err(|e| EngineError::store(format!("failed to set busy timeout: {e}")))?;
        }

        Ok(Self { conn })
    }
}

#[async_trait]
impl AppliedStateStore for SqliteStore {
    async fn initialize(&self) -> EngineResult<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(INIT_SQL)?;
                Ok(())
            })
            .await
            .map_err(|e| EngineError::store(format!("failed to initialize tracking table: {e}")))
    }

    async fn all_records(&self) -> EngineResult<Vec<AppliedRecord>> {
        let rows = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(SELECT_ALL_SQL)?;
                let rows = stmt.query_map([], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?;
                let collected: Result<Vec<_>, _> = rows.collect();
                Ok(collected?)
            })
            .await
            .map_err(|e| EngineError::store(format!("failed to read applied records: {e}")))?;

        rows.into_iter()
            .map(|(name_fingerprint, content_fingerprint, applied_at)| {
                let applied_at = DateTime::parse_from_rfc3339(&applied_at)
                    .map_err(|e| {
                        EngineError::store(format!("invalid applied_at '{applied_at}': {e}"))
                    })?
                    .with_timezone(&Utc);
                Ok(AppliedRecord {
                    name_fingerprint,
                    content_fingerprint,
                    applied_at,
                })
            })
            .collect()
    }

    async fn apply(&self, script: &ScriptFile, applied_at: DateTime<Utc>) -> EngineResult<()> {
        let name = script.name.clone();
        let content = script.content.clone();
        let name_fingerprint = script.identity.name_fingerprint.clone();
        let content_fingerprint = script.identity.content_fingerprint.clone();
        let stamp = applied_at.to_rfc3339();

        debug!(name = %name, "applying script");

        // One transaction spans the script body and its bookkeeping row:
        // SQLite DDL is transactional, so both commit or neither does.
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute_batch(&content)?;
                tx.execute(
                    UPSERT_SQL,
                    params![name_fingerprint, content_fingerprint, stamp],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| EngineError::application_failed(name, e.to_string()))
    }
}

/// Opens one fresh SQLite connection per concurrent worker.
#[derive(Clone)]
pub struct SqliteConnector {
    config: SqliteStoreConfig,
}

impl SqliteConnector {
    /// Create a connector for the given configuration.
    pub fn new(config: SqliteStoreConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }
}

#[async_trait]
impl StoreConnector for SqliteConnector {
    type Store = SqliteStore;

    async fn connect(&self) -> EngineResult<SqliteStore> {
        SqliteStore::open(&self.config).await
    }
}
