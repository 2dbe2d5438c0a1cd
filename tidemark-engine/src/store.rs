//! Applied-state tracking contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::script::ScriptFile;

/// A record of one applied script.
///
/// At most one record exists per name fingerprint; re-applying a repeatable
/// script replaces its record rather than duplicating it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRecord {
    /// Name fingerprint of the applied script (primary key).
    pub name_fingerprint: String,
    /// Content fingerprint at the time of application.
    pub content_fingerprint: String,
    /// When the script was applied.
    pub applied_at: DateTime<Utc>,
}

/// Persistent record of which scripts have been applied.
///
/// `apply` must treat the script execution and the record upsert as one unit
/// of work: a failed execution writes no record, and a lost record write
/// leaves the script looking unapplied on the next run.
#[async_trait]
pub trait AppliedStateStore: Send + Sync {
    /// Idempotently ensure the tracking table exists.
    async fn initialize(&self) -> EngineResult<()>;

    /// The complete applied set, loaded once per run.
    async fn all_records(&self) -> EngineResult<Vec<AppliedRecord>>;

    /// Execute the script's content and upsert its applied record.
    async fn apply(&self, script: &ScriptFile, applied_at: DateTime<Utc>) -> EngineResult<()>;
}

/// Opens independent store handles.
///
/// Each concurrent worker gets its own connection so one worker's
/// transaction cannot block or roll back another's.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Store type produced by this connector.
    type Store: AppliedStateStore + 'static;

    /// Open a fresh store handle.
    async fn connect(&self) -> EngineResult<Self::Store>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied_record_equality_is_field_wise() {
        let applied_at = Utc::now();
        let a = AppliedRecord {
            name_fingerprint: "aa".repeat(16),
            content_fingerprint: "bb".repeat(20),
            applied_at,
        };
        let mut b = a.clone();
        assert_eq!(a, b);

        b.content_fingerprint = "cc".repeat(20);
        assert_ne!(a, b);
    }
}
