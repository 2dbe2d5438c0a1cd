//! High-level reconciliation facade.
//!
//! Ties the loader, planner, and executor together behind a plan-then-apply
//! split, so a confirmation gate can sit between the two steps.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::EngineResult;
use crate::executor::{EventSink, Executor, ExecutorConfig, RunOutcome, DEFAULT_GROUP_SIZE};
use crate::loader::load_scripts;
use crate::plan::{build_plan, Plan};
use crate::store::{AppliedRecord, AppliedStateStore, StoreConnector};

/// Configuration for a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Directory holding the script files.
    pub scripts_dir: PathBuf,
    /// Number of repeatable scripts per concurrent group.
    pub group_size: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            scripts_dir: PathBuf::from("./scripts"),
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

impl ReconcilerConfig {
    /// Create a new configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scripts directory.
    pub fn scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = dir.into();
        self
    }

    /// Set the repeatable-phase group size.
    pub fn group_size(mut self, size: usize) -> Self {
        self.group_size = size.max(1);
        self
    }
}

/// Reconciles a script directory against an applied-state store.
pub struct Reconciler<C: StoreConnector> {
    config: ReconcilerConfig,
    connector: Arc<C>,
}

impl<C> Reconciler<C>
where
    C: StoreConnector + 'static,
{
    /// Create a reconciler over the given store connector.
    pub fn new(config: ReconcilerConfig, connector: C) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
        }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Idempotently create the tracking table.
    pub async fn initialize(&self) -> EngineResult<()> {
        self.connector.connect().await?.initialize().await
    }

    /// Load the script directory and diff it against the applied records.
    pub async fn plan(&self) -> EngineResult<Plan> {
        let scripts = load_scripts(&self.config.scripts_dir).await?;
        let records = self.connector.connect().await?.all_records().await?;
        Ok(build_plan(scripts, &records))
    }

    /// Execute a previously computed plan.
    pub async fn apply(&self, plan: Plan, sink: Arc<dyn EventSink>) -> EngineResult<RunOutcome> {
        let executor = Executor::with_config(
            ExecutorConfig::new().group_size(self.config.group_size),
            ConnectorHandle {
                inner: Arc::clone(&self.connector),
            },
        );
        executor.run(plan, sink).await
    }

    /// Plan and immediately apply, with no gate in between.
    pub async fn update(&self, sink: Arc<dyn EventSink>) -> EngineResult<RunOutcome> {
        let plan = self.plan().await?;
        self.apply(plan, sink).await
    }

    /// The applied records, for status reporting.
    pub async fn status(&self) -> EngineResult<Vec<AppliedRecord>> {
        self.connector.connect().await?.all_records().await
    }
}

/// Cheap cloneable view over the reconciler's connector, so the executor can
/// own one without taking the connector away from the reconciler.
struct ConnectorHandle<C: StoreConnector> {
    inner: Arc<C>,
}

#[async_trait::async_trait]
impl<C> StoreConnector for ConnectorHandle<C>
where
    C: StoreConnector + 'static,
{
    type Store = C::Store;

    async fn connect(&self) -> EngineResult<Self::Store> {
        self.inner.connect().await
    }
}
