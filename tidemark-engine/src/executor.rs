//! Two-phase plan execution.
//!
//! The ordered phase applies migrations strictly sequentially, halting on
//! the first failure. The repeatable phase then partitions its scripts into
//! contiguous groups and runs one worker per group, each on its own store
//! connection; a failure aborts only that group's remainder.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::plan::{Conflict, Plan};
use crate::script::ScriptFile;
use crate::store::{AppliedStateStore, StoreConnector};

/// Default number of repeatable scripts per concurrent group.
pub const DEFAULT_GROUP_SIZE: usize = 8;

/// Configuration for plan execution.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Number of repeatable scripts per concurrent group.
    pub group_size: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            group_size: DEFAULT_GROUP_SIZE,
        }
    }
}

impl ExecutorConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repeatable-phase group size. Values below 1 are clamped to 1.
    pub fn group_size(mut self, size: usize) -> Self {
        self.group_size = size.max(1);
        self
    }
}

/// Progress events emitted while a plan executes.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    /// Script already applied with matching content.
    Skipped {
        /// Script name.
        name: String,
    },
    /// Script application started.
    Applying {
        /// Script name.
        name: String,
    },
    /// Script applied and recorded.
    Applied {
        /// Script name.
        name: String,
    },
    /// Script application failed.
    Failed {
        /// Script name.
        name: String,
        /// Failure description.
        reason: String,
    },
    /// Conflict reported from an aborted plan.
    ConflictDetected {
        /// Script name.
        name: String,
        /// When the original content was applied.
        applied_at: DateTime<Utc>,
    },
}

/// Receives progress events during execution.
///
/// Called from concurrent workers; implementations must be cheap and must
/// not block.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn on_event(&self, event: ExecutionEvent);
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_event(&self, _event: ExecutionEvent) {}
}

/// A script that failed to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    /// Script name.
    pub name: String,
    /// Failure description.
    pub reason: String,
}

/// Outcome of one run.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Scripts skipped as already applied.
    pub skipped: Vec<String>,
    /// Ordered migrations applied this run, in execution order.
    pub applied_ordered: Vec<String>,
    /// Repeatable scripts applied this run.
    pub applied_repeatable: Vec<String>,
    /// Scripts that failed to apply.
    pub failures: Vec<ScriptFailure>,
    /// Conflicts that aborted the run.
    pub conflicts: Vec<Conflict>,
    /// Whether the run aborted before executing anything.
    pub aborted: bool,
    /// Total duration in milliseconds.
    pub duration_ms: i64,
}

impl RunOutcome {
    /// Whether every planned script applied cleanly.
    pub fn succeeded(&self) -> bool {
        !self.aborted && self.failures.is_empty()
    }

    /// Total scripts applied across both phases.
    pub fn applied_count(&self) -> usize {
        self.applied_ordered.len() + self.applied_repeatable.len()
    }

    /// Get a summary of the run.
    pub fn summary(&self) -> String {
        if self.aborted {
            return format!("Aborted with {} conflicts", self.conflicts.len());
        }

        let mut parts = Vec::new();
        if self.applied_count() > 0 {
            parts.push(format!("{} applied", self.applied_count()));
        }
        if !self.skipped.is_empty() {
            parts.push(format!("{} skipped", self.skipped.len()));
        }
        if !self.failures.is_empty() {
            parts.push(format!("{} failed", self.failures.len()));
        }

        if parts.is_empty() {
            "Nothing to apply".to_string()
        } else {
            format!("{} in {}ms", parts.join(", "), self.duration_ms)
        }
    }
}

/// Executes a plan against the applied-state store.
pub struct Executor<C: StoreConnector> {
    config: ExecutorConfig,
    connector: Arc<C>,
}

impl<C> Executor<C>
where
    C: StoreConnector + 'static,
{
    /// Create an executor with the default configuration.
    pub fn new(connector: C) -> Self {
        Self::with_config(ExecutorConfig::default(), connector)
    }

    /// Create an executor with an explicit configuration.
    pub fn with_config(config: ExecutorConfig, connector: C) -> Self {
        Self {
            config,
            connector: Arc::new(connector),
        }
    }

    /// Execute a plan, reporting progress through `sink`.
    ///
    /// An aborted plan executes nothing and only reports its conflicts. An
    /// ordered-phase failure halts that phase and skips the repeatable phase
    /// entirely; prior successes stay recorded. Errors inside individual
    /// scripts land in the outcome's `failures` rather than failing the run.
    pub async fn run(&self, plan: Plan, sink: Arc<dyn EventSink>) -> EngineResult<RunOutcome> {
        let start = Instant::now();
        let mut outcome = RunOutcome::default();

        if plan.is_aborted() {
            for conflict in &plan.conflicts {
                sink.on_event(ExecutionEvent::ConflictDetected {
                    name: conflict.script_name.clone(),
                    applied_at: conflict.applied_at,
                });
            }
            warn!(conflicts = plan.conflicts.len(), "run aborted by conflicts");
            outcome.conflicts = plan.conflicts;
            outcome.aborted = true;
            outcome.duration_ms = start.elapsed().as_millis() as i64;
            return Ok(outcome);
        }

        for script in &plan.to_skip {
            sink.on_event(ExecutionEvent::Skipped {
                name: script.name.clone(),
            });
            outcome.skipped.push(script.name.clone());
        }

        let ordered_ok = self.run_ordered(&plan.to_apply_ordered, &sink, &mut outcome).await?;

        if ordered_ok {
            self.run_repeatable(plan.to_apply_repeatable, &sink, &mut outcome)
                .await?;
        } else {
            debug!("skipping repeatable phase after ordered-phase failure");
        }

        outcome.duration_ms = start.elapsed().as_millis() as i64;
        Ok(outcome)
    }

    /// Ordered phase: strictly sequential, ascending serial, halt on first
    /// failure.
    async fn run_ordered(
        &self,
        scripts: &[ScriptFile],
        sink: &Arc<dyn EventSink>,
        outcome: &mut RunOutcome,
    ) -> EngineResult<bool> {
        if scripts.is_empty() {
            return Ok(true);
        }

        let store = self.connector.connect().await?;
        for script in scripts {
            sink.on_event(ExecutionEvent::Applying {
                name: script.name.clone(),
            });
            match store.apply(script, Utc::now()).await {
                Ok(()) => {
                    debug!(name = %script.name, "applied ordered script");
                    sink.on_event(ExecutionEvent::Applied {
                        name: script.name.clone(),
                    });
                    outcome.applied_ordered.push(script.name.clone());
                }
                Err(err) => {
                    let reason = err.to_string();
                    warn!(name = %script.name, %reason, "ordered script failed, halting phase");
                    sink.on_event(ExecutionEvent::Failed {
                        name: script.name.clone(),
                        reason: reason.clone(),
                    });
                    outcome.failures.push(ScriptFailure {
                        name: script.name.clone(),
                        reason,
                    });
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Repeatable phase: one worker per contiguous group, each with its own
    /// store connection; groups run concurrently, sequential within.
    async fn run_repeatable(
        &self,
        scripts: Vec<ScriptFile>,
        sink: &Arc<dyn EventSink>,
        outcome: &mut RunOutcome,
    ) -> EngineResult<()> {
        if scripts.is_empty() {
            return Ok(());
        }

        let groups = partition(scripts, self.config.group_size);
        debug!(groups = groups.len(), "starting repeatable phase");

        let mut handles = Vec::with_capacity(groups.len());
        for group in groups {
            let connector = Arc::clone(&self.connector);
            let sink = Arc::clone(sink);
            handles.push(tokio::spawn(apply_group(connector, group, sink)));
        }

        // Wait for every group, success or not, before reporting.
        let mut join_error = None;
        for result in join_all(handles).await {
            match result {
                Ok(group_outcome) => {
                    outcome.applied_repeatable.extend(group_outcome.applied);
                    outcome.failures.extend(group_outcome.failure);
                }
                Err(err) => join_error = Some(err),
            }
        }

        if let Some(err) = join_error {
            return Err(EngineError::store(format!("worker task failed: {err}")));
        }
        Ok(())
    }
}

/// Result of one repeatable-phase worker.
#[derive(Debug, Default)]
struct GroupOutcome {
    applied: Vec<String>,
    failure: Option<ScriptFailure>,
}

async fn apply_group<C: StoreConnector + 'static>(
    connector: Arc<C>,
    group: Vec<ScriptFile>,
    sink: Arc<dyn EventSink>,
) -> GroupOutcome {
    let mut outcome = GroupOutcome::default();

    let store = match connector.connect().await {
        Ok(store) => store,
        Err(err) => {
            let name = group
                .first()
                .map(|s| s.name.clone())
                .unwrap_or_default();
            outcome.failure = Some(ScriptFailure {
                name,
                reason: format!("could not open store connection: {err}"),
            });
            return outcome;
        }
    };

    for script in group {
        sink.on_event(ExecutionEvent::Applying {
            name: script.name.clone(),
        });
        match store.apply(&script, Utc::now()).await {
            Ok(()) => {
                sink.on_event(ExecutionEvent::Applied {
                    name: script.name.clone(),
                });
                outcome.applied.push(script.name);
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(name = %script.name, %reason, "repeatable script failed, aborting group");
                sink.on_event(ExecutionEvent::Failed {
                    name: script.name.clone(),
                    reason: reason.clone(),
                });
                outcome.failure = Some(ScriptFailure {
                    name: script.name,
                    reason,
                });
                break;
            }
        }
    }

    outcome
}

/// Split items into contiguous groups of at most `size`, preserving order.
pub fn partition<T>(items: Vec<T>, size: usize) -> Vec<Vec<T>> {
    let size = size.max(1);
    let mut groups = Vec::with_capacity(items.len().div_ceil(size));
    let mut group = Vec::with_capacity(size);

    for item in items {
        group.push(item);
        if group.len() == size {
            groups.push(std::mem::replace(&mut group, Vec::with_capacity(size)));
        }
    }
    if !group.is_empty() {
        groups.push(group);
    }
    groups
}
