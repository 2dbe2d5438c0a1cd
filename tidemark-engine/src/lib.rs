//! # tidemark-engine
//!
//! Reconciliation and application engine for Tidemark.
//!
//! This crate provides functionality for:
//! - Classifying SQL script files as ordered migrations or repeatable
//!   desired-state scripts
//! - Computing stable name and content fingerprints per script
//! - Diffing the script directory against the applied-state records
//! - Detecting edits to already-applied migrations as conflicts
//! - Two-phase application: strictly sequential ordered migrations, then
//!   partitioned concurrent repeatable scripts
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐     ┌────────────┐     ┌──────────────┐
//! │ Script Dir │────▶│   Loader   │────▶│   Planner    │
//! └────────────┘     └────────────┘     └──────────────┘
//!                                              │ reads
//!                                              ▼
//!                    ┌────────────┐     ┌──────────────┐
//!                    │  Executor  │◀────│ Applied      │
//!                    │ (2 phases) │────▶│ State Store  │
//!                    └────────────┘     └──────────────┘
//! ```
//!
//! The planner is a pure function from (script set, applied records) to a
//! [`Plan`]; the executor takes a plan and an event sink, so a confirmation
//! gate can sit between planning and execution.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tidemark_engine::{NullSink, Reconciler, ReconcilerConfig};
//!
//! async fn run(connector: impl tidemark_engine::StoreConnector + 'static)
//!     -> tidemark_engine::EngineResult<()>
//! {
//!     let config = ReconcilerConfig::new().scripts_dir("./scripts");
//!     let reconciler = Reconciler::new(config, connector);
//!
//!     reconciler.initialize().await?;
//!
//!     let plan = reconciler.plan().await?;
//!     println!("Plan: {}", plan.summary());
//!
//!     let outcome = reconciler.apply(plan, Arc::new(NullSink)).await?;
//!     println!("Run: {}", outcome.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Script classification
//!
//! Files named `<integer>_<description>.sql` are ordered migrations carrying
//! that serial; they run exactly once and must never change after they have
//! been applied. Every other file is a repeatable script, re-applied on each
//! run to converge the database toward its declared state.

pub mod error;
pub mod executor;
pub mod identity;
pub mod loader;
pub mod plan;
pub mod reconciler;
pub mod script;
pub mod store;

// Re-exports
pub use error::{EngineError, EngineResult};
pub use executor::{
    partition, EventSink, ExecutionEvent, Executor, ExecutorConfig, NullSink, RunOutcome,
    ScriptFailure, DEFAULT_GROUP_SIZE,
};
pub use identity::ScriptIdentity;
pub use loader::load_scripts;
pub use plan::{build_plan, Conflict, Plan};
pub use reconciler::{Reconciler, ReconcilerConfig};
pub use script::{classify, ScriptFile, ScriptKind};
pub use store::{AppliedRecord, AppliedStateStore, StoreConnector};
