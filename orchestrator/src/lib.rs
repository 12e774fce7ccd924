//! Orchestrator library for sales-lead ranking runs
//!
//! This library drives a ranking run end to end: it opens a run over the
//! ingested leads, feeds caller-chosen batches through the scorer, records
//! the judgements, and finalizes the run by ranking each company's relevant
//! leads.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use core::{
    CompletedRun, ControllerConfig, RankAssignment, RunController, assign_ranks, rank_companies,
};
pub use error::{OrchestratorError, OrchestratorResult};
pub use services::RealRecordStore;
pub use traits::{BatchScorer, RecordStore, RunStart};
