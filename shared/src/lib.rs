//! Shared types for the lead ranking system
//!
//! Contains the domain records that cross crate boundaries (leads, judgements,
//! runs and results), the payloads returned to driving callers, and the
//! process-aware logging setup used by every binary.

pub mod types;
pub mod errors;
pub mod logging;
pub mod messages;
pub mod config;

pub use types::*;
pub use errors::*;

pub use messages::{
    BatchSummary, CompanyRanking, CsvExport, FinalizeSummary, RankedLead, RunResults, StartedRun,
};
