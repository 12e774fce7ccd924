//! Orchestrator-specific error types

use shared::{LeadId, RunId, RunStatus, SharedError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("No leads found. Seed leads before ranking.")]
    NoLeads,

    #[error("Ranking run not found: {run_id}")]
    RunNotFound { run_id: RunId },

    #[error("No completed ranking runs found")]
    NoCompletedRun,

    #[error("Ranking run {run_id} is {status}, not running")]
    RunNotActive { run_id: RunId, status: RunStatus },

    #[error("Lead {lead_id} already has a result in run {run_id}")]
    DuplicateResult { run_id: RunId, lead_id: LeadId },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("Scorer error: {0}")]
    ScorerError(#[from] scorer::ScorerError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl OrchestratorError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        OrchestratorError::InvalidInput { message: message.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        OrchestratorError::StorageError { message: message.into() }
    }

    pub fn config(field: impl Into<String>) -> Self {
        OrchestratorError::ConfigurationError { field: field.into() }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
