//! WebServer-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use orchestrator::OrchestratorError;
use serde_json::json;
use shared::{ProcessId, SharedError, process_error};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebServerError {
    #[error("{details}")]
    InvalidRequest { details: String },

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("Server startup error: {0}")]
    ServerStartup(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Scorer error: {0}")]
    ScorerError(#[from] scorer::ScorerError),

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl WebServerError {
    pub fn invalid_request(details: impl Into<String>) -> Self {
        WebServerError::InvalidRequest { details: details.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        WebServerError::ConfigError(message.into())
    }

    /// HTTP status reported for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebServerError::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            WebServerError::Orchestrator(err) => match err {
                OrchestratorError::InvalidInput { .. } | OrchestratorError::NoLeads => {
                    StatusCode::BAD_REQUEST
                }
                OrchestratorError::RunNotFound { .. } | OrchestratorError::NoCompletedRun => {
                    StatusCode::NOT_FOUND
                }
                OrchestratorError::RunNotActive { .. } | OrchestratorError::DuplicateResult { .. } => {
                    StatusCode::CONFLICT
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            process_error!(ProcessId::current(), "❌ Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type WebServerResult<T> = Result<T, WebServerError>;
