//! Core shared types and identifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use uuid::Uuid;

/// Global process ID singleton - set once at startup
static PROCESS_ID: OnceLock<ProcessId> = OnceLock::new();

/// Process identifier for any binary in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessId {
    /// CLI driver running a ranking end to end
    Orchestrator,
    /// HTTP API server
    WebServer,
}

impl ProcessId {
    /// Initialize the global process ID for the orchestrator CLI
    pub fn init_orchestrator() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::Orchestrator)
    }

    /// Initialize the global process ID for the webserver
    pub fn init_webserver() -> &'static ProcessId {
        PROCESS_ID.get_or_init(|| ProcessId::WebServer)
    }

    /// Get the global process ID, defaulting to the orchestrator when used as a library
    pub fn current() -> &'static ProcessId {
        PROCESS_ID.get_or_init(ProcessId::default)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessId::Orchestrator => write!(f, "orchestrator"),
            ProcessId::WebServer => write!(f, "webserver"),
        }
    }
}

impl Default for ProcessId {
    fn default() -> Self {
        ProcessId::Orchestrator
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for an ingested lead
    LeadId
);
uuid_id!(
    /// Unique identifier for a ranking run
    RunId
);
uuid_id!(
    /// Unique identifier for a single ranking result
    ResultId
);

/// Company bucket used when a lead carries no account name
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// A sales lead as ingested from the lead list
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub account_name: String,
    pub lead_first_name: String,
    pub lead_last_name: String,
    pub lead_job_title: String,
    pub account_domain: String,
    pub account_employee_range: String,
    pub account_industry: String,
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Company grouping key, `Unknown` when the account name is blank
    pub fn company(&self) -> &str {
        let name = self.account_name.trim();
        if name.is_empty() { UNKNOWN_COMPANY } else { name }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.lead_first_name, self.lead_last_name)
            .trim()
            .to_string()
    }
}

/// Ingestion shape of a lead; every column is optional
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewLead {
    pub account_name: String,
    pub lead_first_name: String,
    pub lead_last_name: String,
    pub lead_job_title: String,
    pub account_domain: String,
    pub account_employee_range: String,
    pub account_industry: String,
}

impl NewLead {
    pub fn into_lead(self, created_at: DateTime<Utc>) -> Lead {
        Lead {
            id: LeadId::new(),
            account_name: self.account_name.trim().to_string(),
            lead_first_name: self.lead_first_name.trim().to_string(),
            lead_last_name: self.lead_last_name.trim().to_string(),
            lead_job_title: self.lead_job_title.trim().to_string(),
            account_domain: self.account_domain.trim().to_string(),
            account_employee_range: self.account_employee_range.trim().to_string(),
            account_industry: self.account_industry.trim().to_string(),
            created_at,
        }
    }
}

/// Coarse company-size bucket derived from an employee range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeBand {
    Startup,
    Smb,
    MidMarket,
    Enterprise,
    Unknown,
}

impl SizeBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SizeBand::Startup => "startup",
            SizeBand::Smb => "smb",
            SizeBand::MidMarket => "mid-market",
            SizeBand::Enterprise => "enterprise",
            SizeBand::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SizeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fit grade for a lead's department or seniority
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    Excellent,
    Good,
    Moderate,
    Poor,
    Disqualified,
}

impl Fit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fit::Excellent => "excellent",
            Fit::Good => "good",
            Fit::Moderate => "moderate",
            Fit::Poor => "poor",
            Fit::Disqualified => "disqualified",
        }
    }
}

impl fmt::Display for Fit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The scorer's structured verdict on one lead
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgement {
    pub relevance_score: u8,
    pub is_relevant: bool,
    pub reasoning: String,
    pub department_fit: Fit,
    pub seniority_fit: Fit,
}

impl Judgement {
    /// Zero-relevance verdict recorded whenever scoring a lead fails
    pub fn fallback(reasoning: impl Into<String>) -> Self {
        Self {
            relevance_score: 0,
            is_relevant: false,
            reasoning: reasoning.into(),
            department_fit: Fit::Poor,
            seniority_fit: Fit::Poor,
        }
    }
}

/// A judgement bound to a lead and a run; `rank` is written only at finalization
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub id: ResultId,
    pub run_id: RunId,
    pub lead_id: LeadId,
    #[serde(flatten)]
    pub judgement: Judgement,
    pub rank: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl RankingResult {
    pub fn new(run_id: RunId, lead_id: LeadId, judgement: Judgement) -> Self {
        Self {
            id: ResultId::new(),
            run_id,
            lead_id,
            judgement,
            rank: None,
            created_at: Utc::now(),
        }
    }

    pub fn relevance_score(&self) -> u8 {
        self.judgement.relevance_score
    }

    pub fn is_relevant(&self) -> bool {
        self.judgement.is_relevant
    }
}

/// Lifecycle of a ranking run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Completed | RunStatus::Failed)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Pending => write!(f, "pending"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One end-to-end execution of the scoring pipeline over a fixed lead set
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingRun {
    pub id: RunId,
    pub status: RunStatus,
    pub total_leads: u64,
    pub processed_leads: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RankingRun {
    /// New run in the `running` state with no progress
    pub fn started(total_leads: u64) -> Self {
        Self {
            id: RunId::new(),
            status: RunStatus::Running,
            total_leads,
            processed_leads: 0,
            total_tokens: 0,
            total_cost: 0.0,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn remaining_leads(&self) -> u64 {
        self.total_leads.saturating_sub(self.processed_leads)
    }
}

/// Failure reasons reported by the external scoring service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum ApiFailure {
    #[error("authentication failed (invalid API key)")]
    AuthenticationFailed,

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("request quota exceeded")]
    QuotaExceeded,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("server error: {0}")]
    ServerError(String),

    #[error("request timed out")]
    Timeout,

    #[error("service temporarily unavailable")]
    ServiceUnavailable,

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl ApiFailure {
    /// Whether the failure signals that the request quota was hit
    pub fn is_rate_limit(&self) -> bool {
        match self {
            ApiFailure::RateLimitExceeded | ApiFailure::QuotaExceeded => true,
            ApiFailure::InvalidRequest(message)
            | ApiFailure::InvalidResponse(message)
            | ApiFailure::NetworkError(message)
            | ApiFailure::ServerError(message)
            | ApiFailure::Unknown(message) => {
                let lower = message.to_lowercase();
                lower.contains("rate limit") || lower.contains("rate_limit") || lower.contains("too many requests")
            }
            _ => false,
        }
    }
}
