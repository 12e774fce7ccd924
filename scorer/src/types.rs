//! Scorer-specific data types

use std::time::Duration;

use shared::{ApiFailure, Judgement, Lead};

/// A two-message chat request sent to the scoring service
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Provider response data
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub content: String,
    pub tokens_used: u32,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub model_used: String,
    pub response_time: Duration,
}

/// Result of scoring a single lead; always carries a judgement
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    pub judgement: Judgement,
    pub tokens_used: u32,
    /// Set when the call itself failed and the judgement is a fallback
    pub failure: Option<ApiFailure>,
    /// Set when the call succeeded but the response did not validate
    pub parse_error: Option<String>,
}

impl ScoreOutcome {
    pub fn is_fallback(&self) -> bool {
        self.failure.is_some() || self.parse_error.is_some()
    }

    pub fn is_rate_limited(&self) -> bool {
        self.failure.as_ref().is_some_and(ApiFailure::is_rate_limit)
    }
}

/// A lead paired with its judgement
#[derive(Debug, Clone)]
pub struct ScoredLead {
    pub lead: Lead,
    pub judgement: Judgement,
    pub tokens_used: u32,
}

/// Accumulated output of one batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub results: Vec<ScoredLead>,
    pub total_tokens: u64,
    pub fallback_count: usize,
    pub rate_limited_count: usize,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
