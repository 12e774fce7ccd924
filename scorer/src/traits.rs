//! Scorer trait definitions for dependency injection

use std::time::Duration;

use async_trait::async_trait;
use shared::ApiFailure;

use crate::types::{ChatPrompt, ProviderResponse};

/// External scoring service: one prompt in, free text plus token usage out
#[mockall::automock]
#[async_trait]
pub trait ScoringClient: Send + Sync {
    /// Send a chat prompt and return the raw completion
    async fn complete(&self, prompt: &ChatPrompt) -> Result<ProviderResponse, ApiFailure>;
}

/// Suspension between scoring calls
#[mockall::automock]
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspend the caller for `duration`
    async fn pause(&self, duration: Duration);
}
