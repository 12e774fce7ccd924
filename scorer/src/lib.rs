//! Lead scoring library for the ranking system
//!
//! This library scores sales leads against a fixed persona rubric through an
//! external language model, recovering every failure into a zero-relevance
//! judgement and pacing sequential calls to stay under the provider's quota.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use config::ScorerConfig;
pub use core::{BatchRunner, LeadScorer, PacingPolicy, PromptHandler, classify_company_size};
pub use error::{ScorerError, ScorerResult};
pub use traits::*;
pub use types::*;
pub use services::{RealScoringClient, TokioPacer};
