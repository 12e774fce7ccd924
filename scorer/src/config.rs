//! Scorer configuration
//!
//! Loaded from the environment (and a `.env` file when present):
//! - `GROQ_API_KEY` (required)
//! - `GROQ_MODEL`, `GROQ_BASE_URL`
//! - `SCORER_TEMPERATURE`, `SCORER_MAX_TOKENS`, `SCORER_TIMEOUT_MS`
//! - `SCORER_CALL_DELAY_MS`, `SCORER_RATE_LIMIT_DELAY_MS`

use std::time::Duration;

use shared::config::{self, parse_var, required_var, var_or};

use crate::core::PacingPolicy;
use crate::error::{ScorerError, ScorerResult};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub pacing: PacingPolicy,
}

impl ScorerConfig {
    /// Config with defaults for everything but the key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            pacing: PacingPolicy::default(),
        }
    }

    /// Load from the process environment
    pub fn from_env() -> ScorerResult<Self> {
        config::load_env_file();
        Self::from_lookup(config::process_env)
    }

    /// Load through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> ScorerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PacingPolicy::default();
        let api_key = required_var(&lookup, "GROQ_API_KEY")?;

        let temperature: f32 = parse_var(&lookup, "SCORER_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        if !(0.0..=2.0).contains(&temperature) {
            return Err(ScorerError::config(format!(
                "SCORER_TEMPERATURE must be between 0 and 2, got {temperature}"
            )));
        }

        let max_tokens: u32 = parse_var(&lookup, "SCORER_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(ScorerError::config("SCORER_MAX_TOKENS must be positive"));
        }

        let timeout_ms: u64 = parse_var(&lookup, "SCORER_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
        let call_delay_ms: u64 = parse_var(
            &lookup,
            "SCORER_CALL_DELAY_MS",
            defaults.call_delay.as_millis() as u64,
        )?;
        let rate_limit_delay_ms: u64 = parse_var(
            &lookup,
            "SCORER_RATE_LIMIT_DELAY_MS",
            defaults.rate_limit_delay.as_millis() as u64,
        )?;

        Ok(Self {
            api_key,
            base_url: var_or(&lookup, "GROQ_BASE_URL", DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: var_or(&lookup, "GROQ_MODEL", DEFAULT_MODEL),
            temperature,
            max_tokens,
            request_timeout: Duration::from_millis(timeout_ms),
            pacing: PacingPolicy {
                call_delay: Duration::from_millis(call_delay_ms),
                rate_limit_delay: Duration::from_millis(rate_limit_delay_ms),
            },
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_pacing(mut self, pacing: PacingPolicy) -> Self {
        self.pacing = pacing;
        self
    }
}
