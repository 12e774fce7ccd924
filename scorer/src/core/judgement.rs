//! Strict parsing of the scoring service's free-text reply

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use shared::{Fit, Judgement};
use thiserror::Error;

/// Characters of the raw reply quoted in a parse-failure fallback
const RAW_PREVIEW_CHARS: usize = 100;

/// Reasons a reply is rejected
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JudgementError {
    #[error("reply is empty")]
    Empty,

    #[error("reply is not a valid judgement: {0}")]
    Malformed(String),

    #[error("relevance_score {0} is outside 0..=100")]
    ScoreOutOfRange(u64),
}

/// Wire shape; every field is required and nothing else is accepted
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawJudgement {
    relevance_score: u64,
    is_relevant: bool,
    reasoning: String,
    department_fit: Fit,
    seniority_fit: Fit,
}

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json)?").expect("fence pattern is valid"))
}

/// Remove markdown code fences and surrounding whitespace
pub fn strip_fences(raw: &str) -> String {
    fence_regex().replace_all(raw, "").trim().to_string()
}

/// Parse a reply into a judgement, rejecting anything off-schema
pub fn parse_judgement(raw: &str) -> Result<Judgement, JudgementError> {
    let cleaned = strip_fences(raw);
    if cleaned.is_empty() {
        return Err(JudgementError::Empty);
    }

    let parsed: RawJudgement =
        serde_json::from_str(&cleaned).map_err(|e| JudgementError::Malformed(e.to_string()))?;

    if parsed.relevance_score > 100 {
        return Err(JudgementError::ScoreOutOfRange(parsed.relevance_score));
    }

    Ok(Judgement {
        relevance_score: parsed.relevance_score as u8,
        is_relevant: parsed.is_relevant,
        reasoning: parsed.reasoning,
        department_fit: parsed.department_fit,
        seniority_fit: parsed.seniority_fit,
    })
}

/// Fallback for a reply that arrived but did not validate
pub fn unparseable_reply(raw: &str) -> Judgement {
    let preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
    Judgement::fallback(format!("Failed to parse AI response: {preview}"))
}

/// Fallback for a call that never produced a reply
pub fn failed_call(error: &dyn std::fmt::Display) -> Judgement {
    Judgement::fallback(format!("Ranking failed: {error}"))
}
