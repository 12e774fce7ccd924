//! Sequential, paced scoring of a batch of leads

use std::sync::Arc;
use std::time::Duration;

use shared::{Lead, ProcessId, process_info};

use crate::core::scorer::LeadScorer;
use crate::traits::{Pacer, ScoringClient};
use crate::types::{BatchOutcome, ScoredLead};

/// Pauses inserted after each scoring call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingPolicy {
    pub call_delay: Duration,
    /// Used instead of `call_delay` after a rate-limited call
    pub rate_limit_delay: Duration,
}

impl Default for PacingPolicy {
    fn default() -> Self {
        Self {
            call_delay: Duration::from_millis(2000),
            rate_limit_delay: Duration::from_millis(5000),
        }
    }
}

/// Scores leads one after another, pausing between calls
pub struct BatchRunner<C: ScoringClient, P: Pacer> {
    scorer: LeadScorer<C>,
    pacer: Arc<P>,
    policy: PacingPolicy,
}

impl<C: ScoringClient, P: Pacer> BatchRunner<C, P> {
    pub fn new(scorer: LeadScorer<C>, pacer: Arc<P>, policy: PacingPolicy) -> Self {
        Self { scorer, pacer, policy }
    }

    pub fn policy(&self) -> PacingPolicy {
        self.policy
    }

    /// Score every lead in input order; one result per lead, no errors
    pub async fn run_batch(&self, leads: Vec<Lead>) -> BatchOutcome {
        let process_id = ProcessId::current();
        let mut outcome = BatchOutcome::default();

        for lead in leads {
            let scored = self.scorer.score(&lead).await;
            let rate_limited = scored.is_rate_limited();

            outcome.total_tokens += u64::from(scored.tokens_used);
            if scored.is_fallback() {
                outcome.fallback_count += 1;
            }
            if rate_limited {
                outcome.rate_limited_count += 1;
            }
            outcome.results.push(ScoredLead {
                lead,
                judgement: scored.judgement,
                tokens_used: scored.tokens_used,
            });

            let pause = if rate_limited {
                self.policy.rate_limit_delay
            } else {
                self.policy.call_delay
            };
            self.pacer.pause(pause).await;
        }

        process_info!(
            process_id,
            "📊 Batch scored: {} leads, {} tokens, {} fallbacks, {} rate limited",
            outcome.len(),
            outcome.total_tokens,
            outcome.fallback_count,
            outcome.rate_limited_count
        );

        outcome
    }
}
