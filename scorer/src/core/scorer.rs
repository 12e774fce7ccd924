//! Single-lead scoring with failure recovery

use std::sync::Arc;

use shared::{Lead, ProcessId, process_debug, process_warn};

use crate::core::judgement::{failed_call, parse_judgement, unparseable_reply};
use crate::core::prompt::PromptHandler;
use crate::traits::ScoringClient;
use crate::types::ScoreOutcome;

/// Scores one lead at a time; never returns an error
pub struct LeadScorer<C: ScoringClient> {
    client: Arc<C>,
    prompts: PromptHandler,
}

impl<C: ScoringClient> LeadScorer<C> {
    pub fn new(client: Arc<C>, prompts: PromptHandler) -> Self {
        Self { client, prompts }
    }

    /// Score `lead`, recovering call and parse failures into a fallback judgement
    pub async fn score(&self, lead: &Lead) -> ScoreOutcome {
        let process_id = ProcessId::current();
        let prompt = self.prompts.build_prompt(lead);

        let response = match self.client.complete(&prompt).await {
            Ok(response) => response,
            Err(failure) => {
                process_warn!(process_id, lead_id = %lead.id, "⚠️ Scoring call failed: {}", failure);
                return ScoreOutcome {
                    judgement: failed_call(&failure),
                    tokens_used: 0,
                    failure: Some(failure),
                    parse_error: None,
                };
            }
        };

        match parse_judgement(&response.content) {
            Ok(judgement) => {
                process_debug!(
                    process_id,
                    lead_id = %lead.id,
                    "Scored {} at {} ({} tokens, {:?})",
                    lead.full_name(),
                    judgement.relevance_score,
                    response.tokens_used,
                    response.response_time
                );
                ScoreOutcome {
                    judgement,
                    tokens_used: response.tokens_used,
                    failure: None,
                    parse_error: None,
                }
            }
            Err(error) => {
                process_warn!(process_id, lead_id = %lead.id, "⚠️ Rejected scoring reply: {}", error);
                ScoreOutcome {
                    judgement: unparseable_reply(&response.content),
                    tokens_used: response.tokens_used,
                    failure: None,
                    parse_error: Some(error.to_string()),
                }
            }
        }
    }
}
