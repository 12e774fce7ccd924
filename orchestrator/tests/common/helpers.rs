//! Test helper functions and builders

use std::sync::Arc;

use orchestrator::{ControllerConfig, RealRecordStore, RunController};
use orchestrator::traits::MockBatchScorer;
use scorer::{BatchOutcome, ScoredLead};
use shared::Lead;

use super::fixtures::TestFixtures;

pub type TestController = RunController<RealRecordStore, MockBatchScorer>;

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Batch outcome the scripted scorer returns for `leads`
    pub fn scripted_outcome(leads: Vec<Lead>) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for lead in leads {
            let judgement = TestFixtures::judgement_for(&lead.lead_job_title);
            outcome.total_tokens += TestFixtures::TOKENS_PER_LEAD;
            outcome.results.push(ScoredLead {
                lead,
                judgement,
                tokens_used: TestFixtures::TOKENS_PER_LEAD as u32,
            });
        }
        outcome
    }

    /// Batch scorer answering every call with scripted judgements
    pub fn scripted_scorer() -> MockBatchScorer {
        let mut scorer = MockBatchScorer::new();
        scorer
            .expect_score_batch()
            .returning(|leads: Vec<Lead>| Self::scripted_outcome(leads));
        scorer
    }

    pub fn controller(scorer: MockBatchScorer, config: ControllerConfig) -> TestController {
        RunController::new(Arc::new(RealRecordStore::in_memory()), Arc::new(scorer), config)
    }

    /// Controller over an in-memory store seeded with the sample leads
    pub async fn seeded_controller() -> TestController {
        let controller = Self::controller(Self::scripted_scorer(), ControllerConfig::default());
        controller
            .seed_leads(TestFixtures::sample_leads())
            .await
            .expect("seeding sample leads");
        controller
    }
}
