//! Trait definitions with mockall annotations for testing
//!
//! The run controller depends on these seams only: the record store holding
//! leads, runs and results, and the batch scorer turning leads into judgements.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scorer::{BatchOutcome, BatchRunner, Pacer, ScoringClient};
use shared::{Lead, LeadId, NewLead, RankingResult, RankingRun, RunId};

use crate::error::OrchestratorResult;

/// A newly created run and the runs it displaced
#[derive(Debug, Clone)]
pub struct RunStart {
    pub run: RankingRun,
    /// Runs that were still `running` and have been marked `failed`
    pub swept: Vec<RunId>,
}

/// Persistence for leads, runs and results
///
/// Every mutating operation is atomic: on error nothing has changed.
#[mockall::automock]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Replace all leads, dropping every run and result
    async fn seed_leads(&self, leads: Vec<NewLead>) -> OrchestratorResult<usize>;

    /// All leads ordered by company name
    async fn list_leads(&self) -> OrchestratorResult<Vec<Lead>>;

    /// Leads for `ids` in request order; unknown ids are skipped
    async fn get_leads(&self, ids: &[LeadId]) -> OrchestratorResult<Vec<Lead>>;

    /// Fail every running run and insert a new running run, in one step
    async fn begin_run(&self, total_leads: u64) -> OrchestratorResult<RunStart>;

    async fn get_run(&self, run_id: RunId) -> OrchestratorResult<Option<RankingRun>>;

    /// All runs, newest first
    async fn list_runs(&self) -> OrchestratorResult<Vec<RankingRun>>;

    async fn latest_completed_run(&self) -> OrchestratorResult<Option<RankingRun>>;

    /// Leads that already have a result in `run_id`
    async fn scored_lead_ids(&self, run_id: RunId) -> OrchestratorResult<HashSet<LeadId>>;

    /// Results of `run_id` in insertion order
    async fn list_results(&self, run_id: RunId) -> OrchestratorResult<Vec<RankingResult>>;

    /// Append results and advance the run's counters
    async fn record_batch(
        &self,
        run_id: RunId,
        results: Vec<RankingResult>,
        tokens: u64,
    ) -> OrchestratorResult<RankingRun>;

    /// Rank every company's results, price the run's tokens and mark it
    /// completed, all within one write section
    async fn finalize_run(
        &self,
        run_id: RunId,
        cost_per_million_tokens: f64,
        completed_at: DateTime<Utc>,
    ) -> OrchestratorResult<RankingRun>;
}

/// Sequential scoring of a batch of leads
#[mockall::automock]
#[async_trait]
pub trait BatchScorer: Send + Sync {
    /// One judgement per lead, in input order
    async fn score_batch(&self, leads: Vec<Lead>) -> BatchOutcome;
}

#[async_trait]
impl<C, P> BatchScorer for BatchRunner<C, P>
where
    C: ScoringClient + 'static,
    P: Pacer + 'static,
{
    async fn score_batch(&self, leads: Vec<Lead>) -> BatchOutcome {
        self.run_batch(leads).await
    }
}
