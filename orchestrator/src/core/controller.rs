//! Run controller: the start / batch / finalize / results lifecycle

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use shared::{
    BatchSummary, CompanyRanking, CsvExport, FinalizeSummary, Lead, LeadId, NewLead, ProcessId,
    RankedLead, RankingResult, RankingRun, RunId, RunResults, RunStatus, StartedRun,
    UNKNOWN_COMPANY, logging, process_debug, process_info, process_warn,
};

use crate::core::export::render_csv;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{BatchScorer, RecordStore, RunStart};

/// Controller tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Price applied to a run's total tokens at finalization
    pub cost_per_million_tokens: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self { cost_per_million_tokens: 0.0 }
    }
}

/// A run driven to completion by [`RunController::run_all`]
#[derive(Debug, Clone)]
pub struct CompletedRun {
    pub run_id: RunId,
    pub batches: usize,
    pub summary: FinalizeSummary,
}

/// Drives ranking runs over the record store and batch scorer
pub struct RunController<S: RecordStore, B: BatchScorer> {
    store: Arc<S>,
    scorer: Arc<B>,
    config: ControllerConfig,
}

impl<S: RecordStore, B: BatchScorer> RunController<S, B> {
    pub fn new(store: Arc<S>, scorer: Arc<B>, config: ControllerConfig) -> Self {
        Self { store, scorer, config }
    }

    pub fn config(&self) -> ControllerConfig {
        self.config
    }

    /// Replace the lead set; existing runs and results are dropped
    pub async fn seed_leads(&self, leads: Vec<NewLead>) -> OrchestratorResult<usize> {
        if leads.is_empty() {
            return Err(OrchestratorError::invalid_input("leads array is required"));
        }

        let count = self.store.seed_leads(leads).await?;
        process_info!(ProcessId::current(), "🌱 Seeded {} leads", count);
        Ok(count)
    }

    pub async fn list_leads(&self) -> OrchestratorResult<Vec<Lead>> {
        self.store.list_leads().await
    }

    /// Open a new run over every lead, failing any run still marked running
    pub async fn start(&self) -> OrchestratorResult<StartedRun> {
        let process_id = ProcessId::current();
        let leads = self.store.list_leads().await?;
        if leads.is_empty() {
            return Err(OrchestratorError::NoLeads);
        }

        let RunStart { run, swept } = self.store.begin_run(leads.len() as u64).await?;
        for stale in &swept {
            process_warn!(process_id, run_id = %stale, "⚠️ Marked stale running run as failed");
        }

        let lead_ids: Vec<LeadId> = leads.iter().map(|lead| lead.id).collect();
        process_info!(process_id, run_id = %run.id, "🚀 Started ranking run over {} leads", lead_ids.len());

        Ok(StartedRun {
            run_id: run.id,
            total: lead_ids.len(),
            lead_ids,
        })
    }

    /// Score a caller-chosen batch of the run's leads and record the results.
    ///
    /// Repeated ids and leads already scored in this run are skipped, so
    /// resubmitting a batch never produces duplicate results.
    pub async fn process_batch(
        &self,
        run_id: RunId,
        lead_ids: &[LeadId],
    ) -> OrchestratorResult<BatchSummary> {
        let process_id = ProcessId::current();
        if lead_ids.is_empty() {
            return Err(OrchestratorError::invalid_input("run_id and lead_ids are required"));
        }

        let run = self.active_run(run_id).await?;
        let leads = self.store.get_leads(lead_ids).await?;
        if leads.is_empty() {
            return Err(OrchestratorError::NoLeads);
        }

        let already_scored = self.store.scored_lead_ids(run_id).await?;
        let mut seen = HashSet::with_capacity(leads.len());
        let pending: Vec<Lead> = leads
            .into_iter()
            .filter(|lead| !already_scored.contains(&lead.id) && seen.insert(lead.id))
            .collect();
        let skipped = lead_ids.len() - pending.len();

        if pending.is_empty() {
            process_debug!(process_id, run_id = %run_id, "Batch of {} leads already scored", lead_ids.len());
            return Ok(BatchSummary {
                processed: 0,
                skipped,
                batch_tokens: 0,
                total_processed: run.processed_leads,
                total_tokens: run.total_tokens,
            });
        }

        if run.processed_leads + pending.len() as u64 > run.total_leads {
            return Err(OrchestratorError::invalid_input(format!(
                "batch of {} leads exceeds the run's remaining {} leads",
                pending.len(),
                run.remaining_leads()
            )));
        }

        let outcome = self.scorer.score_batch(pending).await;
        let processed = outcome.len();
        let batch_tokens = outcome.total_tokens;
        let results: Vec<RankingResult> = outcome
            .results
            .into_iter()
            .map(|scored| RankingResult::new(run_id, scored.lead.id, scored.judgement))
            .collect();

        let run = self.store.record_batch(run_id, results, batch_tokens).await?;

        logging::log_progress(
            process_id,
            "Batch recorded",
            &format!(
                "{} scored, {} skipped, {} fallbacks, {}/{} leads, {} tokens",
                processed,
                skipped,
                outcome.fallback_count,
                run.processed_leads,
                run.total_leads,
                run.total_tokens
            ),
        );

        Ok(BatchSummary {
            processed,
            skipped,
            batch_tokens,
            total_processed: run.processed_leads,
            total_tokens: run.total_tokens,
        })
    }

    /// Rank every company's results and mark the run completed.
    ///
    /// Ranking and pricing happen inside the store's write section, so a batch
    /// recorded concurrently is either ranked with the rest or rejected.
    pub async fn finalize(&self, run_id: RunId) -> OrchestratorResult<FinalizeSummary> {
        let run = self
            .store
            .finalize_run(run_id, self.config.cost_per_million_tokens, Utc::now())
            .await?;
        let results = self.store.list_results(run_id).await?;
        let relevant_count = results.iter().filter(|r| r.is_relevant()).count();

        logging::log_success(
            ProcessId::current(),
            &format!(
                "Run {} completed: {} results, {} relevant, {} tokens",
                run.id,
                results.len(),
                relevant_count,
                run.total_tokens
            ),
        );

        Ok(FinalizeSummary {
            total_results: results.len(),
            relevant_count,
            total_tokens: run.total_tokens,
            total_cost: run.total_cost,
        })
    }

    /// Results of `run_id`, or of the latest completed run, grouped by company
    pub async fn get_results(&self, run_id: Option<RunId>) -> OrchestratorResult<RunResults> {
        let run = match run_id {
            Some(run_id) => self
                .store
                .get_run(run_id)
                .await?
                .ok_or(OrchestratorError::RunNotFound { run_id })?,
            None => match self.store.latest_completed_run().await? {
                Some(run) => run,
                None => return Ok(RunResults::default()),
            },
        };

        let results = self.store.list_results(run.id).await?;
        let lead_ids: Vec<LeadId> = results.iter().map(|r| r.lead_id).collect();
        let leads: HashMap<LeadId, Lead> = self
            .store
            .get_leads(&lead_ids)
            .await?
            .into_iter()
            .map(|lead| (lead.id, lead))
            .collect();

        let mut groups: BTreeMap<String, Vec<RankedLead>> = BTreeMap::new();
        for result in results {
            let lead = leads.get(&result.lead_id).cloned();
            let company = lead
                .as_ref()
                .map(|l| l.company().to_string())
                .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
            groups.entry(company).or_default().push(RankedLead { result, lead });
        }

        let companies = groups
            .into_iter()
            .map(|(company, mut results)| {
                results.sort_by(|a, b| display_order(&a.result, &b.result));
                CompanyRanking {
                    relevant_count: results.iter().filter(|r| r.result.is_relevant()).count(),
                    company,
                    results,
                }
            })
            .collect();

        Ok(RunResults { run: Some(run), companies })
    }

    /// Every run, newest first
    pub async fn list_runs(&self) -> OrchestratorResult<Vec<RankingRun>> {
        self.store.list_runs().await
    }

    /// CSV of the top `top_n` relevant leads per company
    pub async fn export_csv(
        &self,
        run_id: Option<RunId>,
        top_n: usize,
    ) -> OrchestratorResult<CsvExport> {
        if top_n == 0 {
            return Err(OrchestratorError::invalid_input("top_n must be at least 1"));
        }

        let results = self.get_results(run_id).await?;
        if results.run.is_none() {
            return Err(OrchestratorError::NoCompletedRun);
        }

        Ok(render_csv(&results, top_n))
    }

    /// Start a run, score every lead in batches of `batch_size`, then finalize
    pub async fn run_all(&self, batch_size: usize) -> OrchestratorResult<CompletedRun> {
        if batch_size == 0 {
            return Err(OrchestratorError::invalid_input("batch size must be at least 1"));
        }

        let started = self.start().await?;
        let batches = started.lead_ids.chunks(batch_size).len();

        for (index, chunk) in started.lead_ids.chunks(batch_size).enumerate() {
            let summary = self.process_batch(started.run_id, chunk).await?;
            process_debug!(
                ProcessId::current(),
                run_id = %started.run_id,
                "Batch {}/{}: {} processed ({} total)",
                index + 1,
                batches,
                summary.processed,
                summary.total_processed
            );
        }

        let summary = self.finalize(started.run_id).await?;
        Ok(CompletedRun {
            run_id: started.run_id,
            batches,
            summary,
        })
    }

    /// The run, provided it exists and is still running
    async fn active_run(&self, run_id: RunId) -> OrchestratorResult<RankingRun> {
        let run = self
            .store
            .get_run(run_id)
            .await?
            .ok_or(OrchestratorError::RunNotFound { run_id })?;

        if run.status != RunStatus::Running {
            return Err(OrchestratorError::RunNotActive {
                run_id,
                status: run.status,
            });
        }
        Ok(run)
    }
}

/// Ranked entries by rank, then unranked entries by descending score
fn display_order(a: &RankingResult, b: &RankingResult) -> Ordering {
    match (a.rank, b.rank) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.relevance_score().cmp(&a.relevance_score()),
    }
}
