//! Record store backed by memory with an optional JSON snapshot
//!
//! Each mutation is applied to a copy of the state, written to `<path>.tmp`,
//! renamed over the snapshot, and only then published in memory.

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{
    Lead, LeadId, NewLead, ProcessId, RankingResult, RankingRun, ResultId, RunId, RunStatus,
    UNKNOWN_COMPANY, process_debug,
};
use tokio::fs;
use tokio::sync::RwLock;

use crate::core::rank_companies;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{RecordStore, RunStart};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    leads: Vec<Lead>,
    /// Creation order
    runs: Vec<RankingRun>,
    /// Insertion order
    results: Vec<RankingResult>,
}

impl StoreState {
    fn run_index(&self, run_id: RunId) -> OrchestratorResult<usize> {
        self.runs
            .iter()
            .position(|run| run.id == run_id)
            .ok_or(OrchestratorError::RunNotFound { run_id })
    }

    fn running_index(&self, run_id: RunId) -> OrchestratorResult<usize> {
        let index = self.run_index(run_id)?;
        let status = self.runs[index].status;
        if status != RunStatus::Running {
            return Err(OrchestratorError::RunNotActive { run_id, status });
        }
        Ok(index)
    }
}

/// Real record store implementation
pub struct RealRecordStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl RealRecordStore {
    /// Store that lives only as long as the process
    pub fn in_memory() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            snapshot_path: None,
        }
    }

    /// Store persisted to `path`, loading the existing snapshot if there is one
    pub async fn with_snapshot(path: impl Into<PathBuf>) -> OrchestratorResult<Self> {
        let path = path.into();
        let state = match fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => return Err(e.into()),
        };

        process_debug!(
            ProcessId::current(),
            "📁 Opened record store at {} ({} leads, {} runs)",
            path.display(),
            state.leads.len(),
            state.runs.len()
        );

        Ok(Self {
            state: RwLock::new(state),
            snapshot_path: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Apply `mutation` to a copy of the state, persist it, then publish it
    async fn mutate<T, F>(&self, mutation: F) -> OrchestratorResult<T>
    where
        F: FnOnce(&mut StoreState) -> OrchestratorResult<T>,
    {
        let mut state = self.state.write().await;
        let mut next = state.clone();
        let value = mutation(&mut next)?;
        self.persist(&next).await?;
        *state = next;
        Ok(value)
    }

    async fn persist(&self, state: &StoreState) -> OrchestratorResult<()> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let tmp = tmp_path(path);
        fs::write(&tmp, serde_json::to_vec_pretty(state)?).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[async_trait]
impl RecordStore for RealRecordStore {
    async fn seed_leads(&self, leads: Vec<NewLead>) -> OrchestratorResult<usize> {
        let created_at = Utc::now();
        self.mutate(move |state| {
            state.leads = leads.into_iter().map(|lead| lead.into_lead(created_at)).collect();
            state.runs.clear();
            state.results.clear();
            Ok(state.leads.len())
        })
        .await
    }

    async fn list_leads(&self) -> OrchestratorResult<Vec<Lead>> {
        let state = self.state.read().await;
        let mut leads = state.leads.clone();
        leads.sort_by(|a, b| a.account_name.cmp(&b.account_name));
        Ok(leads)
    }

    async fn get_leads(&self, ids: &[LeadId]) -> OrchestratorResult<Vec<Lead>> {
        let state = self.state.read().await;
        let by_id: HashMap<LeadId, &Lead> = state.leads.iter().map(|lead| (lead.id, lead)).collect();
        Ok(ids.iter().filter_map(|id| by_id.get(id).map(|lead| (*lead).clone())).collect())
    }

    async fn begin_run(&self, total_leads: u64) -> OrchestratorResult<RunStart> {
        self.mutate(move |state| {
            let mut swept = Vec::new();
            for run in state.runs.iter_mut().filter(|run| run.status == RunStatus::Running) {
                run.status = RunStatus::Failed;
                swept.push(run.id);
            }

            let run = RankingRun::started(total_leads);
            state.runs.push(run.clone());
            Ok(RunStart { run, swept })
        })
        .await
    }

    async fn get_run(&self, run_id: RunId) -> OrchestratorResult<Option<RankingRun>> {
        let state = self.state.read().await;
        Ok(state.runs.iter().find(|run| run.id == run_id).cloned())
    }

    async fn list_runs(&self) -> OrchestratorResult<Vec<RankingRun>> {
        let state = self.state.read().await;
        Ok(state.runs.iter().rev().cloned().collect())
    }

    async fn latest_completed_run(&self) -> OrchestratorResult<Option<RankingRun>> {
        let state = self.state.read().await;
        Ok(state
            .runs
            .iter()
            .rev()
            .find(|run| run.status == RunStatus::Completed)
            .cloned())
    }

    async fn scored_lead_ids(&self, run_id: RunId) -> OrchestratorResult<HashSet<LeadId>> {
        let state = self.state.read().await;
        Ok(state
            .results
            .iter()
            .filter(|result| result.run_id == run_id)
            .map(|result| result.lead_id)
            .collect())
    }

    async fn list_results(&self, run_id: RunId) -> OrchestratorResult<Vec<RankingResult>> {
        let state = self.state.read().await;
        Ok(state
            .results
            .iter()
            .filter(|result| result.run_id == run_id)
            .cloned()
            .collect())
    }

    async fn record_batch(
        &self,
        run_id: RunId,
        results: Vec<RankingResult>,
        tokens: u64,
    ) -> OrchestratorResult<RankingRun> {
        self.mutate(move |state| {
            let index = state.running_index(run_id)?;

            let mut scored: HashSet<LeadId> = state
                .results
                .iter()
                .filter(|result| result.run_id == run_id)
                .map(|result| result.lead_id)
                .collect();
            for result in &results {
                if result.run_id != run_id {
                    return Err(OrchestratorError::invalid_input(format!(
                        "result {} belongs to run {}",
                        result.id, result.run_id
                    )));
                }
                if !scored.insert(result.lead_id) {
                    return Err(OrchestratorError::DuplicateResult {
                        run_id,
                        lead_id: result.lead_id,
                    });
                }
            }

            let count = results.len() as u64;
            state.results.extend(results);

            let run = &mut state.runs[index];
            run.processed_leads = (run.processed_leads + count).min(run.total_leads);
            run.total_tokens += tokens;
            Ok(run.clone())
        })
        .await
    }

    async fn finalize_run(
        &self,
        run_id: RunId,
        cost_per_million_tokens: f64,
        completed_at: DateTime<Utc>,
    ) -> OrchestratorResult<RankingRun> {
        self.mutate(move |state| {
            let index = state.running_index(run_id)?;

            let companies: HashMap<LeadId, String> = state
                .leads
                .iter()
                .map(|lead| (lead.id, lead.company().to_string()))
                .collect();
            let run_results: Vec<RankingResult> = state
                .results
                .iter()
                .filter(|result| result.run_id == run_id)
                .cloned()
                .collect();
            let ranks: HashMap<ResultId, Option<u32>> = rank_companies(&run_results, |result| {
                companies
                    .get(&result.lead_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_COMPANY.to_string())
            })
            .into_iter()
            .map(|assignment| (assignment.result_id, assignment.rank))
            .collect();

            for result in state.results.iter_mut().filter(|result| result.run_id == run_id) {
                result.rank = ranks.get(&result.id).copied().flatten();
            }

            let run = &mut state.runs[index];
            run.status = RunStatus::Completed;
            run.total_cost = run.total_tokens as f64 * cost_per_million_tokens / 1_000_000.0;
            run.completed_at = Some(completed_at);
            Ok(run.clone())
        })
        .await
    }
}
