//! Payloads returned to the caller driving a ranking run
//!
//! These are the success bodies of the four run operations (start, batch,
//! finalize, results) plus the CSV export, shared by the CLI driver and the
//! HTTP surface.

use serde::{Deserialize, Serialize};

use crate::errors::SharedResult;
use crate::types::{Lead, LeadId, NewLead, RankingResult, RankingRun, RunId};

/// A freshly created run and the ordered lead ids the caller should batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartedRun {
    pub run_id: RunId,
    pub lead_ids: Vec<LeadId>,
    pub total: usize,
}

/// Outcome of one processed batch
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchSummary {
    /// Leads scored and persisted by this batch
    pub processed: usize,
    /// Requested ids not scored: repeats, unknown ids, or leads already scored in this run
    pub skipped: usize,
    pub batch_tokens: u64,
    pub total_processed: u64,
    pub total_tokens: u64,
}

/// Outcome of finalizing a run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinalizeSummary {
    pub total_results: usize,
    pub relevant_count: usize,
    pub total_tokens: u64,
    pub total_cost: f64,
}

/// A result joined with its lead
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedLead {
    #[serde(flatten)]
    pub result: RankingResult,
    pub lead: Option<Lead>,
}

/// All results of one company, ranked entries first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRanking {
    pub company: String,
    pub relevant_count: usize,
    pub results: Vec<RankedLead>,
}

/// Grouped results of a run; `run` is `None` when no completed run exists yet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunResults {
    pub run: Option<RankingRun>,
    pub companies: Vec<CompanyRanking>,
}

impl RunResults {
    pub fn total_results(&self) -> usize {
        self.companies.iter().map(|c| c.results.len()).sum()
    }
}

/// Rendered CSV export
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

/// Parse a JSON array of lead records
pub fn parse_leads(json: &str) -> SharedResult<Vec<NewLead>> {
    Ok(serde_json::from_str(json)?)
}
