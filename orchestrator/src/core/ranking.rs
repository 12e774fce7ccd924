//! Per-company rank assignment

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use shared::{RankingResult, ResultId};

/// Rank to persist for one result; `None` for irrelevant entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAssignment {
    pub result_id: ResultId,
    pub rank: Option<u32>,
}

/// Rank one company's results in place.
///
/// Relevant entries get dense ranks 1, 2, ... by descending score, irrelevant
/// entries get `None`. Equal scores keep their insertion order and the slice
/// itself is never reordered.
pub fn assign_ranks(results: &mut [RankingResult]) {
    let mut order: Vec<usize> = (0..results.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| results[b].relevance_score().cmp(&results[a].relevance_score()));

    let mut next_rank = 1;
    for index in order {
        let result = &mut results[index];
        if result.is_relevant() {
            result.rank = Some(next_rank);
            next_rank += 1;
        } else {
            result.rank = None;
        }
    }
}

/// Group results by company and rank each group.
///
/// Returns one assignment per input result, in input order.
pub fn rank_companies<F>(results: &[RankingResult], company_of: F) -> Vec<RankAssignment>
where
    F: Fn(&RankingResult) -> String,
{
    let mut groups: BTreeMap<String, Vec<RankingResult>> = BTreeMap::new();
    for result in results {
        groups.entry(company_of(result)).or_default().push(result.clone());
    }

    let mut ranks: HashMap<ResultId, Option<u32>> = HashMap::with_capacity(results.len());
    for group in groups.values_mut() {
        assign_ranks(group);
        ranks.extend(group.iter().map(|r| (r.id, r.rank)));
    }

    results
        .iter()
        .map(|r| RankAssignment {
            result_id: r.id,
            rank: ranks.get(&r.id).copied().flatten(),
        })
        .collect()
}
