//! Tests for RealRecordStore
//!
//! Covers the run lifecycle invariants the controller relies on: a single
//! running run, atomic batch recording and snapshot persistence.

use chrono::Utc;
use shared::{Judgement, LeadId, NewLead, RankingResult, RunId, RunStatus};

use crate::error::OrchestratorError;
use crate::services::record_store::RealRecordStore;
use crate::traits::RecordStore;

fn new_lead(company: &str, first_name: &str) -> NewLead {
    NewLead {
        account_name: company.to_string(),
        lead_first_name: first_name.to_string(),
        lead_job_title: "Head of Sales".to_string(),
        account_employee_range: "51-200".to_string(),
        ..NewLead::default()
    }
}

fn judged(run_id: RunId, lead_id: LeadId, score: u8, relevant: bool) -> RankingResult {
    let mut judgement = Judgement::fallback("test");
    judgement.relevance_score = score;
    judgement.is_relevant = relevant;
    RankingResult::new(run_id, lead_id, judgement)
}

/// Store seeded with three leads across two companies
async fn seeded_store() -> (RealRecordStore, Vec<LeadId>) {
    let store = RealRecordStore::in_memory();
    store
        .seed_leads(vec![
            new_lead("Globex", "Gil"),
            new_lead("Acme", "Ann"),
            new_lead("Acme", "Abe"),
        ])
        .await
        .unwrap();
    let ids = store.list_leads().await.unwrap().iter().map(|l| l.id).collect();
    (store, ids)
}

#[tokio::test]
async fn test_leads_listed_by_company() {
    let (store, ids) = seeded_store().await;

    let leads = store.list_leads().await.unwrap();
    let names: Vec<_> = leads.iter().map(|l| l.lead_first_name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Abe", "Gil"]);

    let picked = store.get_leads(&[ids[2], LeadId::new(), ids[0]]).await.unwrap();
    assert_eq!(picked.iter().map(|l| l.id).collect::<Vec<_>>(), vec![ids[2], ids[0]]);
}

#[tokio::test]
async fn test_begin_run_sweeps_running_runs() {
    let (store, _) = seeded_store().await;

    let first = store.begin_run(3).await.unwrap();
    assert!(first.swept.is_empty());

    let second = store.begin_run(3).await.unwrap();
    assert_eq!(second.swept, vec![first.run.id]);

    let runs = store.list_runs().await.unwrap();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].id, second.run.id, "newest first");
    assert_eq!(
        runs.iter().filter(|r| r.status == RunStatus::Running).count(),
        1
    );
    assert_eq!(runs[1].status, RunStatus::Failed);
}

#[tokio::test]
async fn test_record_batch_accumulates_counters() {
    let (store, ids) = seeded_store().await;
    let run = store.begin_run(3).await.unwrap().run;

    let after_first = store
        .record_batch(run.id, vec![judged(run.id, ids[0], 80, true)], 900)
        .await
        .unwrap();
    assert_eq!(after_first.processed_leads, 1);
    assert_eq!(after_first.total_tokens, 900);

    let after_second = store
        .record_batch(
            run.id,
            vec![judged(run.id, ids[1], 60, true), judged(run.id, ids[2], 10, false)],
            1500,
        )
        .await
        .unwrap();
    assert_eq!(after_second.processed_leads, 3);
    assert_eq!(after_second.total_tokens, 2400);

    let scored = store.scored_lead_ids(run.id).await.unwrap();
    assert_eq!(scored.len(), 3);
    let results = store.list_results(run.id).await.unwrap();
    assert_eq!(results.iter().map(|r| r.lead_id).collect::<Vec<_>>(), ids);
}

#[tokio::test]
async fn test_duplicate_result_leaves_store_unchanged() {
    let (store, ids) = seeded_store().await;
    let run = store.begin_run(3).await.unwrap().run;
    store
        .record_batch(run.id, vec![judged(run.id, ids[0], 80, true)], 900)
        .await
        .unwrap();

    let err = store
        .record_batch(
            run.id,
            vec![judged(run.id, ids[1], 60, true), judged(run.id, ids[0], 80, true)],
            1000,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::DuplicateResult { lead_id, .. } if lead_id == ids[0]));

    let run = store.get_run(run.id).await.unwrap().unwrap();
    assert_eq!(run.processed_leads, 1);
    assert_eq!(run.total_tokens, 900);
    assert_eq!(store.list_results(run.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_batches_rejected_for_unknown_or_terminal_runs() {
    let (store, ids) = seeded_store().await;
    let unknown = RunId::new();

    let err = store
        .record_batch(unknown, vec![judged(unknown, ids[0], 50, true)], 10)
        .await
        .unwrap_err();
    assert!(matches!(err, OrchestratorError::RunNotFound { .. }));

    let stale = store.begin_run(3).await.unwrap().run;
    store.begin_run(3).await.unwrap();
    let err = store
        .record_batch(stale.id, vec![judged(stale.id, ids[0], 50, true)], 10)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::RunNotActive { status: RunStatus::Failed, .. }
    ));
}

#[tokio::test]
async fn test_processed_leads_saturates_at_total() {
    let (store, ids) = seeded_store().await;
    let run = store.begin_run(2).await.unwrap().run;

    let run = store
        .record_batch(
            run.id,
            ids.iter().map(|id| judged(run.id, *id, 50, true)).collect(),
            30,
        )
        .await
        .unwrap();

    assert_eq!(run.processed_leads, 2);
}

#[tokio::test]
async fn test_finalize_writes_ranks_and_completes() {
    let (store, ids) = seeded_store().await;
    let run = store.begin_run(3).await.unwrap().run;
    store
        .record_batch(
            run.id,
            vec![
                judged(run.id, ids[0], 70, true),
                judged(run.id, ids[1], 30, false),
                judged(run.id, ids[2], 90, true),
            ],
            2_500_000,
        )
        .await
        .unwrap();

    let completed_at = Utc::now();
    let run = store.finalize_run(run.id, 0.59, completed_at).await.unwrap();

    assert_eq!(run.status, RunStatus::Completed);
    assert!((run.total_cost - 1.475).abs() < 1e-9);
    assert_eq!(run.completed_at, Some(completed_at));
    assert_eq!(store.latest_completed_run().await.unwrap().map(|r| r.id), Some(run.id));

    // Ann and Abe share Acme, Gil is alone in Globex
    let ranks: Vec<_> = store.list_results(run.id).await.unwrap().iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![Some(1), None, Some(1)]);

    let err = store.finalize_run(run.id, 0.0, Utc::now()).await.unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::RunNotActive { status: RunStatus::Completed, .. }
    ));
}

#[tokio::test]
async fn test_finalize_ranks_batches_recorded_after_results_were_read() {
    let (store, ids) = seeded_store().await;
    let run = store.begin_run(3).await.unwrap().run;
    store
        .record_batch(run.id, vec![judged(run.id, ids[0], 80, true)], 100)
        .await
        .unwrap();

    // A reader sees one result; a second batch lands before finalize
    assert_eq!(store.list_results(run.id).await.unwrap().len(), 1);
    store
        .record_batch(run.id, vec![judged(run.id, ids[1], 95, true)], 100)
        .await
        .unwrap();

    let run = store.finalize_run(run.id, 1.0, Utc::now()).await.unwrap();

    let ranked: Vec<_> = store
        .list_results(run.id)
        .await
        .unwrap()
        .iter()
        .map(|r| (r.relevance_score(), r.rank))
        .collect();
    assert_eq!(ranked, vec![(80, Some(2)), (95, Some(1))]);
    assert_eq!(run.total_tokens, 200);
    assert!((run.total_cost - 200.0 / 1_000_000.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_concurrent_batch_and_finalize_keep_ranks_consistent() {
    for _ in 0..20 {
        let (store, ids) = seeded_store().await;
        let run = store.begin_run(3).await.unwrap().run;
        store
            .record_batch(run.id, vec![judged(run.id, ids[0], 60, true)], 10)
            .await
            .unwrap();

        let (recorded, finalized) = tokio::join!(
            store.record_batch(run.id, vec![judged(run.id, ids[1], 85, true)], 10),
            store.finalize_run(run.id, 0.0, Utc::now()),
        );
        let finalized = finalized.unwrap();

        let results = store.list_results(run.id).await.unwrap();
        match recorded {
            Ok(_) => assert_eq!(results.len(), 2),
            Err(err) => {
                assert!(matches!(err, OrchestratorError::RunNotActive { .. }));
                assert_eq!(results.len(), 1);
            }
        }
        for result in &results {
            assert_eq!(result.rank.is_some(), result.is_relevant());
        }
        assert_eq!(
            finalized.total_tokens,
            10 * results.len() as u64,
            "cost is priced from every recorded batch"
        );
    }
}

#[tokio::test]
async fn test_reseeding_clears_runs_and_results() {
    let (store, ids) = seeded_store().await;
    let run = store.begin_run(3).await.unwrap().run;
    store
        .record_batch(run.id, vec![judged(run.id, ids[0], 90, true)], 100)
        .await
        .unwrap();

    let count = store.seed_leads(vec![new_lead("Initech", "Ivy")]).await.unwrap();

    assert_eq!(count, 1);
    assert!(store.list_runs().await.unwrap().is_empty());
    assert!(store.list_results(run.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store").join("ranking.json");

    let run_id = {
        let store = RealRecordStore::with_snapshot(&path).await.unwrap();
        store.seed_leads(vec![new_lead("Acme", "Ann")]).await.unwrap();
        let lead_id = store.list_leads().await.unwrap()[0].id;
        let run = store.begin_run(1).await.unwrap().run;
        store
            .record_batch(run.id, vec![judged(run.id, lead_id, 75, true)], 640)
            .await
            .unwrap();
        run.id
    };

    assert!(path.exists());
    assert!(!dir.path().join("store").join("ranking.json.tmp").exists());

    let reopened = tokio_test::assert_ok!(RealRecordStore::with_snapshot(&path).await);
    let run = reopened.get_run(run_id).await.unwrap().unwrap();
    assert_eq!(run.status, RunStatus::Running);
    assert_eq!(run.processed_leads, 1);
    assert_eq!(run.total_tokens, 640);
    assert_eq!(reopened.list_results(run_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_snapshot_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ranking.json");
    tokio::fs::write(&path, "not json").await.unwrap();

    let result = RealRecordStore::with_snapshot(&path).await;
    assert!(matches!(result, Err(OrchestratorError::JsonError(_))));
}
