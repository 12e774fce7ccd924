//! Test helper utilities for webserver integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use orchestrator::traits::MockBatchScorer;
use orchestrator::{BatchScorer, ControllerConfig, RealRecordStore, RecordStore, RunController};
use scorer::{BatchOutcome, ScoredLead};
use serde_json::{Value, json};
use shared::{Fit, Judgement, Lead};
use tower::ServiceExt;
use webserver::WebServer;

pub const TOKENS_PER_LEAD: u64 = 120;

/// Two companies, one lead with no account name
pub fn sample_leads_body() -> Value {
    json!({
        "leads": [
            lead("Acme", "Ann", "VP of Sales"),
            lead("Acme", "Ben", "CFO"),
            lead("Acme", "Cat", "Sales Manager"),
            lead("Globex", "Dan", "Sales Manager"),
            lead("", "Eli", "VP of Sales"),
        ]
    })
}

fn lead(company: &str, first_name: &str, title: &str) -> Value {
    json!({
        "account_name": company,
        "lead_first_name": first_name,
        "lead_last_name": "Sample",
        "lead_job_title": title,
        "account_domain": "example.com",
        "account_employee_range": "201-500",
        "account_industry": "Software",
    })
}

fn judgement_for(title: &str) -> Judgement {
    let (score, relevant, fit) = match title {
        "VP of Sales" => (88, true, Fit::Excellent),
        "Sales Manager" => (64, true, Fit::Good),
        _ => (8, false, Fit::Disqualified),
    };
    Judgement {
        relevance_score: score,
        is_relevant: relevant,
        reasoning: format!("{title} judged {score}"),
        department_fit: fit,
        seniority_fit: fit,
    }
}

/// Batch scorer answering from the job title alone
pub fn scripted_scorer() -> MockBatchScorer {
    let mut scorer = MockBatchScorer::new();
    scorer.expect_score_batch().returning(|leads: Vec<Lead>| {
        let mut outcome = BatchOutcome::default();
        for lead in leads {
            outcome.total_tokens += TOKENS_PER_LEAD;
            outcome.results.push(ScoredLead {
                judgement: judgement_for(&lead.lead_job_title),
                lead,
                tokens_used: TOKENS_PER_LEAD as u32,
            });
        }
        outcome
    });
    scorer
}

pub fn router_for<S, B>(store: S, scorer: B) -> Router
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let controller = RunController::new(
        Arc::new(store),
        Arc::new(scorer),
        ControllerConfig {
            cost_per_million_tokens: 0.59,
        },
    );
    let bind_address: SocketAddr = "127.0.0.1:0".parse().unwrap();
    WebServer::new(bind_address, Arc::new(controller)).build_router()
}

/// Router over an empty in-memory store and the scripted scorer
pub fn test_router() -> Router {
    router_for(RealRecordStore::in_memory(), scripted_scorer())
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let text = body_text(response).await;
    tokio_test::assert_ok!(serde_json::from_str::<Value>(&text))
}

/// Send a request and return its status and JSON body
pub async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send(router, method, uri, body).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Seed the sample leads and start a run, returning its id and lead ids
pub async fn seeded_run(router: &Router) -> (String, Vec<Value>) {
    let (status, _) = call(router, Method::POST, "/api/seed", Some(sample_leads_body())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, started) = call(router, Method::POST, "/api/rank", None).await;
    assert_eq!(status, StatusCode::OK);
    let run_id = started["run_id"].as_str().unwrap().to_string();
    let lead_ids = started["lead_ids"].as_array().unwrap().clone();
    (run_id, lead_ids)
}
