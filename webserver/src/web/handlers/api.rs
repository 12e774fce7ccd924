//! REST API handlers
//!
//! JSON endpoints over the run controller. Bodies are parsed by hand so that
//! missing or malformed fields surface as `400 {"error": ...}` rather than an
//! extractor rejection.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use orchestrator::core::DEFAULT_TOP_N;
use orchestrator::{BatchScorer, RecordStore, RunController};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use shared::{LeadId, NewLead, RunId, RunResults};

use crate::error::{WebServerError, WebServerResult};

pub type SharedController<S, B> = Arc<RunController<S, B>>;

/// Success envelope: `{"success": true, ...payload}`
#[derive(Debug, Serialize)]
pub struct Success<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Success<T> {
    fn new(body: T) -> Json<Self> {
        Json(Self { success: true, body })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedRequest {
    pub leads: Vec<NewLead>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BatchRequest {
    pub run_id: Option<RunId>,
    pub lead_ids: Vec<LeadId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FinalizeRequest {
    pub run_id: Option<RunId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RunQuery {
    pub run_id: Option<String>,
    pub top_n: Option<String>,
}

/// Parse a JSON body; an empty body parses as the default request
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> WebServerResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| WebServerError::invalid_request(format!("Invalid request body: {e}")))
}

fn parse_run_id(raw: Option<&str>) -> WebServerResult<Option<RunId>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => RunId::from_string(raw)
            .map(Some)
            .map_err(|_| WebServerError::invalid_request(format!("Invalid run_id: {raw}"))),
        None => Ok(None),
    }
}

fn parse_top_n(raw: Option<&str>) -> WebServerResult<usize> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => match raw.parse::<usize>() {
            Ok(top_n) if top_n >= 1 => Ok(top_n),
            _ => Err(WebServerError::invalid_request(format!(
                "top_n must be a positive integer, got {raw}"
            ))),
        },
        None => Ok(DEFAULT_TOP_N),
    }
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /api/seed
pub async fn seed_leads<S, B>(
    State(controller): State<SharedController<S, B>>,
    body: Bytes,
) -> WebServerResult<Json<Value>>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let request: SeedRequest = parse_body(&body)?;
    let count = controller.seed_leads(request.leads).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Seeded {count} leads"),
        "count": count,
    })))
}

/// GET /api/leads
pub async fn list_leads<S, B>(
    State(controller): State<SharedController<S, B>>,
) -> WebServerResult<Json<Value>>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let leads = controller.list_leads().await?;
    Ok(Json(json!({ "count": leads.len(), "leads": leads })))
}

/// POST /api/rank
pub async fn start_run<S, B>(
    State(controller): State<SharedController<S, B>>,
) -> WebServerResult<impl IntoResponse>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let started = controller.start().await?;
    Ok(Success::new(started))
}

/// POST /api/rank/batch
pub async fn process_batch<S, B>(
    State(controller): State<SharedController<S, B>>,
    body: Bytes,
) -> WebServerResult<impl IntoResponse>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let request: BatchRequest = parse_body(&body)?;
    let run_id = match request.run_id {
        Some(run_id) if !request.lead_ids.is_empty() => run_id,
        _ => return Err(WebServerError::invalid_request("run_id and lead_ids are required")),
    };

    let summary = controller.process_batch(run_id, &request.lead_ids).await?;
    Ok(Success::new(summary))
}

/// POST /api/rank/finalize
pub async fn finalize_run<S, B>(
    State(controller): State<SharedController<S, B>>,
    body: Bytes,
) -> WebServerResult<impl IntoResponse>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let request: FinalizeRequest = parse_body(&body)?;
    let run_id = request
        .run_id
        .ok_or_else(|| WebServerError::invalid_request("run_id is required"))?;

    let summary = controller.finalize(run_id).await?;
    Ok(Success::new(summary))
}

/// GET /api/results
pub async fn get_results<S, B>(
    State(controller): State<SharedController<S, B>>,
    Query(query): Query<RunQuery>,
) -> WebServerResult<Json<RunResults>>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let run_id = parse_run_id(query.run_id.as_deref())?;
    Ok(Json(controller.get_results(run_id).await?))
}

/// GET /api/runs
pub async fn list_runs<S, B>(
    State(controller): State<SharedController<S, B>>,
) -> WebServerResult<Json<Value>>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let runs = controller.list_runs().await?;
    Ok(Json(json!({ "runs": runs })))
}

/// GET /api/export
pub async fn export_csv<S, B>(
    State(controller): State<SharedController<S, B>>,
    Query(query): Query<RunQuery>,
) -> WebServerResult<Response>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    let run_id = parse_run_id(query.run_id.as_deref())?;
    let top_n = parse_top_n(query.top_n.as_deref())?;
    let export = controller.export_csv(run_id, top_n).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.content,
    )
        .into_response())
}
