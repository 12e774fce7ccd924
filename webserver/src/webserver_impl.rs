//! Main webserver implementation
//!
//! Wires the REST handlers to a shared run controller and serves them with
//! permissive CORS and request tracing.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use orchestrator::{BatchScorer, RecordStore, RunController};
use shared::{ProcessId, logging, process_info};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{WebServerError, WebServerResult};
use crate::web::handlers::api;

/// HTTP front end over a run controller
pub struct WebServer<S: RecordStore, B: BatchScorer> {
    bind_address: SocketAddr,
    controller: Arc<RunController<S, B>>,
}

impl<S, B> WebServer<S, B>
where
    S: RecordStore + 'static,
    B: BatchScorer + 'static,
{
    pub fn new(bind_address: SocketAddr, controller: Arc<RunController<S, B>>) -> Self {
        Self {
            bind_address,
            controller,
        }
    }

    pub fn bind_address(&self) -> SocketAddr {
        self.bind_address
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/health", get(api::health_check))
            .route("/api/seed", post(api::seed_leads::<S, B>))
            .route("/api/leads", get(api::list_leads::<S, B>))
            .route("/api/rank", post(api::start_run::<S, B>))
            .route("/api/rank/batch", post(api::process_batch::<S, B>))
            .route("/api/rank/finalize", post(api::finalize_run::<S, B>))
            .route("/api/results", get(api::get_results::<S, B>))
            .route("/api/runs", get(api::list_runs::<S, B>))
            .route("/api/export", get(api::export_csv::<S, B>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.controller.clone())
    }

    /// Serve until Ctrl-C
    pub async fn run(&self) -> WebServerResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .map_err(|e| {
                WebServerError::ServerStartup(format!(
                    "Failed to bind to {}: {}",
                    self.bind_address, e
                ))
            })?;

        process_info!(
            ProcessId::current(),
            "🌐 Web server listening on http://{}",
            self.bind_address
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Server error: {e}")))?;

        logging::log_shutdown(ProcessId::current(), "received shutdown signal");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logging::log_error(ProcessId::current(), "Installing Ctrl-C handler", &e);
    }
}
