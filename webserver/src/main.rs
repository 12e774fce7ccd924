//! WebServer entry point
//!
//! Builds the scoring pipeline and record store, then serves the ranking API.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use orchestrator::{ControllerConfig, RealRecordStore, RunController};
use scorer::{BatchRunner, LeadScorer, PromptHandler, RealScoringClient, ScorerConfig, TokioPacer};
use shared::{ProcessId, logging, process_debug};

use webserver::{WebServer, WebServerError, WebServerResult};

#[derive(Parser, Debug)]
#[command(name = "webserver")]
#[command(about = "HTTP API for scoring and ranking sales leads")]
struct Args {
    /// Interface to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for HTTP server
    #[arg(long, default_value = "8080")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Snapshot file persisting leads, runs and results across restarts
    #[arg(long)]
    store: Option<PathBuf>,

    /// Price applied to a run's total tokens at finalization
    #[arg(long, default_value = "0.0")]
    cost_per_million_tokens: f64,
}

#[tokio::main]
async fn main() -> WebServerResult<()> {
    let args = Args::parse();

    ProcessId::init_webserver();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(ProcessId::current(), "lead ranking API");

    let bind_address: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|e| WebServerError::config(format!("Invalid bind address: {e}")))?;

    let scorer_config = ScorerConfig::from_env()?;
    process_debug!(
        ProcessId::current(),
        "Model: {}, endpoint base: {}",
        scorer_config.model,
        scorer_config.base_url
    );

    let client = Arc::new(RealScoringClient::new(&scorer_config)?);
    let prompts =
        PromptHandler::new().with_sampling(scorer_config.temperature, scorer_config.max_tokens);
    let runner = BatchRunner::new(
        LeadScorer::new(client, prompts),
        Arc::new(TokioPacer),
        scorer_config.pacing,
    );

    let store = match &args.store {
        Some(path) => RealRecordStore::with_snapshot(path).await?,
        None => RealRecordStore::in_memory(),
    };

    let controller = Arc::new(RunController::new(
        Arc::new(store),
        Arc::new(runner),
        ControllerConfig {
            cost_per_million_tokens: args.cost_per_million_tokens,
        },
    ));

    let server = WebServer::new(bind_address, controller);
    if let Err(e) = server.run().await {
        logging::log_error(ProcessId::current(), "Web server", &e);
        return Err(e);
    }
    Ok(())
}
