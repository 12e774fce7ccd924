//! Main entry point for the orchestrator binary
//!
//! Runs one complete lead ranking locally: optionally seeds leads from a JSON
//! file, scores every lead in paced batches, finalizes the run and writes the
//! CSV export.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use orchestrator::core::DEFAULT_TOP_N;
use orchestrator::{ControllerConfig, RealRecordStore, RunController};
use scorer::{BatchRunner, LeadScorer, PromptHandler, RealScoringClient, ScorerConfig, TokioPacer};
use shared::{ProcessId, logging, messages::parse_leads, process_debug, process_info};

/// Ranks sales leads against the ideal customer persona
#[derive(Parser)]
#[command(name = "orchestrator")]
#[command(about = "Scores and ranks sales leads per company with an LLM")]
pub struct Args {
    /// JSON array of lead records to seed before ranking
    #[arg(long)]
    pub leads: Option<PathBuf>,

    /// Snapshot file persisting leads, runs and results between invocations
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Leads scored per batch
    #[arg(long, default_value = "5")]
    pub batch_size: usize,

    /// Write the top leads per company as CSV to this path
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Leads per company in the export
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Price applied to the run's total tokens
    #[arg(long, default_value = "0.0")]
    pub cost_per_million_tokens: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    ProcessId::init_orchestrator();
    logging::init_tracing_with_level(Some(&args.log_level));
    logging::log_startup(ProcessId::current(), "lead ranking orchestrator");

    let scorer_config = ScorerConfig::from_env().context("loading scorer configuration")?;
    process_debug!(
        ProcessId::current(),
        "Model: {}, call delay: {:?}, rate-limit delay: {:?}",
        scorer_config.model,
        scorer_config.pacing.call_delay,
        scorer_config.pacing.rate_limit_delay
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
        Some(path) => RealRecordStore::with_snapshot(path)
            .await
            .with_context(|| format!("opening record store {}", path.display()))?,
        None => RealRecordStore::in_memory(),
    };

    let controller = RunController::new(
        Arc::new(store),
        Arc::new(runner),
        ControllerConfig {
            cost_per_million_tokens: args.cost_per_million_tokens,
        },
    );

    if let Some(path) = &args.leads {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading leads from {}", path.display()))?;
        let count = controller.seed_leads(parse_leads(&json)?).await?;
        logging::log_success(ProcessId::current(), &format!("Seeded {count} leads"));
    }

    let completed = match controller.run_all(args.batch_size).await {
        Ok(completed) => completed,
        Err(e) => {
            logging::log_error(ProcessId::current(), "Ranking run", &e);
            return Err(e.into());
        }
    };

    process_info!(
        ProcessId::current(),
        run_id = %completed.run_id,
        "🏁 {} batches, {} results, {} relevant, {} tokens, ${:.4}",
        completed.batches,
        completed.summary.total_results,
        completed.summary.relevant_count,
        completed.summary.total_tokens,
        completed.summary.total_cost
    );

    if let Some(path) = &args.export {
        let export = controller
            .export_csv(Some(completed.run_id), args.top_n)
            .await?;
        tokio::fs::write(path, &export.content)
            .await
            .with_context(|| format!("writing export to {}", path.display()))?;
        logging::log_success(
            ProcessId::current(),
            &format!("Exported {} to {}", export.filename, path.display()),
        );
    }

    logging::log_shutdown(ProcessId::current(), "run finished");
    Ok(())
}
