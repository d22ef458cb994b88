use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::info;

use pageview_core::config::Config;
use pageview_core::report::FlatRecord;
use pageview_duckdb::DuckDbBackend;
use pageview_ingest::cli::{ingest_range, Cli, Command};
use pageview_ingest::ingestor::Ingestor;
use pageview_ingest::reporter::Reporter;

fn print_records(records: &[FlatRecord]) -> Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

/// Open the DuckDB store under `data_dir` and wire it to the reporter.
fn open_ingestor(cfg: &Config, reporter: Reporter) -> Result<Ingestor> {
    std::fs::create_dir_all(&cfg.data_dir)?;
    let db = DuckDbBackend::open(&cfg.db_path(), &cfg.duckdb_memory_limit)?;
    Ok(Ingestor::new(reporter, Arc::new(db)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pageview=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let reporter = Reporter::from_config(&cfg);

    let outcome = match cli.command {
        Command::ActiveUsers { start, end } => {
            return print_records(&reporter.get_active_users(start, end).await?);
        }
        Command::PageViews { start, end } => {
            return print_records(&reporter.get_page_views(start, end).await?);
        }
        Command::Ingest { start, end } => {
            let (start, end) = ingest_range(start, end);
            open_ingestor(&cfg, reporter)?
                .ingest_page_views(start, end)
                .await?
        }
        Command::Demo { date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            open_ingestor(&cfg, reporter)?
                .ingest_demo_page_views(date)
                .await?
        }
    };

    info!(outcome = ?outcome, "Ingestion finished");
    if !outcome.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
