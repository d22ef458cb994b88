use chrono::{Duration, NaiveDate, Utc};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "pageviews", about = "Fetch and store analytics page views")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch page views from the analytics API and store them under `--end`.
    Ingest {
        /// First day of the report range (default: same as `--end`).
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Last day of the report range and the stored analytics date
        /// (default: yesterday, UTC).
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Store synthetic page views for a date (default: today, UTC).
    Demo {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print daily active users for a range as JSON lines.
    ActiveUsers {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// Print page views for a range as JSON lines.
    PageViews {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
}

pub fn yesterday() -> NaiveDate {
    Utc::now().date_naive() - Duration::days(1)
}

/// Resolve the ingest range: `end` defaults to yesterday, `start` to `end`.
pub fn ingest_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let end = end.unwrap_or_else(yesterday);
    (start.unwrap_or(end), end)
}
