use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{error, info, warn};

use pageview_core::error::ReportError;
use pageview_core::pageview::PageViewRecord;
use pageview_core::report::FlatRecord;
use pageview_core::store::PageViewStore;
use pageview_core::synthetic::generate_dummy_page_views;

use crate::reporter::Reporter;

/// Why an ingestion wrote nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    ClientUnavailable,
    MissingTarget,
    /// The provider returned zero rows, usually reporting lag.
    EmptyResult,
    /// Rows already exist for the target date.
    DuplicateDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Ingested {
        analytics_date: NaiveDate,
        rows: usize,
    },
    Skipped(SkipReason),
}

impl IngestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IngestOutcome::Ingested { .. })
    }
}

/// Moves report rows into the page-view store, one date per batch.
///
/// The existence check and the insert are separate store calls, so two
/// concurrent ingestions for the same date can both pass the check.
pub struct Ingestor {
    reporter: Reporter,
    store: Arc<dyn PageViewStore>,
}

impl Ingestor {
    pub fn new(reporter: Reporter, store: Arc<dyn PageViewStore>) -> Self {
        Self { reporter, store }
    }

    /// Fetch page views for the range and store them under `end_date`.
    ///
    /// Provider and store failures are returned as errors; every other
    /// non-write is a [`IngestOutcome::Skipped`].
    pub async fn ingest_page_views(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<IngestOutcome> {
        let records = match self.reporter.get_page_views(start_date, end_date).await {
            Ok(records) => records,
            Err(ReportError::ClientUnavailable) => {
                return Ok(IngestOutcome::Skipped(SkipReason::ClientUnavailable))
            }
            Err(ReportError::MissingTarget) => {
                return Ok(IngestOutcome::Skipped(SkipReason::MissingTarget))
            }
            Err(e) => return Err(e.into()),
        };

        if records.is_empty() {
            info!(
                start_date = %start_date,
                end_date = %end_date,
                "No analytics data available for range; provider data can lag 24-48h"
            );
            return Ok(IngestOutcome::Skipped(SkipReason::EmptyResult));
        }

        if self.store.exists_for_date(end_date).await? {
            error!(
                analytics_date = %end_date,
                "Page views already ingested for date; refusing duplicate ingestion"
            );
            return Ok(IngestOutcome::Skipped(SkipReason::DuplicateDate));
        }

        self.write_batch(&records, end_date, Utc::now()).await
    }

    /// Store synthetic page views for `date`.
    ///
    /// Skips the reporter and the duplicate check: calling this twice for one
    /// date stores two synthetic datasets.
    pub async fn ingest_demo_page_views(&self, date: NaiveDate) -> Result<IngestOutcome> {
        let records = generate_dummy_page_views();
        warn!(analytics_date = %date, "Ingesting synthetic page views");
        self.write_batch(&records, date, Utc::now()).await
    }

    async fn write_batch(
        &self,
        records: &[FlatRecord],
        analytics_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<IngestOutcome> {
        // Convert everything up front so a bad row aborts before any write.
        let rows = records
            .iter()
            .map(|record| PageViewRecord::from_flat(record, analytics_date, now))
            .collect::<Result<Vec<_>>>()?;

        self.store.insert_page_views(&rows).await?;
        info!(
            analytics_date = %analytics_date,
            rows = rows.len(),
            "Page views ingested"
        );
        Ok(IngestOutcome::Ingested {
            analytics_date,
            rows: rows.len(),
        })
    }
}
