#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use pageview_core::report::{AnalyticsProvider, ReportRequest, ReportResponse, ReportRow};

/// In-process provider that answers every report with a fixed response
/// (or a fixed failure) and records what it was asked.
pub struct ScriptedProvider {
    response: Option<ReportResponse>,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, ReportRequest)>>,
}

impl ScriptedProvider {
    pub fn returning(rows: Vec<ReportRow>) -> Arc<Self> {
        Arc::new(Self {
            response: Some(ReportResponse { rows }),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            response: None,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, ReportRequest)> {
        self.seen.lock().expect("seen lock").clone()
    }
}

#[async_trait]
impl AnalyticsProvider for ScriptedProvider {
    async fn run_report(
        &self,
        property_id: &str,
        request: &ReportRequest,
    ) -> anyhow::Result<ReportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .expect("seen lock")
            .push((property_id.to_string(), request.clone()));
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => anyhow::bail!("quota exceeded for property {property_id}"),
        }
    }
}

pub fn row(dims: &[&str], metrics: &[&str]) -> ReportRow {
    ReportRow {
        dimension_values: dims.iter().map(|s| s.to_string()).collect(),
        metric_values: metrics.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn page_row(path: &str, title: &str, views: i64, users: i64) -> ReportRow {
    let views = views.to_string();
    let users = users.to_string();
    row(&[path, title], &[views.as_str(), users.as_str()])
}

pub fn day(raw: &str) -> NaiveDate {
    raw.parse().expect("valid date")
}
