//! Report requests, provider responses and row flattening.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

pub const DIM_DATE: &str = "date";
pub const DIM_PAGE_PATH: &str = "pagePath";
pub const DIM_PAGE_TITLE: &str = "pageTitle";
pub const METRIC_ACTIVE_USERS: &str = "activeUsers";
pub const METRIC_SCREEN_PAGE_VIEWS: &str = "screenPageViews";

/// One flattened response row keyed by dimension or metric name.
pub type FlatRecord = BTreeMap<String, String>;

/// A single fixed-shape report query.
///
/// `dimension_names` and `metric_names` are order-significant: position `i`
/// in each list maps to position `i` in every response row's value arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub dimension_names: Vec<String>,
    pub metric_names: Vec<String>,
}

impl ReportRequest {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        dimension_names: &[&str],
        metric_names: &[&str],
    ) -> Self {
        Self {
            start_date,
            end_date,
            dimension_names: dimension_names.iter().map(|s| s.to_string()).collect(),
            metric_names: metric_names.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Dimensions `[date]`, metrics `[activeUsers]`.
    pub fn active_users(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(start_date, end_date, &[DIM_DATE], &[METRIC_ACTIVE_USERS])
    }

    /// Dimensions `[pagePath, pageTitle]`, metrics `[screenPageViews, activeUsers]`.
    pub fn page_views(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self::new(
            start_date,
            end_date,
            &[DIM_PAGE_PATH, DIM_PAGE_TITLE],
            &[METRIC_SCREEN_PAGE_VIEWS, METRIC_ACTIVE_USERS],
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub dimension_values: Vec<String>,
    pub metric_values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResponse {
    pub rows: Vec<ReportRow>,
}

/// Analytics data provider.
///
/// Implementations issue exactly one report query per call. Errors are the
/// provider's own (network, auth, quota) and are surfaced unchanged.
#[async_trait]
pub trait AnalyticsProvider: Send + Sync + 'static {
    async fn run_report(
        &self,
        property_id: &str,
        request: &ReportRequest,
    ) -> anyhow::Result<ReportResponse>;
}

/// Flatten a columnar response into one record per row, preserving row order.
///
/// Every row's value arrays must match the requested name lists in length;
/// a mismatch fails the whole response rather than producing partial records.
pub fn flatten_response(
    request: &ReportRequest,
    response: &ReportResponse,
) -> Result<Vec<FlatRecord>, ReportError> {
    response
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| flatten_row(request, idx, row))
        .collect()
}

fn flatten_row(
    request: &ReportRequest,
    idx: usize,
    row: &ReportRow,
) -> Result<FlatRecord, ReportError> {
    check_shape(idx, "dimension", &request.dimension_names, &row.dimension_values)?;
    check_shape(idx, "metric", &request.metric_names, &row.metric_values)?;

    let mut record = FlatRecord::new();
    for (name, value) in request.dimension_names.iter().zip(&row.dimension_values) {
        record.insert(name.clone(), value.clone());
    }
    for (name, value) in request.metric_names.iter().zip(&row.metric_values) {
        record.insert(name.clone(), value.clone());
    }
    Ok(record)
}

fn check_shape(
    row: usize,
    kind: &'static str,
    names: &[String],
    values: &[String],
) -> Result<(), ReportError> {
    if names.len() != values.len() {
        return Err(ReportError::ShapeMismatch {
            row,
            kind,
            expected: names.len(),
            actual: values.len(),
        });
    }
    Ok(())
}
