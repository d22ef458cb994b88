//! Google Analytics Data API v1beta `runReport` JSON shapes.

use serde::{Deserialize, Serialize};

use pageview_core::report::{ReportRequest, ReportResponse, ReportRow};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportBody {
    pub date_ranges: Vec<DateRange>,
    pub dimensions: Vec<NamedField>,
    pub metrics: Vec<NamedField>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Serialize)]
pub struct NamedField {
    pub name: String,
}

impl From<&ReportRequest> for RunReportBody {
    fn from(request: &ReportRequest) -> Self {
        Self {
            date_ranges: vec![DateRange {
                start_date: request.start_date.format("%Y-%m-%d").to_string(),
                end_date: request.end_date.format("%Y-%m-%d").to_string(),
            }],
            dimensions: request
                .dimension_names
                .iter()
                .map(|name| NamedField { name: name.clone() })
                .collect(),
            metrics: request
                .metric_names
                .iter()
                .map(|name| NamedField { name: name.clone() })
                .collect(),
        }
    }
}

/// `rows` is omitted entirely by the API when the report is empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReportResponse {
    #[serde(default)]
    pub rows: Vec<WireRow>,
    #[serde(default)]
    pub row_count: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRow {
    #[serde(default)]
    pub dimension_values: Vec<WireValue>,
    #[serde(default)]
    pub metric_values: Vec<WireValue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WireValue {
    #[serde(default)]
    pub value: String,
}

impl From<RunReportResponse> for ReportResponse {
    fn from(resp: RunReportResponse) -> Self {
        ReportResponse {
            rows: resp
                .rows
                .into_iter()
                .map(|row| ReportRow {
                    dimension_values: row.dimension_values.into_iter().map(|v| v.value).collect(),
                    metric_values: row.metric_values.into_iter().map(|v| v.value).collect(),
                })
                .collect(),
        }
    }
}
