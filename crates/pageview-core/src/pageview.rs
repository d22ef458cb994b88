use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::report::{FlatRecord, DIM_PAGE_PATH, METRIC_ACTIVE_USERS, METRIC_SCREEN_PAGE_VIEWS};

/// Stored page-view row. Mirrors the DuckDB `page_views` table columns.
///
/// Rows are written once by the ingestor and never updated, so
/// `created_at == updated_at` for every row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViewRecord {
    pub analytics_date: NaiveDate,
    pub page_path: String,
    pub pageviews: i64,
    pub users: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PageViewRecord {
    /// Convert a flattened page-view report row into a stored row.
    ///
    /// Requires `pagePath`, `screenPageViews` and `activeUsers`; other fields
    /// (e.g. `pageTitle`) are not persisted.
    pub fn from_flat(
        record: &FlatRecord,
        analytics_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let page_path = field(record, DIM_PAGE_PATH)?.to_string();
        let pageviews = count(record, METRIC_SCREEN_PAGE_VIEWS)?;
        let users = count(record, METRIC_ACTIVE_USERS)?;
        Ok(Self {
            analytics_date,
            page_path,
            pageviews,
            users,
            created_at: now,
            updated_at: now,
        })
    }
}

fn field<'a>(record: &'a FlatRecord, name: &str) -> Result<&'a str> {
    record
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("record is missing field `{name}`"))
}

fn count(record: &FlatRecord, name: &str) -> Result<i64> {
    let raw = field(record, name)?;
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("field `{name}` is not an integer: {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(pairs: &[(&str, &str)]) -> FlatRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn maps_report_fields_to_columns() {
        let now = Utc::now();
        let date: NaiveDate = "2024-05-01".parse().expect("date");
        let record = flat(&[
            ("pagePath", "/pricing"),
            ("pageTitle", "Pricing"),
            ("screenPageViews", "120"),
            ("activeUsers", "45"),
        ]);

        let row = PageViewRecord::from_flat(&record, date, now).expect("convert");
        assert_eq!(row.page_path, "/pricing");
        assert_eq!(row.pageviews, 120);
        assert_eq!(row.users, 45);
        assert_eq!(row.analytics_date, date);
        assert_eq!(row.created_at, row.updated_at);
    }

    #[test]
    fn missing_metric_is_an_error() {
        let date: NaiveDate = "2024-05-01".parse().expect("date");
        let record = flat(&[("pagePath", "/"), ("screenPageViews", "1")]);
        let err = PageViewRecord::from_flat(&record, date, Utc::now()).expect_err("missing");
        assert!(err.to_string().contains("activeUsers"));
    }

    #[test]
    fn non_numeric_metric_is_an_error() {
        let date: NaiveDate = "2024-05-01".parse().expect("date");
        let record = flat(&[
            ("pagePath", "/"),
            ("screenPageViews", "many"),
            ("activeUsers", "1"),
        ]);
        assert!(PageViewRecord::from_flat(&record, date, Utc::now()).is_err());
    }
}
