use async_trait::async_trait;
use chrono::NaiveDate;

use crate::pageview::PageViewRecord;

/// Persisted page-view storage.
///
/// `insert_page_views` must be atomic per call: either every record in the
/// batch is stored or none is.
#[async_trait]
pub trait PageViewStore: Send + Sync + 'static {
    async fn exists_for_date(&self, analytics_date: NaiveDate) -> anyhow::Result<bool>;
    async fn insert_page_views(&self, records: &[PageViewRecord]) -> anyhow::Result<()>;
    async fn count_for_date(&self, analytics_date: NaiveDate) -> anyhow::Result<i64>;
    async fn list_for_date(&self, analytics_date: NaiveDate)
        -> anyhow::Result<Vec<PageViewRecord>>;
}
