use async_trait::async_trait;
use chrono::NaiveDate;

use pageview_core::pageview::PageViewRecord;
use pageview_core::store::PageViewStore;

use crate::DuckDbBackend;

#[async_trait]
impl PageViewStore for DuckDbBackend {
    async fn exists_for_date(&self, analytics_date: NaiveDate) -> anyhow::Result<bool> {
        DuckDbBackend::page_views_exist(self, analytics_date).await
    }

    async fn insert_page_views(&self, records: &[PageViewRecord]) -> anyhow::Result<()> {
        DuckDbBackend::insert_page_views(self, records).await
    }

    async fn count_for_date(&self, analytics_date: NaiveDate) -> anyhow::Result<i64> {
        DuckDbBackend::count_page_views(self, analytics_date).await
    }

    async fn list_for_date(
        &self,
        analytics_date: NaiveDate,
    ) -> anyhow::Result<Vec<PageViewRecord>> {
        DuckDbBackend::list_page_views(self, analytics_date).await
    }
}
