use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use duckdb::Connection;
use tokio::sync::Mutex;
use tracing::info;

use pageview_core::pageview::PageViewRecord;

use crate::schema::init_sql;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// DuckDB-backed page-view store.
///
/// DuckDB is single-writer, so the connection sits behind an async mutex and
/// every write goes through it. Cloning the `Arc` is cheap.
pub struct DuckDbBackend {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl DuckDbBackend {
    /// Open (or create) a DuckDB database file at `path` and apply the schema.
    pub fn open(path: &str, memory_limit: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(&init_sql(memory_limit))?;
        info!(
            "DuckDB opened at {} with memory_limit={}, threads=2",
            path, memory_limit
        );
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database. Data is discarded on drop; intended for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(&init_sql("1GB"))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Return `true` if at least one page-view row exists for `analytics_date`.
    pub async fn page_views_exist(&self, analytics_date: NaiveDate) -> Result<bool> {
        Ok(self.count_page_views(analytics_date).await? > 0)
    }

    pub async fn count_page_views(&self, analytics_date: NaiveDate) -> Result<i64> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare("SELECT COUNT(*) FROM page_views WHERE analytics_date = CAST(?1 AS DATE)")?;
        let count: i64 =
            stmt.query_row(duckdb::params![analytics_date.to_string()], |row| row.get(0))?;
        Ok(count)
    }

    /// Insert a batch of page-view rows in a single transaction.
    ///
    /// Returns immediately (no-op) if `records` is empty.
    pub async fn insert_page_views(&self, records: &[PageViewRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;

        for record in records {
            tx.execute(
                r#"INSERT INTO page_views (
                    id, analytics_date, page_path, pageviews, users, created_at, updated_at
                ) VALUES (
                    ?1, CAST(?2 AS DATE), ?3, ?4, ?5,
                    CAST(?6 AS TIMESTAMP), CAST(?7 AS TIMESTAMP)
                )"#,
                duckdb::params![
                    uuid::Uuid::new_v4().to_string(),
                    record.analytics_date.to_string(),
                    record.page_path,
                    record.pageviews,
                    record.users,
                    record.created_at.format(TIMESTAMP_FORMAT).to_string(),
                    record.updated_at.format(TIMESTAMP_FORMAT).to_string(),
                ],
            )?;
        }

        tx.commit()?;
        info!("Inserted {} page-view rows into DuckDB", records.len());
        Ok(())
    }

    /// All rows for `analytics_date`, busiest page first.
    pub async fn list_page_views(&self, analytics_date: NaiveDate) -> Result<Vec<PageViewRecord>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(
            "SELECT CAST(analytics_date AS VARCHAR), page_path, pageviews, users, \
                    CAST(created_at AS VARCHAR), CAST(updated_at AS VARCHAR) \
             FROM page_views \
             WHERE analytics_date = CAST(?1 AS DATE) \
             ORDER BY pageviews DESC, page_path ASC",
        )?;
        let rows = stmt.query_map(duckdb::params![analytics_date.to_string()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (date_raw, page_path, pageviews, users, created_raw, updated_raw) = row?;
            out.push(PageViewRecord {
                analytics_date: NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
                    .with_context(|| format!("invalid analytics_date {date_raw:?}"))?,
                page_path,
                pageviews,
                users,
                created_at: parse_timestamp(&created_raw)?,
                updated_at: parse_timestamp(&updated_raw)?,
            });
        }
        Ok(out)
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|_| anyhow!("invalid_datetime: {raw}"))
}
