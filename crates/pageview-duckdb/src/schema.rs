/// DuckDB initialization SQL.
///
/// Executed once at database open time via `Connection::execute_batch`.
/// All statements use `IF NOT EXISTS` so they are safe to re-run on every
/// startup.
///
/// `memory_limit` comes from `Config.duckdb_memory_limit`
/// (env `PAGEVIEW_DUCKDB_MEMORY`, default `"1GB"`).
///
/// `page_views` deliberately has no uniqueness constraint on
/// `analytics_date`: a date holds one row per page. The at-most-one-dataset
/// rule is enforced by the ingestor's existence check.
pub fn init_sql(memory_limit: &str) -> String {
    format!(
        r#"SET memory_limit = '{memory_limit}';
SET threads = 2;

-- ===========================================
-- PAGE VIEWS (one row per page per analytics date)
-- ===========================================
CREATE TABLE IF NOT EXISTS page_views (
    id              VARCHAR PRIMARY KEY,           -- UUID v4
    analytics_date  DATE NOT NULL,
    page_path       VARCHAR NOT NULL,
    pageviews       BIGINT NOT NULL DEFAULT 0,
    users           BIGINT NOT NULL DEFAULT 0,
    created_at      TIMESTAMP NOT NULL,
    updated_at      TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_page_views_date ON page_views(analytics_date);
"#
    )
}
