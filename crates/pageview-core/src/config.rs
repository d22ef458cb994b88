use std::path::PathBuf;

pub const DEFAULT_CREDENTIALS_PATH: &str = "./credentials/service-account-credentials.json";
pub const DEFAULT_GA_ENDPOINT: &str = "https://analyticsdata.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct Config {
    /// Analytics property id. `None` when unset or blank; reports fail with
    /// `MissingTarget` instead of reaching the provider.
    pub property_id: Option<String>,
    pub credentials_path: PathBuf,
    pub ga_endpoint: String,
    pub data_dir: String,
    pub duckdb_memory_limit: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            property_id: normalize_property_id(std::env::var("PAGEVIEW_GA_PROPERTY_ID").ok()),
            credentials_path: std::env::var("PAGEVIEW_GA_CREDENTIALS")
                .unwrap_or_else(|_| DEFAULT_CREDENTIALS_PATH.to_string())
                .into(),
            ga_endpoint: std::env::var("PAGEVIEW_GA_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_GA_ENDPOINT.to_string()),
            data_dir: std::env::var("PAGEVIEW_DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            duckdb_memory_limit: {
                let raw =
                    std::env::var("PAGEVIEW_DUCKDB_MEMORY").unwrap_or_else(|_| "1GB".to_string());
                if raw.trim().is_empty() {
                    return Err("PAGEVIEW_DUCKDB_MEMORY must not be empty".to_string());
                }
                raw
            },
        })
    }

    pub fn db_path(&self) -> String {
        format!("{}/pageviews.db", self.data_dir)
    }
}

/// Treat a blank property id the same as a missing one.
pub fn normalize_property_id(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_property_id_is_missing() {
        assert_eq!(normalize_property_id(Some("   ".to_string())), None);
        assert_eq!(normalize_property_id(None), None);
    }

    #[test]
    fn property_id_is_trimmed() {
        assert_eq!(
            normalize_property_id(Some(" 123456789 ".to_string())).as_deref(),
            Some("123456789")
        );
    }
}
