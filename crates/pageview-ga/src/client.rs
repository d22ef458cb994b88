use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use pageview_core::report::{AnalyticsProvider, ReportRequest, ReportResponse};

use crate::credentials::{CredentialsError, ServiceAccountKey};
use crate::token::TokenSource;
use crate::wire::{RunReportBody, RunReportResponse};

/// Google Analytics Data API client.
///
/// One `runReport` POST per call, authenticated with a service-account
/// access token. No retry and no pagination: the API's default row limit
/// applies.
pub struct GoogleAnalyticsClient {
    client: Client,
    endpoint: String,
    tokens: TokenSource,
}

impl GoogleAnalyticsClient {
    /// Build a client from a service-account key file.
    ///
    /// Fails when the file is absent, is not a service-account key, or holds a
    /// private key that does not parse; callers treat that as "client
    /// unavailable".
    pub fn from_credentials_file(path: &Path, endpoint: &str) -> Result<Self, CredentialsError> {
        let key = ServiceAccountKey::from_file(path)?;
        Self::new(key, endpoint)
    }

    pub fn new(key: ServiceAccountKey, endpoint: &str) -> Result<Self, CredentialsError> {
        let client = Client::new();
        Ok(Self {
            tokens: TokenSource::new(key, client.clone())?,
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

fn report_url(endpoint: &str, property_id: &str) -> String {
    format!("{endpoint}/properties/{property_id}:runReport")
}

#[async_trait]
impl AnalyticsProvider for GoogleAnalyticsClient {
    async fn run_report(
        &self,
        property_id: &str,
        request: &ReportRequest,
    ) -> Result<ReportResponse> {
        let token = self.tokens.access_token().await?;
        let resp = self
            .client
            .post(report_url(&self.endpoint, property_id))
            .bearer_auth(token)
            .json(&RunReportBody::from(request))
            .send()
            .await
            .context("runReport HTTP request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("runReport error {status}: {body}");
        }

        let parsed: RunReportResponse = resp
            .json()
            .await
            .context("runReport response parse failed")?;
        info!(
            property_id,
            client_email = %self.tokens.client_email(),
            rows = parsed.rows.len(),
            row_count = ?parsed.row_count,
            "runReport completed"
        );
        Ok(parsed.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_key_file(contents: &str) -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("unix time")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("pageview-ga-client-{nanos}.json"));
        std::fs::write(&path, contents).expect("write");
        path
    }

    #[test]
    fn report_url_targets_property() {
        assert_eq!(
            report_url("https://analyticsdata.googleapis.com/v1beta", "123456789"),
            "https://analyticsdata.googleapis.com/v1beta/properties/123456789:runReport"
        );
    }

    #[test]
    fn missing_credentials_file_fails_construction() {
        let result = GoogleAnalyticsClient::from_credentials_file(
            Path::new("/nonexistent/service-account.json"),
            "https://analyticsdata.googleapis.com/v1beta",
        );
        assert!(matches!(result, Err(CredentialsError::NotFound(_))));
    }

    #[test]
    fn unparseable_private_key_fails_construction() {
        let path = write_key_file(
            r#"{"type": "service_account", "client_email": "a@b.c", "private_key": "not a pem"}"#,
        );
        let result = GoogleAnalyticsClient::from_credentials_file(
            &path,
            "https://analyticsdata.googleapis.com/v1beta",
        );
        assert!(matches!(result, Err(CredentialsError::InvalidKey(_))));
        let _ = std::fs::remove_file(&path);
    }
}
