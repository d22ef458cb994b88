use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info};

use pageview_core::config::Config;
use pageview_core::error::ReportError;
use pageview_core::report::{flatten_response, AnalyticsProvider, FlatRecord, ReportRequest};
use pageview_ga::GoogleAnalyticsClient;

/// Runs fixed-shape reports against one analytics property.
///
/// `client` is `None` when the provider could not be constructed (typically a
/// missing credentials file); every report then fails with
/// [`ReportError::ClientUnavailable`] without touching the network.
pub struct Reporter {
    property_id: Option<String>,
    client: Option<Arc<dyn AnalyticsProvider>>,
}

impl Reporter {
    pub fn new(property_id: Option<String>, client: Option<Arc<dyn AnalyticsProvider>>) -> Self {
        Self {
            property_id,
            client,
        }
    }

    /// Build a reporter backed by the Google Analytics Data API.
    ///
    /// A credentials failure is logged and leaves the reporter without a
    /// client rather than failing startup.
    pub fn from_config(config: &Config) -> Self {
        let client: Option<Arc<dyn AnalyticsProvider>> =
            match GoogleAnalyticsClient::from_credentials_file(
                &config.credentials_path,
                &config.ga_endpoint,
            ) {
                Ok(client) => Some(Arc::new(client)),
                Err(e) => {
                    error!(error = %e, "Analytics client unavailable");
                    None
                }
            };
        Self::new(config.property_id.clone(), client)
    }

    pub fn build_request(
        start_date: NaiveDate,
        end_date: NaiveDate,
        dimension_names: &[&str],
        metric_names: &[&str],
    ) -> ReportRequest {
        ReportRequest::new(start_date, end_date, dimension_names, metric_names)
    }

    /// Submit one report query and flatten the response, preserving row order.
    pub async fn execute(&self, request: &ReportRequest) -> Result<Vec<FlatRecord>, ReportError> {
        let Some(client) = self.client.as_ref() else {
            error!("Analytics client not initialized; check the credentials file");
            return Err(ReportError::ClientUnavailable);
        };
        let Some(property_id) = self.property_id.as_deref().filter(|p| !p.is_empty()) else {
            error!("Analytics property id is not configured");
            return Err(ReportError::MissingTarget);
        };

        let response = client.run_report(property_id, request).await?;
        let records = flatten_response(request, &response)?;
        info!(
            property_id,
            start_date = %request.start_date,
            end_date = %request.end_date,
            rows = records.len(),
            "Report fetched"
        );
        Ok(records)
    }

    pub async fn get_active_users(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<FlatRecord>, ReportError> {
        self.execute(&ReportRequest::active_users(start_date, end_date))
            .await
    }

    pub async fn get_page_views(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<FlatRecord>, ReportError> {
        self.execute(&ReportRequest::page_views(start_date, end_date))
            .await
    }
}
