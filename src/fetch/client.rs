//! Engagement API Client
//!
//! HTTP client for the user-engagement metrics endpoint.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::error::{FetchError, FetchResult};
use crate::metrics::{DateRange, EngagementReport};

/// Path of the weekly engagement metrics endpoint
pub const ENDPOINT_PATH: &str = "/api/v1/analytics/user_engagement_metrics";

/// Source of weekly engagement reports
#[async_trait]
pub trait EngagementSource: Send + Sync {
    /// Fetch the report covering `range`
    async fn fetch_report(&self, range: &DateRange) -> FetchResult<EngagementReport>;
}

/// Configuration for the engagement API client
#[derive(Debug, Clone)]
pub struct EngagementClientConfig {
    /// Base URL of the analytics API (e.g., "https://api.example.com")
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EngagementClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.example.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl EngagementClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Full endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ENDPOINT_PATH)
    }
}

/// reqwest-backed `EngagementSource`
pub struct EngagementClient {
    client: Client,
    config: EngagementClientConfig,
}

impl EngagementClient {
    /// Create a new client with the given configuration
    pub fn new(config: EngagementClientConfig) -> FetchResult<Self> {
        // Redirects are not followed; a 3xx is reported like any other non-2xx
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &EngagementClientConfig {
        &self.config
    }
}

#[async_trait]
impl EngagementSource for EngagementClient {
    async fn fetch_report(&self, range: &DateRange) -> FetchResult<EngagementReport> {
        let url = self.config.endpoint();
        let (start_date, end_date) = (range.start_param(), range.end_param());

        tracing::debug!(url = %url, start_date = %start_date, end_date = %end_date, "Requesting engagement metrics");

        let response = self
            .client
            .get(&url)
            .query(&[("start_date", &start_date), ("end_date", &end_date)])
            .send()
            .await
            .map_err(FetchError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await.map_err(FetchError::from_transport)?;
        let report: EngagementReport = serde_json::from_slice(&body)?;

        tracing::debug!(weeks = report.weeks.len(), "Engagement metrics received");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngagementClientConfig::default();
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(
            config.endpoint(),
            "https://api.example.com/api/v1/analytics/user_engagement_metrics"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = EngagementClientConfig::new("http://localhost:9000/");
        assert_eq!(
            config.endpoint(),
            "http://localhost:9000/api/v1/analytics/user_engagement_metrics"
        );
    }

    #[test]
    fn test_client_keeps_config() {
        let client = EngagementClient::new(EngagementClientConfig::new("http://localhost:9000")).unwrap();
        assert_eq!(client.config().base_url, "http://localhost:9000");
    }
}
