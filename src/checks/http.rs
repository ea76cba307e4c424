//! HTTP reachability probe.

use std::time::Duration;

use async_trait::async_trait;
use tracing::error;

use crate::check::{CheckResult, CheckStatus, HealthCheck};
use crate::error::BoxError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes a list of URLs with HEAD requests.
///
/// Each URL contributes one datum (`url -> "UP"` or `url -> "DOWN"`); any
/// non-2xx answer, connect failure, or timeout makes the whole result down.
pub struct HttpCheck {
    name: String,
    urls: Vec<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpCheck {
    /// Create a new reachability probe over the given URLs.
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            name: "http".to_string(),
            urls,
            timeout: DEFAULT_TIMEOUT,
            client: reqwest::Client::builder().build().unwrap_or_default(),
        }
    }

    /// Override the check name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom HTTP client.
    ///
    /// The timeout from [`with_timeout`](Self::with_timeout) is applied per
    /// request, so the two setters can be chained in either order.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Whether one URL answers a HEAD request with a 2xx status.
    async fn probe_url(&self, url: &str) -> bool {
        match self.client.head(url).timeout(self.timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                error!(check = %self.name, url = %url, error = %e, "HTTP health check request failed");
                false
            }
        }
    }
}

#[async_trait]
impl HealthCheck for HttpCheck {
    async fn check(&self) -> Result<CheckResult, BoxError> {
        let mut result = CheckResult::up(&self.name);

        for url in &self.urls {
            if self.probe_url(url).await {
                result = result.with_data(url.clone(), "UP");
            } else {
                result = result
                    .with_data(url.clone(), "DOWN")
                    .with_status(CheckStatus::Down);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::DataValue;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reachable_url_is_up() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/status", server.uri());
        let check = HttpCheck::new(vec![url.clone()]);
        let result = check.check().await.unwrap();

        assert!(result.is_up());
        assert_eq!(result.data.get(&url), Some(&DataValue::from("UP")));
    }

    #[tokio::test]
    async fn test_error_status_is_down() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = server.uri();
        let check = HttpCheck::new(vec![url.clone()]);
        let result = check.check().await.unwrap();

        assert!(!result.is_up());
        assert_eq!(result.data.get(&url), Some(&DataValue::from("DOWN")));
    }

    #[tokio::test]
    async fn test_unreachable_url_is_down() {
        let url = "http://127.0.0.1:1/status".to_string();
        let check = HttpCheck::new(vec![url.clone()]).with_timeout(Duration::from_millis(500));
        let result = check.check().await.unwrap();

        assert!(!result.is_up());
        assert_eq!(result.data.get(&url), Some(&DataValue::from("DOWN")));
    }

    #[tokio::test]
    async fn test_one_bad_url_takes_the_result_down() {
        let healthy = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&healthy)
            .await;
        let failing = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&failing)
            .await;

        let healthy_url = healthy.uri();
        let failing_url = failing.uri();
        let check = HttpCheck::new(vec![healthy_url.clone(), failing_url.clone()])
            .with_name("upstreams");
        let result = check.check().await.unwrap();

        assert_eq!(result.name, "upstreams");
        assert!(!result.is_up());
        assert_eq!(result.data.get(&healthy_url), Some(&DataValue::from("UP")));
        assert_eq!(result.data.get(&failing_url), Some(&DataValue::from("DOWN")));
    }

    #[tokio::test]
    async fn test_no_urls_is_up() {
        let check = HttpCheck::new(Vec::new());
        let result = check.check().await.unwrap();
        assert!(result.is_up());
        assert!(result.data.is_empty());
    }

    #[tokio::test]
    async fn test_custom_client_survives_later_timeout() {
        let server = MockServer::start().await;
        // Only requests carrying the tag header match; anything else
        // misses the mock and gets a 404.
        Mock::given(method("HEAD"))
            .and(header("x-vitals-tag", "custom"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "x-vitals-tag",
            reqwest::header::HeaderValue::from_static("custom"),
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .unwrap();

        let url = server.uri();
        let check = HttpCheck::new(vec![url.clone()])
            .with_client(client)
            .with_timeout(Duration::from_secs(1));
        let result = check.check().await.unwrap();

        assert!(result.is_up());
        assert_eq!(result.data.get(&url), Some(&DataValue::from("UP")));
    }

    #[tokio::test]
    async fn test_timeout_applies_through_custom_client() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let url = server.uri();
        let check = HttpCheck::new(vec![url.clone()])
            .with_client(reqwest::Client::new())
            .with_timeout(Duration::from_millis(50));
        let result = check.check().await.unwrap();

        assert!(!result.is_up());
        assert_eq!(result.data.get(&url), Some(&DataValue::from("DOWN")));
    }
}
