use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::HealthConfig;
use crate::error::HealthError;
use crate::types::feed::FeedDocument;

/// Where health feed documents come from.
#[async_trait]
pub trait HealthFeedSource: Send + Sync {
    async fn fetch(&self) -> Result<FeedDocument, HealthError>;
}

/// Fetches the feed with a single HTTP GET.
pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
}

impl HttpFeedSource {
    pub fn new(config: &HealthConfig) -> Result<Self, HealthError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(|e| HealthError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: config.feed_url.clone(),
        })
    }

    /// The feed body exactly as served.
    pub async fn fetch_raw(&self) -> Result<Value, HealthError> {
        debug!(url = %self.url, "Fetching health feed");
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "Health feed request failed");
                HealthError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                url = %self.url,
                status = status.as_u16(),
                "Health feed returned an error status"
            );
            return Err(HealthError::UpstreamStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HealthError::Parse(e.to_string()))
    }
}

#[async_trait]
impl HealthFeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<FeedDocument, HealthError> {
        let body = self.fetch_raw().await?;
        Ok(serde_json::from_value(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> HealthConfig {
        HealthConfig {
            feed_url: format!("{}/api/status", server.uri()),
            timeout: Duration::from_secs(5),
            ..HealthConfig::default()
        }
    }

    #[tokio::test]
    async fn fetch_decodes_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/status"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "meta": { "period": "24h", "count": 1 },
                "data": [{
                    "provider": "foxcode",
                    "service": "cc",
                    "current_status": { "status": 1, "latency": 42, "timestamp": 1710000000 },
                    "timeline": []
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = HttpFeedSource::new(&config_for(&server)).unwrap();
        let entries = source.fetch().await.unwrap().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].provider, "foxcode");
    }

    #[tokio::test]
    async fn sends_configured_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", "relaywatch-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let config = HealthConfig {
            user_agent: "relaywatch-test".to_string(),
            ..config_for(&server)
        };
        let source = HttpFeedSource::new(&config).unwrap();
        assert!(source.fetch().await.unwrap().data.is_empty());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = HttpFeedSource::new(&config_for(&server)).unwrap();
        assert_eq!(source.fetch().await.unwrap_err(), HealthError::UpstreamStatus(503));
    }

    #[tokio::test]
    async fn non_json_body_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let source = HttpFeedSource::new(&config_for(&server)).unwrap();
        assert!(matches!(source.fetch_raw().await, Err(HealthError::Parse(_))));
    }

    #[tokio::test]
    async fn document_without_data_is_a_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"meta": {}})))
            .mount(&server)
            .await;

        let source = HttpFeedSource::new(&config_for(&server)).unwrap();
        assert!(source.fetch_raw().await.is_ok());
        assert!(matches!(source.fetch().await, Err(HealthError::Parse(_))));
    }

    #[tokio::test]
    async fn slow_feed_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": []}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = HealthConfig {
            timeout: Duration::from_millis(50),
            ..config_for(&server)
        };
        let source = HttpFeedSource::new(&config).unwrap();
        assert!(matches!(source.fetch().await, Err(HealthError::Timeout(_))));
    }

    #[tokio::test]
    async fn unreachable_feed_is_a_transport_error() {
        let config = HealthConfig {
            feed_url: "http://127.0.0.1:9/api/status".to_string(),
            ..HealthConfig::default()
        };
        let source = HttpFeedSource::new(&config).unwrap();
        assert!(matches!(source.fetch().await, Err(HealthError::Transport(_))));
    }
}
