use crate::domain::model::HttpResponse;
use crate::domain::ports::HttpTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// reqwest 實作的 GET 傳輸層，每個請求都有固定超時
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str, accept: Option<&str>) -> Result<HttpResponse> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, DEFAULT_USER_AGENT)
            .timeout(self.timeout);

        if let Some(accept) = accept {
            request = request.header(reqwest::header::ACCEPT, accept);
        }

        tracing::debug!("GET {}", url);
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ItweetError;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_non_success_status_is_returned_as_data() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/missing")
                .header("user-agent", DEFAULT_USER_AGENT);
            then.status(404).body("Not Found");
        });

        let transport = ReqwestTransport::new();
        let response = transport.get(&server.url("/missing"), None).await.unwrap();

        api_mock.assert();
        assert_eq!(response.status, 404);
        assert_eq!(response.body, "Not Found");
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_accept_header_is_forwarded() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/meta")
                .header("accept", "application/vnd.github+json");
            then.status(200).body("{}");
        });

        let transport = ReqwestTransport::new();
        let response = transport
            .get(&server.url("/meta"), Some("application/vnd.github+json"))
            .await
            .unwrap();

        api_mock.assert();
        assert!(response.is_success());
    }

    #[tokio::test]
    async fn test_timeout_is_transport_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(1500)).body("late");
        });

        let transport = ReqwestTransport::with_timeout(Duration::from_millis(100));
        let err = transport.get(&server.url("/slow"), None).await.unwrap_err();

        assert!(matches!(err, ItweetError::TransportFailure { .. }));
    }
}
