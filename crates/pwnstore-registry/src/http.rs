// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! reqwest-backed [`Fetcher`].

use std::time::Duration;

use async_trait::async_trait;
use pwnstore_core::{Fetcher, PwnstoreError};
use tracing::debug;

const USER_AGENT: &str = concat!("pwnstore/", env!("CARGO_PKG_VERSION"));

/// Plain GET fetcher with a whole-request timeout. No retries.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, PwnstoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PwnstoreError::Network {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, PwnstoreError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PwnstoreError::Network {
                message: format!("request to {url} failed: {e}"),
                status: None,
            })?;

        let status = response.status();
        debug!(url, status = %status, "response received");
        if !status.is_success() {
            return Err(PwnstoreError::Network {
                message: format!("{url} returned {status}"),
                status: Some(status.as_u16()),
            });
        }

        let body = response.bytes().await.map_err(|e| PwnstoreError::Network {
            message: format!("reading body of {url} failed: {e}"),
            status: Some(status.as_u16()),
        })?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn fetches_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/x.py"))
            .respond_with(ResponseTemplate::new(200).set_body_string("__version__ = '1'"))
            .mount(&server)
            .await;

        let text = fetcher()
            .fetch_text(&format!("{}/x.py", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, "__version__ = '1'");
    }

    #[tokio::test]
    async fn non_success_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = fetcher()
            .fetch_bytes(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();
        match err {
            PwnstoreError::Network { status, .. } => assert_eq!(status, Some(404)),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        let err = fetcher()
            .fetch_bytes("http://127.0.0.1:1/nothing")
            .await
            .unwrap_err();
        assert!(matches!(err, PwnstoreError::Network { status: None, .. }));
    }
}
