// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`Fetcher`] for deterministic tests.
//!
//! Responses are keyed by exact URL. Unknown URLs answer like a 404 so code
//! under test sees the same error shape as from a real server.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pwnstore_core::{Fetcher, PwnstoreError};

/// A fetcher that serves canned bodies and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    /// Create a fetcher that knows no URLs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn with_bytes(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    /// Serve `text` for `url`.
    pub fn with_text(self, url: &str, text: &str) -> Self {
        self.with_bytes(url, text.as_bytes().to_vec())
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, PwnstoreError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.bodies.get(url) {
            Some(body) => Ok(body.clone()),
            None => Err(PwnstoreError::Network {
                message: format!("{url} returned 404 Not Found"),
                status: Some(404),
            }),
        }
    }
}
