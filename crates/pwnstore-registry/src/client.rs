// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry client: resolves where the registry document lives and fetches it.
//!
//! Read-only. Any fetch or parse failure is returned to the caller; there is
//! no retry and no cached fallback.

use std::path::Path;
use std::sync::{Arc, LazyLock};

use pwnstore_core::{Fetcher, PwnstoreError, RegistryDocument};
use regex::Regex;
use tracing::debug;

/// `main.pwnstore_url = "<url>"` in the device config overrides the registry URL.
static URL_OVERRIDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*main\.pwnstore_url\s*=\s*["']([^"']+)["']"#).unwrap()
});

/// The registry override declared in device config text, if any.
pub fn url_override(config_text: &str) -> Option<String> {
    URL_OVERRIDE_RE
        .captures(config_text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Parses a registry document.
pub fn parse_registry(bytes: &[u8]) -> Result<RegistryDocument, PwnstoreError> {
    serde_json::from_slice(bytes).map_err(|e| PwnstoreError::Parse(format!("registry document: {e}")))
}

/// Fetches the registry document from a resolved location.
///
/// Plugin payloads go through a separate downloader when one is set, so the
/// registry and file downloads can run under different timeouts.
#[derive(Clone)]
pub struct RegistryClient {
    fetcher: Arc<dyn Fetcher>,
    downloader: Option<Arc<dyn Fetcher>>,
    url: String,
}

impl RegistryClient {
    pub fn new(fetcher: Arc<dyn Fetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            downloader: None,
            url: url.into(),
        }
    }

    /// Routes plugin downloads through `downloader`.
    pub fn with_downloader(mut self, downloader: Arc<dyn Fetcher>) -> Self {
        self.downloader = Some(downloader);
        self
    }

    /// Uses the override from the device config at `config_path` when one is
    /// declared, otherwise `default_url`. An unreadable config file means no
    /// override.
    pub fn resolve(fetcher: Arc<dyn Fetcher>, default_url: &str, config_path: &Path) -> Self {
        let url = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|text| url_override(&text))
            .unwrap_or_else(|| default_url.to_string());
        debug!(url = %url, "registry location resolved");
        Self::new(fetcher, url)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetcher for plugin files and archives.
    pub fn downloader(&self) -> &Arc<dyn Fetcher> {
        self.downloader.as_ref().unwrap_or(&self.fetcher)
    }

    /// Fetches and parses the registry document.
    pub async fn fetch(&self) -> Result<RegistryDocument, PwnstoreError> {
        let bytes = self.fetcher.fetch_bytes(&self.url).await?;
        let registry = parse_registry(&bytes)?;
        debug!(url = %self.url, count = registry.len(), "registry fetched");
        Ok(registry)
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient").field("url", &self.url).finish_non_exhaustive()
    }
}
