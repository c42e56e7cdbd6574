// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Network fetch seam.

use async_trait::async_trait;

use crate::error::PwnstoreError;

/// Fetches remote resources (registry documents, plugin files, archives).
///
/// Implementations must map connection failures and non-success statuses to
/// [`PwnstoreError::Network`].
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the raw bytes at `url`.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, PwnstoreError>;

    /// Fetches `url` as text, dropping invalid UTF-8 sequences.
    async fn fetch_text(&self, url: &str) -> Result<String, PwnstoreError> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(decode_lossy(&bytes))
    }
}

/// Decodes bytes as UTF-8, dropping invalid sequences instead of failing.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo(Vec<u8>);

    #[async_trait]
    impl Fetcher for Echo {
        async fn fetch_bytes(&self, _url: &str) -> Result<Vec<u8>, PwnstoreError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn decode_lossy_drops_invalid_bytes() {
        let bytes = b"__version__ = \"1.0\"\xff\xfe # tail";
        assert_eq!(decode_lossy(bytes), "__version__ = \"1.0\" # tail");
    }

    #[test]
    fn decode_lossy_keeps_multibyte_text() {
        assert_eq!(decode_lossy("café ☕".as_bytes()), "café ☕");
    }

    #[tokio::test]
    async fn fetch_text_uses_lossy_decoding() {
        let fetcher = Echo(b"ok\x80".to_vec());
        assert_eq!(fetcher.fetch_text("http://h/x").await.unwrap(), "ok");
    }
}
