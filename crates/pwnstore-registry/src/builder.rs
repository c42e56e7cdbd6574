// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry builder: crawls source locations and assembles the registry
//! document.
//!
//! A failing source is logged and contributes nothing; it never stops the
//! crawl.

use std::io::{Cursor, Read};
use std::path::Path;

use pwnstore_core::types::PLUGIN_SUFFIX;
use pwnstore_core::{decode_lossy, Fetcher, PluginDescriptor, PwnstoreError, RegistryDocument};
use pwnstore_plugin::extract_descriptor;
use tracing::{debug, info, warn};
use zip::ZipArchive;

const ARCHIVE_SUFFIX: &str = ".zip";
const PACKAGE_INIT: &str = "__init__";

/// One line of the source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A zip archive whose plugin files are enumerated.
    Archive(String),
    /// A single plugin file fetched as text.
    RawFile(String),
}

impl Source {
    pub fn url(&self) -> &str {
        match self {
            Source::Archive(url) | Source::RawFile(url) => url,
        }
    }
}

/// Result of a crawl.
#[derive(Debug, Default)]
pub struct BuildOutcome {
    /// Descriptors in crawl order.
    pub plugins: RegistryDocument,
    /// Sources that failed and contributed nothing.
    pub failed_sources: Vec<String>,
}

/// Parses a source list: one URL per line, blank lines and `#` comments skipped.
pub fn parse_source_list(text: &str) -> Vec<Source> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            if line.ends_with(ARCHIVE_SUFFIX) {
                Source::Archive(line.to_string())
            } else {
                Source::RawFile(line.to_string())
            }
        })
        .collect()
}

/// Reads and parses a source list file.
pub async fn load_source_list(path: &Path) -> Result<Vec<Source>, PwnstoreError> {
    let text = tokio::fs::read_to_string(path).await.map_err(|e| {
        PwnstoreError::NotFound(format!("source list {}: {e}", path.display()))
    })?;
    Ok(parse_source_list(&text))
}

/// Whether an archive entry is a plugin candidate.
///
/// Candidates carry the plugin suffix, are not package init files, and sit
/// under no hidden path segment.
pub fn is_candidate_entry(entry_name: &str) -> bool {
    entry_name.ends_with(PLUGIN_SUFFIX)
        && !entry_name.contains(PACKAGE_INIT)
        && !entry_name.split('/').any(|segment| segment.starts_with('.'))
}

/// Extracts descriptors from every candidate entry of an in-memory archive.
///
/// An unreadable archive is an error; an unreadable entry is skipped.
pub fn scan_archive(bytes: &[u8], archive_url: &str) -> Result<Vec<PluginDescriptor>, PwnstoreError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| PwnstoreError::Archive(format!("{archive_url}: {e}")))?;

    let mut found = Vec::new();
    for index in 0..archive.len() {
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(archive = archive_url, index, error = %e, "unreadable archive entry");
                continue;
            }
        };
        if entry.is_dir() || !is_candidate_entry(entry.name()) {
            continue;
        }

        let entry_path = entry.name().to_string();
        let mut raw = Vec::new();
        if let Err(e) = entry.read_to_end(&mut raw) {
            warn!(archive = archive_url, entry = %entry_path, error = %e, "failed to read entry");
            continue;
        }

        let code = decode_lossy(&raw);
        let filename = entry_path.rsplit('/').next().unwrap_or(&entry_path);
        if let Some(descriptor) = extract_descriptor(&code, filename, archive_url, Some(&entry_path)) {
            debug!(name = %descriptor.name, category = %descriptor.category, "found plugin");
            found.push(descriptor);
        }
    }
    Ok(found)
}

/// Extracts the descriptor of a single raw plugin file, if it is one.
pub fn scan_raw_file(code: &str, url: &str) -> Option<PluginDescriptor> {
    let filename = url.rsplit('/').next().unwrap_or(url);
    extract_descriptor(code, filename, url, None)
}

/// Crawls every source in order.
pub async fn build_registry(fetcher: &dyn Fetcher, sources: &[Source]) -> BuildOutcome {
    let mut outcome = BuildOutcome::default();

    for source in sources {
        match crawl_source(fetcher, source).await {
            Ok(plugins) => {
                info!(source = source.url(), count = plugins.len(), "source crawled");
                outcome.plugins.extend(plugins);
            }
            Err(e) => {
                warn!(source = source.url(), error = %e, "skipping source");
                outcome.failed_sources.push(source.url().to_string());
            }
        }
    }

    outcome
}

async fn crawl_source(
    fetcher: &dyn Fetcher,
    source: &Source,
) -> Result<Vec<PluginDescriptor>, PwnstoreError> {
    match source {
        Source::Archive(url) => {
            let bytes = fetcher.fetch_bytes(url).await?;
            scan_archive(&bytes, url)
        }
        Source::RawFile(url) => {
            let code = fetcher.fetch_text(url).await?;
            Ok(scan_raw_file(&code, url).into_iter().collect())
        }
    }
}

/// Writes the registry document as pretty-printed JSON, replacing any
/// previous file.
pub async fn write_registry(path: &Path, plugins: &[PluginDescriptor]) -> Result<(), PwnstoreError> {
    let json = serde_json::to_string_pretty(plugins)
        .map_err(|e| PwnstoreError::Internal(format!("serializing registry: {e}")))?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| PwnstoreError::Internal(format!("writing {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwnstore_core::OriginType;
    use pwnstore_test_utils::{zip_archive, MockFetcher};

    #[test]
    fn source_list_skips_blanks_and_comments() {
        let text = "# comment\n\nhttps://h/repo.zip\n  https://h/raw/a.py  \n";
        assert_eq!(
            parse_source_list(text),
            vec![
                Source::Archive("https://h/repo.zip".into()),
                Source::RawFile("https://h/raw/a.py".into()),
            ]
        );
    }

    #[test]
    fn candidate_entry_rules() {
        assert!(is_candidate_entry("repo-main/plugins/a.py"));
        assert!(!is_candidate_entry("repo-main/__init__.py"));
        assert!(!is_candidate_entry("repo-main/.github/hook.py"));
        assert!(!is_candidate_entry("repo-main/README.md"));
    }

    #[test]
    fn archive_with_init_yields_one_descriptor() {
        let bytes = zip_archive(&[
            ("repo-main/a.py", "__version__ = \"1.0\"\n"),
            ("repo-main/__init__.py", "__version__ = \"9.9\"\n"),
        ]);
        let found = scan_archive(&bytes, "http://h/repo.zip").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "a");
        assert_eq!(found[0].origin_type, OriginType::Zip);
        assert_eq!(found[0].path_inside_zip.as_deref(), Some("repo-main/a.py"));
        assert_eq!(found[0].download_url, "http://h/repo.zip");
    }

    #[test]
    fn archive_skips_non_plugins_and_keeps_order() {
        let bytes = zip_archive(&[
            ("r/b.py", "__description__ = 'second letter'\n"),
            ("r/helper.py", "def f():\n    pass\n"),
            ("r/a.py", "__version__ = '0.1'\n"),
        ]);
        let names: Vec<_> = scan_archive(&bytes, "http://h/r.zip")
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn corrupt_archive_is_archive_error() {
        let err = scan_archive(b"not a zip", "http://h/bad.zip").unwrap_err();
        assert!(matches!(err, PwnstoreError::Archive(_)));
    }

    #[tokio::test]
    async fn failing_source_does_not_stop_crawl() {
        let fetcher = MockFetcher::new()
            .with_text("http://h/raw/good.py", "__version__ = '2.0'\n")
            .with_bytes("http://h/broken.zip", b"garbage".to_vec());
        let sources = parse_source_list(
            "http://h/missing.py\nhttp://h/broken.zip\nhttp://h/raw/good.py\n",
        );

        let outcome = build_registry(&fetcher, &sources).await;
        assert_eq!(outcome.plugins.len(), 1);
        assert_eq!(outcome.plugins[0].name, "good");
        assert_eq!(outcome.plugins[0].origin_type, OriginType::Single);
        assert_eq!(outcome.failed_sources.len(), 2);
    }

    #[tokio::test]
    async fn duplicate_names_are_all_kept_in_order() {
        let fetcher = MockFetcher::new()
            .with_text("http://one/dup.py", "__version__ = '1'\n")
            .with_text("http://two/dup.py", "__version__ = '2'\n");
        let sources = parse_source_list("http://one/dup.py\nhttp://two/dup.py\n");

        let outcome = build_registry(&fetcher, &sources).await;
        assert_eq!(outcome.plugins.len(), 2);
        let first = pwnstore_core::find_plugin(&outcome.plugins, "dup").unwrap();
        assert_eq!(first.version, "1");
    }

    #[tokio::test]
    async fn written_registry_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plugins.json");
        let plugins = scan_archive(
            &zip_archive(&[("x/a.py", "__version__ = '1.0'\n")]),
            "http://h/x.zip",
        )
        .unwrap();

        write_registry(&path, &plugins).await.unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: RegistryDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, plugins);
        assert!(text.contains("\"path_inside_zip\""));
    }
}
