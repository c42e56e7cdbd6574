// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metadata extraction from plugin source text.
//!
//! Plugins declare `__version__`, `__author__` and `__description__` as
//! module attributes. The description may also be a parenthesized,
//! implicitly concatenated literal spanning several lines.

use std::sync::LazyLock;

use pwnstore_core::types::{DEFAULT_AUTHOR, DEFAULT_VERSION, NO_DESCRIPTION, PLUGIN_SUFFIX};
use pwnstore_core::{Category, OriginType, PluginDescriptor};
use regex::Regex;

use crate::classifier::classify;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"__version__\s*=\s*['"]([^'"]+)['"]"#).unwrap());

static LOCAL_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"__version__\s*=\s*["'](.+?)["']"#).unwrap());

static AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"__author__\s*=\s*['"]([^'"]+)['"]"#).unwrap());

static DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)__description__\s*=\s*(?:['"]([^'"]+)['"]|\(([^)]+)\))"#).unwrap()
});

static QUOTES_AND_NEWLINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"['"\n\r]"#).unwrap());

static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Raw metadata fields found in a source file, before defaults are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMetadata {
    pub version: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
}

impl RawMetadata {
    /// A file is only treated as a plugin if it declares a version or a description.
    pub fn looks_like_plugin(&self) -> bool {
        self.version.is_some() || self.description.is_some()
    }
}

/// Searches `code` for the three metadata attributes.
pub fn scan_metadata(code: &str) -> RawMetadata {
    RawMetadata {
        version: capture(&VERSION_RE, code),
        author: capture(&AUTHOR_RE, code),
        description: scan_description(code),
    }
}

fn capture(re: &Regex, code: &str) -> Option<String> {
    re.captures(code)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn scan_description(code: &str) -> Option<String> {
    let caps = DESCRIPTION_RE.captures(code)?;
    if let Some(single) = caps.get(1) {
        return Some(single.as_str().to_string());
    }
    let joined = caps.get(2)?.as_str();
    let stripped = QUOTES_AND_NEWLINES_RE.replace_all(joined, "");
    let collapsed = WHITESPACE_RUN_RE.replace_all(&stripped, " ");
    let description = collapsed.trim();
    (!description.is_empty()).then(|| description.to_string())
}

/// Plugin name for a file name: the name with the plugin suffix stripped.
pub fn plugin_name(filename: &str) -> &str {
    filename.strip_suffix(PLUGIN_SUFFIX).unwrap_or(filename)
}

/// Builds a descriptor for one candidate file, or `None` if it is not a plugin.
///
/// `internal_path` is the entry path when the file came from an archive at
/// `origin_url`; otherwise `origin_url` is the file itself.
pub fn extract_descriptor(
    code: &str,
    filename: &str,
    origin_url: &str,
    internal_path: Option<&str>,
) -> Option<PluginDescriptor> {
    let raw = scan_metadata(code);
    if !raw.looks_like_plugin() {
        tracing::debug!(filename, "no version or description, skipping");
        return None;
    }

    let category: Category = classify(code, filename);
    let (origin_type, path_inside_zip) = match internal_path {
        Some(path) if !path.is_empty() => (OriginType::Zip, Some(path.to_string())),
        _ => (OriginType::Single, None),
    };

    Some(PluginDescriptor {
        name: plugin_name(filename).to_string(),
        version: raw.version.unwrap_or_else(|| DEFAULT_VERSION.to_string()),
        description: raw.description.unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        author: raw.author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
        category,
        origin_type,
        download_url: origin_url.to_string(),
        path_inside_zip,
    })
}

/// The `__version__` of an installed file's text, if declared.
pub fn local_version(code: &str) -> Option<String> {
    capture(&LOCAL_VERSION_RE, code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FULL: &str = r#"
import logging
import pwnagotchi.plugins as plugins

class Thing(plugins.Plugin):
    __author__ = 'someone@example.com'
    __version__ = '1.2.3'
    __license__ = 'GPL3'
    __description__ = 'Does a thing'
"#;

    #[test]
    fn extracts_all_fields() {
        let d = extract_descriptor(FULL, "thing.py", "http://h/thing.py", None).unwrap();
        assert_eq!(d.name, "thing");
        assert_eq!(d.version, "1.2.3");
        assert_eq!(d.author, "someone@example.com");
        assert_eq!(d.description, "Does a thing");
        assert_eq!(d.origin_type, OriginType::Single);
        assert_eq!(d.download_url, "http://h/thing.py");
        assert!(d.path_inside_zip.is_none());
    }

    #[test]
    fn parenthesized_description_is_joined() {
        let code = r#"
__version__ = "2.0"
__description__ = (
    "First half of the sentence "
    'and the second half.'
)
"#;
        let raw = scan_metadata(code);
        assert_eq!(
            raw.description.as_deref(),
            Some("First half of the sentence and the second half.")
        );
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let code = "__description__ = \"only a description\"\n";
        let d = extract_descriptor(code, "desc.py", "http://h/desc.py", None).unwrap();
        assert_eq!(d.version, DEFAULT_VERSION);
        assert_eq!(d.author, DEFAULT_AUTHOR);
    }

    #[test]
    fn version_only_gets_sentinel_description() {
        let code = "__version__ = '0.9'\n";
        let d = extract_descriptor(code, "v.py", "http://h/v.py", None).unwrap();
        assert_eq!(d.description, NO_DESCRIPTION);
    }

    #[test]
    fn non_plugin_yields_nothing() {
        let code = "__author__ = 'x'\ndef helper():\n    return 1\n";
        assert!(extract_descriptor(code, "helper.py", "http://h/helper.py", None).is_none());
    }

    #[test]
    fn archive_origin_records_path() {
        let d = extract_descriptor(
            FULL,
            "thing.py",
            "http://h/repo.zip",
            Some("repo-main/thing.py"),
        )
        .unwrap();
        assert_eq!(d.origin_type, OriginType::Zip);
        assert_eq!(d.path_inside_zip.as_deref(), Some("repo-main/thing.py"));
        assert_eq!(d.download_url, "http://h/repo.zip");
    }

    #[test]
    fn local_version_reads_double_quotes() {
        assert_eq!(
            local_version("__version__ = \"1.0\"\n").as_deref(),
            Some("1.0")
        );
        assert!(local_version("no version here").is_none());
    }

    proptest! {
        #[test]
        fn recovers_any_version_literal(version in "[A-Za-z0-9._+-]{1,20}") {
            let code = format!("__version__ = '{version}'\n");
            let raw = scan_metadata(&code);
            prop_assert_eq!(raw.version.as_deref(), Some(version.as_str()));
        }
    }
}
