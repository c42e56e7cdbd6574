// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only queries over a fetched registry: search, source summary, and
//! display helpers for listings.

use std::collections::BTreeMap;

use pwnstore_core::PluginDescriptor;
use url::Url;

/// Listing width for descriptions before they are cut.
pub const DESCRIPTION_WIDTH: usize = 40;

/// Descriptors whose name or description contains `query`, ignoring case.
///
/// An empty query returns every entry.
pub fn search<'a>(registry: &'a [PluginDescriptor], query: &str) -> Vec<&'a PluginDescriptor> {
    let query_lower = query.to_lowercase();
    registry
        .iter()
        .filter(|d| {
            query_lower.is_empty()
                || d.name.to_lowercase().contains(&query_lower)
                || d.description.to_lowercase().contains(&query_lower)
        })
        .collect()
}

/// Human label for where a download URL points.
///
/// GitHub hosts (including raw and codeload) become `github.com/owner/repo`;
/// anything else is just the host.
pub fn source_label(download_url: &str) -> String {
    let Ok(url) = Url::parse(download_url) else {
        return "unknown".to_string();
    };
    let Some(host) = url.host_str() else {
        return "unknown".to_string();
    };

    if host == "github.com" || host.ends_with(".github.com") || host.ends_with("githubusercontent.com")
    {
        let mut segments = url.path_segments().into_iter().flatten().filter(|s| !s.is_empty());
        if let (Some(owner), Some(repo)) = (segments.next(), segments.next()) {
            return format!("github.com/{owner}/{repo}");
        }
    }
    host.to_string()
}

/// Plugin counts per source label, ordered by label.
pub fn summarize_sources(registry: &[PluginDescriptor]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for descriptor in registry {
        *counts.entry(source_label(&descriptor.download_url)).or_insert(0) += 1;
    }
    counts
}

/// Cuts a description to the listing width, marking the cut with `...`.
pub fn short_description(description: &str) -> String {
    if description.chars().count() <= DESCRIPTION_WIDTH {
        return description.to_string();
    }
    let cut: String = description.chars().take(DESCRIPTION_WIDTH).collect();
    format!("{cut}...")
}
