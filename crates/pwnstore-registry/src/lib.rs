// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Building and fetching the pwnstore registry document.

pub mod builder;
pub mod client;
pub mod http;

pub use builder::{
    build_registry, load_source_list, parse_source_list, scan_archive, write_registry,
    BuildOutcome, Source,
};
pub use client::{parse_registry, url_override, RegistryClient};
pub use http::HttpFetcher;
