// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwnstore build`: crawl plugin sources and publish a registry document.

use std::path::Path;

use pwnstore_core::{Fetcher, PwnstoreError};
use pwnstore_registry::{build_registry, load_source_list, write_registry};

use crate::output::Printer;

/// Run `pwnstore build`.
pub async fn run_build(
    fetcher: &dyn Fetcher,
    sources_file: &Path,
    output_file: &Path,
    out: &Printer,
) -> Result<(), PwnstoreError> {
    let sources = load_source_list(sources_file).await?;
    println!(
        "Scanning {} sources from {}...",
        sources.len(),
        sources_file.display()
    );

    let outcome = build_registry(fetcher, &sources).await;
    write_registry(output_file, &outcome.plugins).await?;

    for url in &outcome.failed_sources {
        out.warning(&format!("Skipped {url}"));
    }
    out.success(&format!(
        "Wrote {} plugins to {}",
        outcome.plugins.len(),
        output_file.display()
    ));
    Ok(())
}
