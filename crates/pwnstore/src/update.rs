// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwnstore update`: replace the running executable with the published one.
//!
//! The download is staged in a temp file beside the current executable and
//! swapped in with `self-replace`, so an interrupted update leaves the old
//! binary in place.

use std::io::Write;
use std::path::Path;

use pwnstore_core::{Fetcher, PwnstoreError};
use pwnstore_store::Engine;
use tracing::info;

use crate::output::Printer;

/// Leading bytes of formats we are willing to install.
const EXECUTABLE_MAGIC: &[&[u8]] = &[
    b"\x7fELF",
    b"#!",
    b"MZ",
    b"\xfe\xed\xfa\xce",
    b"\xfe\xed\xfa\xcf",
    b"\xce\xfa\xed\xfe",
    b"\xcf\xfa\xed\xfe",
    b"\xca\xfe\xba\xbe",
];

/// Run `pwnstore update`.
pub async fn run_update(
    engine: &Engine,
    fetcher: &dyn Fetcher,
    url: &str,
    out: &Printer,
) -> Result<(), PwnstoreError> {
    engine.require_privilege()?;

    println!("Downloading {url}...");
    let payload = fetcher.fetch_bytes(url).await?;
    if !looks_executable(&payload) {
        return Err(PwnstoreError::Validation(format!(
            "{url} did not return an executable ({} bytes)",
            payload.len()
        )));
    }

    let current = std::env::current_exe()
        .map_err(|e| PwnstoreError::Internal(format!("locating current executable: {e}")))?;
    let size = payload.len();
    tokio::task::spawn_blocking(move || replace_executable(&current, &payload))
        .await
        .map_err(|e| PwnstoreError::Internal(format!("update task failed: {e}")))??;

    info!(url, bytes = size, "executable replaced");
    out.success("pwnstore updated. Run 'pwnstore --version' to confirm.");
    Ok(())
}

fn looks_executable(payload: &[u8]) -> bool {
    EXECUTABLE_MAGIC.iter().any(|magic| payload.starts_with(magic))
}

fn replace_executable(current: &Path, payload: &[u8]) -> Result<(), PwnstoreError> {
    let internal = |what: &str, e: std::io::Error| PwnstoreError::Internal(format!("{what}: {e}"));
    let dir = current.parent().unwrap_or_else(|| Path::new("."));

    let mut staged =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| internal("staging update", e))?;
    staged
        .write_all(payload)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|e| internal("writing update", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o755))
            .map_err(|e| internal("marking update executable", e))?;
    }

    self_replace::self_replace(staged.path()).map_err(|e| internal("replacing executable", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_binaries_and_scripts() {
        assert!(looks_executable(b"\x7fELF\x02\x01\x01"));
        assert!(looks_executable(b"#!/usr/bin/env python3\n"));
        assert!(looks_executable(b"\xcf\xfa\xed\xfe\x07"));
    }

    #[test]
    fn rejects_html_and_json() {
        assert!(!looks_executable(b"<!DOCTYPE html>"));
        assert!(!looks_executable(b"[{\"name\": \"x\"}]"));
        assert!(!looks_executable(b""));
    }
}
