// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What is installed on the device right now.
//!
//! Nothing is cached: every call re-reads the plugin directory, and local
//! versions come from re-scanning file text.

use std::path::{Path, PathBuf};

use pwnstore_core::types::{PLUGIN_SUFFIX, UNKNOWN_LOCAL_VERSION};
use pwnstore_core::{decode_lossy, PwnstoreError};
use pwnstore_plugin::{local_version, plugin_name};

const PACKAGE_INIT: &str = "__init__";

/// Path of the installed file for `name`.
pub fn plugin_path(plugin_dir: &Path, name: &str) -> PathBuf {
    plugin_dir.join(format!("{name}{PLUGIN_SUFFIX}"))
}

/// Installed plugin names, sorted. A missing directory means nothing is installed.
pub fn installed_plugins(plugin_dir: &Path) -> Result<Vec<String>, PwnstoreError> {
    let entries = match std::fs::read_dir(plugin_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(PwnstoreError::Internal(format!(
                "reading {}: {e}",
                plugin_dir.display()
            )))
        }
    };

    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|file| file.ends_with(PLUGIN_SUFFIX))
        .map(|file| plugin_name(&file).to_string())
        .filter(|name| name != PACKAGE_INIT)
        .collect();
    names.sort();
    Ok(names)
}

/// Whether `name` is installed.
pub fn is_installed(plugin_dir: &Path, name: &str) -> bool {
    plugin_path(plugin_dir, name).is_file()
}

/// Version declared by the installed file, or `0.0.0` when the file is
/// missing, unreadable, or declares none.
pub fn installed_version(plugin_dir: &Path, name: &str) -> String {
    std::fs::read(plugin_path(plugin_dir, name))
        .ok()
        .and_then(|bytes| local_version(&decode_lossy(&bytes)))
        .unwrap_or_else(|| UNKNOWN_LOCAL_VERSION.to_string())
}

/// Installed file text, lossily decoded.
pub fn installed_source(plugin_dir: &Path, name: &str) -> Result<String, PwnstoreError> {
    std::fs::read(plugin_path(plugin_dir, name))
        .map(|bytes| decode_lossy(&bytes))
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PwnstoreError::NotFound(format!("{name} is not installed")),
            _ => PwnstoreError::Internal(format!("reading {name}: {e}")),
        })
}
