// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for pwnstore.
//!
//! Layered TOML parsing with strict validation (`deny_unknown_fields`), XDG
//! lookup, `PWNSTORE_*` environment overrides, and miette diagnostics with
//! typo suggestions.
//!
//! This is the tool's own configuration. The device's `config.toml`, which
//! pwnstore edits on behalf of plugins, is handled by `pwnstore-store`.
//!
//! # Usage
//!
//! ```no_run
//! use pwnstore_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Plugins live in {}", config.device.plugin_dir);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{render_errors, ConfigError};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::PwnstoreConfig;

use std::path::Path;

/// Load configuration from the standard hierarchy and validate it.
pub fn load_and_validate() -> Result<PwnstoreConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load configuration from an explicit file (plus env overrides) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<PwnstoreConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<PwnstoreConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read the TOML files that took part in loading, for error span resolution.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut candidates = vec![Path::new(loader::SYSTEM_CONFIG_PATH).to_path_buf()];
    if let Some(user) = loader::user_config_path() {
        candidates.push(user);
    }
    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(loader::LOCAL_CONFIG_NAME));
    }

    candidates
        .into_iter()
        .filter_map(|path| {
            std::fs::read_to_string(&path)
                .ok()
                .map(|content| (path.display().to_string(), content))
        })
        .collect()
}
