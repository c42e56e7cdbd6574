// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::PwnstoreConfig;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &PwnstoreConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "store.registry_url", &config.store.registry_url);
    if let Some(update_url) = &config.store.update_url {
        check_url(&mut errors, "store.update_url", update_url);
    }

    check_non_empty(&mut errors, "device.plugin_dir", &config.device.plugin_dir);
    check_non_empty(&mut errors, "device.config_file", &config.device.config_file);
    check_non_empty(&mut errors, "gateway.host", &config.gateway.host);
    check_non_empty(&mut errors, "builder.sources_file", &config.builder.sources_file);
    check_non_empty(&mut errors, "builder.output_file", &config.builder.output_file);

    if !config.gateway.path_prefix.starts_with('/') {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.path_prefix must start with `/`, got `{}`",
                config.gateway.path_prefix
            ),
        });
    }

    for (key, value) in [
        ("store.request_timeout_secs", config.store.request_timeout_secs),
        ("store.download_timeout_secs", config.store.download_timeout_secs),
        ("gateway.install_timeout_secs", config.gateway.install_timeout_secs),
        ("gateway.uninstall_timeout_secs", config.gateway.uninstall_timeout_secs),
        ("gateway.configure_timeout_secs", config.gateway.configure_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{key} must be greater than zero"),
            });
        }
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of trace, debug, info, warn, error",
                config.logging.level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_non_empty(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
    } else if !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{value}` must use http or https"),
        });
    }
}
