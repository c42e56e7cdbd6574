// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./pwnstore.toml` > `~/.config/pwnstore/pwnstore.toml`
//! > `/etc/pwnstore/pwnstore.toml`, with `PWNSTORE_` environment overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::PwnstoreConfig;

/// System-wide configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/pwnstore/pwnstore.toml";

/// Configuration file looked up in the working directory.
pub const LOCAL_CONFIG_NAME: &str = "pwnstore.toml";

/// The per-user configuration file, if a config directory exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pwnstore").join(LOCAL_CONFIG_NAME))
}

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/pwnstore/pwnstore.toml`
/// 3. `~/.config/pwnstore/pwnstore.toml`
/// 4. `./pwnstore.toml`
/// 5. `PWNSTORE_*` environment variables
pub fn load_config() -> Result<PwnstoreConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<PwnstoreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PwnstoreConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from an explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<PwnstoreConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(PwnstoreConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(PwnstoreConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_NAME))
        .merge(env_provider())
}

/// Maps `PWNSTORE_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys such as
/// `plugin_dir` contain underscores themselves.
fn env_provider() -> Env {
    Env::prefixed("PWNSTORE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    const SECTIONS: [&str; 5] = ["store", "device", "gateway", "builder", "logging"];
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("device_plugin_dir"), "device.plugin_dir");
        assert_eq!(map_env_key("store_registry_url"), "store.registry_url");
        assert_eq!(map_env_key("gateway_port"), "gateway.port");
        assert_eq!(map_env_key("logging_level"), "logging.level");
    }

    #[test]
    fn unknown_env_keys_pass_through() {
        assert_eq!(map_env_key("something"), "something");
    }

    #[test]
    fn env_overrides_file_values() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[device]\nplugin_dir = \"/from/file\"\n")?;
            jail.set_env("PWNSTORE_DEVICE_CONFIG_FILE", "/from/env/config.toml");
            let config = load_config_from_path(Path::new("custom.toml"))?;
            assert_eq!(config.device.plugin_dir, "/from/file");
            assert_eq!(config.device.config_file, "/from/env/config.toml");
            Ok(())
        });
    }
}
