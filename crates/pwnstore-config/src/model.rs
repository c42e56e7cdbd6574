// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for pwnstore.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in
//! `pwnstore.toml` is reported instead of silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level pwnstore configuration.
///
/// Every section is optional and defaults to the stock Pwnagotchi layout.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PwnstoreConfig {
    /// Registry and self-update locations.
    #[serde(default)]
    pub store: StoreConfig,

    /// Paths on the target device.
    #[serde(default)]
    pub device: DeviceConfig,

    /// Embedded web facade settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Registry builder inputs and outputs.
    #[serde(default)]
    pub builder: BuilderConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the registry document and the tool itself are published.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Default registry document URL. The device config's
    /// `main.pwnstore_url` line takes precedence when present.
    #[serde(default = "default_registry_url")]
    pub registry_url: String,

    /// Where `pwnstore update` downloads the new executable from.
    /// Derived from `registry_url` when unset.
    #[serde(default)]
    pub update_url: Option<String>,

    /// Timeout for registry and self-update requests.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for plugin file and archive downloads.
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl StoreConfig {
    /// The self-update URL, falling back to the registry URL's sibling `pwnstore`.
    pub fn resolved_update_url(&self) -> String {
        match &self.update_url {
            Some(url) => url.clone(),
            None => match self.registry_url.strip_suffix("plugins.json") {
                Some(base) => format!("{base}pwnstore"),
                None => format!("{}/pwnstore", self.registry_url.trim_end_matches('/')),
            },
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            registry_url: default_registry_url(),
            update_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

fn default_registry_url() -> String {
    "https://raw.githubusercontent.com/wpa-2/pwnagotchi-store/main/plugins.json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_download_timeout_secs() -> u64 {
    30
}

/// Paths on the device being managed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    /// Directory the host process loads custom plugins from.
    #[serde(default = "default_plugin_dir")]
    pub plugin_dir: String,

    /// The host's line-oriented `config.toml`.
    #[serde(default = "default_config_file")]
    pub config_file: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            plugin_dir: default_plugin_dir(),
            config_file: default_config_file(),
        }
    }
}

fn default_plugin_dir() -> String {
    "/usr/local/share/pwnagotchi/custom-plugins".to_string()
}

fn default_config_file() -> String {
    "/etc/pwnagotchi/config.toml".to_string()
}

/// Embedded web facade configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Path prefix all web routes live under.
    #[serde(default = "default_path_prefix")]
    pub path_prefix: String,

    /// Budget for a single install request.
    #[serde(default = "default_install_timeout_secs")]
    pub install_timeout_secs: u64,

    /// Budget for a single uninstall request.
    #[serde(default = "default_uninstall_timeout_secs")]
    pub uninstall_timeout_secs: u64,

    /// Budget for a single configure request.
    #[serde(default = "default_configure_timeout_secs")]
    pub configure_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            path_prefix: default_path_prefix(),
            install_timeout_secs: default_install_timeout_secs(),
            uninstall_timeout_secs: default_uninstall_timeout_secs(),
            configure_timeout_secs: default_configure_timeout_secs(),
        }
    }
}

fn default_gateway_host() -> String {
    "0.0.0.0".to_string()
}

fn default_gateway_port() -> u16 {
    8666
}

fn default_path_prefix() -> String {
    "/plugins/pwnstore_ui".to_string()
}

fn default_install_timeout_secs() -> u64 {
    60
}

fn default_uninstall_timeout_secs() -> u64 {
    30
}

fn default_configure_timeout_secs() -> u64 {
    30
}

/// Registry builder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BuilderConfig {
    /// One source location per line; blank lines and `#` comments are skipped.
    #[serde(default = "default_sources_file")]
    pub sources_file: String,

    /// Where the registry document is written.
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            sources_file: default_sources_file(),
            output_file: default_output_file(),
        }
    }
}

fn default_sources_file() -> String {
    "repos.txt".to_string()
}

fn default_output_file() -> String {
    "plugins.json".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_device_layout() {
        let config = PwnstoreConfig::default();
        assert_eq!(
            config.device.plugin_dir,
            "/usr/local/share/pwnagotchi/custom-plugins"
        );
        assert_eq!(config.device.config_file, "/etc/pwnagotchi/config.toml");
        assert_eq!(config.gateway.install_timeout_secs, 60);
        assert_eq!(config.gateway.uninstall_timeout_secs, 30);
        assert_eq!(config.gateway.configure_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn update_url_derives_from_registry_url() {
        let store = StoreConfig {
            registry_url: "https://example.com/store/plugins.json".into(),
            ..StoreConfig::default()
        };
        assert_eq!(
            store.resolved_update_url(),
            "https://example.com/store/pwnstore"
        );
    }

    #[test]
    fn explicit_update_url_wins() {
        let store = StoreConfig {
            update_url: Some("https://example.com/bin/pwnstore-armv7".into()),
            ..StoreConfig::default()
        };
        assert_eq!(
            store.resolved_update_url(),
            "https://example.com/bin/pwnstore-armv7"
        );
    }

    #[test]
    fn update_url_for_non_json_registry() {
        let store = StoreConfig {
            registry_url: "https://example.com/registry/".into(),
            ..StoreConfig::default()
        };
        assert_eq!(
            store.resolved_update_url(),
            "https://example.com/registry/pwnstore"
        );
    }
}
