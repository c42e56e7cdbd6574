// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Install, upgrade, uninstall, and configure plugins on the device.
//!
//! Every mutating operation checks privilege first, then validates its
//! input, then downloads whatever it needs, and only then touches the
//! filesystem under the plugin-directory and config locks. A failed download
//! or a refused prompt therefore leaves the device untouched.

use std::fmt;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use pwnstore_core::{
    decode_lossy, find_plugin, require_elevated, validate_archive_path, validate_name,
    OriginType, PluginDescriptor, PrivilegeCheck, PwnstoreError, RegistryDocument,
};
use pwnstore_plugin::{scan_config_hints, ConfigHint};
use pwnstore_registry::RegistryClient;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{info, warn};
use zip::ZipArchive;

use crate::config_store::ConfigStore;
use crate::inspector;
use crate::lock::FileLock;

/// Result of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
    pub name: String,
    /// The file already existed and was overwritten.
    pub reinstall: bool,
    pub path: PathBuf,
    /// Suggested settings; only computed on first install.
    pub hints: Vec<ConfigHint>,
}

/// An installed plugin whose registry version differs from the local one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingUpgrade {
    pub name: String,
    pub local: String,
    pub remote: String,
    pub author: String,
}

impl PendingUpgrade {
    /// Whether the registry version orders below the local one.
    ///
    /// Only informational: any difference is still offered as an upgrade.
    pub fn is_downgrade(&self) -> bool {
        match (parse_version(&self.local), parse_version(&self.remote)) {
            (Some(local), Some(remote)) => remote < local,
            _ => false,
        }
    }
}

impl fmt::Display for PendingUpgrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} -> {}", self.name, self.local, self.remote)
    }
}

/// Parses `1`, `1.2` or `1.2.3[-pre]` as semver by padding missing parts.
fn parse_version(raw: &str) -> Option<semver::Version> {
    let raw = raw.trim().trim_start_matches('v');
    let core_len = raw.find(['-', '+']).unwrap_or(raw.len());
    let (core, rest) = raw.split_at(core_len);
    let padded = match core.split('.').count() {
        1 => format!("{core}.0.0{rest}"),
        2 => format!("{core}.0{rest}"),
        _ => raw.to_string(),
    };
    semver::Version::parse(&padded).ok()
}

/// How a batch upgrade ended.
#[derive(Debug)]
pub enum UpgradeReport {
    UpToDate,
    Cancelled(Vec<PendingUpgrade>),
    Applied {
        upgraded: Vec<InstallOutcome>,
        failed: Vec<(String, PwnstoreError)>,
    },
}

/// Result of a successful uninstall.
#[derive(Debug, Clone, Serialize)]
pub struct UninstallOutcome {
    pub name: String,
    /// Config lines removed under the plugin's prefix.
    pub removed_keys: usize,
}

/// Reconciles requested actions against the registry and the device.
#[derive(Clone)]
pub struct Engine {
    client: RegistryClient,
    privilege: Arc<dyn PrivilegeCheck>,
    plugin_dir: PathBuf,
    config: ConfigStore,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("client", &self.client)
            .field("plugin_dir", &self.plugin_dir)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        client: RegistryClient,
        privilege: Arc<dyn PrivilegeCheck>,
        plugin_dir: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            privilege,
            plugin_dir: plugin_dir.into(),
            config: ConfigStore::new(config_file),
        }
    }

    pub fn client(&self) -> &RegistryClient {
        &self.client
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn require_privilege(&self) -> Result<(), PwnstoreError> {
        require_elevated(self.privilege.as_ref())
    }

    pub async fn registry(&self) -> Result<RegistryDocument, PwnstoreError> {
        self.client.fetch().await
    }

    pub fn installed(&self) -> Result<Vec<String>, PwnstoreError> {
        inspector::installed_plugins(&self.plugin_dir)
    }

    pub fn installed_version(&self, name: &str) -> String {
        inspector::installed_version(&self.plugin_dir, name)
    }

    /// Fetches the registry and installs `name` from it.
    pub async fn install(&self, name: &str) -> Result<InstallOutcome, PwnstoreError> {
        self.require_privilege()?;
        validate_name(name)?;
        let registry = self.registry().await?;
        self.install_from(&registry, name).await
    }

    /// Installs `name` from an already fetched registry.
    pub async fn install_from(
        &self,
        registry: &[PluginDescriptor],
        name: &str,
    ) -> Result<InstallOutcome, PwnstoreError> {
        self.require_privilege()?;
        validate_name(name)?;
        let descriptor = find_plugin(registry, name)
            .ok_or_else(|| PwnstoreError::NotFound(format!("plugin '{name}' not found in registry")))?;

        info!(plugin = name, author = %descriptor.author, origin = %descriptor.origin_type, "installing");
        let payload = self.fetch_payload(descriptor).await?;

        let plugin_dir = self.plugin_dir.clone();
        let config = self.config.clone();
        let owned_name = name.to_string();
        let outcome = tokio::task::spawn_blocking(move || {
            commit_install(&plugin_dir, &config, &owned_name, &payload)
        })
        .await
        .map_err(|e| PwnstoreError::Internal(format!("install task failed: {e}")))??;

        info!(
            plugin = name,
            reinstall = outcome.reinstall,
            path = %outcome.path.display(),
            "installed"
        );
        Ok(outcome)
    }

    /// Downloads the plugin file bytes, extracting from an archive when needed.
    async fn fetch_payload(&self, descriptor: &PluginDescriptor) -> Result<Vec<u8>, PwnstoreError> {
        let fetcher = self.client.downloader();
        match descriptor.origin_type {
            OriginType::Single => fetcher.fetch_bytes(&descriptor.download_url).await,
            OriginType::Zip => {
                let entry = descriptor.archive_entry().ok_or_else(|| {
                    PwnstoreError::Validation(format!(
                        "{} is an archive entry without a path",
                        descriptor.name
                    ))
                })?;
                validate_archive_path(entry)?;
                let archive = fetcher.fetch_bytes(&descriptor.download_url).await?;
                extract_entry(&archive, entry)
            }
        }
    }

    /// Installed plugins whose version differs from the registry's.
    ///
    /// Plain string inequality: a registry version that orders lower still
    /// counts.
    pub fn pending_upgrades(
        &self,
        registry: &[PluginDescriptor],
    ) -> Result<Vec<PendingUpgrade>, PwnstoreError> {
        let mut pending = Vec::new();
        for name in self.installed()? {
            let Some(remote) = find_plugin(registry, &name) else {
                continue;
            };
            let local = self.installed_version(&name);
            if local != remote.version {
                pending.push(PendingUpgrade {
                    local,
                    remote: remote.version.clone(),
                    author: remote.author.clone(),
                    name,
                });
            }
        }
        Ok(pending)
    }

    /// Reinstalls every out-of-date plugin after `confirm` accepts the list.
    ///
    /// `confirm` runs before anything is written. One failed install does not
    /// stop the rest.
    pub async fn upgrade(
        &self,
        confirm: impl FnOnce(&[PendingUpgrade]) -> bool,
    ) -> Result<UpgradeReport, PwnstoreError> {
        self.require_privilege()?;
        let registry = self.registry().await?;
        let pending = self.pending_upgrades(&registry)?;

        if pending.is_empty() {
            return Ok(UpgradeReport::UpToDate);
        }
        if !confirm(&pending) {
            info!(count = pending.len(), "upgrade cancelled");
            return Ok(UpgradeReport::Cancelled(pending));
        }

        let mut upgraded = Vec::new();
        let mut failed = Vec::new();
        for item in &pending {
            match self.install_from(&registry, &item.name).await {
                Ok(outcome) => upgraded.push(outcome),
                Err(e) => {
                    warn!(plugin = %item.name, error = %e, "upgrade failed");
                    failed.push((item.name.clone(), e));
                }
            }
        }
        Ok(UpgradeReport::Applied { upgraded, failed })
    }

    /// Deletes the plugin file and every config line under its prefix.
    pub async fn uninstall(&self, name: &str) -> Result<UninstallOutcome, PwnstoreError> {
        self.require_privilege()?;
        validate_name(name)?;

        let plugin_dir = self.plugin_dir.clone();
        let config = self.config.clone();
        let owned_name = name.to_string();
        let outcome = tokio::task::spawn_blocking(move || {
            commit_uninstall(&plugin_dir, &config, &owned_name)
        })
        .await
        .map_err(|e| PwnstoreError::Internal(format!("uninstall task failed: {e}")))??;

        info!(plugin = name, removed_keys = outcome.removed_keys, "uninstalled");
        Ok(outcome)
    }

    /// Writes user-supplied settings for `name`.
    pub async fn configure(
        &self,
        name: &str,
        values: Vec<(String, String)>,
    ) -> Result<(), PwnstoreError> {
        self.require_privilege()?;
        validate_name(name)?;
        if values.is_empty() {
            return Err(PwnstoreError::Validation(format!(
                "no config values given for {name}"
            )));
        }

        let config = self.config.clone();
        let owned_name = name.to_string();
        tokio::task::spawn_blocking(move || config.apply_values(&owned_name, &values))
            .await
            .map_err(|e| PwnstoreError::Internal(format!("configure task failed: {e}")))?
    }

    /// Suggested settings for an installed plugin.
    pub fn config_hints(&self, name: &str) -> Result<Vec<ConfigHint>, PwnstoreError> {
        validate_name(name)?;
        let source = inspector::installed_source(&self.plugin_dir, name)?;
        Ok(scan_config_hints(&source))
    }
}

/// Reads one entry out of an in-memory archive.
fn extract_entry(archive: &[u8], entry: &str) -> Result<Vec<u8>, PwnstoreError> {
    let mut zip = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| PwnstoreError::Archive(format!("opening archive: {e}")))?;
    let mut file = zip
        .by_name(entry)
        .map_err(|e| PwnstoreError::Archive(format!("{entry}: {e}")))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| PwnstoreError::Archive(format!("reading {entry}: {e}")))?;
    Ok(bytes)
}

fn commit_install(
    plugin_dir: &Path,
    config: &ConfigStore,
    name: &str,
    payload: &[u8],
) -> Result<InstallOutcome, PwnstoreError> {
    std::fs::create_dir_all(plugin_dir)
        .map_err(|e| PwnstoreError::Internal(format!("creating {}: {e}", plugin_dir.display())))?;
    let _dir_lock = FileLock::plugin_dir(plugin_dir)?;

    let path = inspector::plugin_path(plugin_dir, name);
    let reinstall = inspector::is_installed(plugin_dir, name);
    write_plugin_file(plugin_dir, &path, payload)?;
    config.set_enabled(name, true)?;

    let hints = if reinstall {
        Vec::new()
    } else {
        scan_config_hints(&decode_lossy(payload))
    };
    Ok(InstallOutcome {
        name: name.to_string(),
        reinstall,
        path,
        hints,
    })
}

fn write_plugin_file(plugin_dir: &Path, path: &Path, payload: &[u8]) -> Result<(), PwnstoreError> {
    let err = |what: &str, e: std::io::Error| {
        PwnstoreError::Internal(format!("{what} {}: {e}", path.display()))
    };
    let mut tmp = NamedTempFile::new_in(plugin_dir).map_err(|e| err("staging", e))?;
    tmp.write_all(payload).map_err(|e| err("writing", e))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(|e| err("setting permissions on", e))?;
    }
    tmp.persist(path).map_err(|e| err("replacing", e.error))?;
    Ok(())
}

fn commit_uninstall(
    plugin_dir: &Path,
    config: &ConfigStore,
    name: &str,
) -> Result<UninstallOutcome, PwnstoreError> {
    let not_installed = || PwnstoreError::NotFound(format!("plugin {name} is not installed"));
    if !plugin_dir.is_dir() {
        return Err(not_installed());
    }
    let _dir_lock = FileLock::plugin_dir(plugin_dir)?;

    let path = inspector::plugin_path(plugin_dir, name);
    match std::fs::remove_file(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_installed()),
        Err(e) => {
            return Err(PwnstoreError::Internal(format!(
                "removing {}: {e}",
                path.display()
            )))
        }
    }

    let removed_keys = config.remove_all(name)?;
    Ok(UninstallOutcome {
        name: name.to_string(),
        removed_keys,
    })
}
