// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Throwaway device layout and archive fixtures.
//!
//! `TestDevice` gives each test its own plugin directory and device config
//! file inside a temp dir that is removed on drop.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use pwnstore_core::types::PLUGIN_SUFFIX;
use pwnstore_core::{OriginType, PluginDescriptor};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Builds an in-memory zip archive from `(entry path, contents)` pairs.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (path, contents) in entries {
        writer
            .start_file(*path, SimpleFileOptions::default())
            .expect("start zip entry");
        writer
            .write_all(contents.as_bytes())
            .expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

/// A descriptor for a standalone plugin file at `url`.
pub fn single_descriptor(name: &str, version: &str, url: &str) -> PluginDescriptor {
    PluginDescriptor {
        name: name.to_string(),
        version: version.to_string(),
        description: format!("{name} plugin"),
        author: "tester".to_string(),
        category: Default::default(),
        origin_type: OriginType::Single,
        download_url: url.to_string(),
        path_inside_zip: None,
    }
}

/// A descriptor for an archive entry.
pub fn zip_descriptor(name: &str, version: &str, url: &str, entry: &str) -> PluginDescriptor {
    PluginDescriptor {
        origin_type: OriginType::Zip,
        path_inside_zip: Some(entry.to_string()),
        ..single_descriptor(name, version, url)
    }
}

/// A plugin directory plus device config file in a temp dir.
pub struct TestDevice {
    _root: TempDir,
    plugin_dir: PathBuf,
    config_file: PathBuf,
}

impl TestDevice {
    /// An empty device: the plugin directory is not created yet and the
    /// config file holds a single unrelated line.
    pub fn new() -> Self {
        Self::with_config("main.name = \"pwny\"\n")
    }

    /// A device whose config file starts with `config`.
    pub fn with_config(config: &str) -> Self {
        let root = TempDir::new().expect("create temp dir");
        let plugin_dir = root.path().join("custom-plugins");
        let config_file = root.path().join("config.toml");
        std::fs::write(&config_file, config).expect("seed config file");
        Self {
            _root: root,
            plugin_dir,
            config_file,
        }
    }

    pub fn plugin_dir(&self) -> &Path {
        &self.plugin_dir
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    /// Path the plugin called `name` is installed at.
    pub fn plugin_path(&self, name: &str) -> PathBuf {
        self.plugin_dir.join(format!("{name}{PLUGIN_SUFFIX}"))
    }

    /// Writes an installed plugin file directly, bypassing the engine.
    pub fn install_file(&self, name: &str, code: &str) {
        std::fs::create_dir_all(&self.plugin_dir).expect("create plugin dir");
        std::fs::write(self.plugin_path(name), code).expect("write plugin file");
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugin_path(name).exists()
    }

    pub fn config_text(&self) -> String {
        std::fs::read_to_string(&self.config_file).expect("read config file")
    }

    /// Config lines that start with `prefix` after trimming.
    pub fn config_lines_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.config_text()
            .lines()
            .filter(|line| line.trim().starts_with(prefix))
            .map(str::to_string)
            .collect()
    }
}

impl Default for TestDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zip_fixture_round_trips_entries() {
        let bytes = zip_archive(&[("dir/a.py", "x = 1\n")]);
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.by_index(0).unwrap().name(), "dir/a.py");
    }

    #[test]
    fn device_starts_without_plugin_dir() {
        let device = TestDevice::new();
        assert!(!device.plugin_dir().exists());
        device.install_file("x", "pass\n");
        assert!(device.has_plugin("x"));
        assert!(device.config_text().contains("main.name"));
    }
}
