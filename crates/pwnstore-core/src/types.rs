// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry data model shared by the builder, client, engine, and web facade.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Suffix every plugin file carries, both in archives and on the device.
pub const PLUGIN_SUFFIX: &str = ".py";

/// Version recorded when a plugin file declares none.
pub const DEFAULT_VERSION: &str = "0.0.1";

/// Author recorded when a plugin file declares none.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// Description recorded when a plugin file declares none.
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Local version reported for a missing file or a file without `__version__`.
pub const UNKNOWN_LOCAL_VERSION: &str = "0.0.0";

/// Category label assigned to a plugin by keyword heuristics.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum Category {
    Hardware,
    Social,
    #[serde(rename = "GPS")]
    #[strum(serialize = "GPS")]
    Gps,
    Attack,
    Display,
    System,
    #[default]
    General,
}

/// Whether a descriptor points at a standalone file or an archive entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum OriginType {
    Single,
    Zip,
}

/// One installable plugin as published in the registry document.
///
/// Field names are part of the wire format and must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
    /// Older registry documents predate categories.
    #[serde(default)]
    pub category: Category,
    pub origin_type: OriginType,
    /// The standalone file, or the archive containing the plugin.
    pub download_url: String,
    /// Entry path inside the archive; present iff `origin_type` is `zip`.
    #[serde(default)]
    pub path_inside_zip: Option<String>,
}

impl PluginDescriptor {
    /// The in-archive path, if this descriptor is a well-formed archive entry.
    pub fn archive_entry(&self) -> Option<&str> {
        match self.origin_type {
            OriginType::Zip => self.path_inside_zip.as_deref().filter(|p| !p.is_empty()),
            OriginType::Single => None,
        }
    }
}

/// The published registry: descriptors in crawl order.
pub type RegistryDocument = Vec<PluginDescriptor>;

/// Linear lookup by name. The first-registered descriptor wins when a name
/// appears more than once.
pub fn find_plugin<'a>(registry: &'a [PluginDescriptor], name: &str) -> Option<&'a PluginDescriptor> {
    registry.iter().find(|p| p.name == name)
}

/// Dotted key prefix under which a plugin's settings live in the device config.
pub fn config_key_prefix(name: &str) -> String {
    format!("main.plugins.{name}.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn descriptor(name: &str, version: &str) -> PluginDescriptor {
        PluginDescriptor {
            name: name.to_string(),
            version: version.to_string(),
            description: NO_DESCRIPTION.to_string(),
            author: DEFAULT_AUTHOR.to_string(),
            category: Category::General,
            origin_type: OriginType::Single,
            download_url: format!("http://h/{name}.py"),
            path_inside_zip: None,
        }
    }

    #[test]
    fn category_labels_match_registry_format() {
        assert_eq!(Category::Gps.to_string(), "GPS");
        assert_eq!(serde_json::to_string(&Category::Gps).unwrap(), "\"GPS\"");
        assert_eq!(Category::from_str("Hardware").unwrap(), Category::Hardware);
        assert_eq!(Category::default(), Category::General);
    }

    #[test]
    fn origin_type_is_lowercase_on_the_wire() {
        assert_eq!(serde_json::to_string(&OriginType::Zip).unwrap(), "\"zip\"");
        assert_eq!(OriginType::Single.to_string(), "single");
    }

    #[test]
    fn missing_category_defaults_to_general() {
        let json = r#"{
            "name": "old",
            "version": "1.0",
            "description": "predates categories",
            "author": "someone",
            "origin_type": "single",
            "download_url": "http://h/old.py",
            "path_inside_zip": null
        }"#;
        let parsed: PluginDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.category, Category::General);
        assert!(parsed.path_inside_zip.is_none());
    }

    #[test]
    fn serializes_stable_field_names() {
        let value = serde_json::to_value(descriptor("x", "2.0")).unwrap();
        let object = value.as_object().unwrap();
        for field in [
            "name",
            "version",
            "description",
            "author",
            "category",
            "origin_type",
            "download_url",
            "path_inside_zip",
        ] {
            assert!(object.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn first_registered_duplicate_wins() {
        let registry = vec![descriptor("dup", "1.0"), descriptor("dup", "2.0")];
        assert_eq!(find_plugin(&registry, "dup").unwrap().version, "1.0");
        assert!(find_plugin(&registry, "missing").is_none());
    }

    #[test]
    fn archive_entry_requires_zip_origin_and_path() {
        let mut d = descriptor("z", "1.0");
        assert!(d.archive_entry().is_none());
        d.origin_type = OriginType::Zip;
        assert!(d.archive_entry().is_none());
        d.path_inside_zip = Some("repo-main/z.py".into());
        assert_eq!(d.archive_entry(), Some("repo-main/z.py"));
    }

    #[test]
    fn config_prefix_is_dotted() {
        assert_eq!(config_key_prefix("gps"), "main.plugins.gps.");
    }
}
