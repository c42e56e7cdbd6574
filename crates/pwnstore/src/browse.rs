// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only commands: `list`, `sources`, `search`, `info`.

use std::collections::HashSet;

use pwnstore_core::{find_plugin, PluginDescriptor, PwnstoreError};
use pwnstore_plugin::{search, short_description, summarize_sources};
use pwnstore_store::{is_installed, Engine};

use crate::output::Printer;

const NAME_WIDTH: usize = 25;
const VERSION_WIDTH: usize = 10;
const STATUS_WIDTH: usize = 10;

/// Run `pwnstore list`.
pub async fn run_list(engine: &Engine, out: &Printer) -> Result<(), PwnstoreError> {
    let registry = engine.registry().await?;
    let installed: HashSet<String> = engine.installed()?.into_iter().collect();

    print_table(&registry.iter().collect::<Vec<_>>(), &installed, out);
    println!();
    println!(
        "{} plugins available, {} installed",
        registry.len(),
        registry.iter().filter(|p| installed.contains(&p.name)).count()
    );
    Ok(())
}

/// Run `pwnstore search <query>`.
pub async fn run_search(engine: &Engine, query: &str, out: &Printer) -> Result<(), PwnstoreError> {
    let registry = engine.registry().await?;
    let matches = search(&registry, query);
    if matches.is_empty() {
        out.warning(&format!("No plugins match '{query}'"));
        return Ok(());
    }

    let installed: HashSet<String> = engine.installed()?.into_iter().collect();
    print_table(&matches, &installed, out);
    println!();
    println!("{} matching plugins", matches.len());
    Ok(())
}

/// Run `pwnstore sources`.
pub async fn run_sources(engine: &Engine, out: &Printer) -> Result<(), PwnstoreError> {
    let registry = engine.registry().await?;
    let mut counts: Vec<(String, usize)> = summarize_sources(&registry).into_iter().collect();
    // Largest first; the map already orders ties by label.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    println!("{}", out.heading("Plugin sources"));
    for (label, count) in &counts {
        println!("  {count:>4}  {label}");
    }
    println!();
    println!("{} plugins from {} sources", registry.len(), counts.len());
    Ok(())
}

/// Run `pwnstore info <name>`.
pub async fn run_info(engine: &Engine, name: &str, out: &Printer) -> Result<(), PwnstoreError> {
    let registry = engine.registry().await?;
    let plugin = find_plugin(&registry, name)
        .ok_or_else(|| PwnstoreError::NotFound(format!("plugin '{name}' not found in registry")))?;

    let local = is_installed(engine.plugin_dir(), &plugin.name)
        .then(|| engine.installed_version(&plugin.name));

    println!("{}", out.name(&plugin.name, 0));
    for (label, value) in info_fields(plugin, local.as_deref()) {
        println!("  {:<12} {value}", format!("{label}:"));
    }
    Ok(())
}

/// Labelled fields shown by `info`.
fn info_fields(plugin: &PluginDescriptor, local: Option<&str>) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("Author", plugin.author.clone()),
        ("Version", plugin.version.clone()),
        ("Category", plugin.category.to_string()),
        ("Origin", plugin.origin_type.to_string()),
        ("Download", plugin.download_url.clone()),
    ];
    if let Some(path) = plugin.archive_entry() {
        fields.push(("Archive path", path.to_string()));
    }
    fields.push((
        "Installed",
        match local {
            Some(version) => format!("yes (v{version})"),
            None => "no".to_string(),
        },
    ));
    fields.push(("Description", plugin.description.clone()));
    fields
}

fn print_table(plugins: &[&PluginDescriptor], installed: &HashSet<String>, out: &Printer) {
    println!(
        "{}",
        out.heading(&format!(
            "{:<NAME_WIDTH$} {:<VERSION_WIDTH$} {:<STATUS_WIDTH$} DESCRIPTION",
            "NAME", "VERSION", "STATUS"
        ))
    );
    for plugin in plugins {
        println!(
            "{} {:<VERSION_WIDTH$} {} {}",
            out.name(&plugin.name, NAME_WIDTH),
            plugin.version,
            out.status(installed.contains(&plugin.name), STATUS_WIDTH),
            out.dim(&short_description(&plugin.description)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwnstore_test_utils::{single_descriptor, zip_descriptor};

    #[test]
    fn info_marks_install_state() {
        let plugin = single_descriptor("x", "2.0", "http://h/x.py");
        let fields = info_fields(&plugin, Some("1.0"));
        assert!(fields.contains(&("Installed", "yes (v1.0)".to_string())));
        assert!(fields.contains(&("Origin", "single".to_string())));

        let fields = info_fields(&plugin, None);
        assert!(fields.contains(&("Installed", "no".to_string())));
    }

    #[test]
    fn info_shows_archive_path_for_zip_plugins() {
        let plugin = zip_descriptor("y", "1.0", "http://h/repo.zip", "repo-main/y.py");
        let fields = info_fields(&plugin, None);
        assert!(fields.contains(&("Archive path", "repo-main/y.py".to_string())));
    }
}
