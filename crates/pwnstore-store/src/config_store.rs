// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Line-preserving edits to the device configuration file.
//!
//! The device config is treated as lines of text, not parsed as TOML: only
//! lines under `main.plugins.<name>.` are ever rewritten, and every other
//! line is written back byte for byte in its original position.
//!
//! The `*_lines` functions are pure text transforms. [`ConfigStore`] wraps
//! them in lock, read, atomic replace.

use std::io::Write;
use std::path::{Path, PathBuf};

use pwnstore_core::{config_key_prefix, is_safe_name, PwnstoreError};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::lock::FileLock;

const ENABLED_FIELD: &str = "enabled";

/// Splits a `key = value` line, trimming both sides.
fn parse_assignment(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once('=')?;
    Some((key.trim(), value.trim()))
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with('\n') { "\n" } else { "" }
}

fn push_with_newline(out: &mut String, line: &str) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(line);
    out.push('\n');
}

/// Quotes a value as a single-line TOML basic string.
fn quote_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Sets `main.plugins.<name>.enabled`.
///
/// The first assignment to the key, whatever its value, is rewritten as a
/// bare boolean and any later duplicates are dropped. With no such line,
/// enabling appends one and disabling changes nothing.
pub fn set_enabled_lines(text: &str, name: &str, enabled: bool) -> String {
    let key = format!("{}{ENABLED_FIELD}", config_key_prefix(name));
    let mut out = String::with_capacity(text.len() + key.len() + 8);
    let mut found = false;

    for line in text.split_inclusive('\n') {
        let is_flag = matches!(parse_assignment(line), Some((k, _)) if k == key);
        if !is_flag {
            out.push_str(line);
        } else if !found {
            found = true;
            out.push_str(&format!("{key} = {enabled}{}", line_ending(line)));
        }
    }

    if !found && enabled {
        push_with_newline(&mut out, &format!("{key} = true"));
    }
    out
}

/// Writes `values` under the plugin's prefix as quoted strings.
///
/// Existing lines for a supplied key are rewritten in place; keys never seen
/// are appended at the end in the order given.
pub fn apply_values_lines(text: &str, name: &str, values: &[(String, String)]) -> String {
    let prefix = config_key_prefix(name);
    let mut out = String::with_capacity(text.len());
    let mut written = vec![false; values.len()];

    for line in text.split_inclusive('\n') {
        let field = parse_assignment(line).and_then(|(k, _)| k.strip_prefix(prefix.as_str()));
        let position = field.and_then(|f| values.iter().position(|(k, _)| k == f));
        match position {
            Some(i) => {
                let (field, value) = &values[i];
                written[i] = true;
                out.push_str(&format!(
                    "{prefix}{field} = {}{}",
                    quote_value(value),
                    line_ending(line)
                ));
            }
            None => out.push_str(line),
        }
    }

    for ((field, value), done) in values.iter().zip(written) {
        if !done {
            push_with_newline(&mut out, &format!("{prefix}{field} = {}", quote_value(value)));
        }
    }
    out
}

/// Drops every line whose trimmed text starts with the plugin's prefix.
pub fn remove_all_lines(text: &str, name: &str) -> (String, usize) {
    let prefix = config_key_prefix(name);
    let mut removed = 0;
    let kept: String = text
        .split_inclusive('\n')
        .filter(|line| {
            let drop = line.trim().starts_with(&prefix);
            removed += usize::from(drop);
            !drop
        })
        .collect();
    (kept, removed)
}

/// Existing settings for a plugin as `(field, raw value)`, in file order.
pub fn plugin_settings(text: &str, name: &str) -> Vec<(String, String)> {
    let prefix = config_key_prefix(name);
    text.lines()
        .filter_map(parse_assignment)
        .filter_map(|(k, v)| {
            k.strip_prefix(prefix.as_str())
                .map(|field| (field.to_string(), v.to_string()))
        })
        .collect()
}

/// The device config file, edited only through locked full-file rewrites.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<config>.backup`, written before user-driven edits.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".backup");
        PathBuf::from(name)
    }

    /// Current file contents. A missing file reads as empty.
    pub fn read(&self) -> Result<String, PwnstoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(PwnstoreError::config_io(
                format!("reading {}", self.path.display()),
                e,
            )),
        }
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<(), PwnstoreError> {
        self.edit(|text| (set_enabled_lines(text, name, enabled), ()))?;
        info!(plugin = name, enabled, "config flag updated");
        Ok(())
    }

    /// Writes user-supplied settings, after a best-effort backup.
    ///
    /// `enabled` belongs to install and uninstall and is refused here.
    pub fn apply_values(&self, name: &str, values: &[(String, String)]) -> Result<(), PwnstoreError> {
        if let Some((bad, _)) = values.iter().find(|(k, _)| !is_safe_name(k)) {
            return Err(PwnstoreError::Validation(format!(
                "invalid config key `{bad}` for plugin {name}"
            )));
        }
        if values.iter().any(|(k, _)| k == ENABLED_FIELD) {
            return Err(PwnstoreError::Validation(format!(
                "`{ENABLED_FIELD}` for plugin {name} is managed by install and uninstall"
            )));
        }

        let _lock = FileLock::config(&self.path)?;
        if let Err(e) = std::fs::copy(&self.path, self.backup_path()) {
            warn!(path = %self.path.display(), error = %e, "could not back up config");
        }
        let text = self.read()?;
        self.write(&apply_values_lines(&text, name, values))?;
        info!(plugin = name, count = values.len(), "config values written");
        Ok(())
    }

    /// Removes every setting of a plugin, returning how many lines went.
    pub fn remove_all(&self, name: &str) -> Result<usize, PwnstoreError> {
        let removed = self.edit(|text| remove_all_lines(text, name))?;
        info!(plugin = name, removed, "config entries removed");
        Ok(removed)
    }

    pub fn settings(&self, name: &str) -> Result<Vec<(String, String)>, PwnstoreError> {
        Ok(plugin_settings(&self.read()?, name))
    }

    fn edit<T>(&self, transform: impl FnOnce(&str) -> (String, T)) -> Result<T, PwnstoreError> {
        let _lock = FileLock::config(&self.path)?;
        let text = self.read()?;
        let (updated, result) = transform(&text);
        if updated != text {
            self.write(&updated)?;
        } else {
            debug!(path = %self.path.display(), "config unchanged");
        }
        Ok(result)
    }

    /// Replaces the file through a temp file in the same directory, so a
    /// crash leaves either the old or the new contents.
    fn write(&self, text: &str) -> Result<(), PwnstoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let io = |what: &str, e: std::io::Error| {
            PwnstoreError::config_io(format!("{what} {}", self.path.display()), e)
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| io("staging", e))?;
        tmp.write_all(text.as_bytes()).map_err(|e| io("writing", e))?;
        tmp.as_file().sync_all().map_err(|e| io("syncing", e))?;
        if let Ok(meta) = std::fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| io("setting permissions on", e))?;
        }
        tmp.persist(&self.path).map_err(|e| io("replacing", e.error))?;
        Ok(())
    }
}
