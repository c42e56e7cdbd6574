// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input validation guarding the plugin directory against path escape.

use crate::error::PwnstoreError;

/// Returns true if `name` consists only of ASCII letters, digits, `_` and `-`.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Rejects plugin names that could escape the plugin directory.
pub fn validate_name(name: &str) -> Result<(), PwnstoreError> {
    if is_safe_name(name) {
        Ok(())
    } else {
        Err(PwnstoreError::Validation(format!(
            "invalid characters in plugin name `{name}`"
        )))
    }
}

/// True for a Windows drive prefix such as `C:` at the start of `path`.
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Rejects archive entry paths that are absolute, carry a drive prefix, or
/// climb out of the archive root.
pub fn validate_archive_path(path: &str) -> Result<(), PwnstoreError> {
    if path.is_empty() {
        return Err(PwnstoreError::Validation(
            "archive entry path is empty".to_string(),
        ));
    }

    if path.starts_with('/') || path.starts_with('\\') || has_drive_prefix(path) {
        return Err(PwnstoreError::Validation(format!(
            "malicious zip path detected: `{path}` is absolute"
        )));
    }

    if path.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(PwnstoreError::Validation(format!(
            "malicious zip path detected: `{path}` leaves the archive root"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_unsafe_names() {
        assert!(validate_name("../evil").is_err());
        assert!(validate_name("foo/bar").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("name with space").is_err());
        assert!(validate_name("dots.py").is_err());
    }

    #[test]
    fn accepts_plain_names() {
        assert!(validate_name("my_plugin-2").is_ok());
        assert!(validate_name("GPS").is_ok());
    }

    #[test]
    fn rejects_escaping_archive_paths() {
        assert!(validate_archive_path("../../etc/passwd").is_err());
        assert!(validate_archive_path("/etc/passwd").is_err());
        assert!(validate_archive_path("repo/../../x.py").is_err());
        assert!(validate_archive_path("repo\\..\\x.py").is_err());
        assert!(validate_archive_path("").is_err());
    }

    #[test]
    fn rejects_drive_prefixed_archive_paths() {
        assert!(validate_archive_path("C:/x.py").is_err());
        assert!(validate_archive_path("C:\\x.py").is_err());
        assert!(validate_archive_path("d:x.py").is_err());
        assert!(validate_archive_path("repo/C:x.py").is_ok());
    }

    #[test]
    fn accepts_nested_archive_paths() {
        assert!(validate_archive_path("subdir/plugin.py").is_ok());
        assert!(validate_archive_path("repo-main/plugins/a..b.py").is_ok());
    }

    proptest! {
        #[test]
        fn safe_names_never_contain_separators(name in "\\PC*") {
            if is_safe_name(&name) {
                prop_assert!(!name.contains('/'));
                prop_assert!(!name.contains('.'));
                prop_assert!(!name.is_empty());
            }
        }
    }
}
