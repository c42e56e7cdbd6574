// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Elevated-privilege capability check.

use crate::error::PwnstoreError;

/// Answers whether the current process may mutate the device.
pub trait PrivilegeCheck: Send + Sync {
    /// Returns true if the process runs with elevated privilege.
    fn is_elevated(&self) -> bool;
}

/// Checks the effective user id of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessPrivilege;

impl PrivilegeCheck for ProcessPrivilege {
    #[cfg(unix)]
    fn is_elevated(&self) -> bool {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    fn is_elevated(&self) -> bool {
        true
    }
}

/// Fails with [`PwnstoreError::Permission`] unless `check` reports elevation.
pub fn require_elevated(check: &dyn PrivilegeCheck) -> Result<(), PwnstoreError> {
    if check.is_elevated() {
        Ok(())
    } else {
        Err(PwnstoreError::Permission(
            "you must run this command with sudo".to_string(),
        ))
    }
}
