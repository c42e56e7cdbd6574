// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Privilege check with a fixed answer.

use pwnstore_core::PrivilegeCheck;

#[derive(Debug, Clone, Copy)]
pub struct FixedPrivilege(pub bool);

impl FixedPrivilege {
    pub fn elevated() -> Self {
        Self(true)
    }

    pub fn unprivileged() -> Self {
        Self(false)
    }
}

impl PrivilegeCheck for FixedPrivilege {
    fn is_elevated(&self) -> bool {
        self.0
    }
}
