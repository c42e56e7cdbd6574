// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams between pwnstore and the outside world.
//!
//! Network access and the ambient process identity are both injected through
//! these traits so the engine, builder, and web facade can be exercised with
//! fakes.

pub mod fetcher;
pub mod privilege;

pub use fetcher::Fetcher;
pub use privilege::{require_elevated, PrivilegeCheck, ProcessPrivilege};
