// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for pwnstore.
//!
//! Holds the registry data model, the shared error taxonomy, input
//! validation, and the network and privilege seams every other crate
//! depends on.

pub mod error;
pub mod traits;
pub mod types;
pub mod validate;

pub use error::PwnstoreError;
pub use traits::fetcher::decode_lossy;
pub use traits::{require_elevated, Fetcher, PrivilegeCheck, ProcessPrivilege};
pub use types::{
    config_key_prefix, find_plugin, Category, OriginType, PluginDescriptor, RegistryDocument,
};
pub use validate::{is_safe_name, validate_archive_path, validate_name};
