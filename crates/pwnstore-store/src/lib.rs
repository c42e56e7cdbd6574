// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device-side state for pwnstore: the installed plugin set, the device
//! config file, and the engine that changes both.

pub mod config_store;
pub mod engine;
pub mod inspector;
pub mod lock;

pub use config_store::ConfigStore;
pub use engine::{Engine, InstallOutcome, PendingUpgrade, UninstallOutcome, UpgradeReport};
pub use inspector::{installed_plugins, installed_version, is_installed, plugin_path};
pub use lock::FileLock;
