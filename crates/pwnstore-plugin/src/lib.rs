// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin source analysis for pwnstore.
//!
//! Everything here is pure text processing: metadata extraction, category
//! classification, configuration hints, and queries over a registry
//! document. No network or filesystem access.

pub mod catalog;
pub mod classifier;
pub mod extractor;
pub mod hints;

pub use catalog::{search, short_description, source_label, summarize_sources};
pub use classifier::classify;
pub use extractor::{extract_descriptor, local_version, plugin_name, scan_metadata, RawMetadata};
pub use hints::{scan_config_hints, ConfigHint, FieldType};
