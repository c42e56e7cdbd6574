// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for pwnstore integration tests.
//!
//! Provides fakes for the network and privilege seams plus a throwaway device
//! layout, so engine and gateway tests run without a network or root.
//!
//! # Components
//!
//! - [`MockFetcher`] - canned HTTP bodies keyed by URL
//! - [`FixedPrivilege`] - privilege check with a fixed answer
//! - [`TestDevice`] - temp plugin directory and device config file

pub mod harness;
pub mod mock_fetcher;
pub mod privilege;

pub use harness::{single_descriptor, zip_archive, zip_descriptor, TestDevice};
pub use mock_fetcher::MockFetcher;
pub use privilege::FixedPrivilege;
