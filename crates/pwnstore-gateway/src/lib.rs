// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded web store.
//!
//! A thin HTTP facade over the install engine: it serves a static page and a
//! small JSON API under a fixed path prefix, and calls the engine in-process
//! with per-action time budgets.

pub mod handlers;
pub mod server;

pub use server::{build_router, start_server, GatewayState, ServerConfig};
