// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pwnstore serve` command and process-wide logging setup.

use std::time::Duration;

use pwnstore_config::PwnstoreConfig;
use pwnstore_core::PwnstoreError;
use pwnstore_gateway::{start_server, GatewayState, ServerConfig};
use pwnstore_store::Engine;
use tracing::info;

/// Run the embedded web store until the process is stopped.
pub async fn run_serve(config: &PwnstoreConfig, engine: Engine) -> Result<(), PwnstoreError> {
    let gateway = &config.gateway;
    let server = ServerConfig {
        host: gateway.host.clone(),
        port: gateway.port,
        path_prefix: gateway.path_prefix.clone(),
    };
    let state = GatewayState {
        engine,
        install_timeout: Duration::from_secs(gateway.install_timeout_secs),
        uninstall_timeout: Duration::from_secs(gateway.uninstall_timeout_secs),
        configure_timeout: Duration::from_secs(gateway.configure_timeout_secs),
    };

    info!(
        "web store at http://{}:{}{}/",
        server.host, server.port, server.path_prefix
    );
    start_server(&server, state).await
}

/// Initialize the tracing subscriber. Logs go to stderr so command output on
/// stdout stays clean.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pwnstore={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
